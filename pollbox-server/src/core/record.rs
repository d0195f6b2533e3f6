/*
<key>.req   empty placeholder, its existence means "pending"
<key>.resp  [ status code, decimal ] \n [ body ... ]
*/
use crate::core::error::BrokerError;

/// A backend's answer for one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    pub status_code: i32,
    pub body: String,
}

impl ResponseRecord {
    pub fn new(status_code: i32, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
        }
    }

    /// The status line ends at the first `\r\n`, `\n` or lone `\r`, after
    /// a leading byte order mark is dropped. Surrounding whitespace on the
    /// status line is tolerated; the body is kept byte for byte.
    pub fn parse(raw: &str) -> Result<Self, BrokerError> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let (status_line, body) = split_status_line(raw);

        let status_code = status_line.trim().parse::<i32>().map_err(|_| {
            BrokerError::MalformedRecord(format!(
                "status line {:?} is not an integer",
                status_line
            ))
        })?;

        Ok(Self {
            status_code,
            body: body.to_string(),
        })
    }

    pub fn render(&self) -> String {
        format!("{}\n{}", self.status_code, self.body)
    }
}

fn split_status_line(raw: &str) -> (&str, &str) {
    let Some(end) = raw.find(|c: char| c == '\r' || c == '\n') else {
        return (raw, "");
    };
    let rest = &raw[end..];
    let body = rest.strip_prefix("\r\n").unwrap_or(&rest[1..]);
    (&raw[..end], body)
}
