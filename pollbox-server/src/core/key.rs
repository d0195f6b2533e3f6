use std::fmt;
use md5::{Digest, Md5};
use crate::core::error::BrokerError;

/// What a request is identified by: an HTTP-style method and path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub method: String,
    pub path: String,
}

impl RequestIdentity {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// Correlation key handed out by `create_request` and presented back on polls.
///
/// Keys double as file stems in the storage directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    /// `hex(md5(method ++ path))`, lowercase, no separator between the parts.
    ///
    /// Two callers hitting the same method and path get the same key and so
    /// share one correlation slot.
    pub fn derive(identity: &RequestIdentity) -> Self {
        let mut hasher = Md5::new();
        hasher.update(identity.method.as_bytes());
        hasher.update(identity.path.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Accepts a caller-supplied key.
    ///
    /// Blank keys are rejected, as is anything that could name a file outside
    /// the storage directory. The key is otherwise taken verbatim, it does not
    /// have to look like an MD5 digest.
    pub fn parse(raw: &str) -> Result<Self, BrokerError> {
        if raw.trim().is_empty() {
            return Err(BrokerError::EmptyKey);
        }
        if raw.contains(['/', '\\', '.', '\0']) {
            return Err(BrokerError::InvalidKey(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RequestKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
