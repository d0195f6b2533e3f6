use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use crate::core::error::BrokerError;
use crate::core::key::RequestKey;
use crate::core::record::ResponseRecord;

pub const REQUEST_EXTENSION: &str = "req";
pub const RESPONSE_EXTENSION: &str = "resp";

/// A request record found on disk, as reported by [`Storage::pending_requests`].
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub key: String,
    pub modified: SystemTime,
}

/// Flat directory of `<key>.req` / `<key>.resp` files.
///
/// `Storage` does no locking of its own.
#[derive(Debug)]
pub struct Storage {
    base_dir: PathBuf,
}

impl Storage {
    /// The directory must already exist; it is never created here.
    pub fn open<P: AsRef<Path>>(base_dir: P) -> Result<Self, BrokerError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        if !base_dir.is_dir() {
            return Err(BrokerError::StorageDirMissing(base_dir));
        }
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn request_path(&self, key: &RequestKey) -> PathBuf {
        self.record_path(key, REQUEST_EXTENSION)
    }

    pub fn response_path(&self, key: &RequestKey) -> PathBuf {
        self.record_path(key, RESPONSE_EXTENSION)
    }

    fn record_path(&self, key: &RequestKey, extension: &str) -> PathBuf {
        self.base_dir.join(format!("{}.{}", key, extension))
    }

    /// Creates or truncates the empty request placeholder.
    pub fn write_request(&self, key: &RequestKey) -> io::Result<()> {
        File::create(self.request_path(key))?;
        Ok(())
    }

    /// `Ok(None)` when no response file exists. Invalid UTF-8 is replaced
    /// rather than treated as a fault.
    pub fn read_response(&self, key: &RequestKey) -> io::Result<Option<String>> {
        match fs::read(self.response_path(key)) {
            Ok(raw) => Ok(Some(String::from_utf8_lossy(&raw).into_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Returns `false` if the file was already gone.
    pub fn remove(&self, path: &Path) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Writes a response the way a backend should: to a temp file first, then
    /// renamed into place so a reader never sees a partial record.
    pub fn write_response(&self, key: &RequestKey, record: &ResponseRecord) -> io::Result<()> {
        let path = self.response_path(key);
        let tmp_path = path.with_extension("resp.tmp");
        {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(record.render().as_bytes())?;
            tmp_file.flush()?;
        }
        fs::rename(&tmp_path, &path)
    }

    pub fn pending_requests(&self) -> io::Result<Vec<PendingRequest>> {
        let mut pending = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(REQUEST_EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
                Ok(modified) => modified,
                // consumed between read_dir and stat
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            pending.push(PendingRequest {
                key: key.to_string(),
                modified,
            });
        }
        pending.sort_by_key(|p| p.modified);
        Ok(pending)
    }
}
