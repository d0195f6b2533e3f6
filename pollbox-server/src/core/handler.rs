use std::io;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};
use crate::core::error::BrokerError;
use crate::core::key::{RequestIdentity, RequestKey};
use crate::core::record::ResponseRecord;
use crate::core::storage::{PendingRequest, Storage};

/// Result of looking up a key's response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// No response record yet. Not an error, the caller polls again later.
    NotFound,
    /// A response record exists but its status line is unusable. The record
    /// is left on disk untouched.
    Malformed,
    /// The response was read and its records removed.
    Answered(ResponseRecord),
}

/// Storage side of the broker: records requests and hands back responses.
pub trait MessageHandler: Send + Sync {
    fn create_request(&self, identity: &RequestIdentity) -> Result<RequestKey, BrokerError>;

    fn get_response(&self, key: &RequestKey) -> Result<HandlerOutcome, BrokerError>;
}

/// File-backed handler. One lock covers every record operation for every key.
///
/// The lock is held across read and delete in `get_response`, so a response
/// is handed to at most one caller even when several poll the same key.
#[derive(Debug)]
pub struct FileMessageHandler {
    storage: Storage,
    lock: Mutex<()>,
}

impl FileMessageHandler {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, BrokerError> {
        Ok(Self::new(Storage::open(dir)?))
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Request records currently on disk, oldest first.
    pub fn pending_requests(&self) -> io::Result<Vec<PendingRequest>> {
        let _guard = self.lock();
        self.storage.pending_requests()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The guarded value is `()`, a panic elsewhere cannot leave it torn.
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn discard_consumed(&self, key: &RequestKey) {
        for path in [self.storage.request_path(key), self.storage.response_path(key)] {
            match self.storage.remove(&path) {
                Ok(true) => {}
                Ok(false) => debug!(%key, path = %path.display(), "record already absent"),
                Err(e) => warn!(
                    %key,
                    path = %path.display(),
                    error = %e,
                    "failed to delete consumed record"
                ),
            }
        }
    }
}

impl MessageHandler for FileMessageHandler {
    fn create_request(&self, identity: &RequestIdentity) -> Result<RequestKey, BrokerError> {
        let key = RequestKey::derive(identity);
        {
            let _guard = self.lock();
            self.storage.write_request(&key)?;
        }
        debug!(%key, method = %identity.method, path = %identity.path, "request recorded");
        Ok(key)
    }

    fn get_response(&self, key: &RequestKey) -> Result<HandlerOutcome, BrokerError> {
        let _guard = self.lock();

        let Some(raw) = self.storage.read_response(key)? else {
            return Ok(HandlerOutcome::NotFound);
        };

        let record = match ResponseRecord::parse(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(%key, error = %e, "leaving malformed response record in place");
                return Ok(HandlerOutcome::Malformed);
            }
        };

        self.discard_consumed(key);
        debug!(%key, status_code = record.status_code, "response consumed");
        Ok(HandlerOutcome::Answered(record))
    }
}
