#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;
use pollbox::core::{FileMessageHandler, MessageBroker, RequestKey, ResponseRecord};
use tempfile::TempDir;

pub fn folder_to_use() -> TempDir {
    tempfile::Builder::new()
        .prefix("pollbox_test_")
        .tempdir()
        .expect("failed to create temp dir")
}

pub fn broker_in(dir: &Path) -> (Arc<FileMessageHandler>, MessageBroker) {
    let handler = Arc::new(FileMessageHandler::open(dir).expect("storage dir should exist"));
    let broker = MessageBroker::new(handler.clone());
    (handler, broker)
}

/// Plays the backend: writes `<key>.resp` the way a backend would.
pub fn answer(handler: &FileMessageHandler, key: &RequestKey, status_code: i32, body: &str) {
    handler
        .storage()
        .write_response(key, &ResponseRecord::new(status_code, body))
        .expect("backend write failed");
}

pub fn write_raw_response(dir: &Path, key: &str, raw: &str) {
    fs::write(dir.join(format!("{}.resp", key)), raw).expect("raw write failed");
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
