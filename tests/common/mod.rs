//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use sensorbox::{MemStore, Store};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A scratch directory plus a container path inside it.
pub fn scratch(name: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    (dir, path)
}

/// `/header/length` of a stored tree.
pub fn stored_length(store: &MemStore) -> Option<i64> {
    let id = store.resolve("/header/length")?;
    store.dataset(id).ok()?.scalar_value::<i64>()
}

pub fn frame_names(store: &MemStore) -> Vec<String> {
    let data = store.resolve("/data").expect("missing /data");
    store.child_names(data).expect("/data is not a group")
}

pub fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
