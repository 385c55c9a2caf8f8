//! Common test utilities

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated working directory laid out like the
/// staging area.
pub struct TestEnvironment {
    pub root: TempDir,
    pub data_dir: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let data_dir = root.path().join("unanet_imu").join("data");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        Self { root, data_dir }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Write `contents` to `name` inside the data directory.
    pub fn stage(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.data_dir.join(name);
        std::fs::write(&path, contents).expect("Failed to stage file");
        path
    }

    pub fn read(&self, path: &Path) -> String {
        std::fs::read_to_string(path).expect("Failed to read file")
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
