use std::path::PathBuf;
use std::sync::Arc;

use ifchanged::fs::FileSystem;
use ifchanged::fs::mock::MockFileSystem;

/// Builder for a `MockFileSystem` to simplify test setup.
pub struct MockTree {
    fs: MockFileSystem,
}

impl MockTree {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
        }
    }

    pub fn file(self, path: &str, secs: u64) -> Self {
        self.fs.add_file(path, secs);
        self
    }

    pub fn dir(self, path: &str) -> Self {
        self.fs.add_dir(path);
        self
    }

    pub fn link(self, path: &str, target: &str) -> Self {
        self.fs.add_link(path, target);
        self
    }

    /// Return the mock plus the same filesystem as a trait object for the
    /// runtime. Both share state.
    pub fn build(self) -> (MockFileSystem, Arc<dyn FileSystem>) {
        let shared: Arc<dyn FileSystem> = Arc::new(self.fs.clone());
        (self.fs, shared)
    }
}

impl Default for MockTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert string literals into a watch set.
pub fn watch_set(paths: &[&str]) -> Vec<PathBuf> {
    paths.iter().map(PathBuf::from).collect()
}
