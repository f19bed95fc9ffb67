use crate::store::{Store, StoreOptions};
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    // We keep _temp_dir to ensure the directory is not dropped until the test is done
    pub _temp_dir: TempDir,
    pub store: Store,
    pub root: PathBuf,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_options(StoreOptions::default())
    }

    pub fn with_options(options: StoreOptions) -> Self {
        let temp_dir = tempfile::tempdir().expect("failed to create temp dir");
        let root = temp_dir.path().join("db");
        let store = Store::open(&root, options).expect("failed to open store");
        Self {
            _temp_dir: temp_dir,
            store,
            root,
        }
    }

    /// Names of the files currently in a collection directory, sorted.
    pub fn files(&self, collection: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.root.join(collection))
            .map(|entries| {
                entries
                    .filter_map(|e| e.ok())
                    .map(|e| e.file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }
}
