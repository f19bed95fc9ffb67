use super::backend::StorageBackend;
use crate::error::{Result, StoreError};
use crate::record::RECORD_EXT;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Filesystem backend: `<root>/<collection>/<resource>.json`.
#[derive(Debug, Clone)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn record_path(&self, collection: &str, resource: &str) -> PathBuf {
        self.collection_dir(collection)
            .join(Self::record_filename(resource))
    }

    fn record_filename(resource: &str) -> String {
        format!("{}.{}", resource, RECORD_EXT)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(|e| StoreError::io("create directory", path, e))?;
        }
        Ok(())
    }

    fn is_record_file(path: &Path) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some(RECORD_EXT) && path.is_file()
    }

    /// Record files of a collection sorted by name, or `None` if the
    /// collection directory is absent.
    fn record_files(&self, collection: &str) -> Result<Option<Vec<PathBuf>>> {
        let dir = self.collection_dir(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io("list collection", dir, e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("list collection", &dir, e))?;
            let path = entry.path();
            if Self::is_record_file(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(Some(files))
    }
}

impl StorageBackend for FsBackend {
    fn read_record(&self, collection: &str, resource: &str) -> Result<Option<String>> {
        let path = self.record_path(collection, resource);
        match read_text(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io("read file", path, e)),
        }
    }

    fn write_record(&self, collection: &str, resource: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.collection_dir(collection);
        self.ensure_dir(&dir)?;

        let final_path = dir.join(Self::record_filename(resource));
        let mut tmp_name = final_path.clone().into_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        // Atomic Write
        fs::write(&tmp_path, bytes).map_err(|e| StoreError::io("write file", &tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &final_path) {
            warn!(path = %tmp_path.display(), error = %e, "rename failed, temporary file left behind");
            return Err(StoreError::io("rename file", final_path, e));
        }
        Ok(())
    }

    fn delete_record(&self, collection: &str, resource: &str) -> Result<bool> {
        let path = self.record_path(collection, resource);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io("delete file", path, e)),
        }
    }

    fn list_records(&self, collection: &str) -> Result<Vec<String>> {
        let files = self
            .record_files(collection)?
            .ok_or_else(|| StoreError::CollectionNotFound(collection.to_string()))?;

        let mut records = Vec::with_capacity(files.len());
        for path in files {
            match read_text(&path) {
                Ok(content) => records.push(content),
                // Deleted between listing and reading
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::io("read file", path, e)),
            }
        }
        Ok(records)
    }

    fn record_count(&self, collection: &str) -> usize {
        match self.record_files(collection) {
            Ok(Some(files)) => files.len(),
            _ => 0,
        }
    }

    fn list_collections(&self) -> Result<Vec<String>> {
        let entries =
            fs::read_dir(&self.root).map_err(|e| StoreError::io("list root", &self.root, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io("list root", &self.root, e))?;
            let path = entry.path();
            if path.is_dir() {
                if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Invalid UTF-8 becomes U+FFFD so the text still reaches the decoder,
/// which rejects it per record instead of failing the whole scan.
fn read_text(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
