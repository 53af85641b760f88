use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{Result, store::DurableStorage, validate_key};

/// File-backed storage: one JSON file per key inside a profile directory.
///
/// Writes go to a temporary sibling file that is then renamed over the
/// target, so a crash mid-write leaves either the old or the new document.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `dir`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the profile directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self, value), fields(dir = %self.dir.display()))]
    fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &target)?;

        tracing::debug!(bytes = value.len(), "stored value");
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(dir = %self.dir.display()))]
    fn remove(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
