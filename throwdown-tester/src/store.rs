//! Native persistence backends for the QA harness.
//!
//! `JsonFileStore` keeps each profile as one JSON file under a root
//! directory, the desktop analog of the browser build's single storage
//! key. `SystemClock` supplies real epoch milliseconds.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use throwdown_game::{Clock, ProfileStorage};

/// One JSON file per profile under a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Store profiles under `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob backing `profile_name`. The name is used as the
    /// file stem, so it must not contain path separators.
    #[must_use]
    pub fn blob_path(&self, profile_name: &str) -> PathBuf {
        self.root.join(format!("{profile_name}.json"))
    }
}

impl ProfileStorage for JsonFileStore {
    type Error = std::io::Error;

    fn save_profile(&self, profile_name: &str, payload: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        let path = self.blob_path(profile_name);
        log::debug!("writing profile blob to {}", path.display());
        fs::write(path, payload)
    }

    fn load_profile(&self, profile_name: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.blob_path(profile_name)) {
            Ok(payload) => Ok(Some(payload)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn clear_profile(&self, profile_name: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.blob_path(profile_name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

/// Wall clock in epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}
