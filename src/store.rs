use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::merge;
use crate::options::OptionSet;

/// File name of the preset store, kept next to the executable.
pub const FILE_NAME: &str = "args.json";

/// Every saved preset, keyed by name.
pub type Presets = BTreeMap<String, OptionSet>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preset file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to parse preset file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read preset file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write preset file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Default store location: `<install-root>/bin/args.json`, with `bin` being
/// the directory holding the running executable.
pub fn default_location() -> io::Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let bin = exe
        .parent()
        .ok_or_else(|| io::Error::other("executable has no parent directory"))?;
    Ok(bin.join(FILE_NAME))
}

/// JSON-backed preset persistence.
///
/// The file is read fresh on every call. There is no locking: two processes
/// saving at the same time race and the last write wins.
#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn read(&self) -> Result<Presets, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the whole file with `presets`.
    ///
    /// Writes to a hidden temp file first and renames it into place, so a
    /// reader sees either the old or the new store.
    pub async fn write(&self, presets: &Presets) -> Result<(), StoreError> {
        let write_err = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let json =
            serde_json::to_vec_pretty(presets).map_err(|e| write_err(io::Error::other(e)))?;

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let file_name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(FILE_NAME);
        let tmp = self.path.with_file_name(format!(".{file_name}.tmp"));

        tokio::fs::write(&tmp, json).await.map_err(write_err)?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(write_err)?;

        tracing::debug!("wrote {} presets to {}", presets.len(), self.path.display());
        Ok(())
    }

    /// Insert or overwrite the preset `name`.
    ///
    /// Control, path and invocation fields are stripped first. A corrupt
    /// existing file aborts the save instead of being overwritten.
    pub async fn save(&self, name: &str, options: &OptionSet) -> Result<(), StoreError> {
        let mut presets = match self.read().await {
            Ok(presets) => presets,
            Err(StoreError::NotFound(_)) => Presets::new(),
            Err(e) => return Err(e),
        };

        presets.insert(name.to_string(), merge::sanitize(options));
        self.write(&presets).await
    }

    /// Look up `name` and merge it with the live invocation.
    ///
    /// Returns `Ok(None)` when the store file or the preset does not exist.
    pub async fn load(
        &self,
        name: &str,
        live: &OptionSet,
    ) -> Result<Option<OptionSet>, StoreError> {
        let presets = match self.read().await {
            Ok(presets) => presets,
            Err(StoreError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e),
        };

        Ok(presets.get(name).map(|stored| merge::merge(stored, live)))
    }

    pub async fn list_names(&self) -> Result<Vec<String>, StoreError> {
        match self.read().await {
            Ok(presets) => Ok(presets.into_keys().collect()),
            Err(StoreError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
