use quickplay_core::{BlacklistSet, GreylistTable, ListSet, QuickplayError, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Source of the blacklist/greylist pair.
///
/// Loaded fresh at the start of every pipeline cycle so list edits take
/// effect on the next fetch without a restart. Loading must be loud: a
/// malformed source is an error, never an empty list, because an empty
/// blacklist silently disables filtering.
pub trait ListSource: Send + Sync {
    /// Loads a fresh list pair.
    ///
    /// # Errors
    ///
    /// Returns [`QuickplayError::ListSource`] when either source is
    /// missing or malformed.
    fn load(&self) -> Result<ListSet>;
}

/// Reads the curated `blacklist.json` and `greylist.json` files.
#[derive(Debug, Clone)]
pub struct FileLists {
    blacklist_path: PathBuf,
    greylist_path: PathBuf,
}

impl FileLists {
    /// Creates a source reading the two given files
    #[must_use]
    pub fn new(blacklist_path: impl Into<PathBuf>, greylist_path: impl Into<PathBuf>) -> Self {
        Self {
            blacklist_path: blacklist_path.into(),
            greylist_path: greylist_path.into(),
        }
    }
}

impl ListSource for FileLists {
    fn load(&self) -> Result<ListSet> {
        let blacklist: BlacklistSet = read_list(&self.blacklist_path, "blacklist")?;
        let greylist: GreylistTable = read_list(&self.greylist_path, "greylist")?;
        Ok(ListSet::new(blacklist, greylist))
    }
}

fn read_list<T: DeserializeOwned>(path: &Path, list: &str) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| QuickplayError::ListSource {
        list: list.to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| QuickplayError::ListSource {
        list: list.to_string(),
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
