use crate::backend::CacheBackend;
use crate::entry::CacheEntry;
use async_trait::async_trait;
use quickplay_core::{QuickplayError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

/// On-disk cache storage, one JSON file per key.
///
/// Reads are fail-safe: an unreadable or corrupt file is a miss, never an
/// error. Entries survive restarts and nothing expires them on disk, so
/// this backend asks for a shutdown flush.
#[derive(Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Creates a backend storing entries under `dir`.
    ///
    /// The directory is created on first write, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_key(key)))
    }
}

/// Keeps keys filesystem-safe; anything outside a conservative set becomes
/// a dash. Collisions are possible and guarded by the key recorded inside
/// the entry.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

async fn read_entry(path: &Path, key: &str) -> Option<CacheEntry> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cache file unreadable, treating as miss");
            return None;
        }
    };

    match serde_json::from_slice::<CacheEntry>(&bytes) {
        // Sanitization can collide two keys onto one file name; the key
        // recorded in the entry disambiguates.
        Ok(entry) if entry.key == key => Some(entry),
        Ok(_) => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt cache file, treating as miss");
            let _ = fs::remove_file(path).await;
            None
        }
    }
}

#[async_trait]
impl CacheBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        Ok(read_entry(&self.entry_path(key), key).await)
    }

    async fn set(&self, entry: CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| QuickplayError::Cache(format!("create cache dir: {e}")))?;

        let path = self.entry_path(&entry.key);
        let json = serde_json::to_string(&entry)
            .map_err(|e| QuickplayError::Cache(format!("encode entry: {e}")))?;
        fs::write(&path, json)
            .await
            .map_err(|e| QuickplayError::Cache(format!("write {}: {e}", path.display())))
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(QuickplayError::Cache(format!(
                "remove {}: {e}",
                path.display()
            ))),
        }
    }

    async fn flush(&self) -> Result<()> {
        let mut dir = match fs::read_dir(&self.dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(QuickplayError::Cache(format!("read cache dir: {e}"))),
        };

        loop {
            let item = dir
                .next_entry()
                .await
                .map_err(|e| QuickplayError::Cache(format!("walk cache dir: {e}")))?;
            let Some(item) = item else { break };

            let path = item.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Err(e) = fs::remove_file(&path).await {
                    warn!(path = %path.display(), error = %e, "could not remove cache file");
                }
            }
        }
        Ok(())
    }

    fn requires_shutdown_flush(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("pick"), "pick");
        assert_eq!(sanitize_key("list:2:10"), "list-2-10");
        assert_eq!(sanitize_key("../evil"), "---evil");
    }

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        let entry = CacheEntry::new("list:2:10", r#"{"total":25}"#, Duration::from_secs(60), 4);

        backend.set(entry.clone()).await.unwrap();
        let got = backend.get("list:2:10").await.unwrap().unwrap();
        assert_eq!(got, entry);
    }

    #[tokio::test]
    async fn test_entries_survive_reconstruction() {
        let dir = tempfile::tempdir().unwrap();
        let entry = CacheEntry::new("pick", "{}", Duration::from_secs(60), 1);

        FileBackend::new(dir.path()).set(entry.clone()).await.unwrap();

        // A fresh instance over the same directory still sees the entry.
        let reopened = FileBackend::new(dir.path());
        let got = reopened.get("pick").await.unwrap().unwrap();
        assert_eq!(got, entry);
    }

    #[tokio::test]
    async fn test_missing_dir_is_miss() {
        let backend = FileBackend::new("/nonexistent/quickplay-cache-test");
        assert!(backend.get("pick").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_miss_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        let path = backend.entry_path("pick");
        fs::create_dir_all(dir.path()).await.unwrap();
        fs::write(&path, b"definitely not json").await.unwrap();

        assert!(backend.get("pick").await.unwrap().is_none());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_colliding_sanitized_names_do_not_alias() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());

        // Both keys sanitize to "list-2-10".
        backend
            .set(CacheEntry::new("list:2:10", "colon", Duration::from_secs(60), 1))
            .await
            .unwrap();

        assert!(backend.get("list-2-10").await.unwrap().is_none());
        assert_eq!(
            backend.get("list:2:10").await.unwrap().unwrap().payload,
            "colon"
        );
    }

    #[tokio::test]
    async fn test_remove_and_flush() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path());
        backend
            .set(CacheEntry::new("a", "1", Duration::from_secs(60), 1))
            .await
            .unwrap();
        backend
            .set(CacheEntry::new("b", "2", Duration::from_secs(60), 1))
            .await
            .unwrap();

        backend.remove("a").await.unwrap();
        assert!(backend.get("a").await.unwrap().is_none());

        backend.flush().await.unwrap();
        assert!(backend.get("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_absent_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        FileBackend::new(dir.path()).remove("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_flush_on_missing_dir_is_ok() {
        FileBackend::new("/nonexistent/quickplay-cache-test")
            .flush()
            .await
            .unwrap();
    }

    #[test]
    fn test_requires_shutdown_flush() {
        assert!(FileBackend::new("cache").requires_shutdown_flush());
        assert_eq!(FileBackend::new("cache").name(), "file");
    }
}
