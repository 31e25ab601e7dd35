//! Cache manager for persisting fetched forecasts to disk
//!
//! Stores serializable data as JSON files with an expiry timestamp so the
//! application can fall back to the last forecast when the API is unreachable.

use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Wrapper struct for cached data stored on disk
#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

/// Result of reading from cache, including metadata about cache freshness
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// When the data was originally cached
    pub cached_at: DateTime<Utc>,
    /// Whether the cache entry has expired
    pub is_expired: bool,
}

/// Reads and writes cached data under a single directory
///
/// Defaults to the XDG cache directory (`~/.cache/exercast/` on Linux).
/// Expired entries are still returned, flagged with `is_expired`.
#[derive(Debug, Clone)]
pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    /// Creates a CacheManager in the platform cache directory
    ///
    /// Returns `None` if no cache directory can be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "exercast")?;
        Some(Self::with_dir(project_dirs.cache_dir().to_path_buf()))
    }

    /// Creates a CacheManager rooted at a custom directory
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Directory holding the cache files
    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Creates the cache directory if it does not exist yet
    pub fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Writes `data` under `key`, fresh for `ttl`
    pub fn write<T: Serialize>(&self, key: &str, data: &T, ttl: Duration) -> std::io::Result<()> {
        self.ensure_dir()?;

        let now = Utc::now();
        let entry = CacheEntry {
            data,
            cached_at: now,
            expires_at: now + ttl,
        };

        let json = serde_json::to_string_pretty(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        fs::write(self.cache_path(key), json)
    }

    /// Reads the entry stored under `key`
    ///
    /// Returns `None` if the entry doesn't exist or cannot be parsed as `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let content = fs::read_to_string(self.cache_path(key)).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        Some(CachedData {
            data: entry.data,
            cached_at: entry.cached_at,
            is_expired: Utc::now() > entry.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::thread;
    use std::time::Duration as StdDuration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Sample {
        hours: Vec<String>,
        scores: Vec<f64>,
    }

    fn sample() -> Sample {
        Sample {
            hours: vec!["2024-07-15T06:00".to_string(), "2024-07-15T07:00".to_string()],
            scores: vec![100.0, 80.0],
        }
    }

    fn create_test_cache() -> (CacheManager, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = CacheManager::with_dir(temp_dir.path().to_path_buf());
        (cache, temp_dir)
    }

    #[test]
    fn test_write_creates_json_file_named_after_key() {
        let (cache, temp_dir) = create_test_cache();

        cache
            .write("forecast_35.68_139.77", &sample(), Duration::minutes(60))
            .expect("Write should succeed");

        let path = temp_dir.path().join("forecast_35.68_139.77.json");
        let content = fs::read_to_string(&path).expect("Should read file");
        assert!(content.contains("\"hours\""));
        assert!(content.contains("2024-07-15T06:00"));
        assert!(content.contains("\"expires_at\""));
    }

    #[test]
    fn test_read_returns_none_for_missing_key() {
        let (cache, _temp_dir) = create_test_cache();

        let result: Option<CachedData<Sample>> = cache.read("missing");

        assert!(result.is_none());
    }

    #[test]
    fn test_read_returns_none_for_mismatched_type() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .write("numbers", &vec![1, 2, 3], Duration::minutes(60))
            .expect("Write should succeed");

        let result: Option<CachedData<Sample>> = cache.read("numbers");

        assert!(result.is_none());
    }

    #[test]
    fn test_fresh_entry_is_not_expired() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .write("fresh", &sample(), Duration::minutes(60))
            .expect("Write should succeed");

        let result: CachedData<Sample> = cache.read("fresh").expect("Should read fresh cache");

        assert_eq!(result.data, sample());
        assert!(!result.is_expired);
    }

    #[test]
    fn test_expired_entry_is_still_returned() {
        let (cache, _temp_dir) = create_test_cache();
        cache
            .write("stale", &sample(), Duration::zero())
            .expect("Write should succeed");

        thread::sleep(StdDuration::from_millis(10));

        let result: CachedData<Sample> = cache.read("stale").expect("Should read expired cache");

        assert_eq!(result.data, sample());
        assert!(result.is_expired);
    }

    #[test]
    fn test_write_creates_nested_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let nested = temp_dir.path().join("a").join("b");
        let cache = CacheManager::with_dir(nested.clone());

        cache
            .write("nested", &sample(), Duration::minutes(1))
            .expect("Write should succeed");

        assert!(nested.join("nested.json").exists());
        assert_eq!(cache.dir(), nested.as_path());
    }

    #[test]
    fn test_cached_at_is_recorded() {
        let (cache, _temp_dir) = create_test_cache();

        let before = Utc::now();
        cache
            .write("stamped", &sample(), Duration::minutes(60))
            .expect("Write should succeed");
        let after = Utc::now();

        let result: CachedData<Sample> = cache.read("stamped").expect("Should read cache");
        assert!(result.cached_at >= before && result.cached_at <= after);
    }

    #[test]
    fn test_overwrite_keeps_latest() {
        let (cache, _temp_dir) = create_test_cache();
        let mut newer = sample();
        newer.scores = vec![10.0];

        cache.write("key", &sample(), Duration::minutes(60)).unwrap();
        cache.write("key", &newer, Duration::minutes(60)).unwrap();

        let result: CachedData<Sample> = cache.read("key").unwrap();
        assert_eq!(result.data, newer);
    }

    #[test]
    fn test_new_uses_project_named_directory() {
        if let Some(cache) = CacheManager::new() {
            assert!(cache.dir().to_string_lossy().contains("exercast"));
        }
        // Passes when no home directory exists (e.g., in CI)
    }
}
