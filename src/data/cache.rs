//! Dataset cache keyed by a fingerprint of the data directory.
//!
//! Filter changes reuse the cached [`LoadReport`]; the directory is only
//! re-read when the set of CSV files, their sizes or their modification
//! times change.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use super::loader::{LoadReport, list_csv_files, load_all_csvs};

/// Hash of the CSV listing of a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint(u64);

/// Compute the fingerprint of `dir`.
///
/// A missing or unreadable directory still has a fingerprint, so creating
/// the folder later is detected as a change.
pub fn fingerprint(dir: &Path) -> Fingerprint {
    let mut hasher = DefaultHasher::new();
    dir.exists().hash(&mut hasher);

    if let Ok(files) = list_csv_files(dir) {
        for path in files {
            path.file_name().hash(&mut hasher);
            if let Ok(meta) = std::fs::metadata(&path) {
                meta.len().hash(&mut hasher);
                let mtime = meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .map(|d| d.as_nanos());
                mtime.hash(&mut hasher);
            }
        }
    }

    Fingerprint(hasher.finish())
}

#[derive(Debug, Clone)]
struct CacheEntry {
    dir: PathBuf,
    fingerprint: Fingerprint,
    report: LoadReport,
}

/// Holds the most recent load and the directory state it was built from.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entry: Option<CacheEntry>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-check `dir` and reload if it changed since the cached load.
    ///
    /// Returns `true` when a fresh load happened.
    pub fn refresh(&mut self, dir: &Path) -> bool {
        let current = fingerprint(dir);
        let fresh = matches!(
            &self.entry,
            Some(entry) if entry.dir == dir && entry.fingerprint == current
        );
        if fresh {
            log::debug!("Dataset cache hit for {}", dir.display());
        } else {
            self.entry = None;
        }

        self.entry.get_or_insert_with(|| {
            let report = load_all_csvs(dir);
            log::info!(
                "Loaded {} records from {} ({} warnings)",
                report.dataset.len(),
                dir.display(),
                report.warnings.len()
            );
            CacheEntry {
                dir: dir.to_path_buf(),
                fingerprint: current,
                report,
            }
        });
        !fresh
    }

    /// Cached report, without touching the filesystem.
    pub fn report(&self) -> Option<&LoadReport> {
        self.entry.as_ref().map(|e| &e.report)
    }

    /// Forget the cached load; the next refresh re-reads the directory.
    pub fn invalidate(&mut self) {
        self.entry = None;
        log::debug!("Dataset cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "client_code,client_code_norm,client_name,net_sales";

    #[test]
    fn test_first_refresh_loads() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("v_2024.csv"), format!("{HEADER}\nA,1,Alpha,10\n")).unwrap();

        let mut cache = DatasetCache::new();
        assert!(cache.report().is_none());
        assert!(cache.refresh(dir.path()));
        assert_eq!(cache.report().unwrap().dataset.len(), 1);
    }

    #[test]
    fn test_unchanged_directory_is_cache_hit() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("v_2024.csv"), format!("{HEADER}\nA,1,Alpha,10\n")).unwrap();

        let mut cache = DatasetCache::new();
        assert!(cache.refresh(dir.path()));
        assert!(!cache.refresh(dir.path()));
        assert!(!cache.refresh(dir.path()));
    }

    #[test]
    fn test_new_file_triggers_reload() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("v_2024.csv"), format!("{HEADER}\nA,1,Alpha,10\n")).unwrap();

        let mut cache = DatasetCache::new();
        assert!(cache.refresh(dir.path()));
        assert_eq!(cache.report().unwrap().dataset.len(), 1);

        fs::write(dir.path().join("v_2025.csv"), format!("{HEADER}\nB,2,Beta,20\n")).unwrap();
        assert!(cache.refresh(dir.path()));
        assert_eq!(cache.report().unwrap().dataset.len(), 2);
    }

    #[test]
    fn test_non_csv_files_do_not_change_fingerprint() {
        let dir = TempDir::new().unwrap();
        let before = fingerprint(dir.path());
        fs::write(dir.path().join("README.md"), "notes").unwrap();
        assert_eq!(fingerprint(dir.path()), before);
    }

    #[test]
    fn test_created_directory_is_detected() {
        let root = TempDir::new().unwrap();
        let data = root.path().join("data");

        let mut cache = DatasetCache::new();
        assert!(cache.refresh(&data));
        assert!(cache.report().unwrap().dataset.is_empty());
        assert!(!cache.refresh(&data));

        fs::create_dir(&data).unwrap();
        assert!(cache.refresh(&data));
    }

    #[test]
    fn test_invalidate_and_dir_switch() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();

        let mut cache = DatasetCache::new();
        assert!(cache.refresh(a.path()));
        cache.invalidate();
        assert!(cache.report().is_none());
        assert!(cache.refresh(a.path()));
        assert!(cache.refresh(b.path()));
    }
}
