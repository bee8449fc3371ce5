use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use indexmap::IndexMap;
use tracing::debug;

/// Maps bare command names to executable files found on the search path.
///
/// The cache is insert only. A name resolved once keeps that path for the
/// life of the resolver, and earlier directories shadow later ones. A miss
/// triggers a full rescan before the lookup is retried, so executables
/// installed after startup are still found.
pub struct PathResolver {
    dirs: Vec<PathBuf>,
    cache: Mutex<IndexMap<String, PathBuf>>,
}

impl PathResolver {
    pub fn from_env() -> Self {
        let dirs = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();
        Self::with_dirs(dirs)
    }

    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        PathResolver {
            dirs,
            cache: Mutex::new(IndexMap::new()),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        {
            let cache = self.cache.lock().unwrap();
            if let Some(path) = cache.get(name) {
                return Some(path.clone());
            }
        }
        self.refresh();
        self.cache.lock().unwrap().get(name).cloned()
    }

    pub fn has_executable(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// All executable names currently on the search path, in first-found
    /// order. Used for completion.
    pub fn names(&self) -> Vec<String> {
        self.refresh();
        self.cache.lock().unwrap().keys().cloned().collect()
    }

    /// Rescans every search path directory, filling in names not already
    /// cached. Existing entries are never overwritten or removed.
    pub fn refresh(&self) {
        debug!("rescanning {} search path directories", self.dirs.len());
        let mut cache = self.cache.lock().unwrap();
        for dir in &self.dirs {
            let Ok(entries) = fs::read_dir(dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                if !is_executable_file(&path) {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                cache.entry(name.to_string()).or_insert(path);
            }
        }
    }
}

// Metadata is taken through fs::metadata so symlinks to executables count.
fn is_executable_file(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    if !metadata.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}
