//! Enablement cache
//!
//! Remembers which (project, service) pairs were observed ENABLED so later
//! checks can skip the network. Only positive results are ever stored.
//!
//! The file-backed store keeps everything under a single top-level key:
//!
//! ```json
//! { "apiEnablementCache": { "my-project": { "run.googleapis.com": true } } }
//! ```
//!
//! Other top-level keys in the same file are preserved on write.

use parking_lot::{Mutex, RwLock};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Top-level key the cache lives under
pub const CACHE_KEY: &str = "apiEnablementCache";

/// Cache file name inside the per-user config directory
const CACHE_FILE_NAME: &str = "configstore.json";

/// project -> services known to be enabled
pub type CacheEntries = BTreeMap<String, BTreeMap<String, bool>>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache file I/O failed for {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("Cache file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Could not determine config directory for the enablement cache")]
    NoConfigDir,
}

/// Store of services known to be enabled
pub trait EnablementCache: Send + Sync {
    /// True if `service` was previously observed enabled on `project_id`
    fn is_enabled(&self, project_id: &str, service: &str) -> bool;

    /// Record that `service` is enabled on `project_id`
    fn mark_enabled(&self, project_id: &str, service: &str) -> Result<(), CacheError>;
}

/// In-process cache, forgotten when the process exits
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, HashSet<String>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EnablementCache for MemoryCache {
    fn is_enabled(&self, project_id: &str, service: &str) -> bool {
        self.entries
            .read()
            .get(project_id)
            .is_some_and(|services| services.contains(service))
    }

    fn mark_enabled(&self, project_id: &str, service: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .entry(project_id.to_string())
            .or_default()
            .insert(service.to_string());
        Ok(())
    }
}

/// JSON-file-backed cache shared by every invocation of the CLI
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Cache at `<config dir>/gcp-apictl/configstore.json`
    pub fn default_location() -> Result<Self, CacheError> {
        let dir = dirs::config_dir().ok_or(CacheError::NoConfigDir)?;
        Ok(Self::new(dir.join("gcp-apictl").join(CACHE_FILE_NAME)))
    }

    /// Cache at `path` if given, else the default location
    pub fn open(path: Option<&Path>) -> Result<Self, CacheError> {
        match path {
            Some(p) => Ok(Self::new(p)),
            None => Self::default_location(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All cached entries
    ///
    /// Entries that are not booleans, and projects that are not objects, are
    /// skipped.
    pub fn entries(&self) -> Result<CacheEntries, CacheError> {
        let store = self.load_store()?;
        let Some(Value::Object(projects)) = store.get(CACHE_KEY) else {
            return Ok(CacheEntries::new());
        };

        let mut entries = CacheEntries::new();
        for (project, services) in projects {
            let Value::Object(services) = services else {
                log::debug!("Skipping malformed cache entry for project {}", project);
                continue;
            };
            let decoded: BTreeMap<String, bool> = services
                .iter()
                .filter_map(|(name, value)| value.as_bool().map(|b| (name.clone(), b)))
                .collect();
            if !decoded.is_empty() {
                entries.insert(project.clone(), decoded);
            }
        }
        Ok(entries)
    }

    /// Drop entries for one project, or for every project when `project_id` is `None`
    ///
    /// Returns the number of service entries removed. Other projects are
    /// left untouched, even when malformed.
    pub fn clear(&self, project_id: Option<&str>) -> Result<usize, CacheError> {
        let _guard = self.write_lock.lock();
        let mut store = self.load_store()?;

        let removed = match project_id {
            Some(project) => match store.get_mut(CACHE_KEY) {
                Some(Value::Object(projects)) => {
                    projects.remove(project).as_ref().map_or(0, service_count)
                }
                _ => 0,
            },
            None => {
                let count = match store.get(CACHE_KEY) {
                    Some(Value::Object(projects)) => projects.values().map(service_count).sum(),
                    _ => 0,
                };
                store.insert(CACHE_KEY.to_string(), Value::Object(Map::new()));
                count
            }
        };

        self.save_store(&store)?;
        Ok(removed)
    }

    fn load_store(&self) -> Result<Map<String, Value>, CacheError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|source| CacheError::Io {
            path: self.path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&content).map_err(|source| CacheError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the cache file atomically so concurrent readers never see a partial store
    fn save_store(&self, store: &Map<String, Value>) -> Result<(), CacheError> {
        let io_err = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(io_err)?;

        let json = serde_json::to_string_pretty(store).map_err(|source| CacheError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        staged.write_all(json.as_bytes()).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged
            .persist(&self.path)
            .map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

fn service_count(services: &Value) -> usize {
    services.as_object().map_or(0, Map::len)
}

impl EnablementCache for FileCache {
    fn is_enabled(&self, project_id: &str, service: &str) -> bool {
        match self.load_store() {
            Ok(store) => store
                .get(CACHE_KEY)
                .and_then(|c| c.get(project_id))
                .and_then(|p| p.get(service))
                .and_then(Value::as_bool)
                .unwrap_or(false),
            Err(e) => {
                log::debug!("Ignoring unreadable enablement cache: {}", e);
                false
            }
        }
    }

    fn mark_enabled(&self, project_id: &str, service: &str) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock();
        let mut store = self.load_store()?;

        let cache = store
            .entry(CACHE_KEY.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !cache.is_object() {
            *cache = Value::Object(Map::new());
        }
        if let Value::Object(projects) = cache {
            let project = projects
                .entry(project_id.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !project.is_object() {
                *project = Value::Object(Map::new());
            }
            if let Value::Object(services) = project {
                services.insert(service.to_string(), Value::Bool(true));
            }
        }

        self.save_store(&store)
    }
}
