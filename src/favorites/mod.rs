use fs_err as fs;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::errors::IdeaError;

/// Add/remove-by-id set of favorited idea ids. Operations commute, so
/// concurrent requests need no coordination beyond the store's own lock.
pub trait FavoriteStore: Send + Sync {
    fn add(&self, id: &str) -> Result<(), IdeaError>;
    fn remove(&self, id: &str) -> Result<(), IdeaError>;
    fn contains(&self, id: &str) -> Result<bool, IdeaError>;
    fn list(&self) -> Result<Vec<String>, IdeaError>;

    fn snapshot(&self) -> Result<HashSet<String>, IdeaError> {
        Ok(self.list()?.into_iter().collect())
    }
}

#[derive(Debug, Default)]
pub struct MemoryFavorites {
    ids: RwLock<BTreeSet<String>>,
}

impl MemoryFavorites {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids<I: IntoIterator<Item = S>, S: Into<String>>(ids: I) -> Self {
        Self { ids: RwLock::new(ids.into_iter().map(Into::into).collect()) }
    }
}

impl FavoriteStore for MemoryFavorites {
    fn add(&self, id: &str) -> Result<(), IdeaError> {
        self.ids.write().insert(id.to_string());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<(), IdeaError> {
        self.ids.write().remove(id);
        Ok(())
    }

    fn contains(&self, id: &str) -> Result<bool, IdeaError> {
        Ok(self.ids.read().contains(id))
    }

    fn list(&self) -> Result<Vec<String>, IdeaError> {
        Ok(self.ids.read().iter().cloned().collect())
    }
}

/// Favorites kept as a JSON array of ids in one local file.
pub struct FileFavorites {
    path: PathBuf,
    lock: Mutex<()>,
}

fn store_err(e: impl std::fmt::Display) -> IdeaError {
    IdeaError::Favorites(e.to_string())
}

impl FileFavorites {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), lock: Mutex::new(()) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<BTreeSet<String>, IdeaError> {
        if !self.path.exists() {
            return Ok(BTreeSet::new());
        }
        let text = fs::read_to_string(&self.path).map_err(store_err)?;
        if text.trim().is_empty() {
            return Ok(BTreeSet::new());
        }
        let ids: Vec<String> = serde_json::from_str(&text).map_err(store_err)?;
        Ok(ids.into_iter().collect())
    }

    fn write(&self, ids: &BTreeSet<String>) -> Result<(), IdeaError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(store_err)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let body = serde_json::to_string_pretty(&ids.iter().collect::<Vec<_>>()).map_err(store_err)?;
        fs::write(&tmp, body).map_err(store_err)?;
        fs::rename(&tmp, &self.path).map_err(store_err)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeSet<String>) -> bool) -> Result<(), IdeaError> {
        let _guard = self.lock.lock();
        let mut ids = self.read()?;
        if f(&mut ids) {
            self.write(&ids)?;
        }
        Ok(())
    }
}

impl FavoriteStore for FileFavorites {
    fn add(&self, id: &str) -> Result<(), IdeaError> {
        self.update(|ids| ids.insert(id.to_string()))
    }

    fn remove(&self, id: &str) -> Result<(), IdeaError> {
        self.update(|ids| ids.remove(id))
    }

    fn contains(&self, id: &str) -> Result<bool, IdeaError> {
        let _guard = self.lock.lock();
        Ok(self.read()?.contains(id))
    }

    fn list(&self) -> Result<Vec<String>, IdeaError> {
        let _guard = self.lock.lock();
        Ok(self.read()?.into_iter().collect())
    }
}
