use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{ClientError, ClientResult};

/// Durable slot holding the serialized session.
pub trait SessionStorage: Send + Sync {
    fn load(&self) -> ClientResult<Option<String>>;
    fn save(&self, raw: &str) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// One JSON file per storage key inside the config directory.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: &Path, key: &str) -> Self {
        Self {
            path: dir.join(format!("{key}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> ClientResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&self.path)?))
    }

    fn save(&self, raw: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage; clones share the same slot.
#[derive(Clone, Default)]
pub struct MemorySessionStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.to_string()))),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|s| s.clone())
    }
}

impl SessionStorage for MemorySessionStorage {
    fn load(&self) -> ClientResult<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("session slot poisoned".to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, raw: &str) -> ClientResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("session slot poisoned".to_string()))?;
        *slot = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| ClientError::Storage("session slot poisoned".to_string()))?;
        *slot = None;
        Ok(())
    }
}
