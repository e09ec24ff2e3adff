use crate::dashboard::instances::InstanceId;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

pub const WIDGET_STATE_FILE: &str = "widget_state.json";

/// Storage for widget-internal state, keyed by instance id. The layout never
/// looks inside the blobs; it only asks for them to be erased when a widget
/// is deleted.
pub trait WidgetStateStore: Send {
    fn save(&mut self, id: &InstanceId, blob: Value) -> anyhow::Result<()>;
    fn load(&self, id: &InstanceId) -> Option<Value>;
    fn erase(&mut self, id: &InstanceId) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    blobs: HashMap<InstanceId, Value>,
}

impl MemoryStateStore {
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl WidgetStateStore for MemoryStateStore {
    fn save(&mut self, id: &InstanceId, blob: Value) -> anyhow::Result<()> {
        self.blobs.insert(id.clone(), blob);
        Ok(())
    }

    fn load(&self, id: &InstanceId) -> Option<Value> {
        self.blobs.get(id).cloned()
    }

    fn erase(&mut self, id: &InstanceId) -> anyhow::Result<()> {
        self.blobs.remove(id);
        Ok(())
    }
}

/// JSON object on disk mapping instance id to blob. Every change is written
/// through immediately.
#[derive(Debug)]
pub struct JsonFileStateStore {
    path: PathBuf,
    blobs: BTreeMap<String, Value>,
}

impl JsonFileStateStore {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        let blobs = if content.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&content)?
        };
        Ok(Self { path, blobs })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&self.blobs)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl WidgetStateStore for JsonFileStateStore {
    fn save(&mut self, id: &InstanceId, blob: Value) -> anyhow::Result<()> {
        self.blobs.insert(id.to_string(), blob);
        self.flush()
    }

    fn load(&self, id: &InstanceId) -> Option<Value> {
        self.blobs.get(id.as_str()).cloned()
    }

    fn erase(&mut self, id: &InstanceId) -> anyhow::Result<()> {
        if self.blobs.remove(id.as_str()).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_store_erase_is_idempotent() {
        let mut store = MemoryStateStore::default();
        let id = InstanceId::new("notes-1");
        store.save(&id, json!({"text": "goblins"})).unwrap();
        assert_eq!(store.load(&id), Some(json!({"text": "goblins"})));
        store.erase(&id).unwrap();
        store.erase(&id).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WIDGET_STATE_FILE);
        let id = InstanceId::new("timer-2");
        {
            let mut store = JsonFileStateStore::open(&path).unwrap();
            store.save(&id, json!({"seconds": 90})).unwrap();
        }
        let mut store = JsonFileStateStore::open(&path).unwrap();
        assert_eq!(store.load(&id), Some(json!({"seconds": 90})));
        store.erase(&id).unwrap();
        let store = JsonFileStateStore::open(&path).unwrap();
        assert_eq!(store.load(&id), None);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WIDGET_STATE_FILE);
        std::fs::write(&path, "not json").unwrap();
        assert!(JsonFileStateStore::open(&path).is_err());
    }
}
