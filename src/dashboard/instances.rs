use crate::error::LayoutError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable identity of a widget instance for its whole lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetInstance {
    pub id: InstanceId,
    pub type_tag: String,
}

/// Owns the mapping from instance id to widget type.
///
/// Ids take the form `<type_tag>-<n>` where `n` comes from a per-registry
/// counter, so two creations can never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRegistry {
    instances: HashMap<InstanceId, WidgetInstance>,
    next_seq: u64,
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self {
            instances: HashMap::new(),
            next_seq: 1,
        }
    }
}

impl InstanceRegistry {
    pub fn create(&mut self, type_tag: &str) -> InstanceId {
        loop {
            let id = InstanceId(format!("{type_tag}-{}", self.next_seq));
            self.next_seq = self.next_seq.saturating_add(1);
            if !self.instances.contains_key(&id) {
                self.instances.insert(
                    id.clone(),
                    WidgetInstance {
                        id: id.clone(),
                        type_tag: type_tag.to_string(),
                    },
                );
                return id;
            }
        }
    }

    /// Adopt an id that was created elsewhere (e.g. read from a saved layout).
    ///
    /// Returns `false` if the id is already live. The sequence counter is
    /// advanced past any numeric suffix so later ids stay unique.
    pub fn register(&mut self, id: InstanceId, type_tag: &str) -> bool {
        if self.instances.contains_key(&id) {
            return false;
        }
        if let Some(seq) = parse_seq(id.as_str()) {
            self.next_seq = self.next_seq.max(seq.saturating_add(1));
        }
        self.instances.insert(
            id.clone(),
            WidgetInstance {
                id,
                type_tag: type_tag.to_string(),
            },
        );
        true
    }

    pub fn destroy(&mut self, id: &InstanceId) -> Result<WidgetInstance, LayoutError> {
        self.instances
            .remove(id)
            .ok_or_else(|| LayoutError::InstanceNotFound { id: id.clone() })
    }

    pub fn type_of(&self, id: &InstanceId) -> Result<&str, LayoutError> {
        self.instances
            .get(id)
            .map(|inst| inst.type_tag.as_str())
            .ok_or_else(|| LayoutError::InstanceNotFound { id: id.clone() })
    }

    pub fn get(&self, id: &InstanceId) -> Option<&WidgetInstance> {
        self.instances.get(id)
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &InstanceId> {
        self.instances.keys()
    }
}

/// Suffixes above this are treated as free-form so imported ids cannot push
/// the counter to its limit.
const MAX_IMPORTED_SEQ: u64 = u32::MAX as u64;

fn parse_seq(id: &str) -> Option<u64> {
    let (_, num) = id.rsplit_once('-')?;
    num.parse::<u64>().ok().filter(|n| *n <= MAX_IMPORTED_SEQ)
}
