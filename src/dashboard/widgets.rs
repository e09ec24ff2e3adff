use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Display metadata for a widget type the UI knows how to mount.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetMetadata {
    pub type_tag: String,
    pub name: String,
    pub icon: String,
    /// `false` for types listed in the selector but not selectable yet.
    pub available: bool,
}

#[derive(Clone, Debug)]
pub struct WidgetDescriptor {
    name: String,
    icon: String,
    available: bool,
}

impl WidgetDescriptor {
    pub fn new(name: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: icon.to_string(),
            available: true,
        }
    }

    pub fn coming_soon(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn metadata(&self, type_tag: &str) -> WidgetMetadata {
        WidgetMetadata {
            type_tag: type_tag.to_string(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            available: self.available,
        }
    }
}

static BUILTIN: Lazy<WidgetCatalog> = Lazy::new(|| {
    let mut catalog = WidgetCatalog::default();
    catalog.register("dice-roller", WidgetDescriptor::new("Dice Roller", "🎲"));
    catalog.register("notes", WidgetDescriptor::new("Notes", "📝"));
    catalog.register("timer", WidgetDescriptor::new("Timer", "⏱️"));
    catalog.register(
        "initiative-tracker",
        WidgetDescriptor::new("Initiative Tracker", "⚔️").coming_soon(),
    );
    catalog
});

/// Widget types that can be placed on the grid, keyed by type tag.
#[derive(Clone, Debug, Default)]
pub struct WidgetCatalog {
    map: HashMap<String, WidgetDescriptor>,
    order: Vec<String>,
}

impl WidgetCatalog {
    pub fn with_defaults() -> Self {
        BUILTIN.clone()
    }

    pub fn register(&mut self, type_tag: &str, descriptor: WidgetDescriptor) {
        if self.map.insert(type_tag.to_string(), descriptor).is_none() {
            self.order.push(type_tag.to_string());
        }
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.map.contains_key(type_tag)
    }

    pub fn is_available(&self, type_tag: &str) -> bool {
        self.map
            .get(type_tag)
            .map(WidgetDescriptor::is_available)
            .unwrap_or(false)
    }

    pub fn descriptor(&self, type_tag: &str) -> Option<&WidgetDescriptor> {
        self.map.get(type_tag)
    }

    /// Type tags in registration order, which is the selector order.
    pub fn type_tags(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn metadata(&self) -> Vec<WidgetMetadata> {
        self.order
            .iter()
            .filter_map(|tag| self.map.get(tag).map(|d| d.metadata(tag)))
            .collect()
    }

    pub fn metadata_for(&self, type_tag: &str) -> Option<WidgetMetadata> {
        self.map.get(type_tag).map(|d| d.metadata(type_tag))
    }
}
