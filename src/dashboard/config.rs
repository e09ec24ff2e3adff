use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const LAYOUT_FILE: &str = "layout.json";

fn default_version() -> u32 {
    1
}

fn default_rows() -> usize {
    2
}

fn default_cols() -> usize {
    5
}

fn default_span() -> usize {
    1
}

/// Grid definition for the saved layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GridConfig {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
        }
    }
}

/// One placed widget in a saved layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotConfig {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub widget: String,
    pub row: i32,
    pub col: i32,
    #[serde(default = "default_span")]
    pub row_span: usize,
    #[serde(default = "default_span")]
    pub col_span: usize,
}

impl SlotConfig {
    pub fn with_widget(widget: &str, row: i32, col: i32) -> Self {
        Self {
            id: None,
            widget: widget.to_string(),
            row,
            col,
            row_span: default_span(),
            col_span: default_span(),
        }
    }

    pub fn spanning(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span;
        self.col_span = col_span;
        self
    }
}

/// Saved dashboard layout: grid size plus which widget sits where.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayoutConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub slots: Vec<SlotConfig>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            grid: GridConfig::default(),
            slots: Vec::new(),
        }
    }
}

impl LayoutConfig {
    /// Load a layout from disk. A missing or empty file yields the default
    /// (empty) layout.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: LayoutConfig = serde_json::from_str(&content)?;
        Ok(cfg)
    }

    /// Save the layout, writing to a temporary file first and renaming it
    /// over the target.
    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn path_for(base: &str) -> PathBuf {
        let base = Path::new(base);
        if base.is_dir() {
            base.join(LAYOUT_FILE)
        } else {
            PathBuf::from(base)
        }
    }
}
