use crate::dashboard::config::LAYOUT_FILE;
use crate::dashboard::geometry::GridSize;
use crate::widget_state::WIDGET_STATE_FILE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Largest row or column count offered by the settings panel.
pub const MAX_GRID_DIM: usize = 10;

fn default_rows() -> usize {
    2
}

fn default_cols() -> usize {
    5
}

fn default_overlay_timeout() -> u64 {
    8
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Seconds a transient result stays on screen.
    #[serde(default = "default_overlay_timeout")]
    pub overlay_timeout_secs: u64,
    #[serde(default)]
    pub hide_titles: bool,
    /// Show the shared dice result overlay at all.
    #[serde(default = "default_true")]
    pub dice_overlay: bool,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            overlay_timeout_secs: default_overlay_timeout(),
            hide_titles: false,
            dice_overlay: true,
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Grid size with both axes clamped to `1..=MAX_GRID_DIM`.
    pub fn grid(&self) -> GridSize {
        GridSize::new(
            self.rows.clamp(1, MAX_GRID_DIM),
            self.cols.clamp(1, MAX_GRID_DIM),
        )
    }

    pub fn overlay_timeout(&self) -> Duration {
        Duration::from_secs(self.overlay_timeout_secs)
    }

    pub fn layout_path(settings_path: &Path) -> PathBuf {
        sibling(settings_path, LAYOUT_FILE)
    }

    pub fn widget_state_path(settings_path: &Path) -> PathBuf {
        sibling(settings_path, WIDGET_STATE_FILE)
    }
}

fn sibling(settings_path: &Path, file: &str) -> PathBuf {
    let base_dir = settings_path.parent().unwrap_or_else(|| Path::new("."));
    base_dir.join(file)
}
