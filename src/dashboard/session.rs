use crate::dashboard::config::LayoutConfig;
use crate::dashboard::geometry::CellIndex;
use crate::dashboard::instances::{InstanceId, WidgetInstance};
use crate::dashboard::layout::{DashboardLayout, LayoutEvent, LayoutEventCallback};
use crate::dashboard::overlay::ResultOverlay;
use crate::dashboard::widgets::WidgetCatalog;
use crate::error::LayoutError;
use crate::settings::Settings;
use crate::widget_state::WidgetStateStore;
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// All state of one open dashboard, owned by the application shell.
///
/// Wraps the layout engine with the cell-selector flow, the shared result
/// overlay and the store holding widget-internal state. Every instance the
/// layout destroys has its stored state erased before the mutating call
/// returns.
pub struct DashboardSession {
    layout: DashboardLayout,
    overlay: ResultOverlay<Value>,
    overlay_timeout: Duration,
    overlay_enabled: bool,
    store: Box<dyn WidgetStateStore>,
    selected_cell: Option<CellIndex>,
    destroyed: Arc<Mutex<Vec<InstanceId>>>,
    listener: Option<LayoutEventCallback>,
}

impl DashboardSession {
    pub fn new(
        settings: &Settings,
        catalog: WidgetCatalog,
        store: Box<dyn WidgetStateStore>,
    ) -> Result<Self, LayoutError> {
        let layout = DashboardLayout::new(settings.grid(), catalog)?;
        Ok(Self::with_layout(layout, settings, store))
    }

    pub fn with_layout(
        layout: DashboardLayout,
        settings: &Settings,
        store: Box<dyn WidgetStateStore>,
    ) -> Self {
        let mut session = Self {
            layout,
            overlay: ResultOverlay::default(),
            overlay_timeout: settings.overlay_timeout(),
            overlay_enabled: settings.dice_overlay,
            store,
            selected_cell: None,
            destroyed: Arc::new(Mutex::new(Vec::new())),
            listener: None,
        };
        session.install_event_callback();
        session
    }

    pub fn layout(&self) -> &DashboardLayout {
        &self.layout
    }

    /// Observe layout events. The session keeps its own subscription for
    /// state erasure; `listener` is called after it.
    pub fn set_event_listener(&mut self, listener: Option<LayoutEventCallback>) {
        self.listener = listener;
        self.install_event_callback();
    }

    fn install_event_callback(&mut self) {
        let destroyed = self.destroyed.clone();
        let listener = self.listener.clone();
        self.layout
            .set_event_callback(Some(Arc::new(move |event: &LayoutEvent| {
                if let LayoutEvent::InstanceDestroyed { id } = event {
                    if let Ok(mut queue) = destroyed.lock() {
                        queue.push(id.clone());
                    }
                }
                if let Some(listener) = &listener {
                    listener(event);
                }
            })));
    }

    /// Erase the stored state of every instance destroyed since the last call.
    fn erase_destroyed(&mut self) {
        let ids = match self.destroyed.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => return,
        };
        for id in ids {
            if let Err(e) = self.store.erase(&id) {
                tracing::warn!(id = %id, error = %e, "failed to erase widget state");
            }
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.overlay_timeout = settings.overlay_timeout();
        self.overlay_enabled = settings.dice_overlay;
        if !self.overlay_enabled {
            self.overlay.clear();
        }
    }

    /// Remember `cell` as the target for the widget selector. Returns `false`
    /// (and opens nothing) when the cell is already covered by a widget.
    pub fn open_selector(&mut self, cell: CellIndex) -> bool {
        if !self.layout.grid().contains_cell(cell) || self.layout.owner_of(cell).is_some() {
            return false;
        }
        self.selected_cell = Some(cell);
        true
    }

    pub fn selected_cell(&self) -> Option<CellIndex> {
        self.selected_cell
    }

    pub fn close_selector(&mut self) {
        self.selected_cell = None;
    }

    /// Place `type_tag` at the cell chosen with [`Self::open_selector`]. The
    /// selector stays open when placement is refused.
    pub fn choose_widget(&mut self, type_tag: &str) -> Result<InstanceId, LayoutError> {
        let cell = self.selected_cell.ok_or(LayoutError::NoCellSelected)?;
        let id = self.layout.place_widget(cell, type_tag)?;
        self.selected_cell = None;
        Ok(id)
    }

    /// Delete the widget at `cell` and erase its stored state.
    pub fn delete_widget(&mut self, cell: CellIndex) -> Option<WidgetInstance> {
        let instance = self.layout.delete_widget(cell);
        self.erase_destroyed();
        instance
    }

    /// Swap the widget type at `cell`, keeping its size. The previous
    /// instance's state is erased.
    pub fn replace_widget(&mut self, cell: CellIndex, type_tag: &str) -> Result<InstanceId, LayoutError> {
        let result = self.layout.replace_widget(cell, type_tag);
        self.erase_destroyed();
        result
    }

    pub fn resize_or_move(
        &mut self,
        cell: CellIndex,
        col_span: usize,
        row_span: usize,
        new_origin: Option<CellIndex>,
    ) -> Result<(), LayoutError> {
        self.layout.resize_or_move(cell, col_span, row_span, new_origin)
    }

    pub fn move_widget(&mut self, from: CellIndex, to: CellIndex) -> Result<(), LayoutError> {
        self.layout.move_widget(from, to)
    }

    /// Resize the grid and close the selector. Widgets dropped by the resize
    /// lose their stored state.
    pub fn change_dimensions(&mut self, rows: usize, cols: usize) -> Result<(), LayoutError> {
        let result = self.layout.change_dimensions(rows, cols);
        self.erase_destroyed();
        if result.is_ok() {
            // Linear indices change meaning with the column count.
            self.selected_cell = None;
        }
        result
    }

    pub fn set_rows(&mut self, rows: usize) -> Result<(), LayoutError> {
        self.change_dimensions(rows, self.layout.grid().cols)
    }

    pub fn set_cols(&mut self, cols: usize) -> Result<(), LayoutError> {
        self.change_dimensions(self.layout.grid().rows, cols)
    }

    pub fn save_widget_state(&mut self, id: &InstanceId, blob: Value) -> anyhow::Result<()> {
        if !self.layout.instances().contains(id) {
            return Err(LayoutError::InstanceNotFound { id: id.clone() }.into());
        }
        self.store.save(id, blob)
    }

    pub fn load_widget_state(&self, id: &InstanceId) -> Option<Value> {
        self.store.load(id)
    }

    /// Show a transient result; any pending dismissal is replaced.
    pub fn show_result(&mut self, value: Option<Value>, now: Instant) {
        if !self.overlay_enabled {
            return;
        }
        self.overlay.show(value, self.overlay_timeout, now);
    }

    pub fn current_result(&self) -> Option<&Value> {
        self.overlay.value()
    }

    /// Advance time; clears the overlay once its timeout has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.overlay.tick(now)
    }

    pub fn save_layout(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        self.layout.to_config().save(path)?;
        tracing::info!(path = %path.display(), "layout saved");
        Ok(())
    }

    /// Replace the current layout with the one stored at `path`. State blobs
    /// of widgets that are not in the loaded layout are left alone. Returns
    /// the normalisation warnings.
    pub fn load_layout(&mut self, path: impl AsRef<Path>) -> anyhow::Result<Vec<String>> {
        let path = path.as_ref();
        let cfg = LayoutConfig::load(path)?;
        let catalog = self.layout.catalog().clone();
        let (layout, warnings) = DashboardLayout::from_config(&cfg, catalog);
        self.layout = layout;
        self.install_event_callback();
        self.selected_cell = None;
        tracing::info!(path = %path.display(), widgets = self.layout.occupancy().len(), "layout loaded");
        Ok(warnings)
    }
}
