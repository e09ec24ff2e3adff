use crate::dashboard::config::{GridConfig, LayoutConfig, SlotConfig};
use crate::dashboard::geometry::{row_col_to_cell, CellIndex, CellRect, GridSize, Span};
use crate::dashboard::instances::{InstanceId, InstanceRegistry, WidgetInstance};
use crate::dashboard::occupancy::{Occupancy, Placement};
use crate::dashboard::widgets::WidgetCatalog;
use crate::error::{Axis, LayoutError};
use crate::settings::MAX_GRID_DIM;
use std::sync::Arc;

/// Notification emitted after a layout change has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    InstanceCreated { id: InstanceId, cell: CellIndex },
    InstanceDestroyed { id: InstanceId },
    Moved { id: InstanceId, from: CellIndex, to: CellIndex },
    Resized { id: InstanceId, cell: CellIndex, span: Span },
    GridResized { grid: GridSize },
}

pub type LayoutEventCallback = Arc<dyn Fn(&LayoutEvent) + Send + Sync>;

/// Everything a layout operation may change. Two equal values describe the
/// same dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    pub grid: GridSize,
    pub occupancy: Occupancy,
    pub instances: InstanceRegistry,
}

/// The grid layout engine. Every operation validates against the current
/// state first and only then commits, so a rejected call leaves the state
/// untouched.
pub struct DashboardLayout {
    state: LayoutState,
    catalog: WidgetCatalog,
    event_cb: Option<LayoutEventCallback>,
}

impl std::fmt::Debug for DashboardLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardLayout")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DashboardLayout {
    pub fn new(grid: GridSize, catalog: WidgetCatalog) -> Result<Self, LayoutError> {
        check_dimensions(grid.rows, grid.cols)?;
        Ok(Self {
            state: LayoutState {
                grid,
                occupancy: Occupancy::default(),
                instances: InstanceRegistry::default(),
            },
            catalog,
            event_cb: None,
        })
    }

    pub fn set_event_callback(&mut self, cb: Option<LayoutEventCallback>) {
        self.event_cb = cb;
    }

    pub fn grid(&self) -> GridSize {
        self.state.grid
    }

    pub fn state(&self) -> &LayoutState {
        &self.state
    }

    pub fn occupancy(&self) -> &Occupancy {
        &self.state.occupancy
    }

    pub fn instances(&self) -> &InstanceRegistry {
        &self.state.instances
    }

    pub fn catalog(&self) -> &WidgetCatalog {
        &self.catalog
    }

    pub fn placement_at(&self, cell: CellIndex) -> Option<Placement> {
        self.state.occupancy.placement_at(cell)
    }

    pub fn owner_of(&self, cell: CellIndex) -> Option<Placement> {
        self.state.occupancy.owner_of(cell, self.state.grid.cols)
    }

    pub fn type_at(&self, cell: CellIndex) -> Option<&str> {
        let placement = self.placement_at(cell)?;
        self.state.instances.type_of(&placement.instance).ok()
    }

    /// Placed widgets with their type tags, ordered by origin cell.
    pub fn widgets(&self) -> Vec<(Placement, String)> {
        self.state
            .occupancy
            .placements()
            .map(|p| {
                let tag = self
                    .state
                    .instances
                    .type_of(&p.instance)
                    .map(str::to_string)
                    .unwrap_or_default();
                (p, tag)
            })
            .collect()
    }

    fn emit(&self, event: LayoutEvent) {
        if let Some(cb) = &self.event_cb {
            (cb)(&event);
        }
    }

    fn check_type(&self, type_tag: &str) -> Result<(), LayoutError> {
        if !self.catalog.contains(type_tag) {
            return Err(LayoutError::UnknownWidget {
                type_tag: type_tag.to_string(),
            });
        }
        if !self.catalog.is_available(type_tag) {
            return Err(LayoutError::WidgetUnavailable {
                type_tag: type_tag.to_string(),
            });
        }
        Ok(())
    }

    fn check_rect(&self, rect: CellRect, excluding: Option<&InstanceId>) -> Result<(), LayoutError> {
        let grid = self.state.grid;
        if !rect.fits_in(grid) {
            return Err(LayoutError::OutOfBounds { rect, grid });
        }
        if let Some(cell) = self
            .state
            .occupancy
            .first_conflict(&rect, grid.cols, excluding)
        {
            return Err(LayoutError::Occupied { cell });
        }
        Ok(())
    }

    /// Attach a new widget of `type_tag` to the empty cell `cell` as a 1x1
    /// placement.
    pub fn place_widget(&mut self, cell: CellIndex, type_tag: &str) -> Result<InstanceId, LayoutError> {
        self.check_type(type_tag)?;
        let rect = CellRect::at(cell, Span::UNIT, self.state.grid.cols);
        self.check_rect(rect, None)?;

        let id = self.state.instances.create(type_tag);
        self.state.occupancy.insert(cell, id.clone(), Span::UNIT);
        tracing::debug!(cell, widget = %type_tag, id = %id, "widget placed");
        self.emit(LayoutEvent::InstanceCreated {
            id: id.clone(),
            cell,
        });
        Ok(id)
    }

    /// Swap the widget anchored at `cell` for a fresh instance of `type_tag`,
    /// keeping its span.
    pub fn replace_widget(&mut self, cell: CellIndex, type_tag: &str) -> Result<InstanceId, LayoutError> {
        let placement = self
            .placement_at(cell)
            .ok_or(LayoutError::NoWidgetAt { cell })?;
        self.check_type(type_tag)?;

        let id = self.state.instances.create(type_tag);
        if let Err(e) = self.state.instances.destroy(&placement.instance) {
            tracing::warn!(cell, error = %e, "replaced placement had no registered instance");
        }
        self.state.occupancy.set_instance(cell, id.clone());
        tracing::debug!(cell, widget = %type_tag, old = %placement.instance, new = %id, "widget replaced");
        self.emit(LayoutEvent::InstanceDestroyed {
            id: placement.instance,
        });
        self.emit(LayoutEvent::InstanceCreated {
            id: id.clone(),
            cell,
        });
        Ok(id)
    }

    /// Remove the widget anchored at `cell`. Deleting an empty cell does
    /// nothing and returns `None`.
    pub fn delete_widget(&mut self, cell: CellIndex) -> Option<WidgetInstance> {
        let placement = self.state.occupancy.remove(cell)?;
        let instance = match self.state.instances.destroy(&placement.instance) {
            Ok(instance) => instance,
            Err(e) => {
                tracing::warn!(cell, error = %e, "deleted placement had no registered instance");
                WidgetInstance {
                    id: placement.instance.clone(),
                    type_tag: String::new(),
                }
            }
        };
        tracing::debug!(cell, id = %instance.id, "widget deleted");
        self.emit(LayoutEvent::InstanceDestroyed {
            id: instance.id.clone(),
        });
        Some(instance)
    }

    /// Resize the widget anchored at `cell`, optionally relocating its origin
    /// to `new_origin` in the same step. The widget may overlap its own
    /// current rectangle but nothing else.
    pub fn resize_or_move(
        &mut self,
        cell: CellIndex,
        col_span: usize,
        row_span: usize,
        new_origin: Option<CellIndex>,
    ) -> Result<(), LayoutError> {
        let placement = self
            .placement_at(cell)
            .ok_or(LayoutError::NoWidgetAt { cell })?;
        let span = Span::new(col_span, row_span);
        if !span.is_valid() {
            return Err(LayoutError::InvalidSpan);
        }
        let origin = new_origin.unwrap_or(cell);
        let rect = CellRect::at(origin, span, self.state.grid.cols);
        self.check_rect(rect, Some(&placement.instance))?;

        if origin != cell {
            self.state.occupancy.relocate(cell, origin, span);
            tracing::debug!(from = cell, to = origin, %rect, "widget moved and resized");
            self.emit(LayoutEvent::Moved {
                id: placement.instance.clone(),
                from: cell,
                to: origin,
            });
        } else {
            self.state
                .occupancy
                .insert(cell, placement.instance.clone(), span);
            tracing::debug!(cell, %rect, "widget resized");
        }
        if span != placement.span {
            self.emit(LayoutEvent::Resized {
                id: placement.instance,
                cell: origin,
                span,
            });
        }
        Ok(())
    }

    /// Drag the widget anchored at `from` to `to`, keeping its span.
    pub fn move_widget(&mut self, from: CellIndex, to: CellIndex) -> Result<(), LayoutError> {
        let placement = self
            .placement_at(from)
            .ok_or(LayoutError::NoWidgetAt { cell: from })?;
        if self.state.occupancy.placement_at(to).is_some() {
            return Err(LayoutError::Occupied { cell: to });
        }
        let rect = CellRect::at(to, placement.span, self.state.grid.cols);
        self.check_rect(rect, Some(&placement.instance))?;

        self.state.occupancy.relocate(from, to, placement.span);
        tracing::debug!(from, to, "widget moved");
        self.emit(LayoutEvent::Moved {
            id: placement.instance,
            from,
            to,
        });
        Ok(())
    }

    /// Whether the grid can shrink to `new_rows` without cutting off a
    /// widget. Growing is always allowed.
    pub fn can_shrink_rows(&self, new_rows: usize) -> bool {
        if new_rows >= self.state.grid.rows {
            return true;
        }
        let cols = self.state.grid.cols;
        self.state
            .occupancy
            .placements()
            .all(|p| p.rect(cols).row_end() <= new_rows)
    }

    /// Column counterpart of [`Self::can_shrink_rows`].
    pub fn can_shrink_cols(&self, new_cols: usize) -> bool {
        if new_cols >= self.state.grid.cols {
            return true;
        }
        let cols = self.state.grid.cols;
        self.state
            .occupancy
            .placements()
            .all(|p| p.rect(cols).col_end() <= new_cols)
    }

    /// Resize the grid. Each axis is checked independently against the
    /// current placements. Placements keep their `(row, col)` origin; their
    /// linear indices are recomputed for the new column count.
    pub fn change_dimensions(&mut self, new_rows: usize, new_cols: usize) -> Result<(), LayoutError> {
        check_dimensions(new_rows, new_cols)?;
        if !self.can_shrink_rows(new_rows) {
            return Err(LayoutError::WouldTruncate { axis: Axis::Rows });
        }
        if !self.can_shrink_cols(new_cols) {
            return Err(LayoutError::WouldTruncate { axis: Axis::Cols });
        }
        let grid = GridSize::new(new_rows, new_cols);
        if grid == self.state.grid {
            return Ok(());
        }
        self.reflow(grid);
        tracing::debug!(%grid, "grid resized");
        self.emit(LayoutEvent::GridResized { grid });
        Ok(())
    }

    pub fn set_rows(&mut self, rows: usize) -> Result<(), LayoutError> {
        self.change_dimensions(rows, self.state.grid.cols)
    }

    pub fn set_cols(&mut self, cols: usize) -> Result<(), LayoutError> {
        self.change_dimensions(self.state.grid.rows, cols)
    }

    /// Re-anchor every placement for `grid`, dropping any that no longer fit.
    pub(crate) fn reflow(&mut self, grid: GridSize) {
        let old_cols = self.state.grid.cols;
        let mut kept = Vec::with_capacity(self.state.occupancy.len());
        let mut dropped = Vec::new();
        for p in self.state.occupancy.placements() {
            let rect = p.rect(old_cols);
            if rect.fits_in(grid) {
                kept.push(Placement {
                    origin: row_col_to_cell(rect.row, rect.col, grid.cols),
                    ..p
                });
            } else {
                dropped.push(p);
            }
        }
        self.state.occupancy.replace_all(kept);
        self.state.grid = grid;
        for p in dropped {
            tracing::warn!(id = %p.instance, origin = p.origin, %grid, "widget outside resized grid dropped");
            if let Err(e) = self.state.instances.destroy(&p.instance) {
                tracing::warn!(error = %e, "dropped placement had no registered instance");
            }
            self.emit(LayoutEvent::InstanceDestroyed { id: p.instance });
        }
    }

    /// Describe every broken layout invariant. An empty list means the layout
    /// is consistent.
    pub fn validate(&self) -> Vec<String> {
        let grid = self.state.grid;
        let occupancy = &self.state.occupancy;
        let mut problems = Vec::new();
        let placements: Vec<Placement> = occupancy.placements().collect();

        for (i, p) in placements.iter().enumerate() {
            let rect = p.rect(grid.cols);
            if !rect.fits_in(grid) {
                problems.push(format!("widget '{}' at {rect} exceeds the {grid} grid", p.instance));
            }
            for other in &placements[i + 1..] {
                if rect.intersects(&other.rect(grid.cols)) {
                    problems.push(format!(
                        "widget '{}' overlaps '{}'",
                        p.instance, other.instance
                    ));
                }
            }
            if !self.state.instances.contains(&p.instance) {
                problems.push(format!("widget '{}' has no registered instance", p.instance));
            }
            if placements[..i].iter().any(|q| q.instance == p.instance) {
                problems.push(format!("widget '{}' is placed twice", p.instance));
            }
        }
        let span_cells: Vec<CellIndex> = occupancy.span_cells().collect();
        let origins: Vec<CellIndex> = placements.iter().map(|p| p.origin).collect();
        if span_cells != origins {
            problems.push("span table and placement table disagree".to_string());
        }
        for id in self.state.instances.ids() {
            if occupancy.origin_of(id).is_none() {
                problems.push(format!("instance '{id}' is not placed"));
            }
        }
        problems
    }

    /// Export the layout for saving.
    pub fn to_config(&self) -> LayoutConfig {
        let grid = self.state.grid;
        let slots = self
            .widgets()
            .into_iter()
            .map(|(p, tag)| {
                let rect = p.rect(grid.cols);
                SlotConfig {
                    id: Some(p.instance.to_string()),
                    widget: tag,
                    row: rect.row as i32,
                    col: rect.col as i32,
                    row_span: p.span.row_span,
                    col_span: p.span.col_span,
                }
            })
            .collect();
        LayoutConfig {
            version: 1,
            grid: GridConfig {
                rows: grid.rows,
                cols: grid.cols,
            },
            slots,
        }
    }

    /// Build a layout from a saved configuration. Slots with unknown widgets,
    /// origins outside the grid or overlaps are dropped; spans are clamped to
    /// the grid. Returns the dropped-slot warnings alongside the layout.
    pub fn from_config(cfg: &LayoutConfig, catalog: WidgetCatalog) -> (Self, Vec<String>) {
        let grid = GridSize::new(
            cfg.grid.rows.clamp(1, MAX_GRID_DIM),
            cfg.grid.cols.clamp(1, MAX_GRID_DIM),
        );
        let mut layout = Self {
            state: LayoutState {
                grid,
                occupancy: Occupancy::default(),
                instances: InstanceRegistry::default(),
            },
            catalog,
            event_cb: None,
        };
        let mut warnings = Vec::new();
        if grid.rows != cfg.grid.rows || grid.cols != cfg.grid.cols {
            warnings.push(format!(
                "grid {}x{} clamped to {grid}",
                cfg.grid.rows, cfg.grid.cols
            ));
        }

        for slot in &cfg.slots {
            if !layout.catalog.is_available(&slot.widget) {
                warnings.push(format!("dropping unknown widget '{}'", slot.widget));
                continue;
            }
            let Some(rect) = normalize_slot(slot, grid) else {
                warnings.push(format!(
                    "slot for widget '{}' is outside the grid and was ignored",
                    slot.widget
                ));
                continue;
            };
            if let Some(cell) = layout.state.occupancy.first_conflict(&rect, grid.cols, None) {
                warnings.push(format!(
                    "slot for widget '{}' overlaps cell {cell} and was ignored",
                    slot.widget
                ));
                continue;
            }

            let id = match slot.id.as_deref().filter(|id| !id.trim().is_empty()) {
                Some(id) => {
                    let id = InstanceId::new(id);
                    if layout.state.instances.register(id.clone(), &slot.widget) {
                        id
                    } else {
                        warnings.push(format!("duplicate widget id '{id}' was regenerated"));
                        layout.state.instances.create(&slot.widget)
                    }
                }
                None => layout.state.instances.create(&slot.widget),
            };
            let origin = row_col_to_cell(rect.row, rect.col, grid.cols);
            layout.state.occupancy.insert(origin, id, rect.span);
        }

        for w in &warnings {
            tracing::warn!("{w}");
        }
        (layout, warnings)
    }
}

/// Every cell of the grid must have a linear index.
fn check_dimensions(rows: usize, cols: usize) -> Result<(), LayoutError> {
    if rows == 0 || cols == 0 {
        return Err(LayoutError::EmptyGrid);
    }
    if rows.checked_mul(cols).is_none() {
        return Err(LayoutError::GridTooLarge { rows, cols });
    }
    Ok(())
}

fn normalize_slot(slot: &SlotConfig, grid: GridSize) -> Option<CellRect> {
    if slot.row < 0 || slot.col < 0 {
        return None;
    }
    let row = slot.row as usize;
    let col = slot.col as usize;
    if row >= grid.rows || col >= grid.cols {
        return None;
    }
    let row_span = slot.row_span.max(1).min(grid.rows - row);
    let col_span = slot.col_span.max(1).min(grid.cols - col);
    Some(CellRect::new(row, col, Span::new(col_span, row_span)))
}
