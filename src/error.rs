use crate::dashboard::geometry::{CellIndex, CellRect, GridSize};
use crate::dashboard::instances::InstanceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Cols => write!(f, "columns"),
        }
    }
}

/// Reason a layout operation was refused. A refused operation never changes
/// any state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    OutOfBounds { rect: CellRect, grid: GridSize },
    Occupied { cell: CellIndex },
    WouldTruncate { axis: Axis },
    NoWidgetAt { cell: CellIndex },
    InstanceNotFound { id: InstanceId },
    InvalidSpan,
    EmptyGrid,
    GridTooLarge { rows: usize, cols: usize },
    UnknownWidget { type_tag: String },
    WidgetUnavailable { type_tag: String },
    NoCellSelected,
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::OutOfBounds { rect, grid } => {
                write!(f, "{rect} exceeds the {grid} grid")
            }
            LayoutError::Occupied { cell } => write!(f, "cell {cell} is already occupied"),
            LayoutError::WouldTruncate { axis } => {
                write!(f, "reducing {axis} would cut off a placed widget")
            }
            LayoutError::NoWidgetAt { cell } => write!(f, "no widget at cell {cell}"),
            LayoutError::InstanceNotFound { id } => write!(f, "widget instance '{id}' not found"),
            LayoutError::InvalidSpan => write!(f, "spans must be at least 1x1"),
            LayoutError::EmptyGrid => write!(f, "grid needs at least one row and one column"),
            LayoutError::GridTooLarge { rows, cols } => {
                write!(f, "a {rows}x{cols} grid has too many cells to address")
            }
            LayoutError::UnknownWidget { type_tag } => {
                write!(f, "unknown widget type '{type_tag}'")
            }
            LayoutError::WidgetUnavailable { type_tag } => {
                write!(f, "widget type '{type_tag}' is not available yet")
            }
            LayoutError::NoCellSelected => write!(f, "no cell is selected"),
        }
    }
}

impl std::error::Error for LayoutError {}
