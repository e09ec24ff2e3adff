pub mod config;
pub mod geometry;
pub mod instances;
pub mod layout;
pub mod occupancy;
pub mod overlay;
pub mod session;
pub mod widgets;

pub use geometry::{CellIndex, CellRect, GridSize, Span};
pub use instances::{InstanceId, InstanceRegistry, WidgetInstance};
pub use layout::{DashboardLayout, LayoutEvent, LayoutEventCallback, LayoutState};
pub use occupancy::{Occupancy, Placement};
pub use session::DashboardSession;
pub use widgets::{WidgetCatalog, WidgetDescriptor, WidgetMetadata};
