pub mod dashboard;
pub mod error;
pub mod logging;
pub mod settings;
pub mod widget_state;

pub use error::{Axis, LayoutError};
