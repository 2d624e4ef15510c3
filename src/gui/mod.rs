//! Pieces of the terminal monitor that do not need a terminal.

mod error;
mod projection;

pub use error::MonitorError;
pub use projection::{axis_labels, Plane, Projection};
