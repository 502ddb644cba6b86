//! Rendering of grids and viewports for the transport layer.
pub mod payload;
pub mod trace;

pub use payload::{format_value, structure_payload, viewport_payload};
pub use trace::format_trace;
