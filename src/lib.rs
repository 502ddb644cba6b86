//! Live analytics grids over a continuously recomputed view.
//!
//! A compute engine pushes compiled view definitions and cycle results; this
//! crate turns them into grid structures, a bounded-history results cache and
//! versioned viewports that many clients can read concurrently. Single cells
//! can be drilled into as dependency graph grids showing their lineage.

// --- MODULE DECLARATIONS ---
pub mod cache;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod grid;
pub mod structure;
pub mod view;
pub mod viewport;

#[cfg(test)]
mod testing;

// Re-export the main entry points.
pub use config::GridConfig;
pub use error::{GridError, GridResult};
pub use grid::GridType;
pub use view::{spawn_event_loop, AnalyticsView, UpdateListener, ViewManager};
pub use viewport::{ViewportCell, ViewportDefinition, ViewportResults};
