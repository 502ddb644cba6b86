//! Versioned, bounds-checked windows into a grid.
pub mod cell;
pub mod definition;
pub mod depgraph;
pub mod main_grid;

pub use cell::{render, ViewportCell, ViewportResults, ViewportRow};
pub use definition::ViewportDefinition;
pub use depgraph::DependencyGraphViewport;
pub use main_grid::{Viewport, INITIAL_VERSION};
