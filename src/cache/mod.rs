//! Process-local store of computed values shared by the viewports of a grid.
pub mod history;
pub mod results;

pub use history::History;
pub use results::{CacheItem, CacheKey, ResultsCache};
