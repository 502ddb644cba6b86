//! registry.rs
//! Owned registry of live views keyed by generated ids.

use super::AnalyticsView;
use crate::config::GridConfig;
use crate::error::{GridError, GridResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use ulid::Ulid;

#[derive(Debug, Default)]
pub struct ViewManager {
    config: GridConfig,
    views: RwLock<HashMap<String, Arc<AnalyticsView>>>,
}

impl ViewManager {
    pub fn new(config: GridConfig) -> Self {
        Self { config, views: RwLock::new(HashMap::new()) }
    }

    /// Creates a view and returns its id.
    pub fn create_view(&self, portfolio_callback_id: &str, primitives_callback_id: &str) -> String {
        let id = Ulid::new().to_string();
        let view = AnalyticsView::new(id.clone(), portfolio_callback_id, primitives_callback_id, self.config.clone());
        self.views.write().insert(id.clone(), Arc::new(view));
        tracing::info!(view = %id, "view created");
        id
    }

    pub fn get_view(&self, id: &str) -> GridResult<Arc<AnalyticsView>> {
        self.views.read().get(id).cloned().ok_or_else(|| GridError::ViewNotFound(id.to_string()))
    }

    /// Removes the view. Holders of an `Arc` keep a usable view until dropped.
    pub fn delete_view(&self, id: &str) -> GridResult<()> {
        self.views.write().remove(id).ok_or_else(|| GridError::ViewNotFound(id.to_string()))?;
        tracing::info!(view = %id, "view deleted");
        Ok(())
    }

    pub fn view_ids(&self) -> Vec<String> {
        self.views.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize { self.views.read().len() }

    pub fn is_empty(&self) -> bool { self.views.read().is_empty() }
}
