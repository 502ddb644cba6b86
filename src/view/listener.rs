//! listener.rs
//! Drains engine events on a dedicated thread and forwards changed ids.

use super::AnalyticsView;
use crate::engine::EngineEvent;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// The transport seam: receives the opaque ids of grids whose structure
/// changed and viewports whose data changed.
pub trait UpdateListener: Send {
    fn items_updated(&self, ids: &[String]);
}

impl UpdateListener for Sender<Vec<String>> {
    fn items_updated(&self, ids: &[String]) {
        if self.send(ids.to_vec()).is_err() {
            tracing::debug!(dropped = ids.len(), "update listener disconnected");
        }
    }
}

/// Applies every event from `events` to `view` until the engine side hangs up.
pub fn spawn_event_loop<L>(view: Arc<AnalyticsView>, events: Receiver<EngineEvent>, listener: L) -> JoinHandle<()>
where
    L: UpdateListener + 'static,
{
    thread::spawn(move || {
        for event in events {
            let name = event.name();
            let ids = view.apply(event);
            tracing::debug!(view = %view.id(), event = name, updated = ids.len(), "engine event applied");
            if !ids.is_empty() {
                listener.items_updated(&ids);
            }
        }
        tracing::debug!(view = %view.id(), "engine event channel closed");
    })
}
