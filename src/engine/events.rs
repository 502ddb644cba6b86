//! events.rs
//! Typed events pushed by the compute engine from its own thread.

use super::cycle::{CycleHandle, ViewCycleResult};
use super::definition::CompiledViewDefinition;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum EngineEvent {
    StructureCompiled(Arc<CompiledViewDefinition>),
    CycleCompleted {
        result: Arc<ViewCycleResult>,
        cycle: Arc<dyn CycleHandle>,
    },
}

impl EngineEvent {
    pub fn name(&self) -> &'static str {
        match self {
            EngineEvent::StructureCompiled(_) => "structure-compiled",
            EngineEvent::CycleCompleted { .. } => "cycle-completed",
        }
    }
}

/// Creates the channel the engine publishes on and the view layer drains.
pub fn event_channel() -> (Sender<EngineEvent>, Receiver<EngineEvent>) {
    channel()
}
