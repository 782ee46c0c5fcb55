//! The trigger engine: live corner geometry, debouncing and orchestration

mod debounce;
pub mod geometry;
mod instance;
mod orchestrator;

pub use debounce::DebounceGate;
pub use instance::{CornerSnapshot, EngineOptions, HotCornerInstance};
pub use orchestrator::CornerOrchestrator;
