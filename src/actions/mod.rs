//! Action catalog, registry and dispatcher

pub mod catalog;
mod dispatcher;
mod handlers;
mod registry;

pub use dispatcher::{Dispatcher, RunActionData};
pub use registry::ActionRegistry;
