//! Corner configuration model and persistence

mod corner;
mod store;
mod trigger;

pub use corner::Corner;
pub use store::{ChangeEvent, ConfigDoc, CornerSettings, GlobalSettings, SettingsStore, ShortcutSpec, SubscriptionId};
pub use trigger::{CornerId, Quadrant, Trigger, TriggerConfig, DISABLED_ACTION};
