//! Typed cached view over the settings store for one screen quadrant

use std::collections::BTreeMap;

use tracing::trace;

use super::store::{ChangeEvent, SettingsStore, SubscriptionId};
use super::trigger::{CornerId, Trigger, TriggerConfig};

/// One corner's configuration accessor
///
/// Values read through this view are cached per trigger; an external change
/// notification for a trigger invalidates exactly that trigger's cache entry.
/// Writes go through to the store (which debounces the physical write), so
/// callers must not assume synchronous durability.
pub struct Corner {
    id: CornerId,
    cache: BTreeMap<Trigger, TriggerConfig>,
    expansion: Option<(bool, bool)>,
    subscriptions: Vec<SubscriptionId>,
}

impl Corner {
    /// Create an unconnected view for one corner
    pub fn new(id: CornerId) -> Self {
        Self {
            id,
            cache: BTreeMap::new(),
            expansion: None,
            subscriptions: Vec::new(),
        }
    }

    /// Corner identity
    pub fn id(&self) -> CornerId {
        self.id
    }

    /// Subscribe to external-change notifications for every trigger
    ///
    /// The returned handles are held internally and must be released through
    /// [`Corner::release`] before the view is dropped.
    pub fn connect_all(&mut self, store: &mut SettingsStore) {
        debug_assert!(self.subscriptions.is_empty());
        for trigger in Trigger::ALL {
            self.subscriptions.push(store.connect(self.id, trigger));
        }
    }

    /// Release all change subscriptions
    pub fn release(&mut self, store: &mut SettingsStore) {
        for id in self.subscriptions.drain(..) {
            store.disconnect(id);
        }
    }

    /// Cached settings bundle for one trigger
    pub fn trigger_config(&mut self, store: &SettingsStore, trigger: Trigger) -> &TriggerConfig {
        self.cache
            .entry(trigger)
            .or_insert_with(|| store.trigger_config(self.id, trigger))
    }

    /// Write one trigger's settings bundle through the store
    pub fn set_trigger_config(
        &mut self,
        store: &mut SettingsStore,
        trigger: Trigger,
        config: TriggerConfig,
    ) {
        store.set_trigger_config(self.id, trigger, config);
        // The store normalizes on read; re-fetch instead of trusting the input
        self.cache
            .insert(trigger, store.trigger_config(self.id, trigger));
    }

    /// Convenience setter for the action id of one trigger
    pub fn set_action(&mut self, store: &mut SettingsStore, trigger: Trigger, action: &str) {
        let mut config = self.trigger_config(store, trigger).clone();
        config.action = action.to_string();
        self.set_trigger_config(store, trigger, config);
    }

    /// Cached expansion flags (h, v)
    pub fn expansion(&mut self, store: &SettingsStore) -> (bool, bool) {
        *self
            .expansion
            .get_or_insert_with(|| store.expansion(self.id))
    }

    /// Write the expansion flags through the store
    pub fn set_expansion(&mut self, store: &mut SettingsStore, h_expand: bool, v_expand: bool) {
        store.set_expansion(self.id, h_expand, v_expand);
        self.expansion = Some((h_expand, v_expand));
    }

    /// True if at least one trigger fires an actual action
    pub fn any_trigger_enabled(&mut self, store: &SettingsStore) -> bool {
        Trigger::ALL
            .into_iter()
            .any(|t| self.trigger_config(store, t).enabled())
    }

    /// Drop every cached value so the next read goes to the store
    pub fn invalidate(&mut self) {
        self.cache.clear();
        self.expansion = None;
    }

    /// Apply an external change notification, invalidating exactly the
    /// affected cache entry
    pub fn note_change(&mut self, event: &ChangeEvent) {
        match *event {
            ChangeEvent::Trigger { corner, trigger } if corner == self.id => {
                trace!(corner = %self.id, trigger = %trigger, "Invalidating trigger cache");
                self.cache.remove(&trigger);
            }
            ChangeEvent::Corner { corner } if corner == self.id => {
                self.expansion = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::trigger::Quadrant;

    fn setup() -> (tempfile::TempDir, SettingsStore, Corner) {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(&dir.path().join("config.json")).unwrap();
        let corner = Corner::new(CornerId::new(0, Quadrant::TopLeft));
        (dir, store, corner)
    }

    #[test]
    fn test_cache_serves_stale_value_until_invalidated() {
        let (_dir, mut store, mut corner) = setup();
        assert!(!corner.trigger_config(&store, Trigger::ClickPrimary).enabled());

        // Mutate the store behind the view's back
        let mut config = TriggerConfig::default();
        config.action = "close-win".to_string();
        store.set_trigger_config(corner.id(), Trigger::ClickPrimary, config);

        // Cached copy still answers
        assert!(!corner.trigger_config(&store, Trigger::ClickPrimary).enabled());

        // Change notification for exactly that trigger refreshes it
        corner.note_change(&ChangeEvent::Trigger {
            corner: corner.id(),
            trigger: Trigger::ClickPrimary,
        });
        assert!(corner.trigger_config(&store, Trigger::ClickPrimary).enabled());
    }

    #[test]
    fn test_invalidate_discards_every_cached_value() {
        let (_dir, mut store, mut corner) = setup();
        assert!(!corner.any_trigger_enabled(&store));
        assert_eq!(corner.expansion(&store), (false, false));

        // Store writes that never pass through a change notification
        let mut config = TriggerConfig::default();
        config.action = "close-win".to_string();
        store.set_trigger_config(corner.id(), Trigger::ClickPrimary, config);
        store.set_expansion(corner.id(), true, false);

        corner.invalidate();
        assert!(corner.any_trigger_enabled(&store));
        assert_eq!(corner.expansion(&store), (true, false));
    }

    #[test]
    fn test_note_change_ignores_other_corners() {
        let (_dir, mut store, mut corner) = setup();
        corner.set_action(&mut store, Trigger::ScrollUp, "volume-up");

        corner.note_change(&ChangeEvent::Trigger {
            corner: CornerId::new(1, Quadrant::TopLeft),
            trigger: Trigger::ScrollUp,
        });
        // Cache entry survives; no store read needed to answer
        assert_eq!(
            corner.trigger_config(&store, Trigger::ScrollUp).action,
            "volume-up"
        );
    }

    #[test]
    fn test_write_through_updates_cache() {
        let (_dir, mut store, mut corner) = setup();
        corner.set_action(&mut store, Trigger::ClickMiddle, "minimize-win");
        assert_eq!(
            store.trigger_config(corner.id(), Trigger::ClickMiddle).action,
            "minimize-win"
        );
        assert!(corner.any_trigger_enabled(&store));
    }

    #[test]
    fn test_subscription_lifecycle() {
        let (_dir, mut store, mut corner) = setup();
        corner.connect_all(&mut store);
        assert!(store.delivers(corner.id(), Trigger::ScrollDown));
        corner.release(&mut store);
        assert!(!store.delivers(corner.id(), Trigger::ScrollDown));
    }
}
