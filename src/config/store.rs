//! Settings store: typed per-(monitor, quadrant, trigger) configuration
//!
//! Holds the authoritative in-memory state, persists it to a JSON file with
//! debounced writes, and queues change events for the daemon loop. External
//! edits of the file (e.g. by the preferences GUI) are picked up by
//! [`SettingsStore::reload_if_changed`] and reported as per-trigger events.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::common::types::Monitor;
use crate::constants::{debounce, geometry, timing};

use super::trigger::{CornerId, Quadrant, Trigger, TriggerConfig};

/// Handle for one change subscription; must be explicitly released via
/// [`SettingsStore::disconnect`]
pub type SubscriptionId = u64;

/// A configuration change visible to the rest of the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// One trigger's settings bundle changed
    Trigger { corner: CornerId, trigger: Trigger },
    /// A corner-level option (expansion flags) changed
    Corner { corner: CornerId },
    /// A global option changed
    Global,
}

/// A keyboard shortcut binding an accelerator to an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutSpec {
    /// Accelerator string, e.g. `"<Ctrl><Alt>F5"`
    pub accelerator: String,
    /// Action id to dispatch
    pub action: String,
    /// Shell command line for the run-command action
    #[serde(default)]
    pub command: String,
    /// Target workspace for the workspace actions
    #[serde(default)]
    pub workspace_index: u32,
}

/// Global options applying to all corners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Master enable switch; when off no corner geometry exists
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Minimum delay between two firings of the same corner (ms)
    #[serde(default = "default_debounce_delay_ms")]
    pub debounce_delay_ms: u64,

    /// Disable pressure barriers and fall back to region-only corners
    #[serde(default)]
    pub barrier_fallback: bool,

    /// Suppress plain pointer-pressure firing unless Shift is held
    #[serde(default)]
    pub pressure_requires_shift: bool,

    /// Fire click triggers on button press (true) or release (false)
    #[serde(default = "default_action_on_press")]
    pub action_on_press: bool,

    /// Debounce window for physical configuration writes (ms)
    #[serde(default = "default_flush_debounce_ms")]
    pub flush_debounce_ms: u64,

    /// Interval of the periodic reconciliation pass (ms)
    #[serde(default = "default_reconcile_interval_ms")]
    pub reconcile_interval_ms: u64,

    /// Global keyboard shortcuts feeding the same action dispatcher
    #[serde(default)]
    pub shortcuts: Vec<ShortcutSpec>,
}

fn default_enabled() -> bool {
    true
}

fn default_debounce_delay_ms() -> u64 {
    debounce::DEFAULT_DELAY_MS
}

fn default_action_on_press() -> bool {
    true
}

fn default_flush_debounce_ms() -> u64 {
    timing::FLUSH_DEBOUNCE_MS
}

fn default_reconcile_interval_ms() -> u64 {
    timing::RECONCILE_INTERVAL_MS
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            debounce_delay_ms: default_debounce_delay_ms(),
            barrier_fallback: false,
            pressure_requires_shift: false,
            action_on_press: default_action_on_press(),
            flush_debounce_ms: default_flush_debounce_ms(),
            reconcile_interval_ms: default_reconcile_interval_ms(),
            shortcuts: Vec::new(),
        }
    }
}

/// Persisted settings of one corner
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerSettings {
    /// Extend the clickable region along the horizontal edge
    #[serde(default)]
    pub h_expand: bool,

    /// Extend the clickable region along the vertical edge
    #[serde(default)]
    pub v_expand: bool,

    /// Per-trigger bundles; missing entries mean "all defaults"
    #[serde(default)]
    pub triggers: BTreeMap<Trigger, TriggerConfig>,
}

/// On-disk document layout
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConfigDoc {
    #[serde(default)]
    pub global: GlobalSettings,
    /// Keyed by [`CornerId::key`], e.g. `"0-top-left"`
    #[serde(default)]
    pub corners: BTreeMap<String, CornerSettings>,
}

/// One registered change subscription
#[derive(Debug, Clone, Copy)]
struct Subscriber {
    id: SubscriptionId,
    corner: CornerId,
    trigger: Trigger,
}

/// The settings store
pub struct SettingsStore {
    path: PathBuf,
    doc: ConfigDoc,
    file_mtime: Option<SystemTime>,
    dirty: bool,
    flush_due: Option<Instant>,
    pending: Vec<ChangeEvent>,
    subscribers: Vec<Subscriber>,
    next_subscription: SubscriptionId,
}

impl SettingsStore {
    /// Load the store from `path`, falling back to defaults when the file
    /// does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        let (doc, file_mtime) = match fs::read_to_string(path) {
            Ok(contents) => {
                let doc: ConfigDoc = serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse config file {}", path.display()))?;
                let mtime = fs::metadata(path).and_then(|m| m.modified()).ok();
                info!(path = %path.display(), corners = doc.corners.len(), "Loaded configuration");
                (doc, mtime)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file yet, starting with defaults");
                (ConfigDoc::default(), None)
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read config file {}", path.display()));
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            doc: normalize(doc),
            file_mtime,
            dirty: false,
            flush_due: None,
            pending: Vec::new(),
            subscribers: Vec::new(),
            next_subscription: 1,
        })
    }

    /// Global options
    pub fn global(&self) -> &GlobalSettings {
        &self.doc.global
    }

    /// Mutate the global options and queue a change event
    pub fn update_global(&mut self, update: impl FnOnce(&mut GlobalSettings)) {
        update(&mut self.doc.global);
        self.mark_changed(ChangeEvent::Global);
    }

    /// Settings bundle for one trigger, fully populated with defaults
    ///
    /// The `requires_ctrl` invariant for [`Trigger::CtrlPointerPressure`] is
    /// enforced here so no consumer can observe it unset.
    pub fn trigger_config(&self, corner: CornerId, trigger: Trigger) -> TriggerConfig {
        let mut config = self
            .doc
            .corners
            .get(&corner.key())
            .and_then(|c| c.triggers.get(&trigger))
            .cloned()
            .unwrap_or_default();
        if trigger == Trigger::CtrlPointerPressure {
            config.requires_ctrl = true;
        }
        config.barrier_size_h = config.barrier_size_h.min(geometry::BARRIER_PERCENT_MAX);
        config.barrier_size_v = config.barrier_size_v.min(geometry::BARRIER_PERCENT_MAX);
        config
    }

    /// Write one trigger's settings bundle through and queue a change event
    ///
    /// Durability is debounced: the physical write happens once the flush
    /// window elapses, not synchronously.
    pub fn set_trigger_config(&mut self, corner: CornerId, trigger: Trigger, config: TriggerConfig) {
        self.doc
            .corners
            .entry(corner.key())
            .or_default()
            .triggers
            .insert(trigger, config);
        self.mark_changed(ChangeEvent::Trigger { corner, trigger });
    }

    /// Expansion flags (h, v) of one corner
    pub fn expansion(&self, corner: CornerId) -> (bool, bool) {
        self.doc
            .corners
            .get(&corner.key())
            .map(|c| (c.h_expand, c.v_expand))
            .unwrap_or((false, false))
    }

    /// Write the expansion flags of one corner
    pub fn set_expansion(&mut self, corner: CornerId, h_expand: bool, v_expand: bool) {
        let settings = self.doc.corners.entry(corner.key()).or_default();
        settings.h_expand = h_expand;
        settings.v_expand = v_expand;
        self.mark_changed(ChangeEvent::Corner { corner });
    }

    /// All corner ids for the given monitor list (4 per monitor)
    pub fn corner_ids(monitors: &[Monitor]) -> Vec<CornerId> {
        let mut ids = Vec::with_capacity(monitors.len() * 4);
        for slot in 0..monitors.len() {
            for quadrant in Quadrant::ALL {
                ids.push(CornerId::new(slot, quadrant));
            }
        }
        ids
    }

    /// Reset every option to its default and queue events for all of it
    pub fn reset_all(&mut self) {
        let old_corners: Vec<String> = self.doc.corners.keys().cloned().collect();
        self.doc = ConfigDoc::default();
        for key in old_corners {
            if let Some(corner) = CornerId::parse(&key) {
                self.mark_changed(ChangeEvent::Corner { corner });
            }
        }
        self.mark_changed(ChangeEvent::Global);
        info!("Configuration reset to defaults");
    }

    /// Subscribe to external-change notifications for one corner and trigger
    pub fn connect(&mut self, corner: CornerId, trigger: Trigger) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.subscribers.push(Subscriber { id, corner, trigger });
        id
    }

    /// Release a subscription handle
    pub fn disconnect(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|s| s.id != id);
    }

    /// True if any live subscription covers the given trigger change
    pub fn delivers(&self, corner: CornerId, trigger: Trigger) -> bool {
        self.subscribers
            .iter()
            .any(|s| s.corner == corner && s.trigger == trigger)
    }

    /// Drain all queued change events
    pub fn take_events(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    /// Earliest deadline at which [`SettingsStore::flush_if_due`] should run
    pub fn next_flush(&self) -> Option<Instant> {
        self.flush_due
    }

    /// Persist the document if the debounce window has elapsed
    pub fn flush_if_due(&mut self, now: Instant) -> Result<()> {
        match self.flush_due {
            Some(due) if now >= due => self.flush(),
            _ => Ok(()),
        }
    }

    /// Persist the document unconditionally (shutdown path)
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(&self.doc)
            .context("Failed to serialize configuration")?;
        // Write-then-rename so a crash mid-write never truncates the config
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, contents)
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to move {} into place", tmp.display()))?;
        self.file_mtime = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        self.dirty = false;
        self.flush_due = None;
        debug!(path = %self.path.display(), "Configuration flushed");
        Ok(())
    }

    /// Re-read the file if another process modified it, queueing one event
    /// per (corner, trigger) that actually differs
    ///
    /// Returns true if anything changed.
    pub fn reload_if_changed(&mut self) -> Result<bool> {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            // File missing or unreadable: nothing external to pick up
            Err(_) => return Ok(false),
        };
        if self.file_mtime == Some(mtime) {
            return Ok(false);
        }
        if self.dirty {
            // Our own unflushed edits win; skip this round and let the next
            // flush re-establish the file
            warn!("Config file changed externally while local edits are pending, keeping local state");
            self.file_mtime = Some(mtime);
            return Ok(false);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to re-read config file {}", self.path.display()))?;
        let new_doc: ConfigDoc = match serde_json::from_str(&contents) {
            Ok(doc) => normalize(doc),
            Err(err) => {
                // A half-written external edit must not take down the daemon
                warn!(error = %err, "Ignoring unparsable external config edit");
                self.file_mtime = Some(mtime);
                return Ok(false);
            }
        };

        let events = diff_docs(&self.doc, &new_doc);
        let changed = !events.is_empty();
        if changed {
            info!(changes = events.len(), "Picked up external configuration edit");
        }
        self.doc = new_doc;
        self.file_mtime = Some(mtime);
        self.pending.extend(events);
        Ok(changed)
    }

    fn mark_changed(&mut self, event: ChangeEvent) {
        if !self.pending.contains(&event) {
            self.pending.push(event);
        }
        self.dirty = true;
        self.flush_due =
            Some(Instant::now() + Duration::from_millis(self.doc.global.flush_debounce_ms));
    }
}

/// Enforce schema invariants on a freshly-deserialized document
fn normalize(mut doc: ConfigDoc) -> ConfigDoc {
    for settings in doc.corners.values_mut() {
        if let Some(config) = settings.triggers.get_mut(&Trigger::CtrlPointerPressure) {
            config.requires_ctrl = true;
        }
        for config in settings.triggers.values_mut() {
            config.barrier_size_h = config.barrier_size_h.min(geometry::BARRIER_PERCENT_MAX);
            config.barrier_size_v = config.barrier_size_v.min(geometry::BARRIER_PERCENT_MAX);
        }
    }
    doc
}

/// Compute the change events separating two documents
fn diff_docs(old: &ConfigDoc, new: &ConfigDoc) -> Vec<ChangeEvent> {
    let mut events = Vec::new();
    if old.global != new.global {
        events.push(ChangeEvent::Global);
    }

    let default_corner = CornerSettings::default();
    let keys: std::collections::BTreeSet<&String> =
        old.corners.keys().chain(new.corners.keys()).collect();
    for key in keys {
        let Some(corner) = CornerId::parse(key) else {
            continue;
        };
        let old_settings = old.corners.get(key).unwrap_or(&default_corner);
        let new_settings = new.corners.get(key).unwrap_or(&default_corner);
        if (old_settings.h_expand, old_settings.v_expand)
            != (new_settings.h_expand, new_settings.v_expand)
        {
            events.push(ChangeEvent::Corner { corner });
        }
        for trigger in Trigger::ALL {
            let old_trigger = old_settings.triggers.get(&trigger);
            let new_trigger = new_settings.triggers.get(&trigger);
            let default_trigger = TriggerConfig::default();
            if old_trigger.unwrap_or(&default_trigger) != new_trigger.unwrap_or(&default_trigger) {
                events.push(ChangeEvent::Trigger { corner, trigger });
            }
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::trigger::DISABLED_ACTION;

    fn store_in(dir: &tempfile::TempDir) -> SettingsStore {
        SettingsStore::load(&dir.path().join("config.json")).unwrap()
    }

    fn corner() -> CornerId {
        CornerId::new(0, Quadrant::TopLeft)
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.global().enabled);
        let config = store.trigger_config(corner(), Trigger::ClickPrimary);
        assert_eq!(config.action, DISABLED_ACTION);
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.action = "toggle-overview".to_string();
        config.barrier_size_h = 10;
        store.set_trigger_config(corner(), Trigger::PointerPressure, config.clone());
        store.flush().unwrap();

        let reloaded = store_in(&dir);
        assert_eq!(
            reloaded.trigger_config(corner(), Trigger::PointerPressure),
            config
        );
    }

    #[test]
    fn test_ctrl_pressure_requires_ctrl_is_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.action = "close-win".to_string();
        config.requires_ctrl = false;
        store.set_trigger_config(corner(), Trigger::CtrlPointerPressure, config);
        assert!(
            store
                .trigger_config(corner(), Trigger::CtrlPointerPressure)
                .requires_ctrl
        );
    }

    #[test]
    fn test_barrier_size_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.barrier_size_h = 100;
        store.set_trigger_config(corner(), Trigger::PointerPressure, config);
        assert_eq!(
            store
                .trigger_config(corner(), Trigger::PointerPressure)
                .barrier_size_h,
            geometry::BARRIER_PERCENT_MAX
        );
    }

    #[test]
    fn test_writes_are_debounced_not_synchronous() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.action = "close-win".to_string();
        store.set_trigger_config(corner(), Trigger::ClickPrimary, config);

        // Nothing on disk before the debounce window elapses
        assert!(!dir.path().join("config.json").exists());
        assert!(store.next_flush().is_some());

        // Not due yet
        store.flush_if_due(Instant::now()).unwrap();
        assert!(!dir.path().join("config.json").exists());

        // Past the deadline
        let past_deadline = store.next_flush().unwrap();
        store.flush_if_due(past_deadline).unwrap();
        assert!(dir.path().join("config.json").exists());
        assert!(store.next_flush().is_none());
    }

    #[test]
    fn test_change_events_queued_and_drained() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        store.set_trigger_config(corner(), Trigger::ScrollUp, TriggerConfig::default());
        store.set_expansion(corner(), true, false);
        store.update_global(|g| g.enabled = false);

        let events = store.take_events();
        assert_eq!(
            events,
            vec![
                ChangeEvent::Trigger { corner: corner(), trigger: Trigger::ScrollUp },
                ChangeEvent::Corner { corner: corner() },
                ChangeEvent::Global,
            ]
        );
        assert!(store.take_events().is_empty());
    }

    #[test]
    fn test_subscriptions_released_explicitly() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let id = store.connect(corner(), Trigger::ClickPrimary);
        assert!(store.delivers(corner(), Trigger::ClickPrimary));
        assert!(!store.delivers(corner(), Trigger::ClickMiddle));
        store.disconnect(id);
        assert!(!store.delivers(corner(), Trigger::ClickPrimary));
    }

    #[test]
    fn test_external_reload_reports_exact_trigger() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.action = "close-win".to_string();
        store.set_trigger_config(corner(), Trigger::ClickPrimary, config);
        store.flush().unwrap();
        // The daemon drains notifications every loop iteration; drain the
        // local write's event so only the external change is left to see.
        assert_eq!(store.take_events().len(), 1);

        // Simulate the preferences GUI rewriting the file
        let mut other = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.action = "minimize-win".to_string();
        other.set_trigger_config(corner(), Trigger::ClickSecondary, config);
        other.flush().unwrap();
        // Force an mtime difference despite coarse filesystem timestamps
        let future = std::time::SystemTime::now() + Duration::from_secs(5);
        let file = fs::File::options()
            .write(true)
            .open(dir.path().join("config.json"))
            .unwrap();
        file.set_modified(future).unwrap();

        assert!(store.reload_if_changed().unwrap());
        let events = store.take_events();
        assert_eq!(
            events,
            vec![ChangeEvent::Trigger { corner: corner(), trigger: Trigger::ClickSecondary }]
        );
        // Unchanged triggers stay untouched
        assert_eq!(
            store.trigger_config(corner(), Trigger::ClickPrimary).action,
            "close-win"
        );
    }

    #[test]
    fn test_reset_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(&dir);
        let mut config = TriggerConfig::default();
        config.action = "close-win".to_string();
        store.set_trigger_config(corner(), Trigger::ClickPrimary, config);
        store.take_events();

        store.reset_all();
        assert_eq!(
            store.trigger_config(corner(), Trigger::ClickPrimary).action,
            DISABLED_ACTION
        );
        assert!(store.take_events().contains(&ChangeEvent::Global));
    }
}
