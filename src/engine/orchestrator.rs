//! Corner lifecycle orchestration
//!
//! The orchestrator owns every live [`HotCornerInstance`] together with the
//! per-corner config views. It knows only one reconfiguration move: tear
//! everything down and build the world again from the current settings and
//! monitor layout. Partial patching of live corners does not exist.

use std::collections::BTreeMap;
use std::time::Instant;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::actions::Dispatcher;
use crate::backend::{BackendEvent, Compositor, ShellOps};
use crate::common::types::Monitor;
use crate::config::{ChangeEvent, Corner, CornerId, Quadrant, SettingsStore};

use super::instance::{CornerSnapshot, EngineOptions, HotCornerInstance};
use super::geometry;

/// Owner of all live corner instances
pub struct CornerOrchestrator {
    dispatcher: Dispatcher,
    corners: BTreeMap<CornerId, Corner>,
    instances: Vec<HotCornerInstance>,
    monitors: Vec<Monitor>,
}

impl CornerOrchestrator {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            corners: BTreeMap::new(),
            instances: Vec::new(),
            monitors: Vec::new(),
        }
    }

    /// Number of live instances
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Monitor layout captured by the last rebuild
    pub fn monitors(&self) -> &[Monitor] {
        &self.monitors
    }

    /// Tear down and rebuild every corner from current settings and layout
    ///
    /// This is the only reconfiguration entry point. It is safe to call at
    /// any time, including when nothing changed; two consecutive calls
    /// converge on the same set of live corners.
    pub fn rebuild(
        &mut self,
        store: &mut SettingsStore,
        compositor: &mut dyn Compositor,
    ) -> Result<()> {
        self.destroy_all(compositor);

        self.monitors = compositor.monitors()?;
        self.sync_corner_views(store);
        // A rebuild reads current settings, not whatever the views cached
        // before; store writes may have bypassed the notification path.
        for corner in self.corners.values_mut() {
            corner.invalidate();
        }

        let global = store.global().clone();
        if !global.enabled {
            info!("Hot corners disabled, leaving all corners torn down");
            return Ok(());
        }
        let options = EngineOptions::from(&global);

        for (slot, monitor) in self.monitors.clone().into_iter().enumerate() {
            // Expansion is a property of the whole monitor: all four corners
            // are settled jointly so no edge is ever claimed twice.
            let mut flags = [(false, false); 4];
            for (i, quadrant) in Quadrant::ALL.into_iter().enumerate() {
                let id = CornerId::new(slot, quadrant);
                if let Some(corner) = self.corners.get_mut(&id) {
                    flags[i] = corner.expansion(store);
                }
            }
            let expansions = geometry::monitor_expansions(flags);

            for (i, quadrant) in Quadrant::ALL.into_iter().enumerate() {
                let id = CornerId::new(slot, quadrant);
                let Some(corner) = self.corners.get_mut(&id) else {
                    continue;
                };
                if !corner.any_trigger_enabled(store) {
                    continue;
                }
                let snapshot =
                    CornerSnapshot::capture(corner, store, monitor.rect, expansions[i]);
                self.instances
                    .push(HotCornerInstance::build(snapshot, options, compositor));
            }
        }

        if let Err(err) = compositor.stamp_ownership() {
            warn!(error = %err, "Failed to stamp corner ownership");
        }
        info!(
            monitors = self.monitors.len(),
            corners = self.instances.len(),
            "Hot corners rebuilt"
        );
        Ok(())
    }

    /// Destroy every live instance, releasing all native geometry
    pub fn destroy_all(&mut self, compositor: &mut dyn Compositor) {
        for mut instance in self.instances.drain(..) {
            instance.destroy(compositor);
        }
    }

    /// Release corner views and subscriptions on shutdown
    pub fn release_views(&mut self, store: &mut SettingsStore) {
        for (_, mut corner) in std::mem::take(&mut self.corners) {
            corner.release(store);
        }
    }

    /// Keep exactly one connected config view per corner of the current layout
    fn sync_corner_views(&mut self, store: &mut SettingsStore) {
        let slots = self.monitors.len();
        for slot in 0..slots {
            for quadrant in Quadrant::ALL {
                let id = CornerId::new(slot, quadrant);
                self.corners.entry(id).or_insert_with(|| {
                    let mut corner = Corner::new(id);
                    corner.connect_all(store);
                    corner
                });
            }
        }
        let stale: Vec<CornerId> = self
            .corners
            .keys()
            .filter(|id| id.monitor_slot >= slots)
            .copied()
            .collect();
        for id in stale {
            if let Some(mut corner) = self.corners.remove(&id) {
                debug!(corner = %id, "Releasing view of vanished monitor corner");
                corner.release(store);
            }
        }
    }

    /// Forward an external settings change to the affected corner view
    ///
    /// Returns true when the change warrants a rebuild (it always does; the
    /// caller coalesces).
    pub fn apply_change(&mut self, event: &ChangeEvent) -> bool {
        for corner in self.corners.values_mut() {
            corner.note_change(event);
        }
        true
    }

    /// Route one backend input event to the instance owning its geometry
    ///
    /// Returns whether an action fired. Events for geometry no instance
    /// owns (a race against a rebuild) are dropped silently.
    pub fn handle_event(
        &mut self,
        event: BackendEvent,
        now: Instant,
        compositor: &mut dyn Compositor,
        shell: &mut dyn ShellOps,
    ) -> bool {
        let dispatcher = &self.dispatcher;
        match event {
            BackendEvent::BarrierHit { barrier, velocity, mods } => self
                .instances
                .iter_mut()
                .find(|i| i.owns_barrier(barrier))
                .is_some_and(|i| {
                    i.on_barrier_hit(velocity, mods, now, compositor, dispatcher, shell)
                }),
            BackendEvent::BarrierLeave { barrier } => {
                if let Some(instance) =
                    self.instances.iter_mut().find(|i| i.owns_barrier(barrier))
                {
                    instance.on_barrier_leave();
                }
                false
            }
            BackendEvent::RegionButton { region, button, pressed, mods } => self
                .instances
                .iter_mut()
                .find(|i| i.owns_region(region))
                .is_some_and(|i| {
                    i.on_button(button, pressed, mods, now, compositor, dispatcher, shell)
                }),
            BackendEvent::RegionScroll { region, direction, mods } => self
                .instances
                .iter_mut()
                .find(|i| i.owns_region(region))
                .is_some_and(|i| {
                    i.on_scroll(direction, mods, now, compositor, dispatcher, shell)
                }),
            // Layout changes and shortcuts are the daemon's concern
            BackendEvent::LayoutChanged | BackendEvent::Shortcut { .. } => false,
        }
    }

    /// Periodic ownership check; true means the marker was lost and the
    /// caller should schedule a rebuild
    pub fn reconcile(&mut self, compositor: &mut dyn Compositor) -> bool {
        if self.instances.is_empty() {
            return false;
        }
        match compositor.ownership_intact() {
            Ok(true) => false,
            Ok(false) => {
                warn!("Corner ownership marker lost, scheduling rebuild");
                true
            }
            Err(err) => {
                debug!(error = %err, "Ownership check failed");
                false
            }
        }
    }

    /// The shared dispatcher, for keyboard-shortcut and CLI dispatch
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}
