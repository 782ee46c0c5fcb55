//! One live hot corner
//!
//! A [`HotCornerInstance`] owns the native input-sensing resources (pointer
//! barriers and clickable regions) of one corner. It is built from a
//! configuration snapshot, resolves raw input events to triggers, runs the
//! debounce and fullscreen gates, and dispatches. Instances are never
//! patched in place: any config or layout change destroys the instance and
//! builds a fresh one.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::actions::{Dispatcher, RunActionData};
use crate::backend::{
    BarrierId, Compositor, Modifiers, MouseButton, RegionId, ScrollDirection, ShellOps,
};
use crate::common::types::Rect;
use crate::config::{Corner, CornerId, GlobalSettings, SettingsStore, Trigger, TriggerConfig};

use super::debounce::DebounceGate;
use super::geometry::{self, Expansion};

/// Read-only global options the engine needs, detached from the store
///
/// Injected at construction so instances carry no reference back into the
/// configuration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub debounce_delay: Duration,
    pub barrier_fallback: bool,
    pub pressure_requires_shift: bool,
    pub action_on_press: bool,
}

impl From<&GlobalSettings> for EngineOptions {
    fn from(global: &GlobalSettings) -> Self {
        Self {
            debounce_delay: Duration::from_millis(global.debounce_delay_ms),
            barrier_fallback: global.barrier_fallback,
            pressure_requires_shift: global.pressure_requires_shift,
            action_on_press: global.action_on_press,
        }
    }
}

/// Everything one instance needs to know about its corner, copied out of the
/// config layer at build time
#[derive(Debug, Clone)]
pub struct CornerSnapshot {
    pub id: CornerId,
    /// Geometry of the owning monitor
    pub monitor: Rect,
    /// Fully-populated per-trigger settings
    pub triggers: BTreeMap<Trigger, TriggerConfig>,
    /// Joint expansion state, computed by the orchestrator for the whole
    /// monitor, never by the corner in isolation
    pub expansion: Expansion,
}

impl CornerSnapshot {
    /// Capture a snapshot through a corner's cached view
    pub fn capture(
        corner: &mut Corner,
        store: &SettingsStore,
        monitor: Rect,
        expansion: Expansion,
    ) -> Self {
        let triggers = Trigger::ALL
            .into_iter()
            .map(|t| (t, corner.trigger_config(store, t).clone()))
            .collect();
        Self { id: corner.id(), monitor, triggers, expansion }
    }

    /// Settings of one trigger
    pub fn config(&self, trigger: Trigger) -> &TriggerConfig {
        // The map is always fully populated by construction
        &self.triggers[&trigger]
    }

    /// True if either pressure trigger fires an action
    pub fn pressure_enabled(&self) -> bool {
        self.config(Trigger::PointerPressure).enabled()
            || self.config(Trigger::CtrlPointerPressure).enabled()
    }

    /// True if any click or scroll trigger fires an action
    pub fn region_enabled(&self) -> bool {
        Trigger::ALL
            .into_iter()
            .filter(|t| t.is_region())
            .any(|t| self.config(t).enabled())
    }

    /// The corner-existence predicate: any trigger enabled at all
    pub fn should_exist(&self) -> bool {
        Trigger::ALL.into_iter().any(|t| self.config(t).enabled())
    }

    /// Barrier sizing comes from the plain pressure trigger when enabled,
    /// else from the Ctrl variant
    fn pressure_config(&self) -> &TriggerConfig {
        if self.config(Trigger::PointerPressure).enabled() {
            self.config(Trigger::PointerPressure)
        } else {
            self.config(Trigger::CtrlPointerPressure)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InstanceState {
    Built,
    Destroyed,
}

/// A live hot corner owning its native geometry
pub struct HotCornerInstance {
    snapshot: CornerSnapshot,
    options: EngineOptions,
    state: InstanceState,
    barriers: Vec<BarrierId>,
    regions: Vec<RegionId>,
    /// Pointer pressure accumulated against the barrier pair since the last
    /// firing or barrier-leave
    pressure: f64,
    gate: DebounceGate,
}

impl HotCornerInstance {
    /// Allocate the corner's native geometry and return the live instance
    ///
    /// Allocation failures (including degenerate sizes on tiny monitors) are
    /// skipped silently; a corner with no surviving geometry is simply inert.
    pub fn build(
        snapshot: CornerSnapshot,
        options: EngineOptions,
        compositor: &mut dyn Compositor,
    ) -> Self {
        let mut barriers = Vec::new();
        if snapshot.pressure_enabled() && !options.barrier_fallback {
            let config = snapshot.pressure_config();
            let pair = geometry::barrier_pair(
                &snapshot.monitor,
                snapshot.id.quadrant,
                config.barrier_size_h,
                config.barrier_size_v,
            );
            for line in [pair.horizontal, pair.vertical].into_iter().flatten() {
                match compositor.create_barrier(line) {
                    Ok(id) => barriers.push(id),
                    Err(err) => {
                        debug!(corner = %snapshot.id, error = %err, "Skipping barrier allocation")
                    }
                }
            }
        }

        let mut regions = Vec::new();
        if snapshot.region_enabled() {
            for rect in
                geometry::click_regions(&snapshot.monitor, snapshot.id.quadrant, snapshot.expansion)
            {
                match compositor.create_region(rect) {
                    Ok(id) => regions.push(id),
                    Err(err) => {
                        debug!(corner = %snapshot.id, error = %err, "Skipping region allocation")
                    }
                }
            }
        }

        trace!(
            corner = %snapshot.id,
            barriers = barriers.len(),
            regions = regions.len(),
            "Hot corner built"
        );
        let gate = DebounceGate::new(options.debounce_delay);
        Self {
            snapshot,
            options,
            state: InstanceState::Built,
            barriers,
            regions,
            pressure: 0.0,
            gate,
        }
    }

    /// Corner identity
    pub fn id(&self) -> CornerId {
        self.snapshot.id
    }

    /// True if this instance owns the given barrier
    pub fn owns_barrier(&self, id: BarrierId) -> bool {
        self.barriers.contains(&id)
    }

    /// True if this instance owns the given region
    pub fn owns_region(&self, id: RegionId) -> bool {
        self.regions.contains(&id)
    }

    /// Pointer pressed against one of this corner's barriers
    ///
    /// Accumulates pressure until the configured threshold, then resolves
    /// and fires. Returns whether an action actually fired.
    pub fn on_barrier_hit(
        &mut self,
        velocity: f64,
        mods: Modifiers,
        now: Instant,
        compositor: &mut dyn Compositor,
        dispatcher: &Dispatcher,
        shell: &mut dyn ShellOps,
    ) -> bool {
        if self.state != InstanceState::Built {
            return false;
        }
        self.pressure += velocity.abs();
        let threshold = self.snapshot.pressure_config().pressure_threshold as f64;
        if self.pressure < threshold {
            return false;
        }
        self.pressure = 0.0;

        let trigger = if mods.ctrl {
            Trigger::CtrlPointerPressure
        } else {
            if self.options.pressure_requires_shift && !mods.shift {
                trace!(corner = %self.snapshot.id, "Pressure without Shift suppressed");
                return false;
            }
            Trigger::PointerPressure
        };
        self.fire(trigger, now, compositor, dispatcher, shell)
    }

    /// Pointer moved away from the barrier; discard accumulated pressure
    pub fn on_barrier_leave(&mut self) {
        self.pressure = 0.0;
    }

    /// Button state change inside one of this corner's regions
    pub fn on_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        mods: Modifiers,
        now: Instant,
        compositor: &mut dyn Compositor,
        dispatcher: &Dispatcher,
        shell: &mut dyn ShellOps,
    ) -> bool {
        if self.state != InstanceState::Built {
            return false;
        }
        // The firing phase (press or release) is a global option
        if pressed != self.options.action_on_press {
            return false;
        }
        let trigger = match button {
            MouseButton::Primary => Trigger::ClickPrimary,
            MouseButton::Secondary => Trigger::ClickSecondary,
            MouseButton::Middle => Trigger::ClickMiddle,
        };
        if self.snapshot.config(trigger).requires_ctrl && !mods.ctrl {
            return false;
        }
        self.fire(trigger, now, compositor, dispatcher, shell)
    }

    /// Scroll step inside one of this corner's regions
    pub fn on_scroll(
        &mut self,
        direction: ScrollDirection,
        mods: Modifiers,
        now: Instant,
        compositor: &mut dyn Compositor,
        dispatcher: &Dispatcher,
        shell: &mut dyn ShellOps,
    ) -> bool {
        if self.state != InstanceState::Built {
            return false;
        }
        let trigger = match direction {
            ScrollDirection::Up => Trigger::ScrollUp,
            ScrollDirection::Down => Trigger::ScrollDown,
        };
        if self.snapshot.config(trigger).requires_ctrl && !mods.ctrl {
            return false;
        }
        self.fire(trigger, now, compositor, dispatcher, shell)
    }

    /// Gate and dispatch one resolved trigger
    fn fire(
        &mut self,
        trigger: Trigger,
        now: Instant,
        compositor: &mut dyn Compositor,
        dispatcher: &Dispatcher,
        shell: &mut dyn ShellOps,
    ) -> bool {
        let config = self.snapshot.config(trigger).clone();
        if !config.enabled() {
            return false;
        }
        if !self.gate.permitted(now, &config.action) {
            trace!(corner = %self.snapshot.id, trigger = %trigger, "Debounced");
            return false;
        }
        if !config.fullscreen_enabled {
            match compositor.monitor_in_fullscreen(&self.snapshot.monitor) {
                Ok(true) => {
                    debug!(corner = %self.snapshot.id, trigger = %trigger, "Suppressed by fullscreen window");
                    return false;
                }
                Ok(false) => {}
                Err(err) => {
                    // Treat an unanswerable query as not-fullscreen
                    warn!(corner = %self.snapshot.id, error = %err, "Fullscreen query failed");
                }
            }
        }

        let data = RunActionData {
            action: config.action,
            monitor_index: self.snapshot.id.monitor_slot,
            workspace_index: config.workspace_index,
            command: config.command,
            keyboard_origin: false,
        };
        dispatcher.dispatch(shell, data)
    }

    /// Release all owned native geometry
    ///
    /// Idempotent: safe to call on an already-destroyed instance. Always
    /// runs before any rebuild so no stale barrier survives a change.
    pub fn destroy(&mut self, compositor: &mut dyn Compositor) {
        for id in self.barriers.drain(..) {
            compositor.destroy_barrier(id);
        }
        for id in self.regions.drain(..) {
            compositor.destroy_region(id);
        }
        self.state = InstanceState::Destroyed;
    }
}
