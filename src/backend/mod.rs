//! Backend abstraction layer
//!
//! The engine never talks to X11 directly: it is handed two narrow
//! capability traits at construction time. [`Compositor`] covers the
//! input-sensing primitives (monitors, pointer barriers, clickable regions,
//! shortcut grabs), [`ShellOps`] covers the side effects the action handlers
//! perform. Events flow back as [`BackendEvent`] values drained by the
//! daemon loop.

pub mod x11;

#[cfg(test)]
pub mod testing;

use anyhow::Result;

use crate::common::types::{Monitor, Rect};
use crate::shortcuts::Accelerator;

/// Opaque handle of one live pointer barrier
pub type BarrierId = u32;

/// Opaque handle of one live clickable region
pub type RegionId = u32;

/// Opaque handle of a toplevel window
pub type WindowHandle = u32;

/// Modifier state at the time of an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Mouse button identity, already normalized from backend button numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Primary,
    Secondary,
    Middle,
}

/// Scroll direction, normalized from discrete and smooth scroll deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// MPRIS-style media command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCommand {
    PlayPause,
    Next,
    Previous,
}

/// A pressure-barrier line segment in root-window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierLine {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// One input or layout event delivered by the backend
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackendEvent {
    /// The pointer pushed against a live barrier
    BarrierHit {
        barrier: BarrierId,
        /// Pointer velocity component normal to the barrier
        velocity: f64,
        mods: Modifiers,
    },
    /// The pointer moved away from a barrier it was pressing against
    BarrierLeave { barrier: BarrierId },
    /// A mouse button changed state inside a clickable region
    RegionButton {
        region: RegionId,
        button: MouseButton,
        pressed: bool,
        mods: Modifiers,
    },
    /// A scroll step occurred inside a clickable region
    RegionScroll {
        region: RegionId,
        direction: ScrollDirection,
        mods: Modifiers,
    },
    /// A grabbed keyboard shortcut fired; the index refers to the slice
    /// passed to [`Compositor::grab_shortcuts`]
    Shortcut { index: usize },
    /// Monitor layout changed (output added/removed/reconfigured)
    LayoutChanged,
}

/// Input-sensing primitives consumed by the trigger engine
pub trait Compositor {
    /// Connected monitors in slot order: primary first, then enumeration
    /// order excluding the primary
    fn monitors(&mut self) -> Result<Vec<Monitor>>;

    /// True if the given monitor currently shows a fullscreen window
    fn monitor_in_fullscreen(&mut self, monitor: &Rect) -> Result<bool>;

    /// Allocate a pointer barrier along the given line
    fn create_barrier(&mut self, line: BarrierLine) -> Result<BarrierId>;

    /// Release a pointer barrier; must tolerate already-released ids
    fn destroy_barrier(&mut self, id: BarrierId);

    /// Allocate a clickable region covering the given rectangle
    fn create_region(&mut self, rect: Rect) -> Result<RegionId>;

    /// Release a clickable region; must tolerate already-released ids
    fn destroy_region(&mut self, id: RegionId);

    /// Grab the given accelerators globally, replacing any previous set
    fn grab_shortcuts(&mut self, accelerators: &[Accelerator]) -> Result<()>;

    /// Release all shortcut grabs
    fn ungrab_shortcuts(&mut self);

    /// Mark this daemon as the owner of the live corner geometry
    fn stamp_ownership(&mut self) -> Result<()>;

    /// True if the ownership marker is still in place and unmodified
    fn ownership_intact(&mut self) -> Result<bool>;
}

/// Side-effecting shell operations consumed by the action handlers
///
/// Every method checks its own preconditions and reports failure as a plain
/// `Err`; the dispatcher contains those errors so a failing operation never
/// breaks the event loop.
pub trait ShellOps {
    /// Currently focused toplevel, if any
    fn active_window(&mut self) -> Result<Option<WindowHandle>>;

    fn close_window(&mut self, window: WindowHandle) -> Result<()>;
    fn minimize_window(&mut self, window: WindowHandle) -> Result<()>;
    fn toggle_maximize(&mut self, window: WindowHandle) -> Result<()>;
    fn toggle_fullscreen(&mut self, window: WindowHandle) -> Result<()>;
    fn toggle_above(&mut self, window: WindowHandle) -> Result<()>;
    fn toggle_sticky(&mut self, window: WindowHandle) -> Result<()>;

    /// Create a live thumbnail of the window (host-shell effect)
    fn create_window_thumbnail(&mut self, window: WindowHandle) -> Result<()>;

    fn workspace_count(&mut self) -> Result<u32>;
    fn current_workspace(&mut self) -> Result<u32>;
    fn switch_workspace(&mut self, index: u32) -> Result<()>;
    fn move_window_to_workspace(&mut self, window: WindowHandle, index: u32) -> Result<()>;

    fn toggle_show_desktop(&mut self) -> Result<()>;
    fn toggle_overview(&mut self) -> Result<()>;

    /// Spawn a detached shell command
    fn spawn_command(&mut self, command: &str) -> Result<()>;

    fn lock_screen(&mut self) -> Result<()>;
    fn suspend(&mut self) -> Result<()>;

    /// Current output volume in percent
    fn volume(&mut self) -> Result<i32>;
    fn set_volume(&mut self, percent: i32) -> Result<()>;
    fn toggle_mute(&mut self) -> Result<bool>;

    /// Current backlight level in percent
    fn brightness(&mut self) -> Result<i32>;
    fn set_brightness(&mut self, percent: i32) -> Result<()>;

    fn media_control(&mut self, command: MediaCommand) -> Result<()>;

    /// Show a transient on-screen indicator for a stepped adjustment
    fn show_feedback(&mut self, label: &str, level: Option<i32>);
}
