//! Recording fake backend for engine and dispatch tests

use std::collections::BTreeSet;

use anyhow::{Result, bail};

use crate::common::types::{Monitor, Rect};
use crate::shortcuts::Accelerator;

use super::{
    BarrierId, BarrierLine, Compositor, MediaCommand, RegionId, ShellOps, WindowHandle,
};

/// In-memory backend implementing both capability traits
///
/// Records every allocation, teardown and shell operation so tests can
/// assert on exact side effects.
pub struct FakeBackend {
    pub monitors: Vec<Monitor>,
    /// Monitor rects currently showing a fullscreen window
    pub fullscreen: Vec<Rect>,

    next_id: u32,
    pub live_barriers: BTreeSet<BarrierId>,
    pub live_regions: BTreeSet<RegionId>,
    pub barrier_lines: Vec<(BarrierId, BarrierLine)>,
    pub region_rects: Vec<(RegionId, Rect)>,
    pub grabbed: Vec<Accelerator>,
    pub ownership_stamped: bool,
    pub ownership_intact: bool,

    pub active: Option<WindowHandle>,
    pub volume: i32,
    pub muted: bool,
    pub brightness: i32,
    pub workspace: u32,
    pub workspaces: u32,
    /// Chronological log of every shell operation performed
    pub ops: Vec<String>,
}

impl FakeBackend {
    /// Fake with a single primary 1920×1080 monitor
    pub fn new() -> Self {
        Self::with_monitors(vec![Monitor {
            rect: Rect::new(0, 0, 1920, 1080),
            primary: true,
        }])
    }

    /// Fake with an explicit monitor layout (slot order)
    pub fn with_monitors(monitors: Vec<Monitor>) -> Self {
        Self {
            monitors,
            fullscreen: Vec::new(),
            next_id: 1,
            live_barriers: BTreeSet::new(),
            live_regions: BTreeSet::new(),
            barrier_lines: Vec::new(),
            region_rects: Vec::new(),
            grabbed: Vec::new(),
            ownership_stamped: false,
            ownership_intact: true,
            active: Some(0x100),
            volume: 50,
            muted: false,
            brightness: 60,
            workspace: 0,
            workspaces: 4,
            ops: Vec::new(),
        }
    }

    /// Line of a live barrier
    pub fn barrier_line(&self, id: BarrierId) -> Option<BarrierLine> {
        self.barrier_lines
            .iter()
            .find(|(b, _)| *b == id)
            .map(|(_, line)| *line)
    }

    /// Rect of a live region
    pub fn region_rect(&self, id: RegionId) -> Option<Rect> {
        self.region_rects
            .iter()
            .find(|(r, _)| *r == id)
            .map(|(_, rect)| *rect)
    }
}

impl Compositor for FakeBackend {
    fn monitors(&mut self) -> Result<Vec<Monitor>> {
        Ok(self.monitors.clone())
    }

    fn monitor_in_fullscreen(&mut self, monitor: &Rect) -> Result<bool> {
        Ok(self.fullscreen.contains(monitor))
    }

    fn create_barrier(&mut self, line: BarrierLine) -> Result<BarrierId> {
        if line.x1 == line.x2 && line.y1 == line.y2 {
            bail!("degenerate barrier line");
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live_barriers.insert(id);
        self.barrier_lines.push((id, line));
        Ok(id)
    }

    fn destroy_barrier(&mut self, id: BarrierId) {
        self.live_barriers.remove(&id);
        self.barrier_lines.retain(|(b, _)| *b != id);
    }

    fn create_region(&mut self, rect: Rect) -> Result<RegionId> {
        if rect.is_degenerate() {
            bail!("degenerate region rect");
        }
        let id = self.next_id;
        self.next_id += 1;
        self.live_regions.insert(id);
        self.region_rects.push((id, rect));
        Ok(id)
    }

    fn destroy_region(&mut self, id: RegionId) {
        self.live_regions.remove(&id);
        self.region_rects.retain(|(r, _)| *r != id);
    }

    fn grab_shortcuts(&mut self, accelerators: &[Accelerator]) -> Result<()> {
        self.grabbed = accelerators.to_vec();
        Ok(())
    }

    fn ungrab_shortcuts(&mut self) {
        self.grabbed.clear();
    }

    fn stamp_ownership(&mut self) -> Result<()> {
        self.ownership_stamped = true;
        self.ownership_intact = true;
        Ok(())
    }

    fn ownership_intact(&mut self) -> Result<bool> {
        Ok(self.ownership_intact)
    }
}

impl ShellOps for FakeBackend {
    fn active_window(&mut self) -> Result<Option<WindowHandle>> {
        Ok(self.active)
    }

    fn close_window(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("close {window:#x}"));
        Ok(())
    }

    fn minimize_window(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("minimize {window:#x}"));
        Ok(())
    }

    fn toggle_maximize(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("toggle-maximize {window:#x}"));
        Ok(())
    }

    fn toggle_fullscreen(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("toggle-fullscreen {window:#x}"));
        Ok(())
    }

    fn toggle_above(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("toggle-above {window:#x}"));
        Ok(())
    }

    fn toggle_sticky(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("toggle-sticky {window:#x}"));
        Ok(())
    }

    fn create_window_thumbnail(&mut self, window: WindowHandle) -> Result<()> {
        self.ops.push(format!("thumbnail {window:#x}"));
        Ok(())
    }

    fn workspace_count(&mut self) -> Result<u32> {
        Ok(self.workspaces)
    }

    fn current_workspace(&mut self) -> Result<u32> {
        Ok(self.workspace)
    }

    fn switch_workspace(&mut self, index: u32) -> Result<()> {
        self.workspace = index;
        self.ops.push(format!("switch-workspace {index}"));
        Ok(())
    }

    fn move_window_to_workspace(&mut self, window: WindowHandle, index: u32) -> Result<()> {
        self.ops.push(format!("move-to-workspace {window:#x} {index}"));
        Ok(())
    }

    fn toggle_show_desktop(&mut self) -> Result<()> {
        self.ops.push("show-desktop".to_string());
        Ok(())
    }

    fn toggle_overview(&mut self) -> Result<()> {
        self.ops.push("toggle-overview".to_string());
        Ok(())
    }

    fn spawn_command(&mut self, command: &str) -> Result<()> {
        self.ops.push(format!("spawn {command}"));
        Ok(())
    }

    fn lock_screen(&mut self) -> Result<()> {
        self.ops.push("lock-screen".to_string());
        Ok(())
    }

    fn suspend(&mut self) -> Result<()> {
        self.ops.push("suspend".to_string());
        Ok(())
    }

    fn volume(&mut self) -> Result<i32> {
        Ok(self.volume)
    }

    fn set_volume(&mut self, percent: i32) -> Result<()> {
        self.volume = percent;
        self.ops.push(format!("set-volume {percent}"));
        Ok(())
    }

    fn toggle_mute(&mut self) -> Result<bool> {
        self.muted = !self.muted;
        self.ops.push(format!("toggle-mute {}", self.muted));
        Ok(self.muted)
    }

    fn brightness(&mut self) -> Result<i32> {
        Ok(self.brightness)
    }

    fn set_brightness(&mut self, percent: i32) -> Result<()> {
        self.brightness = percent;
        self.ops.push(format!("set-brightness {percent}"));
        Ok(())
    }

    fn media_control(&mut self, command: MediaCommand) -> Result<()> {
        self.ops.push(format!("media {command:?}"));
        Ok(())
    }

    fn show_feedback(&mut self, label: &str, level: Option<i32>) {
        self.ops.push(match level {
            Some(level) => format!("feedback {label} {level}"),
            None => format!("feedback {label}"),
        });
    }
}
