//! X11 backend
//!
//! Pressure sensing uses XFixes pointer barriers with XInput2 barrier
//! events; clickable regions are unmanaged InputOnly windows; monitors come
//! from RandR with the primary output pinned to slot 0. Window and
//! workspace operations go through EWMH client messages, and the few
//! effects X11 has no protocol for (volume, backlight, media, session)
//! shell out to the usual desktop tools.
//!
//! The compositor and shell halves are separate structs sharing one
//! connection, so the engine can borrow them independently.

use std::collections::HashMap;
use std::os::unix::io::{AsRawFd, RawFd};
use std::process::{Command, Stdio};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::Event;
use x11rb::protocol::randr::{self, ConnectionExt as _};
use x11rb::protocol::xfixes::ConnectionExt as _;
use x11rb::protocol::xinput::{self, ConnectionExt as _};
use x11rb::protocol::xproto::*;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::common::types::{Monitor, Rect};
use crate::constants::{commands, x11};
use crate::shortcuts::Accelerator;

use super::{
    BackendEvent, BarrierId, BarrierLine, Compositor, MediaCommand, Modifiers, MouseButton,
    RegionId, ScrollDirection, ShellOps, WindowHandle,
};

/// Pre-cached X11 atoms to avoid repeated roundtrips
pub struct CachedAtoms {
    pub net_active_window: Atom,
    pub net_client_list: Atom,
    pub net_wm_state: Atom,
    pub net_wm_state_fullscreen: Atom,
    pub net_wm_state_maximized_vert: Atom,
    pub net_wm_state_maximized_horz: Atom,
    pub net_wm_state_above: Atom,
    pub net_wm_state_sticky: Atom,
    pub net_close_window: Atom,
    pub net_current_desktop: Atom,
    pub net_number_of_desktops: Atom,
    pub net_wm_desktop: Atom,
    pub net_showing_desktop: Atom,
    pub wm_change_state: Atom,
    pub owner_marker: Atom,
}

impl CachedAtoms {
    pub fn new(conn: &RustConnection) -> Result<Self> {
        let intern = |name: &str| -> Result<Atom> {
            Ok(conn
                .intern_atom(false, name.as_bytes())
                .with_context(|| format!("Failed to intern {name} atom"))?
                .reply()
                .with_context(|| format!("Failed to get reply for {name} atom"))?
                .atom)
        };
        Ok(Self {
            net_active_window: intern("_NET_ACTIVE_WINDOW")?,
            net_client_list: intern("_NET_CLIENT_LIST")?,
            net_wm_state: intern("_NET_WM_STATE")?,
            net_wm_state_fullscreen: intern("_NET_WM_STATE_FULLSCREEN")?,
            net_wm_state_maximized_vert: intern("_NET_WM_STATE_MAXIMIZED_VERT")?,
            net_wm_state_maximized_horz: intern("_NET_WM_STATE_MAXIMIZED_HORZ")?,
            net_wm_state_above: intern("_NET_WM_STATE_ABOVE")?,
            net_wm_state_sticky: intern("_NET_WM_STATE_STICKY")?,
            net_close_window: intern("_NET_CLOSE_WINDOW")?,
            net_current_desktop: intern("_NET_CURRENT_DESKTOP")?,
            net_number_of_desktops: intern("_NET_NUMBER_OF_DESKTOPS")?,
            net_wm_desktop: intern("_NET_WM_DESKTOP")?,
            net_showing_desktop: intern("_NET_SHOWING_DESKTOP")?,
            wm_change_state: intern("WM_CHANGE_STATE")?,
            owner_marker: intern(x11::OWNER_PROPERTY)?,
        })
    }
}

/// Shared connection state of both backend halves
pub struct XContext {
    conn: RustConnection,
    root: Window,
    atoms: CachedAtoms,
}

impl XContext {
    /// Raw connection file descriptor for poll()-based blocking
    pub fn as_raw_fd(&self) -> RawFd {
        self.conn.stream().as_raw_fd()
    }

    /// Send an EWMH client message addressed to the window manager
    fn send_root_message(&self, window: Window, message_type: Atom, data: [u32; 5]) -> Result<()> {
        let event = ClientMessageEvent::new(32, window, message_type, data);
        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                event,
            )
            .context("Failed to send client message")?;
        self.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    /// _NET_WM_STATE toggle for up to two state atoms
    fn toggle_wm_state(&self, window: Window, first: Atom, second: Atom) -> Result<()> {
        self.send_root_message(
            window,
            self.atoms.net_wm_state,
            [x11::NET_WM_STATE_TOGGLE, first, second, x11::SOURCE_PAGER, 0],
        )
    }

    /// First CARDINAL of a root-window property
    fn root_cardinal(&self, atom: Atom) -> Result<Option<u32>> {
        let reply = self
            .conn
            .get_property(false, self.root, atom, AtomEnum::CARDINAL, 0, 1)
            .context("Failed to request root property")?
            .reply()
            .context("Failed to read root property")?;
        Ok(reply.value32().and_then(|mut v| v.next()))
    }

    /// Window list from a root property
    fn root_window_list(&self, atom: Atom) -> Result<Vec<Window>> {
        let reply = self
            .conn
            .get_property(false, self.root, atom, AtomEnum::WINDOW, 0, u32::MAX)
            .context("Failed to request window list")?
            .reply()
            .context("Failed to read window list")?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    /// Atom list property of a window
    fn window_atom_list(&self, window: Window, atom: Atom) -> Result<Vec<Atom>> {
        let reply = self
            .conn
            .get_property(false, window, atom, AtomEnum::ATOM, 0, 1024)
            .context("Failed to request atom list")?
            .reply()
            .context("Failed to read atom list")?;
        Ok(reply.value32().map(|v| v.collect()).unwrap_or_default())
    }

    /// Root-coordinate geometry of a window
    fn window_rect(&self, window: Window) -> Result<Rect> {
        let geometry = self
            .conn
            .get_geometry(window)
            .context("Failed to request window geometry")?
            .reply()
            .context("Failed to read window geometry")?;
        let translated = self
            .conn
            .translate_coordinates(window, self.root, 0, 0)
            .context("Failed to translate window coordinates")?
            .reply()
            .context("Failed to read translated coordinates")?;
        Ok(Rect::new(
            translated.dst_x as i32,
            translated.dst_y as i32,
            geometry.width as u32,
            geometry.height as u32,
        ))
    }

    /// Modifier state from a pointer roundtrip (barrier events carry none)
    fn query_modifiers(&self) -> Result<Modifiers> {
        let reply = self
            .conn
            .query_pointer(self.root)
            .context("Failed to query pointer")?
            .reply()
            .context("Failed to read pointer reply")?;
        Ok(convert_modifiers(reply.mask))
    }
}

/// One registered shortcut grab
struct ShortcutGrab {
    keycode: Keycode,
    modmask: ModMask,
    index: usize,
}

/// The input-sensing half of the backend
pub struct X11Compositor {
    ctx: Rc<XContext>,
    /// Live barriers with their orientation (true = horizontal line)
    barriers: HashMap<BarrierId, bool>,
    regions: HashMap<RegionId, Window>,
    grabs: Vec<ShortcutGrab>,
}

/// The side-effecting half of the backend
pub struct X11Shell {
    ctx: Rc<XContext>,
}

/// Connect to the display and negotiate the required extensions
pub fn connect() -> Result<(X11Compositor, X11Shell)> {
    let (conn, screen_num) = x11rb::connect(None).context("Failed to connect to X11")?;
    let root = conn.setup().roots[screen_num].root;

    conn.xfixes_query_version(5, 0)
        .context("Failed to negotiate XFixes version")?
        .reply()
        .context("XFixes 5.0 not supported by the server")?;
    conn.xinput_xi_query_version(2, 3)
        .context("Failed to negotiate XInput version")?
        .reply()
        .context("XInput 2.3 not supported by the server")?;
    conn.randr_query_version(1, 5)
        .context("Failed to negotiate RandR version")?
        .reply()
        .context("RandR 1.5 not supported by the server")?;

    // Barrier hit/leave events from every master pointer
    conn.xinput_xi_select_events(
        root,
        &[xinput::EventMask {
            deviceid: xinput::Device::ALL_MASTER.into(),
            mask: vec![(xinput::XIEventMask::BARRIER_HIT | xinput::XIEventMask::BARRIER_LEAVE)
                .into()],
        }],
    )
    .context("Failed to select XInput barrier events")?;

    // Monitor layout changes
    conn.randr_select_input(root, randr::NotifyMask::SCREEN_CHANGE)
        .context("Failed to select RandR events")?;

    let atoms = CachedAtoms::new(&conn)?;
    conn.flush().context("Failed to flush X11 connection")?;
    info!("Connected to X11 display");

    let ctx = Rc::new(XContext { conn, root, atoms });
    Ok((
        X11Compositor {
            ctx: Rc::clone(&ctx),
            barriers: HashMap::new(),
            regions: HashMap::new(),
            grabs: Vec::new(),
        },
        X11Shell { ctx },
    ))
}

impl X11Compositor {
    /// Connection file descriptor for the daemon's poll loop
    pub fn as_raw_fd(&self) -> RawFd {
        self.ctx.as_raw_fd()
    }

    /// Drain and convert all pending X11 events
    pub fn poll_events(&mut self) -> Result<Vec<BackendEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self
            .ctx
            .conn
            .poll_for_event()
            .context("X11 connection broke")?
        {
            if let Some(converted) = self.convert_event(event)? {
                events.push(converted);
            }
        }
        Ok(events)
    }

    fn convert_event(&mut self, event: Event) -> Result<Option<BackendEvent>> {
        Ok(match event {
            Event::XinputBarrierHit(hit) => {
                let barrier = hit.barrier;
                let Some(&horizontal) = self.barriers.get(&barrier) else {
                    return Ok(None);
                };
                // Pressure is the velocity component normal to the line
                let velocity = if horizontal {
                    fp3232_to_f64(hit.dy)
                } else {
                    fp3232_to_f64(hit.dx)
                };
                let mods = self.ctx.query_modifiers().unwrap_or_default();
                Some(BackendEvent::BarrierHit { barrier, velocity: velocity.abs(), mods })
            }
            Event::XinputBarrierLeave(leave) => self
                .barriers
                .contains_key(&leave.barrier)
                .then_some(BackendEvent::BarrierLeave { barrier: leave.barrier }),
            Event::ButtonPress(press) => self.convert_button(press, true),
            Event::ButtonRelease(release) => self.convert_button(release, false),
            Event::KeyPress(press) => {
                let modmask = normalize_modmask(press.state);
                self.grabs
                    .iter()
                    .find(|g| g.keycode == press.detail && g.modmask == modmask)
                    .map(|g| BackendEvent::Shortcut { index: g.index })
            }
            Event::RandrScreenChangeNotify(_) | Event::RandrNotify(_) => {
                Some(BackendEvent::LayoutChanged)
            }
            Event::MappingNotify(_) => {
                // Keycodes may have moved under our grabs
                warn!("Keyboard mapping changed, shortcut grabs may be stale until rebuild");
                None
            }
            _ => None,
        })
    }

    fn convert_button(&self, event: ButtonPressEvent, pressed: bool) -> Option<BackendEvent> {
        let region = event.event;
        if !self.regions.contains_key(&region) {
            return None;
        }
        let mods = convert_modifiers(event.state);
        match event.detail {
            x11::BUTTON_PRIMARY => Some(BackendEvent::RegionButton {
                region,
                button: MouseButton::Primary,
                pressed,
                mods,
            }),
            x11::BUTTON_MIDDLE => Some(BackendEvent::RegionButton {
                region,
                button: MouseButton::Middle,
                pressed,
                mods,
            }),
            x11::BUTTON_SECONDARY => Some(BackendEvent::RegionButton {
                region,
                button: MouseButton::Secondary,
                pressed,
                mods,
            }),
            // A scroll step is only its press half
            x11::BUTTON_SCROLL_UP if pressed => Some(BackendEvent::RegionScroll {
                region,
                direction: ScrollDirection::Up,
                mods,
            }),
            x11::BUTTON_SCROLL_DOWN if pressed => Some(BackendEvent::RegionScroll {
                region,
                direction: ScrollDirection::Down,
                mods,
            }),
            _ => None,
        }
    }
}

impl Compositor for X11Compositor {
    fn monitors(&mut self) -> Result<Vec<Monitor>> {
        let reply = self
            .ctx
            .conn
            .randr_get_monitors(self.ctx.root, true)
            .context("Failed to request monitors")?
            .reply()
            .context("Failed to read monitor list")?;
        let mut monitors: Vec<Monitor> = reply
            .monitors
            .iter()
            .map(|m| Monitor {
                rect: Rect::new(m.x as i32, m.y as i32, m.width as u32, m.height as u32),
                primary: m.primary,
            })
            .collect();
        // Slot 0 is always the primary
        monitors.sort_by_key(|m| !m.primary);
        Ok(monitors)
    }

    fn monitor_in_fullscreen(&mut self, monitor: &Rect) -> Result<bool> {
        let ctx = &self.ctx;
        for window in ctx.root_window_list(ctx.atoms.net_client_list)? {
            let states = match ctx.window_atom_list(window, ctx.atoms.net_wm_state) {
                Ok(states) => states,
                // The window may be gone by the time we ask
                Err(_) => continue,
            };
            if !states.contains(&ctx.atoms.net_wm_state_fullscreen) {
                continue;
            }
            if let Ok(rect) = ctx.window_rect(window)
                && rect.intersects(monitor)
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn create_barrier(&mut self, line: BarrierLine) -> Result<BarrierId> {
        let line = nudge_off_corner_end(line);
        let barrier = self
            .ctx
            .conn
            .generate_id()
            .context("Failed to allocate barrier id")?;
        self.ctx
            .conn
            .xfixes_create_pointer_barrier(
                barrier,
                self.ctx.root,
                line.x1.max(0) as u16,
                line.y1.max(0) as u16,
                line.x2.max(0) as u16,
                line.y2.max(0) as u16,
                // Zero blocks motion from every direction
                0u32.into(),
                &[],
            )
            .context("Failed to create pointer barrier")?;
        self.ctx.conn.flush().context("Failed to flush X11 connection")?;
        self.barriers.insert(barrier, line.y1 == line.y2);
        debug!(barrier, ?line, "Created pointer barrier");
        Ok(barrier)
    }

    fn destroy_barrier(&mut self, id: BarrierId) {
        if self.barriers.remove(&id).is_none() {
            return;
        }
        if let Err(err) = self.ctx.conn.xfixes_delete_pointer_barrier(id) {
            debug!(barrier = id, error = %err, "Failed to delete pointer barrier");
        }
        let _ = self.ctx.conn.flush();
    }

    fn create_region(&mut self, rect: Rect) -> Result<RegionId> {
        if rect.is_degenerate() {
            bail!("degenerate region rect {rect:?}");
        }
        let window = self
            .ctx
            .conn
            .generate_id()
            .context("Failed to allocate window id")?;
        self.ctx
            .conn
            .create_window(
                0,
                window,
                self.ctx.root,
                rect.x as i16,
                rect.y as i16,
                rect.width as u16,
                rect.height as u16,
                0,
                WindowClass::INPUT_ONLY,
                0,
                &CreateWindowAux::new()
                    .override_redirect(x11::OVERRIDE_REDIRECT)
                    .event_mask(EventMask::BUTTON_PRESS | EventMask::BUTTON_RELEASE),
            )
            .context("Failed to create region window")?;
        self.ctx
            .conn
            .map_window(window)
            .context("Failed to map region window")?;
        self.ctx.conn.flush().context("Failed to flush X11 connection")?;
        self.regions.insert(window, window);
        debug!(region = window, ?rect, "Created clickable region");
        Ok(window)
    }

    fn destroy_region(&mut self, id: RegionId) {
        let Some(window) = self.regions.remove(&id) else {
            return;
        };
        if let Err(err) = self.ctx.conn.destroy_window(window) {
            debug!(region = id, error = %err, "Failed to destroy region window");
        }
        let _ = self.ctx.conn.flush();
    }

    fn grab_shortcuts(&mut self, accelerators: &[Accelerator]) -> Result<()> {
        self.ungrab_shortcuts();
        if accelerators.is_empty() {
            return Ok(());
        }

        let keymap = Keymap::fetch(&self.ctx.conn)?;
        for (index, accel) in accelerators.iter().enumerate() {
            let Some(keycode) = keymap.keycode_for(accel.keysym) else {
                warn!(accelerator = %accel, "No keycode for keysym, skipping grab");
                continue;
            };
            let modmask = accelerator_modmask(accel);
            if let Err(err) = grab_with_lock_variants(&self.ctx.conn, self.ctx.root, keycode, modmask)
            {
                warn!(accelerator = %accel, error = %err, "Failed to grab shortcut");
                continue;
            }
            debug!(accelerator = %accel, keycode, "Grabbed shortcut");
            self.grabs.push(ShortcutGrab { keycode, modmask, index });
        }
        self.ctx.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn ungrab_shortcuts(&mut self) {
        for grab in self.grabs.drain(..) {
            for variant in lock_variants(grab.modmask) {
                let _ = self.ctx.conn.ungrab_key(grab.keycode, self.ctx.root, variant);
            }
        }
        let _ = self.ctx.conn.flush();
    }

    fn stamp_ownership(&mut self) -> Result<()> {
        self.ctx
            .conn
            .change_property32(
                PropMode::REPLACE,
                self.ctx.root,
                self.ctx.atoms.owner_marker,
                AtomEnum::CARDINAL,
                &[std::process::id()],
            )
            .context("Failed to set ownership marker")?;
        self.ctx.conn.flush().context("Failed to flush X11 connection")?;
        Ok(())
    }

    fn ownership_intact(&mut self) -> Result<bool> {
        let marker = self.ctx.root_cardinal(self.ctx.atoms.owner_marker)?;
        Ok(marker == Some(std::process::id()))
    }
}

impl ShellOps for X11Shell {
    fn active_window(&mut self) -> Result<Option<WindowHandle>> {
        let windows = self.ctx.root_window_list(self.ctx.atoms.net_active_window)?;
        Ok(windows.first().copied().filter(|w| *w != 0))
    }

    fn close_window(&mut self, window: WindowHandle) -> Result<()> {
        self.ctx.send_root_message(
            window,
            self.ctx.atoms.net_close_window,
            [0, x11::SOURCE_PAGER, 0, 0, 0],
        )
    }

    fn minimize_window(&mut self, window: WindowHandle) -> Result<()> {
        self.ctx.send_root_message(
            window,
            self.ctx.atoms.wm_change_state,
            [x11::ICONIC_STATE, 0, 0, 0, 0],
        )
    }

    fn toggle_maximize(&mut self, window: WindowHandle) -> Result<()> {
        self.ctx.toggle_wm_state(
            window,
            self.ctx.atoms.net_wm_state_maximized_vert,
            self.ctx.atoms.net_wm_state_maximized_horz,
        )
    }

    fn toggle_fullscreen(&mut self, window: WindowHandle) -> Result<()> {
        self.ctx
            .toggle_wm_state(window, self.ctx.atoms.net_wm_state_fullscreen, 0)
    }

    fn toggle_above(&mut self, window: WindowHandle) -> Result<()> {
        self.ctx
            .toggle_wm_state(window, self.ctx.atoms.net_wm_state_above, 0)
    }

    fn toggle_sticky(&mut self, window: WindowHandle) -> Result<()> {
        self.ctx
            .toggle_wm_state(window, self.ctx.atoms.net_wm_state_sticky, 0)
    }

    fn create_window_thumbnail(&mut self, _window: WindowHandle) -> Result<()> {
        // Live thumbnails need compositor cooperation plain X11 cannot ask for
        bail!("window thumbnails are not supported on this backend")
    }

    fn workspace_count(&mut self) -> Result<u32> {
        Ok(self
            .ctx
            .root_cardinal(self.ctx.atoms.net_number_of_desktops)?
            .unwrap_or(1))
    }

    fn current_workspace(&mut self) -> Result<u32> {
        Ok(self
            .ctx
            .root_cardinal(self.ctx.atoms.net_current_desktop)?
            .unwrap_or(0))
    }

    fn switch_workspace(&mut self, index: u32) -> Result<()> {
        self.ctx.send_root_message(
            self.ctx.root,
            self.ctx.atoms.net_current_desktop,
            [index, 0, 0, 0, 0],
        )
    }

    fn move_window_to_workspace(&mut self, window: WindowHandle, index: u32) -> Result<()> {
        self.ctx.send_root_message(
            window,
            self.ctx.atoms.net_wm_desktop,
            [index, x11::SOURCE_PAGER, 0, 0, 0],
        )
    }

    fn toggle_show_desktop(&mut self) -> Result<()> {
        let showing = self
            .ctx
            .root_cardinal(self.ctx.atoms.net_showing_desktop)?
            .unwrap_or(0);
        self.ctx.send_root_message(
            self.ctx.root,
            self.ctx.atoms.net_showing_desktop,
            [1 - showing.min(1), 0, 0, 0, 0],
        )
    }

    fn toggle_overview(&mut self) -> Result<()> {
        spawn_detached(commands::TOGGLE_OVERVIEW)
    }

    fn spawn_command(&mut self, command: &str) -> Result<()> {
        spawn_detached(command)
    }

    fn lock_screen(&mut self) -> Result<()> {
        spawn_detached(commands::LOCK_SCREEN)
    }

    fn suspend(&mut self) -> Result<()> {
        spawn_detached(commands::SUSPEND)
    }

    fn volume(&mut self) -> Result<i32> {
        let output = run_capture(commands::VOLUME_GET)?;
        parse_percent(&output).context("No volume percentage in pactl output")
    }

    fn set_volume(&mut self, percent: i32) -> Result<()> {
        spawn_detached(&format!("{} {percent}%", commands::VOLUME_SET))
    }

    fn toggle_mute(&mut self) -> Result<bool> {
        spawn_detached(commands::MUTE_TOGGLE)?;
        // The toggle is asynchronous; report the intent, not the sink state
        Ok(true)
    }

    fn brightness(&mut self) -> Result<i32> {
        let output = run_capture(commands::BRIGHTNESS_GET)?;
        parse_percent(&output).context("No brightness percentage in brightnessctl output")
    }

    fn set_brightness(&mut self, percent: i32) -> Result<()> {
        spawn_detached(&format!("{} {percent}%", commands::BRIGHTNESS_SET))
    }

    fn media_control(&mut self, command: MediaCommand) -> Result<()> {
        let verb = match command {
            MediaCommand::PlayPause => "play-pause",
            MediaCommand::Next => "next",
            MediaCommand::Previous => "previous",
        };
        spawn_detached(&format!("{} {verb}", commands::MEDIA_PLAYER))
    }

    fn show_feedback(&mut self, label: &str, level: Option<i32>) {
        match level {
            Some(level) => info!(label, level, "Adjustment"),
            None => info!(label, "Adjustment"),
        }
    }
}

/// Shorten the off-corner end of a barrier line by one pixel
///
/// Two corners on the same monitor edge may each claim up to half of it;
/// without the nudge their barriers would meet at the midpoint and the
/// server rejects the second one as overlapping.
fn nudge_off_corner_end(line: BarrierLine) -> BarrierLine {
    let mut line = line;
    if line.y1 == line.y2 && (line.x2 - line.x1).abs() > 1 {
        line.x2 -= (line.x2 - line.x1).signum();
    } else if line.x1 == line.x2 && (line.y2 - line.y1).abs() > 1 {
        line.y2 -= (line.y2 - line.y1).signum();
    }
    line
}

/// Keysym-to-keycode table fetched from the server
struct Keymap {
    min_keycode: Keycode,
    keysyms_per_keycode: u8,
    keysyms: Vec<u32>,
}

impl Keymap {
    fn fetch(conn: &RustConnection) -> Result<Self> {
        let setup = conn.setup();
        let min_keycode = setup.min_keycode;
        let count = setup.max_keycode - min_keycode + 1;
        let reply = conn
            .get_keyboard_mapping(min_keycode, count)
            .context("Failed to request keyboard mapping")?
            .reply()
            .context("Failed to read keyboard mapping")?;
        Ok(Self {
            min_keycode,
            keysyms_per_keycode: reply.keysyms_per_keycode,
            keysyms: reply.keysyms,
        })
    }

    fn keycode_for(&self, keysym: u32) -> Option<Keycode> {
        let per = self.keysyms_per_keycode as usize;
        if per == 0 {
            return None;
        }
        self.keysyms
            .chunks(per)
            .position(|syms| syms.contains(&keysym))
            .map(|i| self.min_keycode + i as Keycode)
    }
}

fn accelerator_modmask(accel: &Accelerator) -> ModMask {
    let mut modmask = ModMask::from(0u16);
    if accel.ctrl {
        modmask |= ModMask::CONTROL;
    }
    if accel.shift {
        modmask |= ModMask::SHIFT;
    }
    if accel.alt {
        modmask |= ModMask::M1;
    }
    if accel.super_ {
        modmask |= ModMask::M4;
    }
    modmask
}

/// The lock-modifier permutations every grab must cover
///
/// X11 treats NumLock and CapsLock as part of the modifier state, so a grab
/// that ignores them needs one registration per combination.
fn lock_variants(modmask: ModMask) -> [ModMask; 4] {
    [
        modmask,
        modmask | ModMask::M2,
        modmask | ModMask::LOCK,
        modmask | ModMask::M2 | ModMask::LOCK,
    ]
}

fn grab_with_lock_variants(
    conn: &RustConnection,
    root: Window,
    keycode: Keycode,
    modmask: ModMask,
) -> Result<()> {
    for variant in lock_variants(modmask) {
        conn.grab_key(false, root, variant, keycode, GrabMode::ASYNC, GrabMode::ASYNC)
            .with_context(|| format!("Failed to grab keycode {keycode} with {variant:?}"))?;
    }
    Ok(())
}

/// Keep only Shift, Control, Alt and Super; drop the lock modifiers
fn normalize_modmask(state: KeyButMask) -> ModMask {
    let state: u16 = state.into();
    ModMask::from(
        state
            & (ModMask::SHIFT.bits()
                | ModMask::CONTROL.bits()
                | ModMask::M1.bits()
                | ModMask::M4.bits()),
    )
}

fn convert_modifiers(state: KeyButMask) -> Modifiers {
    Modifiers {
        ctrl: state.contains(KeyButMask::CONTROL),
        shift: state.contains(KeyButMask::SHIFT),
    }
}

fn fp3232_to_f64(value: xinput::Fp3232) -> f64 {
    value.integral as f64 + value.frac as f64 / (u32::MAX as f64 + 1.0)
}

fn spawn_detached(command: &str) -> Result<()> {
    debug!(command, "Spawning");
    Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to spawn {command:?}"))?;
    Ok(())
}

fn run_capture(command: &str) -> Result<String> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("Failed to run {command:?}"))?;
    if !output.status.success() {
        bail!("{command:?} exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// First percentage token in a command's output
fn parse_percent(output: &str) -> Option<i32> {
    output
        .split(|c: char| c.is_whitespace() || c == ',' || c == '/')
        .filter_map(|token| token.strip_suffix('%'))
        .find_map(|token| token.parse().ok())
}
