//! The daemon event loop
//!
//! Single-threaded: one poll() loop blocks on the X11 connection with a
//! timeout derived from the earliest pending deadline (coalesced rebuild,
//! debounced config flush, periodic reconciliation). All engine and
//! dispatch work happens inline on this thread.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::actions::Dispatcher;
use crate::backend::x11::{self, X11Compositor, X11Shell};
use crate::backend::{BackendEvent, Compositor};
use crate::config::SettingsStore;
use crate::constants::timing;
use crate::engine::CornerOrchestrator;
use crate::shortcuts::ShortcutMap;

/// Maximum poll timeout when no deadline is pending (ms)
const IDLE_POLL_MS: i32 = 1_000;

struct Daemon {
    store: SettingsStore,
    orchestrator: CornerOrchestrator,
    compositor: X11Compositor,
    shell: X11Shell,
    shortcuts: ShortcutMap,
    /// Coalesced deadline of the next full rebuild
    rebuild_due: Option<Instant>,
    next_reconcile: Instant,
}

/// Run the daemon until SIGINT/SIGTERM
pub fn run(config_path: &Path) -> Result<()> {
    let shutdown = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&shutdown))
        .context("Failed to register SIGTERM handler")?;
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&shutdown))
        .context("Failed to register SIGINT handler")?;

    let store = SettingsStore::load(config_path)?;
    let (compositor, shell) = x11::connect()?;
    let mut daemon = Daemon {
        store,
        orchestrator: CornerOrchestrator::new(Dispatcher::new()),
        compositor,
        shell,
        shortcuts: ShortcutMap::from_specs(&[]),
        rebuild_due: None,
        next_reconcile: Instant::now(),
    };

    daemon.rebuild()?;
    info!("Hot corner daemon running");
    let result = daemon.run_loop(&shutdown);
    daemon.shutdown();
    result
}

impl Daemon {
    #[allow(unsafe_code)] // libc::poll on the X11 connection fd
    fn run_loop(&mut self, shutdown: &AtomicBool) -> Result<()> {
        let x11_fd = self.compositor.as_raw_fd();
        while !shutdown.load(Ordering::Relaxed) {
            let timeout = self.poll_timeout_ms(Instant::now());
            let mut poll_fds = [libc::pollfd {
                fd: x11_fd,
                events: libc::POLLIN,
                revents: 0,
            }];
            // SAFETY: poll_fds is a valid stack array of length 1, matching
            // the nfds argument.
            let poll_result = unsafe { libc::poll(poll_fds.as_mut_ptr(), 1, timeout) };
            if poll_result < 0 {
                let err = std::io::Error::last_os_error();
                if err.kind() == std::io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err).context("poll() on the X11 connection failed");
            }

            self.drain_backend_events()?;
            self.drain_config_events();
            self.run_due_work(Instant::now())?;
        }
        info!("Shutdown signal received");
        Ok(())
    }

    /// Poll timeout until the earliest pending deadline
    fn poll_timeout_ms(&self, now: Instant) -> i32 {
        let deadlines = [
            self.rebuild_due,
            self.store.next_flush(),
            Some(self.next_reconcile),
        ];
        deadlines
            .into_iter()
            .flatten()
            .map(|due| {
                due.saturating_duration_since(now).as_millis().min(IDLE_POLL_MS as u128) as i32
            })
            .min()
            .unwrap_or(IDLE_POLL_MS)
    }

    fn drain_backend_events(&mut self) -> Result<()> {
        let now = Instant::now();
        for event in self.compositor.poll_events()? {
            match event {
                BackendEvent::LayoutChanged => {
                    debug!("Monitor layout changed");
                    self.schedule_rebuild(now);
                }
                BackendEvent::Shortcut { index } => {
                    if let Some(data) = self.shortcuts.invocation(index) {
                        self.orchestrator.dispatcher().dispatch(&mut self.shell, data);
                    }
                }
                other => {
                    self.orchestrator.handle_event(
                        other,
                        now,
                        &mut self.compositor,
                        &mut self.shell,
                    );
                }
            }
        }
        Ok(())
    }

    fn drain_config_events(&mut self) {
        let events = self.store.take_events();
        if events.is_empty() {
            return;
        }
        let now = Instant::now();
        for event in &events {
            self.orchestrator.apply_change(event);
        }
        debug!(changes = events.len(), "Configuration changed, scheduling rebuild");
        self.schedule_rebuild(now);
    }

    fn run_due_work(&mut self, now: Instant) -> Result<()> {
        if self.rebuild_due.is_some_and(|due| now >= due) {
            self.rebuild_due = None;
            self.rebuild()?;
        }

        if let Err(err) = self.store.flush_if_due(now) {
            // Persistence failures must not take the corners down
            error!(error = %err, "Failed to persist configuration");
        }

        if now >= self.next_reconcile {
            self.next_reconcile =
                now + Duration::from_millis(self.store.global().reconcile_interval_ms);
            self.reconcile(now);
        }
        Ok(())
    }

    /// Periodic pass picking up external config edits and lost ownership
    fn reconcile(&mut self, now: Instant) {
        match self.store.reload_if_changed() {
            Ok(true) => self.drain_config_events(),
            Ok(false) => {}
            Err(err) => warn!(error = %err, "Failed to reload configuration"),
        }
        if self.orchestrator.reconcile(&mut self.compositor) {
            self.schedule_rebuild(now);
        }
    }

    fn schedule_rebuild(&mut self, now: Instant) {
        let due = now + Duration::from_millis(timing::REBUILD_COALESCE_MS);
        if self.rebuild_due.is_none_or(|current| due < current) {
            self.rebuild_due = Some(due);
        }
    }

    /// Full teardown and recreation of corners and shortcut grabs
    fn rebuild(&mut self) -> Result<()> {
        self.orchestrator.rebuild(&mut self.store, &mut self.compositor)?;

        self.shortcuts = if self.store.global().enabled {
            ShortcutMap::from_specs(&self.store.global().shortcuts)
        } else {
            ShortcutMap::from_specs(&[])
        };
        if let Err(err) = self.compositor.grab_shortcuts(&self.shortcuts.accelerators()) {
            warn!(error = %err, "Failed to grab keyboard shortcuts");
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.orchestrator.destroy_all(&mut self.compositor);
        self.compositor.ungrab_shortcuts();
        self.orchestrator.release_views(&mut self.store);
        if let Err(err) = self.store.flush() {
            error!(error = %err, "Failed to persist configuration on shutdown");
        }
        info!("Hot corner daemon stopped");
    }
}
