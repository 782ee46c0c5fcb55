//! The ordered action catalog
//!
//! One flat table drives everything: registry construction, the
//! `--list-actions` CLI output and the preferences-UI menus. Entries with an
//! empty id are pure section separators and are skipped by the registry.
//! The table is ordered and append-only; reordering would shuffle the menus
//! users know.

use anyhow::Result;

use crate::backend::ShellOps;

use super::dispatcher::RunActionData;
use super::handlers;

/// Handler signature shared by every action body
pub type Handler = fn(&mut dyn ShellOps, &RunActionData) -> Result<()>;

/// One catalog row
pub struct ActionEntry {
    /// Stable action id; empty for section separators
    pub id: &'static str,
    /// Menu label (or section title for separators)
    pub label: &'static str,
    /// Handler body; `None` for separators and for the disabled sentinel
    pub handler: Option<Handler>,
}

const fn action(id: &'static str, label: &'static str, handler: Handler) -> ActionEntry {
    ActionEntry { id, label, handler: Some(handler) }
}

const fn section(label: &'static str) -> ActionEntry {
    ActionEntry { id: "", label, handler: None }
}

/// The catalog, in menu order
pub const CATALOG: &[ActionEntry] = &[
    section("Global"),
    ActionEntry { id: "disabled", label: "-", handler: None },
    action("toggle-overview", "Toggle Overview", handlers::session::toggle_overview),
    action("show-desktop", "Show Desktop", handlers::session::show_desktop),
    action("run-command", "Run Command", handlers::session::run_command),
    action("lock-screen", "Lock Screen", handlers::session::lock_screen),
    action("suspend", "Suspend", handlers::session::suspend),
    section("Workspaces"),
    action("prev-workspace", "Previous Workspace", handlers::workspace::previous),
    action("next-workspace", "Next Workspace", handlers::workspace::next),
    action("move-to-workspace", "Go To Workspace", handlers::workspace::switch_to_index),
    section("Windows"),
    action("close-win", "Close Window", handlers::window::close),
    action("minimize-win", "Minimize Window", handlers::window::minimize),
    action("maximize-win", "Toggle Maximize", handlers::window::toggle_maximize),
    action("fullscreen-win", "Toggle Fullscreen", handlers::window::toggle_fullscreen),
    action("above-win", "Toggle Always On Top", handlers::window::toggle_above),
    action("stick-win", "Toggle On All Workspaces", handlers::window::toggle_sticky),
    action("thumbnail-win", "Create Window Thumbnail", handlers::window::thumbnail),
    action(
        "minimize-to-thumbnail",
        "Minimize To Thumbnail",
        handlers::window::minimize_to_thumbnail,
    ),
    action(
        "move-win-to-prev-workspace",
        "Move Window To Previous Workspace",
        handlers::window::move_to_prev_workspace,
    ),
    action(
        "move-win-to-next-workspace",
        "Move Window To Next Workspace",
        handlers::window::move_to_next_workspace,
    ),
    section("Sound & Media"),
    action("volume-up", "Volume Up", handlers::media::volume_up),
    action("volume-down", "Volume Down", handlers::media::volume_down),
    action("mute-sound", "Toggle Mute", handlers::media::toggle_mute),
    action("media-play-pause", "Play / Pause", handlers::media::play_pause),
    action("media-next", "Next Track", handlers::media::next_track),
    action("media-prev", "Previous Track", handlers::media::prev_track),
    section("Display"),
    action("brightness-up", "Brightness Up", handlers::media::brightness_up),
    action("brightness-down", "Brightness Down", handlers::media::brightness_down),
];

/// Actions exempt from the debounce gate
///
/// These represent analog repeat gestures (a scroll wheel ratcheting volume,
/// a held edge stepping through workspaces) and are intentionally allowed to
/// re-fire faster than the configured delay.
pub const DEBOUNCE_EXEMPT: &[&str] = &[
    "volume-up",
    "volume-down",
    "brightness-up",
    "brightness-down",
    "prev-workspace",
    "next-workspace",
];

/// True if the action may bypass the debounce gate
pub fn is_debounce_exempt(action: &str) -> bool {
    DEBOUNCE_EXEMPT.contains(&action)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for entry in CATALOG {
            if entry.id.is_empty() {
                continue;
            }
            assert!(seen.insert(entry.id), "duplicate action id {}", entry.id);
        }
    }

    #[test]
    fn test_separators_carry_no_handler() {
        for entry in CATALOG {
            if entry.id.is_empty() {
                assert!(entry.handler.is_none(), "separator {:?} has a handler", entry.label);
            }
        }
    }

    #[test]
    fn test_exemptions_name_real_actions() {
        for id in DEBOUNCE_EXEMPT {
            assert!(
                CATALOG.iter().any(|e| e.id == *id),
                "exempt action {id} missing from catalog"
            );
        }
    }
}
