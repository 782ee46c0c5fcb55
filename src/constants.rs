//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the daemon, providing a single source of truth for constant values.

/// Corner geometry constants
pub mod geometry {
    /// Side length in pixels of the minimal (non-expanded) clickable corner region
    pub const CLICK_REGION_PX: u32 = 8;

    /// Maximum pressure-barrier size as a percentage of the monitor dimension
    pub const BARRIER_PERCENT_MAX: u8 = 98;

    /// Numerator/denominator of the edge fraction claimed by an expanded
    /// region when the neighboring corner also expands into the shared edge
    pub const HALF_EDGE: (u32, u32) = (1, 2);

    /// Edge fraction claimed when this corner is the only one expanding into
    /// the shared edge
    pub const FULL_EDGE: (u32, u32) = (7, 8);
}

/// Trigger debouncing constants
pub mod debounce {
    /// Default minimum delay between two firings of the same corner (ms)
    pub const DEFAULT_DELAY_MS: u64 = 350;
}

/// Daemon timing constants
pub mod timing {
    /// Delay used to coalesce bursts of configuration changes into a single
    /// orchestrator rebuild (ms)
    pub const REBUILD_COALESCE_MS: u64 = 50;

    /// Interval of the periodic ownership/layout reconciliation pass (ms)
    pub const RECONCILE_INTERVAL_MS: u64 = 5_000;

    /// Default debounce window for physical configuration writes (ms)
    pub const FLUSH_DEBOUNCE_MS: u64 = 400;
}

/// Configuration file locations
pub mod paths {
    /// Directory name under the XDG config home
    pub const CONFIG_DIR: &str = "hotcornerd";

    /// Configuration file name
    pub const CONFIG_FILE: &str = "config.json";
}

/// X11 protocol constants
pub mod x11 {
    /// Override redirect flag for unmanaged windows
    pub const OVERRIDE_REDIRECT: u32 = 1;

    /// _NET_WM_STATE action: remove property (0)
    pub const NET_WM_STATE_REMOVE: u32 = 0;

    /// _NET_WM_STATE action: add/set property (1)
    pub const NET_WM_STATE_ADD: u32 = 1;

    /// _NET_WM_STATE action: toggle property (2)
    pub const NET_WM_STATE_TOGGLE: u32 = 2;

    /// Source indication for EWMH client messages (2 = pager/direct user action)
    pub const SOURCE_PAGER: u32 = 2;

    /// WM_CHANGE_STATE iconic value (requests the WM to minimize)
    pub const ICONIC_STATE: u32 = 3;

    /// X11 core button numbers for clicks and scroll emulation
    pub const BUTTON_PRIMARY: u8 = 1;
    pub const BUTTON_MIDDLE: u8 = 2;
    pub const BUTTON_SECONDARY: u8 = 3;
    pub const BUTTON_SCROLL_UP: u8 = 4;
    pub const BUTTON_SCROLL_DOWN: u8 = 5;

    /// Root window property marking this daemon as the owner of the live
    /// corner geometry, checked by the reconciliation pass
    pub const OWNER_PROPERTY: &str = "_HOTCORNERD_ACTIVE";
}

/// External commands spawned by shell operations that have no native X11
/// protocol equivalent
pub mod commands {
    /// Overview/activities toggle (sends the Super key)
    pub const TOGGLE_OVERVIEW: &str = "xdotool key super";

    /// Session lock
    pub const LOCK_SCREEN: &str = "loginctl lock-session";

    /// System suspend
    pub const SUSPEND: &str = "systemctl suspend";

    /// Volume query/set via PulseAudio
    pub const VOLUME_GET: &str = "pactl get-sink-volume @DEFAULT_SINK@";
    pub const VOLUME_SET: &str = "pactl set-sink-volume @DEFAULT_SINK@";
    pub const MUTE_TOGGLE: &str = "pactl set-sink-mute @DEFAULT_SINK@ toggle";

    /// Backlight query/set
    pub const BRIGHTNESS_GET: &str = "brightnessctl -m";
    pub const BRIGHTNESS_SET: &str = "brightnessctl -q s";

    /// MPRIS media control
    pub const MEDIA_PLAYER: &str = "playerctl";
}

/// Clamping ranges for stepped adjustment actions
pub mod levels {
    /// Volume percentage range
    pub const VOLUME_MIN: i32 = 0;
    pub const VOLUME_MAX: i32 = 100;

    /// Backlight percentage range
    pub const BRIGHTNESS_MIN: i32 = 5;
    pub const BRIGHTNESS_MAX: i32 = 100;

    /// Step applied per stepped-adjustment invocation
    pub const ADJUST_STEP: i32 = 5;
}
