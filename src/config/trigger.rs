//! Trigger kinds, corner identity and per-trigger settings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Action id meaning "this trigger is off"; a trigger carrying it contributes
/// no live geometry.
pub const DISABLED_ACTION: &str = "disabled";

/// The seven ways a corner can be activated
///
/// Closed and ordered; the order is part of the persisted schema and of the
/// preferences UI layout, so it must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    PointerPressure,
    CtrlPointerPressure,
    ClickPrimary,
    ClickSecondary,
    ClickMiddle,
    ScrollUp,
    ScrollDown,
}

impl Trigger {
    /// All triggers in schema order
    pub const ALL: [Trigger; 7] = [
        Trigger::PointerPressure,
        Trigger::CtrlPointerPressure,
        Trigger::ClickPrimary,
        Trigger::ClickSecondary,
        Trigger::ClickMiddle,
        Trigger::ScrollUp,
        Trigger::ScrollDown,
    ];

    /// True for the two pointer-pressure triggers (the only ones that carry
    /// barrier sizing and a pressure threshold)
    pub fn is_pressure(self) -> bool {
        matches!(self, Trigger::PointerPressure | Trigger::CtrlPointerPressure)
    }

    /// True for triggers sensed through the clickable region (clicks and scrolls)
    pub fn is_region(self) -> bool {
        !self.is_pressure()
    }

    /// Schema/key name of this trigger
    pub fn key(self) -> &'static str {
        match self {
            Trigger::PointerPressure => "pointer-pressure",
            Trigger::CtrlPointerPressure => "ctrl-pointer-pressure",
            Trigger::ClickPrimary => "click-primary",
            Trigger::ClickSecondary => "click-secondary",
            Trigger::ClickMiddle => "click-middle",
            Trigger::ScrollUp => "scroll-up",
            Trigger::ScrollDown => "scroll-down",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One of the four screen quadrants of a monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Quadrant {
    /// All quadrants in schema order
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    /// Position of this quadrant in [`Quadrant::ALL`]
    pub const fn index(self) -> usize {
        match self {
            Quadrant::TopLeft => 0,
            Quadrant::TopRight => 1,
            Quadrant::BottomLeft => 2,
            Quadrant::BottomRight => 3,
        }
    }

    /// True if the quadrant sits on the top edge
    pub fn top(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::TopRight)
    }

    /// True if the quadrant sits on the left edge
    pub fn left(self) -> bool {
        matches!(self, Quadrant::TopLeft | Quadrant::BottomLeft)
    }

    /// The quadrant sharing this quadrant's horizontal (top or bottom) edge
    pub fn horizontal_neighbor(self) -> Quadrant {
        match self {
            Quadrant::TopLeft => Quadrant::TopRight,
            Quadrant::TopRight => Quadrant::TopLeft,
            Quadrant::BottomLeft => Quadrant::BottomRight,
            Quadrant::BottomRight => Quadrant::BottomLeft,
        }
    }

    /// The quadrant sharing this quadrant's vertical (left or right) edge
    pub fn vertical_neighbor(self) -> Quadrant {
        match self {
            Quadrant::TopLeft => Quadrant::BottomLeft,
            Quadrant::BottomLeft => Quadrant::TopLeft,
            Quadrant::TopRight => Quadrant::BottomRight,
            Quadrant::BottomRight => Quadrant::TopRight,
        }
    }

    /// Schema/key name of this quadrant
    pub fn key(self) -> &'static str {
        match self {
            Quadrant::TopLeft => "top-left",
            Quadrant::TopRight => "top-right",
            Quadrant::BottomLeft => "bottom-left",
            Quadrant::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Quadrant {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quadrant::ALL
            .into_iter()
            .find(|q| q.key() == s)
            .ok_or(())
    }
}

/// Identity of one corner: monitor slot plus quadrant
///
/// Slot 0 is always the primary monitor; the remaining slots follow the
/// backend's enumeration order excluding the primary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CornerId {
    pub monitor_slot: usize,
    pub quadrant: Quadrant,
}

impl CornerId {
    /// Create a corner id
    pub fn new(monitor_slot: usize, quadrant: Quadrant) -> Self {
        Self { monitor_slot, quadrant }
    }

    /// Settings-file key of this corner, e.g. `"0-top-left"`
    pub fn key(&self) -> String {
        format!("{}-{}", self.monitor_slot, self.quadrant)
    }

    /// Parse a settings-file key back into a corner id
    pub fn parse(key: &str) -> Option<Self> {
        let (slot, quadrant) = key.split_once('-')?;
        Some(Self {
            monitor_slot: slot.parse().ok()?,
            quadrant: quadrant.parse().ok()?,
        })
    }
}

impl fmt::Display for CornerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.monitor_slot, self.quadrant)
    }
}

/// Per-trigger settings bundle
///
/// Always fully populated: the store substitutes defaults for missing file
/// entries, so consumers never see a partially-missing config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Action id fired by this trigger; `"disabled"` turns the trigger off
    #[serde(default = "default_action")]
    pub action: String,

    /// Only fire when the Ctrl modifier is held
    ///
    /// Fixed true for [`Trigger::CtrlPointerPressure`]; the store normalizes
    /// it on load and the preferences UI does not offer editing it.
    #[serde(default)]
    pub requires_ctrl: bool,

    /// Keep firing while the owning monitor shows a fullscreen window
    #[serde(default)]
    pub fullscreen_enabled: bool,

    /// Shell command line; meaningful only for the run-command action
    #[serde(default)]
    pub command: String,

    /// Target workspace; meaningful only for the workspace actions
    #[serde(default)]
    pub workspace_index: u32,

    /// Horizontal barrier length as a percentage of the monitor width
    /// (pressure triggers only)
    #[serde(default = "default_barrier_size")]
    pub barrier_size_h: u8,

    /// Vertical barrier length as a percentage of the monitor height
    /// (pressure triggers only)
    #[serde(default = "default_barrier_size")]
    pub barrier_size_v: u8,

    /// Accumulated pointer pressure needed before the barrier fires
    /// (pressure triggers only)
    #[serde(default = "default_pressure_threshold")]
    pub pressure_threshold: u32,
}

pub(crate) fn default_action() -> String {
    DISABLED_ACTION.to_string()
}

pub(crate) fn default_barrier_size() -> u8 {
    25
}

pub(crate) fn default_pressure_threshold() -> u32 {
    100
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            action: default_action(),
            requires_ctrl: false,
            fullscreen_enabled: false,
            command: String::new(),
            workspace_index: 0,
            barrier_size_h: default_barrier_size(),
            barrier_size_v: default_barrier_size(),
            pressure_threshold: default_pressure_threshold(),
        }
    }
}

impl TriggerConfig {
    /// True if this trigger fires an actual action
    pub fn enabled(&self) -> bool {
        self.action != DISABLED_ACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_order_is_stable() {
        // The schema order is load-bearing: persisted keys and UI layout
        // depend on it.
        let keys: Vec<&str> = Trigger::ALL.iter().map(|t| t.key()).collect();
        assert_eq!(
            keys,
            vec![
                "pointer-pressure",
                "ctrl-pointer-pressure",
                "click-primary",
                "click-secondary",
                "click-middle",
                "scroll-up",
                "scroll-down",
            ]
        );
    }

    #[test]
    fn test_trigger_classification() {
        assert!(Trigger::PointerPressure.is_pressure());
        assert!(Trigger::CtrlPointerPressure.is_pressure());
        assert!(Trigger::ClickPrimary.is_region());
        assert!(Trigger::ScrollDown.is_region());
    }

    #[test]
    fn test_quadrant_index_matches_schema_order() {
        for (i, quadrant) in Quadrant::ALL.into_iter().enumerate() {
            assert_eq!(quadrant.index(), i);
        }
    }

    #[test]
    fn test_quadrant_neighbors() {
        assert_eq!(Quadrant::TopLeft.horizontal_neighbor(), Quadrant::TopRight);
        assert_eq!(Quadrant::TopLeft.vertical_neighbor(), Quadrant::BottomLeft);
        assert_eq!(Quadrant::BottomRight.horizontal_neighbor(), Quadrant::BottomLeft);
        assert_eq!(Quadrant::BottomRight.vertical_neighbor(), Quadrant::TopRight);
    }

    #[test]
    fn test_corner_id_key_round_trip() {
        for slot in 0..4 {
            for quadrant in Quadrant::ALL {
                let id = CornerId::new(slot, quadrant);
                assert_eq!(CornerId::parse(&id.key()), Some(id));
            }
        }
        assert_eq!(CornerId::parse("nonsense"), None);
        assert_eq!(CornerId::parse("x-top-left"), None);
    }

    #[test]
    fn test_trigger_config_defaults_disabled() {
        let config = TriggerConfig::default();
        assert!(!config.enabled());
        assert_eq!(config.action, DISABLED_ACTION);
    }
}
