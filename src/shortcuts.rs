//! Keyboard shortcut accelerators
//!
//! Accelerator strings use the GTK-style `<Ctrl><Alt>F5` syntax. Parsing is
//! lenient about modifier casing and accepts the common aliases
//! (`<Control>`, `<Primary>`, `<Mod4>`). The keysym table covers the keys a
//! desktop shortcut realistically binds; anything else fails to parse and
//! the shortcut is skipped with a warning rather than aborting startup.

use std::fmt;

use anyhow::{Result, bail};
use tracing::warn;

use crate::actions::RunActionData;
use crate::config::ShortcutSpec;

/// A parsed global keyboard accelerator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accelerator {
    /// X11 keysym of the non-modifier key
    pub keysym: u32,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub super_: bool,
}

impl Accelerator {
    /// Parse a `<Ctrl><Alt>key` accelerator string
    pub fn parse(spec: &str) -> Result<Self> {
        let mut rest = spec.trim();
        let mut accel = Self {
            keysym: 0,
            ctrl: false,
            shift: false,
            alt: false,
            super_: false,
        };

        while let Some(stripped) = rest.strip_prefix('<') {
            let Some((name, tail)) = stripped.split_once('>') else {
                bail!("unterminated modifier in accelerator {spec:?}");
            };
            match name.to_ascii_lowercase().as_str() {
                "ctrl" | "control" | "primary" => accel.ctrl = true,
                "shift" => accel.shift = true,
                "alt" | "mod1" => accel.alt = true,
                "super" | "mod4" => accel.super_ = true,
                other => bail!("unknown modifier {other:?} in accelerator {spec:?}"),
            }
            rest = tail;
        }

        if rest.is_empty() {
            bail!("accelerator {spec:?} names no key");
        }
        accel.keysym = keysym_from_name(rest)
            .ok_or_else(|| anyhow::anyhow!("unknown key {rest:?} in accelerator {spec:?}"))?;
        Ok(accel)
    }
}

impl fmt::Display for Accelerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            f.write_str("<Ctrl>")?;
        }
        if self.shift {
            f.write_str("<Shift>")?;
        }
        if self.alt {
            f.write_str("<Alt>")?;
        }
        if self.super_ {
            f.write_str("<Super>")?;
        }
        if let Some(name) = keysym_name(self.keysym) {
            return f.write_str(name);
        }
        // Single-character keysyms print as their character so the output
        // stays parseable; anything else falls back to hex for the logs.
        match char::from_u32(self.keysym).filter(char::is_ascii_graphic) {
            Some(c) => write!(f, "{c}"),
            None => write!(f, "0x{:x}", self.keysym),
        }
    }
}

/// Named non-modifier keys beyond single characters
const NAMED_KEYS: &[(&str, u32)] = &[
    ("F1", 0xffbe),
    ("F2", 0xffbf),
    ("F3", 0xffc0),
    ("F4", 0xffc1),
    ("F5", 0xffc2),
    ("F6", 0xffc3),
    ("F7", 0xffc4),
    ("F8", 0xffc5),
    ("F9", 0xffc6),
    ("F10", 0xffc7),
    ("F11", 0xffc8),
    ("F12", 0xffc9),
    ("space", 0x0020),
    ("Return", 0xff0d),
    ("Tab", 0xff09),
    ("Escape", 0xff1b),
    ("BackSpace", 0xff08),
    ("Delete", 0xffff),
    ("Insert", 0xff63),
    ("Home", 0xff50),
    ("End", 0xff57),
    ("Page_Up", 0xff55),
    ("Page_Down", 0xff56),
    ("Left", 0xff51),
    ("Up", 0xff52),
    ("Right", 0xff53),
    ("Down", 0xff54),
    ("Print", 0xff61),
    ("Pause", 0xff13),
];

fn keysym_from_name(name: &str) -> Option<u32> {
    if let Some((_, sym)) = NAMED_KEYS.iter().find(|(n, _)| *n == name) {
        return Some(*sym);
    }
    let mut chars = name.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    // Latin-1 printable characters map directly to their keysym; letters
    // are grabbed lowercase.
    let c = c.to_ascii_lowercase();
    (c.is_ascii_graphic()).then_some(c as u32)
}

fn keysym_name(keysym: u32) -> Option<&'static str> {
    NAMED_KEYS
        .iter()
        .find(|(_, sym)| *sym == keysym)
        .map(|(name, _)| *name)
}

/// Parsed global shortcuts in grab order
///
/// Unparsable entries are dropped with a warning so one bad accelerator
/// never takes the rest of the set down.
pub struct ShortcutMap {
    entries: Vec<(Accelerator, ShortcutSpec)>,
}

impl ShortcutMap {
    pub fn from_specs(specs: &[ShortcutSpec]) -> Self {
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            match Accelerator::parse(&spec.accelerator) {
                Ok(accel) => entries.push((accel, spec.clone())),
                Err(err) => {
                    warn!(accelerator = %spec.accelerator, error = %err, "Skipping shortcut")
                }
            }
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Accelerators in grab order; the backend reports firings by index
    /// into this slice
    pub fn accelerators(&self) -> Vec<Accelerator> {
        self.entries.iter().map(|(accel, _)| *accel).collect()
    }

    /// Dispatch payload for the shortcut at `index`
    pub fn invocation(&self, index: usize) -> Option<RunActionData> {
        self.entries.get(index).map(|(_, spec)| RunActionData {
            action: spec.action.clone(),
            monitor_index: 0,
            workspace_index: spec.workspace_index,
            command: spec.command.clone(),
            keyboard_origin: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modifier_combinations() {
        let accel = Accelerator::parse("<Ctrl><Alt>F5").unwrap();
        assert!(accel.ctrl && accel.alt && !accel.shift && !accel.super_);
        assert_eq!(accel.keysym, 0xffc2);

        let accel = Accelerator::parse("<Primary><Shift>t").unwrap();
        assert!(accel.ctrl && accel.shift);
        assert_eq!(accel.keysym, 't' as u32);

        let accel = Accelerator::parse("<Super>space").unwrap();
        assert!(accel.super_);
        assert_eq!(accel.keysym, 0x20);
    }

    #[test]
    fn test_letters_normalize_to_lowercase() {
        assert_eq!(
            Accelerator::parse("<Ctrl>T").unwrap(),
            Accelerator::parse("<Ctrl>t").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(Accelerator::parse("<Ctrl").is_err());
        assert!(Accelerator::parse("<Hyper>x").is_err());
        assert!(Accelerator::parse("<Ctrl>").is_err());
        assert!(Accelerator::parse("<Ctrl>NoSuchKey").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        for spec in ["<Ctrl><Shift>F2", "<Super>Return", "<Alt>x"] {
            let accel = Accelerator::parse(spec).unwrap();
            assert_eq!(Accelerator::parse(&accel.to_string()).unwrap(), accel);
        }
        // Character keys display as themselves, not as a hex keysym
        assert_eq!(Accelerator::parse("<Alt>x").unwrap().to_string(), "<Alt>x");
    }

    #[test]
    fn test_shortcut_map_skips_bad_entries() {
        let specs = vec![
            ShortcutSpec {
                accelerator: "<Ctrl><Alt>o".to_string(),
                action: "toggle-overview".to_string(),
                command: String::new(),
                workspace_index: 0,
            },
            ShortcutSpec {
                accelerator: "<Bogus>q".to_string(),
                action: "lock-screen".to_string(),
                command: String::new(),
                workspace_index: 0,
            },
        ];
        let map = ShortcutMap::from_specs(&specs);
        assert_eq!(map.accelerators().len(), 1);

        let data = map.invocation(0).unwrap();
        assert_eq!(data.action, "toggle-overview");
        assert!(data.keyboard_origin);
        assert!(map.invocation(1).is_none());
    }
}
