//! Sound, media and backlight actions
//!
//! The volume/brightness handlers are stepped adjustments: they apply a
//! fixed signed delta, clamp to the allowed range and emit an on-screen
//! feedback indicator.

use anyhow::Result;

use crate::actions::dispatcher::RunActionData;
use crate::backend::{MediaCommand, ShellOps};
use crate::constants::levels;

pub fn volume_up(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    adjust_volume(shell, levels::ADJUST_STEP)
}

pub fn volume_down(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    adjust_volume(shell, -levels::ADJUST_STEP)
}

pub fn toggle_mute(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    let muted = shell.toggle_mute()?;
    shell.show_feedback(if muted { "Muted" } else { "Unmuted" }, None);
    Ok(())
}

pub fn brightness_up(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    adjust_brightness(shell, levels::ADJUST_STEP)
}

pub fn brightness_down(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    adjust_brightness(shell, -levels::ADJUST_STEP)
}

pub fn play_pause(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.media_control(MediaCommand::PlayPause)
}

pub fn next_track(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.media_control(MediaCommand::Next)
}

pub fn prev_track(shell: &mut dyn ShellOps, _data: &RunActionData) -> Result<()> {
    shell.media_control(MediaCommand::Previous)
}

fn adjust_volume(shell: &mut dyn ShellOps, delta: i32) -> Result<()> {
    let level = (shell.volume()? + delta).clamp(levels::VOLUME_MIN, levels::VOLUME_MAX);
    shell.set_volume(level)?;
    shell.show_feedback("Volume", Some(level));
    Ok(())
}

fn adjust_brightness(shell: &mut dyn ShellOps, delta: i32) -> Result<()> {
    let level = (shell.brightness()? + delta).clamp(levels::BRIGHTNESS_MIN, levels::BRIGHTNESS_MAX);
    shell.set_brightness(level)?;
    shell.show_feedback("Brightness", Some(level));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::FakeBackend;

    #[test]
    fn test_volume_steps_and_reports_feedback() {
        let mut shell = FakeBackend::new();
        shell.volume = 50;
        volume_up(&mut shell, &RunActionData::new("volume-up")).unwrap();
        assert_eq!(shell.volume, 55);
        assert_eq!(shell.ops, vec!["set-volume 55", "feedback Volume 55"]);
    }

    #[test]
    fn test_volume_clamps_at_range_ends() {
        let mut shell = FakeBackend::new();
        shell.volume = 98;
        volume_up(&mut shell, &RunActionData::new("volume-up")).unwrap();
        assert_eq!(shell.volume, levels::VOLUME_MAX);

        shell.volume = 2;
        volume_down(&mut shell, &RunActionData::new("volume-down")).unwrap();
        assert_eq!(shell.volume, levels::VOLUME_MIN);
    }

    #[test]
    fn test_brightness_never_drops_below_floor() {
        let mut shell = FakeBackend::new();
        shell.brightness = levels::BRIGHTNESS_MIN + 2;
        brightness_down(&mut shell, &RunActionData::new("brightness-down")).unwrap();
        assert_eq!(shell.brightness, levels::BRIGHTNESS_MIN);
    }

    #[test]
    fn test_mute_alternates() {
        let mut shell = FakeBackend::new();
        toggle_mute(&mut shell, &RunActionData::new("mute-sound")).unwrap();
        assert!(shell.muted);
        toggle_mute(&mut shell, &RunActionData::new("mute-sound")).unwrap();
        assert!(!shell.muted);
    }
}
