//! Host keyboard shortcuts.
//!
//! The adapter never listens for keys itself. A host forwards key presses
//! here and the shortcuts call into the same command surface as the on-screen
//! controls.

use crate::player::PlaybackAdapter;

/// Maximum volume accepted by the widget.
pub const MAX_VOLUME: u8 = 100;

/// A key press, reduced to what the shortcuts care about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Space bar.
    Space,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// Printable character.
    Char(char),
    /// Anything else.
    Other,
}

impl Key {
    /// Parse a key name (`" "`, `"Space"`, `"ArrowUp"`, `"up"`, `"m"`...).
    pub fn parse(name: &str) -> Self {
        match name {
            " " => return Key::Space,
            "" => return Key::Other,
            _ => {}
        }

        let trimmed = name.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "space" | "spacebar" => Key::Space,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            _ => {
                let mut chars = trimmed.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other,
                }
            }
        }
    }
}

/// What a shortcut does.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlAction {
    /// Play or pause.
    TogglePlay,
    /// Raise volume by one step.
    VolumeUp,
    /// Lower volume by one step.
    VolumeDown,
    /// Mute or unmute.
    ToggleMute,
}

impl ControlAction {
    /// Shortcut bound to `key`, if any.
    pub fn for_key(key: Key) -> Option<Self> {
        match key {
            Key::Space => Some(Self::TogglePlay),
            Key::ArrowUp => Some(Self::VolumeUp),
            Key::ArrowDown => Some(Self::VolumeDown),
            Key::Char('m') | Key::Char('M') => Some(Self::ToggleMute),
            _ => None,
        }
    }
}

/// Keyboard shortcut dispatcher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardControls {
    /// Volume change per arrow press.
    pub volume_step: u8,
}

impl KeyboardControls {
    /// Create with the given step.
    pub fn new(volume_step: u8) -> Self {
        Self { volume_step }
    }

    /// Apply the shortcut for `key` to `adapter`.
    pub fn handle(&self, adapter: &PlaybackAdapter, key: Key) -> Option<ControlAction> {
        let action = ControlAction::for_key(key)?;
        self.apply(adapter, action);
        Some(action)
    }

    /// Apply `action` to `adapter`.
    pub fn apply(&self, adapter: &PlaybackAdapter, action: ControlAction) {
        match action {
            ControlAction::TogglePlay => adapter.toggle_play(),
            ControlAction::ToggleMute => adapter.toggle_mute(),
            ControlAction::VolumeUp | ControlAction::VolumeDown => {
                let volume = self.stepped_volume(adapter.state().volume, action);
                adapter.change_volume(volume);
            }
        }
    }

    /// Volume after one step of `action`, kept within `[0, 100]`.
    pub fn stepped_volume(&self, current: u8, action: ControlAction) -> u8 {
        match action {
            ControlAction::VolumeUp => current.saturating_add(self.volume_step).min(MAX_VOLUME),
            ControlAction::VolumeDown => current.min(MAX_VOLUME).saturating_sub(self.volume_step),
            _ => current,
        }
    }
}

impl Default for KeyboardControls {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_parse() {
        assert_eq!(Key::parse(" "), Key::Space);
        assert_eq!(Key::parse("Space"), Key::Space);
        assert_eq!(Key::parse("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::parse("down"), Key::ArrowDown);
        assert_eq!(Key::parse("m"), Key::Char('m'));
        assert_eq!(Key::parse("Enter"), Key::Other);
        assert_eq!(Key::parse(""), Key::Other);
    }

    #[test]
    fn test_bindings() {
        assert_eq!(ControlAction::for_key(Key::Space), Some(ControlAction::TogglePlay));
        assert_eq!(ControlAction::for_key(Key::ArrowUp), Some(ControlAction::VolumeUp));
        assert_eq!(ControlAction::for_key(Key::ArrowDown), Some(ControlAction::VolumeDown));
        assert_eq!(ControlAction::for_key(Key::Char('M')), Some(ControlAction::ToggleMute));
        assert_eq!(ControlAction::for_key(Key::Char('k')), None);
        assert_eq!(ControlAction::for_key(Key::Other), None);
    }

    #[test]
    fn test_stepped_volume_clamps() {
        let controls = KeyboardControls::default();
        assert_eq!(controls.stepped_volume(50, ControlAction::VolumeUp), 60);
        assert_eq!(controls.stepped_volume(95, ControlAction::VolumeUp), 100);
        assert_eq!(controls.stepped_volume(5, ControlAction::VolumeDown), 0);
        assert_eq!(controls.stepped_volume(250, ControlAction::VolumeDown), 90);
        assert_eq!(controls.stepped_volume(40, ControlAction::ToggleMute), 40);
    }
}
