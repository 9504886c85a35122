//! Embedded video widget contract.
//!
//! The widget is the third-party player running inside the page. The adapter
//! in [`crate::player`] is the only thing allowed to call these methods.

use std::sync::{Arc, Weak};

use crate::embed::PlayerVars;
use crate::player::AdapterInner;

/// Command surface of an embedded widget instance.
pub trait Widget: Send + Sync {
    /// Start playback.
    fn play_video(&self);
    /// Pause playback.
    fn pause_video(&self);
    /// Seek to a position in seconds.
    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool);
    /// Set output volume, 0 to 100.
    fn set_volume(&self, volume: u8);
    /// Mute output.
    fn mute(&self);
    /// Unmute output.
    fn un_mute(&self);
    /// Total duration in seconds, 0 if unknown.
    fn duration(&self) -> f64;
    /// Current playback position in seconds.
    fn current_time(&self) -> f64;
    /// Tear down the embedded player and release its resources.
    fn destroy(&self);
}

/// Constructor for widget instances, handed out once the widget API is ready.
pub trait WidgetFactory: Send + Sync {
    /// Build a widget bound to the element `mount_point`, loading `video_id`.
    fn create(
        &self,
        mount_point: &str,
        video_id: &str,
        vars: &PlayerVars,
        events: WidgetEvents,
    ) -> Arc<dyn Widget>;
}

/// Playback state codes reported by the widget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WidgetState {
    /// Not started yet.
    Unstarted = -1,
    /// Reached the end.
    Ended = 0,
    /// Playing.
    Playing = 1,
    /// Paused.
    Paused = 2,
    /// Waiting for data.
    Buffering = 3,
    /// Loaded and queued, not started.
    Cued = 5,
}

impl WidgetState {
    /// Map a raw state code. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }

    /// Raw state code.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Event sink handed to a widget at construction.
///
/// Holds only a weak link to the adapter plus the load generation it was
/// created for, so events from a widget that was torn down or replaced are
/// dropped.
#[derive(Clone, Debug)]
pub struct WidgetEvents {
    adapter: Weak<AdapterInner>,
    generation: u64,
}

impl WidgetEvents {
    pub(crate) fn new(adapter: Weak<AdapterInner>, generation: u64) -> Self {
        Self {
            adapter,
            generation,
        }
    }

    /// A sink that delivers nowhere. Useful for driving widgets standalone.
    pub fn detached() -> Self {
        Self {
            adapter: Weak::new(),
            generation: 0,
        }
    }

    /// The widget finished loading its video.
    pub fn ready(&self) {
        if let Some(adapter) = self.adapter.upgrade() {
            adapter.on_ready(self.generation);
        }
    }

    /// The widget's playback state changed to the raw `code`.
    pub fn state_change(&self, code: i32) {
        if let Some(adapter) = self.adapter.upgrade() {
            adapter.on_state_change(self.generation, code);
        }
    }

    /// Whether the adapter this sink reports to is still alive.
    pub fn is_connected(&self) -> bool {
        self.adapter.strong_count() > 0
    }
}
