//! In-process widget.
//!
//! Stands in for the embedded player where no browser exists: the host
//! program drives it from the terminal and the tests drive it by hand.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::runtime::Handle;
use tokio::time::Instant;

use crate::embed::PlayerVars;
use crate::widget::{Widget, WidgetEvents, WidgetFactory, WidgetState};

/// A call made on a simulated widget.
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetCall {
    /// `play_video`.
    Play,
    /// `pause_video`.
    Pause,
    /// `seek_to` with its target and seek-ahead flag.
    SeekTo(f64, bool),
    /// `set_volume`.
    SetVolume(u8),
    /// `mute`.
    Mute,
    /// `un_mute`.
    UnMute,
    /// `destroy`.
    Destroy,
}

/// Simulated embedded player.
#[derive(Debug)]
pub struct SimulatedWidget {
    /// Loaded video.
    video_id: String,
    /// Element it was mounted into.
    mount_point: String,
    /// Configuration it was built with.
    vars: PlayerVars,
    /// Event sink back to the adapter.
    events: WidgetEvents,
    /// Video length in seconds.
    length: f64,
    /// Emit state changes in response to play/pause.
    auto_events: bool,
    /// Every call received, in order.
    calls: Mutex<Vec<WidgetCall>>,
    /// Position at the last anchor point.
    position: RwLock<f64>,
    /// When playback last started, while playing.
    playing_since: RwLock<Option<Instant>>,
    /// Volume.
    volume: RwLock<u8>,
    /// Muted state.
    muted: RwLock<bool>,
}

impl SimulatedWidget {
    /// Create a widget for `video_id` reporting `length` seconds.
    pub fn new(video_id: &str, length: f64, events: WidgetEvents) -> Self {
        Self {
            video_id: video_id.to_string(),
            mount_point: String::new(),
            vars: PlayerVars::default(),
            events,
            length,
            auto_events: false,
            calls: Mutex::new(Vec::new()),
            position: RwLock::new(0.0),
            playing_since: RwLock::new(None),
            volume: RwLock::new(100),
            muted: RwLock::new(false),
        }
    }

    /// Loaded video.
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Mount point given at construction.
    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    /// Configuration given at construction.
    pub fn vars(&self) -> &PlayerVars {
        &self.vars
    }

    /// Announce that the video is loaded.
    pub fn emit_ready(&self) {
        self.events.ready();
    }

    /// Report a playback state change.
    pub fn emit_state(&self, state: WidgetState) {
        self.events.state_change(state.code());
    }

    /// Report a raw state code.
    pub fn emit_code(&self, code: i32) {
        self.events.state_change(code);
    }

    /// Force the reported position.
    pub fn set_position(&self, seconds: f64) {
        *self.position.write() = seconds;
        if self.playing_since.read().is_some() {
            *self.playing_since.write() = Some(Instant::now());
        }
    }

    /// Whether the clock is running.
    pub fn is_playing(&self) -> bool {
        self.playing_since.read().is_some()
    }

    /// Current volume.
    pub fn volume(&self) -> u8 {
        *self.volume.read()
    }

    /// Whether muted.
    pub fn is_muted(&self) -> bool {
        *self.muted.read()
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<WidgetCall> {
        self.calls.lock().clone()
    }

    /// Number of calls equal to `call`.
    pub fn count(&self, call: &WidgetCall) -> usize {
        self.calls.lock().iter().filter(|c| *c == call).count()
    }

    /// Whether `destroy` was called.
    pub fn is_destroyed(&self) -> bool {
        self.count(&WidgetCall::Destroy) > 0
    }

    fn record(&self, call: WidgetCall) {
        self.calls.lock().push(call);
    }

    /// Fold elapsed play time into the anchored position.
    fn settle(&self) -> f64 {
        let mut since = self.playing_since.write();
        let mut position = self.position.write();
        if let Some(start) = *since {
            *position = (*position + start.elapsed().as_secs_f64()).min(self.length);
            *since = Some(Instant::now());
        }
        *position
    }
}

impl Widget for SimulatedWidget {
    fn play_video(&self) {
        self.record(WidgetCall::Play);
        self.settle();
        *self.playing_since.write() = Some(Instant::now());
        if self.auto_events {
            self.emit_state(WidgetState::Playing);
        }
    }

    fn pause_video(&self) {
        self.record(WidgetCall::Pause);
        self.settle();
        *self.playing_since.write() = None;
        if self.auto_events {
            self.emit_state(WidgetState::Paused);
        }
    }

    fn seek_to(&self, seconds: f64, allow_seek_ahead: bool) {
        self.record(WidgetCall::SeekTo(seconds, allow_seek_ahead));
        self.set_position(seconds.clamp(0.0, self.length));
    }

    fn set_volume(&self, volume: u8) {
        self.record(WidgetCall::SetVolume(volume));
        *self.volume.write() = volume;
    }

    fn mute(&self) {
        self.record(WidgetCall::Mute);
        *self.muted.write() = true;
    }

    fn un_mute(&self) {
        self.record(WidgetCall::UnMute);
        *self.muted.write() = false;
    }

    fn duration(&self) -> f64 {
        self.length
    }

    fn current_time(&self) -> f64 {
        let position = self.settle();
        if self.auto_events && position >= self.length && self.is_playing() {
            *self.playing_since.write() = None;
            self.emit_state(WidgetState::Ended);
        }
        position
    }

    fn destroy(&self) {
        self.record(WidgetCall::Destroy);
        *self.playing_since.write() = None;
    }
}

/// Factory producing [`SimulatedWidget`]s.
#[derive(Debug)]
pub struct SimulatedWidgetFactory {
    /// Length every created video reports.
    length: f64,
    /// Emit state changes in response to play/pause.
    auto_events: bool,
    /// Emit `ready` this long after construction.
    ready_after: Option<Duration>,
    /// Emit `ready` before `create` returns.
    ready_on_create: bool,
    /// Widgets created so far.
    created: Mutex<Vec<Arc<SimulatedWidget>>>,
}

impl SimulatedWidgetFactory {
    /// Create a factory for videos of `length` seconds.
    ///
    /// By default widgets stay silent until told to emit events.
    pub fn new(length: f64) -> Self {
        Self {
            length,
            auto_events: false,
            ready_after: None,
            ready_on_create: false,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Make widgets answer play/pause with state events and report the end.
    pub fn with_auto_events(mut self, enabled: bool) -> Self {
        self.auto_events = enabled;
        self
    }

    /// Make widgets announce `ready` on their own after `delay`.
    pub fn with_ready_after(mut self, delay: Duration) -> Self {
        self.ready_after = Some(delay);
        self
    }

    /// Make widgets announce `ready` from inside `create`.
    pub fn with_ready_on_create(mut self, enabled: bool) -> Self {
        self.ready_on_create = enabled;
        self
    }

    /// Widgets created so far.
    pub fn widgets(&self) -> Vec<Arc<SimulatedWidget>> {
        self.created.lock().clone()
    }

    /// Most recently created widget.
    pub fn last(&self) -> Option<Arc<SimulatedWidget>> {
        self.created.lock().last().cloned()
    }

    /// Number of widgets created.
    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

impl WidgetFactory for SimulatedWidgetFactory {
    fn create(
        &self,
        mount_point: &str,
        video_id: &str,
        vars: &PlayerVars,
        events: WidgetEvents,
    ) -> Arc<dyn Widget> {
        let mut widget = SimulatedWidget::new(video_id, self.length, events);
        widget.mount_point = mount_point.to_string();
        widget.vars = vars.clone();
        widget.auto_events = self.auto_events;
        let widget = Arc::new(widget);
        self.created.lock().push(widget.clone());

        if self.ready_on_create {
            widget.emit_ready();
        }

        if let (Some(delay), Ok(runtime)) = (self.ready_after, Handle::try_current()) {
            let announce = widget.clone();
            runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                announce.emit_ready();
            });
        }

        widget
    }
}
