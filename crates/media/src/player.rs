//! Playback adapter over the embedded video widget.
//!
//! The adapter owns the widget handle outright. Host controls call its
//! commands and read its [`PlayerState`]; nothing else touches the widget.
//!
//! Two paths write the same fields: commands update state optimistically as
//! they are issued, and widget events overwrite it when they arrive. The last
//! write wins, so a late `Paused` event corrects an earlier optimistic `play`.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use common::{progress_fraction, PlayerError, PlayerResult};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::api::{IframeApi, ScriptHost};
use crate::embed::PlayerVars;
use crate::poller::PollTimer;
use crate::widget::{Widget, WidgetEvents, WidgetFactory, WidgetState};

/// Element id the widget mounts into by default.
pub const DEFAULT_MOUNT_POINT: &str = "youtube-player";

/// Adapter configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    /// Element the widget mounts into.
    pub mount_point: String,
    /// How often the position is polled while playing.
    pub poll_interval: Duration,
    /// Volume applied once the widget is ready, unless changed before.
    pub initial_volume: u8,
    /// Widget configuration bag.
    pub player_vars: PlayerVars,
}

impl PlayerConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set mount point.
    pub fn with_mount_point(mut self, mount_point: &str) -> Self {
        self.mount_point = mount_point.to_string();
        self
    }

    /// Set poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set initial volume.
    pub fn with_initial_volume(mut self, volume: u8) -> Self {
        self.initial_volume = volume;
        self
    }

    /// Set widget configuration.
    pub fn with_player_vars(mut self, vars: PlayerVars) -> Self {
        self.player_vars = vars;
        self
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
            poll_interval: Duration::from_secs(1),
            initial_volume: 100,
            player_vars: PlayerVars::default(),
        }
    }
}

/// Observable playback state.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayerState {
    /// Playing, per the last command or widget event.
    pub is_playing: bool,
    /// Muted locally. Output is silent while set, whatever `volume` holds.
    pub is_muted: bool,
    /// Last volume chosen by the host, 0 to 100. Kept across mute/unmute.
    pub volume: u8,
    /// Total length in seconds, set when the widget reports ready.
    pub duration: f64,
    /// Last polled or sought position in seconds.
    pub current_time: f64,
}

impl PlayerState {
    fn initial(volume: u8) -> Self {
        Self {
            is_playing: false,
            is_muted: false,
            volume,
            duration: 0.0,
            current_time: 0.0,
        }
    }
}

/// Shared adapter internals. Widget events and the poll task reach these
/// through weak references.
pub(crate) struct AdapterInner {
    /// Adapter configuration.
    config: PlayerConfig,
    /// Runtime the poll task runs on.
    runtime: Handle,
    /// Widget API registry.
    api: Arc<IframeApi>,
    /// Weak self, handed to callbacks.
    this: Weak<AdapterInner>,
    /// Video currently loaded.
    video_id: RwLock<String>,
    /// Bumped on every video change; stale callbacks compare against it.
    generation: AtomicU64,
    /// Widget handle, absent until the API is ready.
    widget: RwLock<Option<Arc<dyn Widget>>>,
    /// Generation whose widget reported ready before its handle was stored.
    pending_ready: Mutex<Option<u64>>,
    /// A registry callback is queued and has not run yet.
    awaiting_api: AtomicBool,
    /// Position poll, present while playing.
    poller: Mutex<Option<PollTimer>>,
    /// Current state and its subscribers.
    state: watch::Sender<PlayerState>,
    /// Set once torn down.
    disposed: AtomicBool,
}

impl AdapterInner {
    fn is_current(&self, generation: u64) -> bool {
        !self.disposed.load(Ordering::SeqCst) && self.generation.load(Ordering::SeqCst) == generation
    }

    fn widget(&self) -> Option<Arc<dyn Widget>> {
        self.widget.read().clone()
    }

    fn snapshot(&self) -> PlayerState {
        *self.state.borrow()
    }

    /// Ask the registry for a widget for the current load.
    ///
    /// At most one callback per adapter waits in the registry. It builds for
    /// whichever load is current when it runs.
    fn request_widget(&self) {
        if self.awaiting_api.swap(true, Ordering::SeqCst) {
            return;
        }
        let this = self.this.clone();
        self.api.when_ready(move |factory| {
            if let Some(inner) = this.upgrade() {
                inner.awaiting_api.store(false, Ordering::SeqCst);
                let generation = inner.generation.load(Ordering::SeqCst);
                inner.construct(generation, factory);
            }
        });
    }

    fn construct(&self, generation: u64, factory: Arc<dyn WidgetFactory>) {
        if !self.is_current(generation) {
            tracing::debug!(generation, "Skipping widget construction for stale load");
            return;
        }
        if self.widget.read().is_some() {
            return;
        }

        let video_id = self.video_id.read().clone();
        tracing::debug!(%video_id, mount_point = %self.config.mount_point, "Constructing widget");
        let widget = factory.create(
            &self.config.mount_point,
            &video_id,
            &self.config.player_vars,
            WidgetEvents::new(self.this.clone(), generation),
        );

        let mut slot = self.widget.write();
        if !self.is_current(generation) || slot.is_some() {
            drop(slot);
            widget.destroy();
            return;
        }
        *slot = Some(widget.clone());
        let replay = self.pending_ready.lock().take() == Some(generation);
        drop(slot);

        if replay {
            tracing::debug!(generation, "Replaying ready event raised during construction");
            self.apply_ready(widget.as_ref());
        }
    }

    pub(crate) fn on_ready(&self, generation: u64) {
        if !self.is_current(generation) {
            return;
        }
        let widget = {
            let slot = self.widget.read();
            match slot.as_ref() {
                Some(widget) => widget.clone(),
                None => {
                    // Raised from inside the constructor; `construct` replays it.
                    *self.pending_ready.lock() = Some(generation);
                    return;
                }
            }
        };
        self.apply_ready(widget.as_ref());
    }

    /// Store the duration and push the stored volume to a ready widget.
    fn apply_ready(&self, widget: &dyn Widget) {
        let duration = widget.duration();
        self.state.send_modify(|state| state.duration = duration);

        let volume = self.snapshot().volume;
        widget.set_volume(volume);
        tracing::debug!(duration, volume, "Widget ready");
    }

    pub(crate) fn on_state_change(&self, generation: u64, code: i32) {
        if !self.is_current(generation) {
            return;
        }
        match WidgetState::from_code(code) {
            Some(WidgetState::Playing) => self.set_playing(true),
            Some(WidgetState::Paused) | Some(WidgetState::Ended) => self.set_playing(false),
            other => tracing::trace!(code, state = ?other, "Ignoring widget state"),
        }
    }

    /// Record the playing flag and start or stop the poll to match.
    fn set_playing(&self, playing: bool) {
        self.state.send_if_modified(|state| {
            let changed = state.is_playing != playing;
            state.is_playing = playing;
            changed
        });

        if playing {
            self.ensure_poller();
        } else {
            self.stop_poller();
        }
    }

    fn ensure_poller(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }
        let mut poller = self.poller.lock();
        if poller.as_ref().is_some_and(|timer| !timer.is_finished()) {
            return;
        }

        let this = self.this.clone();
        *poller = Some(PollTimer::spawn(
            &self.runtime,
            self.config.poll_interval,
            move || this.upgrade().is_some_and(|inner| inner.poll_position()),
        ));
    }

    fn stop_poller(&self) {
        if let Some(timer) = self.poller.lock().take() {
            timer.cancel();
        }
    }

    /// One poll tick. Returns `false` once polling should end.
    fn poll_position(&self) -> bool {
        if self.disposed.load(Ordering::SeqCst) || !self.snapshot().is_playing {
            return false;
        }
        let Some(widget) = self.widget() else {
            return false;
        };

        let position = widget.current_time();
        // A pause may have landed while the widget was queried.
        self.state.send_if_modified(|state| {
            if state.is_playing {
                state.current_time = position;
            }
            state.is_playing
        })
    }

    /// Stop polling and destroy the widget, if any.
    fn release_widget(&self) {
        self.stop_poller();
        self.pending_ready.lock().take();
        let widget = self.widget.write().take();
        if let Some(widget) = widget {
            widget.destroy();
        }
    }
}

/// Command/query surface over one embedded widget.
///
/// Commands issued while no widget exists are silent no-ops. They are not
/// queued for later. If the widget script never loads, the adapter simply
/// stays inert.
pub struct PlaybackAdapter {
    inner: Arc<AdapterInner>,
}

impl PlaybackAdapter {
    /// Create an adapter for `video_id`.
    ///
    /// Loads the widget script into `host` if no other adapter did so yet and
    /// registers for the API's ready notification. Must be called from within
    /// a tokio runtime.
    pub fn new(
        video_id: &str,
        config: PlayerConfig,
        api: Arc<IframeApi>,
        host: &dyn ScriptHost,
    ) -> PlayerResult<Self> {
        let runtime = Handle::try_current().map_err(|_| PlayerError::NoRuntime)?;
        let (state, _) = watch::channel(PlayerState::initial(config.initial_volume));

        let inner = Arc::new_cyclic(|this| AdapterInner {
            config,
            runtime,
            api,
            this: this.clone(),
            video_id: RwLock::new(video_id.to_string()),
            generation: AtomicU64::new(0),
            widget: RwLock::new(None),
            pending_ready: Mutex::new(None),
            awaiting_api: AtomicBool::new(false),
            poller: Mutex::new(None),
            state,
            disposed: AtomicBool::new(false),
        });

        inner.api.ensure_loaded(host);
        inner.request_widget();

        Ok(Self { inner })
    }

    // Commands

    /// Start playback.
    pub fn play(&self) {
        let Some(widget) = self.inner.widget() else {
            tracing::debug!("play ignored: widget not ready");
            return;
        };
        widget.play_video();
        self.inner.set_playing(true);
    }

    /// Pause playback.
    pub fn pause(&self) {
        let Some(widget) = self.inner.widget() else {
            tracing::debug!("pause ignored: widget not ready");
            return;
        };
        widget.pause_video();
        self.inner.set_playing(false);
    }

    /// Pause if playing, play otherwise.
    pub fn toggle_play(&self) {
        if self.state().is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Flip mute. Unmuting reapplies the stored volume.
    pub fn toggle_mute(&self) {
        let Some(widget) = self.inner.widget() else {
            tracing::debug!("toggle_mute ignored: widget not ready");
            return;
        };

        let state = self.state();
        if state.is_muted {
            widget.un_mute();
            widget.set_volume(state.volume);
        } else {
            widget.mute();
        }
        self.inner
            .state
            .send_modify(|current| current.is_muted = !state.is_muted);
    }

    /// Seek to `seconds`. The target is passed through unclamped.
    pub fn seek_to(&self, seconds: f64) {
        let Some(widget) = self.inner.widget() else {
            tracing::debug!("seek_to ignored: widget not ready");
            return;
        };
        widget.seek_to(seconds, true);
        self.inner
            .state
            .send_modify(|state| state.current_time = seconds);
    }

    /// Set volume, 0 to 100.
    ///
    /// Zero marks the adapter muted. Any other value clears a mute and also
    /// unmutes the widget, so local and widget mute never disagree.
    pub fn change_volume(&self, volume: u8) {
        let Some(widget) = self.inner.widget() else {
            tracing::debug!("change_volume ignored: widget not ready");
            return;
        };

        widget.set_volume(volume);
        let was_muted = self.state().is_muted;
        if volume > 0 && was_muted {
            widget.un_mute();
        }

        self.inner.state.send_modify(|state| {
            state.volume = volume;
            if volume == 0 {
                state.is_muted = true;
            } else if was_muted {
                state.is_muted = false;
            }
        });
    }

    /// Switch to another video.
    ///
    /// Destroys the current widget, resets playback position and duration,
    /// and builds a new widget once the API is ready. Volume and mute carry
    /// over. Loading the id already shown does nothing.
    pub fn load_video(&self, video_id: &str) {
        if self.is_disposed() || *self.inner.video_id.read() == video_id {
            return;
        }

        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.inner.video_id.write() = video_id.to_string();
        self.inner.release_widget();
        self.inner.state.send_modify(|state| {
            state.is_playing = false;
            state.duration = 0.0;
            state.current_time = 0.0;
        });

        tracing::debug!(%video_id, generation, "Loading video");
        self.inner.request_widget();
    }

    /// Tear down: stop polling and destroy the widget. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.release_widget();
        tracing::debug!(video_id = %self.video_id(), "Playback adapter disposed");
    }

    // Queries

    /// Current state snapshot.
    pub fn state(&self) -> PlayerState {
        self.inner.snapshot()
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<PlayerState> {
        self.inner.state.subscribe()
    }

    /// Fraction of the video played, 0 while the duration is unknown.
    pub fn progress(&self) -> f64 {
        let state = self.state();
        progress_fraction(state.current_time, state.duration)
    }

    /// Video currently loaded.
    pub fn video_id(&self) -> String {
        self.inner.video_id.read().clone()
    }

    /// Whether a widget handle exists.
    pub fn has_widget(&self) -> bool {
        self.inner.widget.read().is_some()
    }

    /// Whether the position poll is running.
    pub fn is_polling(&self) -> bool {
        self.inner
            .poller
            .lock()
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Whether the adapter was torn down.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Adapter configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.inner.config
    }
}

impl Drop for PlaybackAdapter {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for PlaybackAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackAdapter")
            .field("video_id", &self.video_id())
            .field("state", &self.state())
            .field("has_widget", &self.has_widget())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
