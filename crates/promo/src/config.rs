//! Promo player configuration.

use std::time::Duration;

use promo_media::{PlayerConfig, PlayerVars};

/// Video shown in the promo section.
pub const DEFAULT_VIDEO_ID: &str = "dbwIKgG16Cs";

/// Promo player configuration.
#[derive(Clone, Debug)]
pub struct PromoConfig {
    /// Video to load.
    pub video_id: String,
    /// Element the widget mounts into.
    pub mount_point: String,
    /// Position poll interval while playing.
    pub poll_interval: Duration,
    /// Volume applied when the widget becomes ready.
    pub initial_volume: u8,
    /// Volume change per arrow key press.
    pub volume_step: u8,
    /// Length reported by the simulated widget, in seconds.
    pub video_length: f64,
    /// Delay before the simulated widget reports ready.
    pub load_delay: Duration,
    /// Widget configuration bag.
    pub player_vars: PlayerVars,
}

impl PromoConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set video id.
    pub fn with_video_id(mut self, video_id: &str) -> Self {
        self.video_id = video_id.to_string();
        self
    }

    /// Set poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set initial volume, clamped to 100.
    pub fn with_initial_volume(mut self, volume: u8) -> Self {
        self.initial_volume = volume.min(100);
        self
    }

    /// Set volume step.
    pub fn with_volume_step(mut self, step: u8) -> Self {
        self.volume_step = step;
        self
    }

    /// Set simulated video length.
    pub fn with_video_length(mut self, seconds: f64) -> Self {
        self.video_length = seconds.max(0.0);
        self
    }

    /// Set simulated load delay.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    /// Adapter configuration derived from this one.
    pub fn player_config(&self) -> PlayerConfig {
        PlayerConfig::new()
            .with_mount_point(&self.mount_point)
            .with_poll_interval(self.poll_interval)
            .with_initial_volume(self.initial_volume)
            .with_player_vars(self.player_vars.clone())
    }
}

impl Default for PromoConfig {
    fn default() -> Self {
        Self {
            video_id: DEFAULT_VIDEO_ID.to_string(),
            mount_point: promo_media::player::DEFAULT_MOUNT_POINT.to_string(),
            poll_interval: Duration::from_secs(1),
            initial_volume: 100,
            volume_step: 10,
            video_length: 212.0,
            load_delay: Duration::from_millis(300),
            player_vars: PlayerVars::default(),
        }
    }
}
