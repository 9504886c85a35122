//! Interactive player session.
//!
//! Binds text commands and key names to the playback adapter the way the
//! promo section binds its buttons and keyboard shortcuts.

use std::sync::Arc;

use common::{format_time, PlayerError, PlayerResult};
use promo_media::{
    embed_url, ControlAction, IframeApi, Key, KeyboardControls, PlaybackAdapter,
    SimulatedWidgetFactory,
};

use crate::config::PromoConfig;
use crate::host::PageHost;

/// A parsed session command.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Start playback.
    Play,
    /// Pause playback.
    Pause,
    /// Keyboard shortcut.
    Key(Key),
    /// Seek to seconds.
    Seek(f64),
    /// Set volume.
    Volume(u8),
    /// Switch video.
    Load(String),
    /// Print state.
    Status,
    /// End the session.
    Quit,
}

impl Command {
    /// Parse one input line.
    pub fn parse(line: &str) -> PlayerResult<Self> {
        let mut parts = line.split_whitespace();
        let head = parts
            .next()
            .ok_or_else(|| PlayerError::invalid_command("empty input"))?;
        let arg = parts.next();

        match head.to_ascii_lowercase().as_str() {
            "play" => Ok(Command::Play),
            "pause" => Ok(Command::Pause),
            "status" => Ok(Command::Status),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            "seek" => {
                let seconds = arg
                    .and_then(|s| s.parse::<f64>().ok())
                    .filter(|s| s.is_finite() && *s >= 0.0)
                    .ok_or_else(|| PlayerError::invalid_command(line.trim()))?;
                Ok(Command::Seek(seconds))
            }
            "vol" | "volume" => {
                let volume = arg
                    .and_then(|s| s.parse::<u8>().ok())
                    .filter(|v| *v <= promo_media::controls::MAX_VOLUME)
                    .ok_or_else(|| PlayerError::invalid_command(line.trim()))?;
                Ok(Command::Volume(volume))
            }
            "load" => {
                let id = arg.ok_or_else(|| PlayerError::invalid_command(line.trim()))?;
                Ok(Command::Load(id.to_string()))
            }
            _ => {
                let key = Key::parse(head);
                match ControlAction::for_key(key) {
                    Some(_) => Ok(Command::Key(key)),
                    None => Err(PlayerError::invalid_command(line.trim())),
                }
            }
        }
    }
}

/// A promo player session over a simulated widget.
pub struct Session {
    /// Session configuration.
    config: PromoConfig,
    /// Widget API registry for the page.
    api: Arc<IframeApi>,
    /// Host document.
    host: PageHost,
    /// Widget constructor handed out once the API loads.
    factory: Arc<SimulatedWidgetFactory>,
    /// The adapter.
    adapter: PlaybackAdapter,
    /// Keyboard shortcuts.
    controls: KeyboardControls,
}

impl Session {
    /// Create a session. Must be called within a tokio runtime.
    pub fn new(config: PromoConfig) -> PlayerResult<Self> {
        let url = embed_url(&config.video_id, &config.player_vars)?;
        tracing::info!("Embedding: {}", url);

        let api = Arc::new(IframeApi::new());
        let host = PageHost::new();
        let factory = Arc::new(
            SimulatedWidgetFactory::new(config.video_length)
                .with_auto_events(true)
                .with_ready_after(config.load_delay),
        );
        let adapter = PlaybackAdapter::new(
            &config.video_id,
            config.player_config(),
            api.clone(),
            &host,
        )?;
        let controls = KeyboardControls::new(config.volume_step);

        Ok(Self {
            config,
            api,
            host,
            factory,
            adapter,
            controls,
        })
    }

    /// Signal that the widget script finished loading.
    pub fn load_api(&self) {
        if self.api.resolve(self.factory.clone()) {
            tracing::info!("Widget API ready");
        }
    }

    /// Run `command`. Returns `false` once the session should end.
    pub fn execute(&self, command: Command) -> PlayerResult<bool> {
        tracing::debug!(?command, "Executing");
        match command {
            Command::Play => self.adapter.play(),
            Command::Pause => self.adapter.pause(),
            Command::Key(key) => {
                self.controls.handle(&self.adapter, key);
            }
            Command::Seek(seconds) => self.adapter.seek_to(seconds),
            Command::Volume(volume) => self.adapter.change_volume(volume),
            Command::Load(video_id) => {
                let url = embed_url(&video_id, &self.config.player_vars)?;
                tracing::info!("Embedding: {}", url);
                self.adapter.load_video(&video_id);
            }
            Command::Status => println!("{}", self.status()),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// One-line state summary.
    pub fn status(&self) -> String {
        let state = self.adapter.state();
        let mut line = format!(
            "[{}] {} / {}  vol {}",
            if state.is_playing { "playing" } else { "paused" },
            format_time(state.current_time),
            format_time(state.duration),
            state.volume,
        );
        if state.is_muted {
            line.push_str(" (muted)");
        }
        line
    }

    /// State as JSON.
    pub fn status_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(&self.adapter.state())?)
    }

    /// The adapter.
    pub fn adapter(&self) -> &PlaybackAdapter {
        &self.adapter
    }

    /// Host document.
    pub fn host(&self) -> &PageHost {
        &self.host
    }

    /// Session configuration.
    pub fn config(&self) -> &PromoConfig {
        &self.config
    }

    /// Tear the player down.
    pub fn shutdown(&self) {
        self.adapter.dispose();
        tracing::info!("Player shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("play").unwrap(), Command::Play);
        assert_eq!(Command::parse("PAUSE").unwrap(), Command::Pause);
        assert_eq!(Command::parse("space").unwrap(), Command::Key(Key::Space));
        assert_eq!(Command::parse("up").unwrap(), Command::Key(Key::ArrowUp));
        assert_eq!(Command::parse("m").unwrap(), Command::Key(Key::Char('m')));
        assert_eq!(Command::parse("seek 75.5").unwrap(), Command::Seek(75.5));
        assert_eq!(Command::parse("vol 45").unwrap(), Command::Volume(45));
        assert_eq!(
            Command::parse("load abc123").unwrap(),
            Command::Load("abc123".to_string())
        );
        assert_eq!(Command::parse(" q ").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("seek").is_err());
        assert!(Command::parse("seek -3").is_err());
        assert!(Command::parse("vol 101").is_err());
        assert!(Command::parse("load").is_err());
        assert!(Command::parse("k").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_flow() {
        let session = Session::new(PromoConfig::default()).unwrap();
        assert_eq!(session.host().scripts().len(), 1);

        // Nothing happens before the API loads.
        session.execute(Command::Play).unwrap();
        assert!(!session.adapter().state().is_playing);

        session.load_api();
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(session.adapter().state().duration, 212.0);

        session.execute(Command::Key(Key::Space)).unwrap();
        assert!(session.adapter().state().is_playing);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(session.adapter().state().current_time > 1.5);

        session.execute(Command::Seek(75.0)).unwrap();
        assert_eq!(session.status(), "[playing] 01:15 / 03:32  vol 100");

        session.execute(Command::Key(Key::ArrowDown)).unwrap();
        session.execute(Command::Key(Key::Char('m'))).unwrap();
        assert_eq!(session.status(), "[playing] 01:15 / 03:32  vol 90 (muted)");

        assert!(!session.execute(Command::Quit).unwrap());
        session.shutdown();
        assert!(session.adapter().is_disposed());
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_id() {
        let session = Session::new(PromoConfig::default()).unwrap();
        let result = session.execute(Command::Load("../x".to_string()));
        assert!(matches!(result, Err(PlayerError::InvalidVideoId(_))));
        assert_eq!(session.adapter().video_id(), "dbwIKgG16Cs");
    }

    #[tokio::test]
    async fn test_status_json() {
        let session = Session::new(PromoConfig::default()).unwrap();
        let json = session.status_json().unwrap();
        assert!(json.contains("\"is_playing\":false"));
        assert!(json.contains("\"volume\":100"));
    }
}
