//! Common error types.

use thiserror::Error;

/// Main error type for the promo player.
///
/// Playback commands never return these; they degrade to no-ops instead.
/// Errors only come out of setup paths (runtime capture, URL building,
/// host input).
#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("No async runtime available")]
    NoRuntime,

    #[error("Invalid video id: {0:?}")]
    InvalidVideoId(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid command: {0}")]
    InvalidCommand(String),
}

pub type PlayerResult<T> = Result<T, PlayerError>;

impl PlayerError {
    pub fn invalid_video_id(id: impl Into<String>) -> Self {
        Self::InvalidVideoId(id.into())
    }

    pub fn invalid_command(msg: impl Into<String>) -> Self {
        Self::InvalidCommand(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlayerError::invalid_video_id("");
        assert_eq!(err.to_string(), "Invalid video id: \"\"");

        let err = PlayerError::invalid_command("jump 3");
        assert_eq!(err.to_string(), "Invalid command: jump 3");
    }

    #[test]
    fn test_url_error_conversion() {
        let parse_err = url::Url::parse("not a url").unwrap_err();
        let err: PlayerError = parse_err.into();
        assert!(matches!(err, PlayerError::UrlParse(_)));
    }
}
