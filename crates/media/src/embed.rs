//! Embed configuration for the widget.

use common::{PlayerError, PlayerResult};
use url::Url;

/// Bootstrap script that announces the widget API once loaded.
pub const IFRAME_API_SRC: &str = "https://www.youtube.com/iframe_api";

/// Base for iframe embed URLs.
pub const EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Widget configuration bag.
///
/// The adapter draws its own controls, so the defaults switch off everything
/// the widget would otherwise render or react to on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerVars {
    /// Show native controls.
    pub controls: bool,
    /// Disable native keyboard shortcuts.
    pub disable_kb: bool,
    /// Minimise branding.
    pub modest_branding: bool,
    /// Show related videos at the end.
    pub rel: bool,
    /// Show the title bar before playback.
    pub show_info: bool,
    /// Play inline on mobile instead of fullscreen.
    pub plays_inline: bool,
    /// Start playing on load.
    pub autoplay: bool,
    /// Allow the JS API to drive the player.
    pub enable_js_api: bool,
}

impl PlayerVars {
    /// Flags in the widget's wire names, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let flag = |on: bool| if on { "1" } else { "0" };
        vec![
            ("autoplay", flag(self.autoplay)),
            ("controls", flag(self.controls)),
            ("disablekb", flag(self.disable_kb)),
            ("playsinline", flag(self.plays_inline)),
            ("rel", flag(self.rel)),
            ("showinfo", flag(self.show_info)),
            ("modestbranding", flag(self.modest_branding)),
            ("enablejsapi", flag(self.enable_js_api)),
        ]
    }
}

impl Default for PlayerVars {
    fn default() -> Self {
        Self {
            controls: false,
            disable_kb: true,
            modest_branding: true,
            rel: false,
            show_info: false,
            plays_inline: true,
            autoplay: false,
            enable_js_api: true,
        }
    }
}

/// Build the iframe embed URL for `video_id`.
pub fn embed_url(video_id: &str, vars: &PlayerVars) -> PlayerResult<Url> {
    let id = video_id.trim();
    let valid = id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if id.is_empty() || !valid {
        return Err(PlayerError::invalid_video_id(video_id));
    }

    let mut url = Url::parse(EMBED_BASE)?.join(id)?;
    url.query_pairs_mut().extend_pairs(vars.query_pairs());
    Ok(url)
}
