//! Playback adapter for the promo video.
//!
//! This crate provides:
//! - The widget contract the embedded player implements
//! - A per-page registry for the widget script's ready notification
//! - The playback adapter with its command surface and position poll
//! - Host keyboard shortcuts
//! - A simulated widget for hosts without a browser

pub mod api;
pub mod controls;
pub mod embed;
pub mod player;
pub mod poller;
pub mod simulated;
pub mod widget;

pub use api::{IframeApi, ScriptHost};
pub use controls::{ControlAction, Key, KeyboardControls};
pub use embed::{embed_url, PlayerVars, IFRAME_API_SRC};
pub use player::{PlaybackAdapter, PlayerConfig, PlayerState};
pub use poller::PollTimer;
pub use simulated::{SimulatedWidget, SimulatedWidgetFactory, WidgetCall};
pub use widget::{Widget, WidgetEvents, WidgetFactory, WidgetState};
