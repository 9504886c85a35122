//! Common utilities and types shared by the promo player crates.

pub mod error;
pub mod timecode;

pub use error::{PlayerError, PlayerResult};
pub use timecode::{format_time, progress_fraction};
