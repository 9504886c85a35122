//! Promo video player host.
//!
//! Wires the playback adapter to a host page:
//! - Configuration
//! - Script host
//! - Command/keyboard session

pub mod config;
pub mod host;
pub mod session;

pub use config::PromoConfig;
pub use host::PageHost;
pub use session::{Command, Session};

/// Player version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
