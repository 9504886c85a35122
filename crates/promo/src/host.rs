//! Host document stand-in.

use parking_lot::RwLock;
use promo_media::ScriptHost;

/// Script host that records and logs injected scripts.
#[derive(Debug, Default)]
pub struct PageHost {
    /// Script sources in injection order.
    scripts: RwLock<Vec<String>>,
}

impl PageHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts injected so far.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.read().clone()
    }
}

impl ScriptHost for PageHost {
    fn inject_script(&self, src: &str) {
        tracing::info!("Loading script: {}", src);
        self.scripts.write().push(src.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_scripts() {
        let host = PageHost::new();
        host.inject_script("https://www.youtube.com/iframe_api");
        assert_eq!(host.scripts(), vec!["https://www.youtube.com/iframe_api".to_string()]);
    }
}
