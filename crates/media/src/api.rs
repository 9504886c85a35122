//! Widget API bootstrap and ready notification.
//!
//! The widget's bootstrap script announces itself once, through a single
//! global hook. [`IframeApi`] owns that hook for a page: every adapter
//! registers its own callback here instead of overwriting a shared global,
//! and the registry resolves them all exactly once.

use std::sync::Arc;
use parking_lot::Mutex;

use crate::embed::IFRAME_API_SRC;
use crate::widget::WidgetFactory;

/// Callback run once the widget API is available.
pub type ReadyCallback = Box<dyn FnOnce(Arc<dyn WidgetFactory>) + Send>;

/// Host document able to load scripts.
pub trait ScriptHost: Send + Sync {
    /// Insert a script element loading `src`.
    fn inject_script(&self, src: &str);
}

/// Registry state.
enum ApiState {
    /// Waiting for the script to announce itself.
    Pending(Vec<ReadyCallback>),
    /// Script loaded; constructor available.
    Ready(Arc<dyn WidgetFactory>),
}

/// Per-page registry for the widget API.
pub struct IframeApi {
    /// Script source to inject.
    src: String,
    /// Whether the script has been injected.
    injected: Mutex<bool>,
    /// Readiness state.
    state: Mutex<ApiState>,
}

impl IframeApi {
    /// Create a registry for the default widget script.
    pub fn new() -> Self {
        Self::with_src(IFRAME_API_SRC)
    }

    /// Create a registry for a custom script source.
    pub fn with_src(src: &str) -> Self {
        Self {
            src: src.to_string(),
            injected: Mutex::new(false),
            state: Mutex::new(ApiState::Pending(Vec::new())),
        }
    }

    /// Script source this registry loads.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Inject the bootstrap script into `host` unless already done.
    pub fn ensure_loaded(&self, host: &dyn ScriptHost) {
        let mut injected = self.injected.lock();
        if *injected {
            return;
        }
        *injected = true;
        drop(injected);

        tracing::debug!(src = %self.src, "Injecting widget API script");
        host.inject_script(&self.src);
    }

    /// Whether the bootstrap script was injected.
    pub fn is_script_injected(&self) -> bool {
        *self.injected.lock()
    }

    /// Whether the API announced itself.
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.lock(), ApiState::Ready(_))
    }

    /// Number of callbacks still waiting for readiness.
    pub fn pending_callbacks(&self) -> usize {
        match &*self.state.lock() {
            ApiState::Pending(callbacks) => callbacks.len(),
            ApiState::Ready(_) => 0,
        }
    }

    /// Run `callback` once the API is ready, immediately if it already is.
    pub fn when_ready<F>(&self, callback: F)
    where
        F: FnOnce(Arc<dyn WidgetFactory>) + Send + 'static,
    {
        let factory = {
            let mut state = self.state.lock();
            match &mut *state {
                ApiState::Pending(callbacks) => {
                    callbacks.push(Box::new(callback));
                    return;
                }
                ApiState::Ready(factory) => factory.clone(),
            }
        };
        callback(factory);
    }

    /// Announce that the API is ready, handing out `factory`.
    ///
    /// Fires every queued callback once. Returns `false` if the API was
    /// already resolved, in which case nothing happens.
    pub fn resolve(&self, factory: Arc<dyn WidgetFactory>) -> bool {
        let callbacks = {
            let mut state = self.state.lock();
            match std::mem::replace(&mut *state, ApiState::Ready(factory.clone())) {
                ApiState::Pending(callbacks) => callbacks,
                ApiState::Ready(existing) => {
                    *state = ApiState::Ready(existing);
                    tracing::warn!("Widget API announced ready more than once; ignoring");
                    return false;
                }
            }
        };

        tracing::debug!(count = callbacks.len(), "Widget API ready");
        // Callbacks may register further callbacks; the lock is released.
        for callback in callbacks {
            callback(factory.clone());
        }
        true
    }
}

impl Default for IframeApi {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for IframeApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IframeApi")
            .field("src", &self.src)
            .field("injected", &self.is_script_injected())
            .field("ready", &self.is_ready())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::PlayerVars;
    use crate::widget::{Widget, WidgetEvents};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHost {
        injected: Mutex<Vec<String>>,
    }

    impl ScriptHost for CountingHost {
        fn inject_script(&self, src: &str) {
            self.injected.lock().push(src.to_string());
        }
    }

    struct NullFactory;

    impl WidgetFactory for NullFactory {
        fn create(
            &self,
            _mount_point: &str,
            _video_id: &str,
            _vars: &PlayerVars,
            _events: WidgetEvents,
        ) -> Arc<dyn Widget> {
            unreachable!("not constructed in these tests")
        }
    }

    #[test]
    fn test_script_injected_once() {
        let api = IframeApi::new();
        let host = CountingHost::default();

        assert!(!api.is_script_injected());
        api.ensure_loaded(&host);
        api.ensure_loaded(&host);

        assert!(api.is_script_injected());
        assert_eq!(*host.injected.lock(), vec![IFRAME_API_SRC.to_string()]);
    }

    #[test]
    fn test_callbacks_fire_once_on_resolve() {
        let api = IframeApi::new();
        let fired = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let fired = fired.clone();
            api.when_ready(move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(api.pending_callbacks(), 3);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        assert!(api.resolve(Arc::new(NullFactory)));
        assert_eq!(fired.load(Ordering::SeqCst), 3);
        assert_eq!(api.pending_callbacks(), 0);

        assert!(!api.resolve(Arc::new(NullFactory)));
        assert_eq!(fired.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_late_registration_runs_immediately() {
        let api = IframeApi::new();
        api.resolve(Arc::new(NullFactory));

        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        api.when_ready(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(api.is_ready());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}
