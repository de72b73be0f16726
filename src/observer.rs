//! Diagnostic observers for resolution events.
//!
//! Observers are notified synchronously, under the registry lock, whenever a
//! factory is about to run, has produced an instance, or has failed. Cache
//! hits are not reported. Keep implementations cheap: every other caller of
//! the registry waits while they run.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for resolution events.
///
/// # Examples
///
/// ```
/// use ferrous_registry::{BoxError, DiError, Key, Registry, ResolutionObserver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl ResolutionObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.0.lock().unwrap().push(format!("start {}", key));
///     }
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.0.lock().unwrap().push(format!("done {}", key));
///     }
///     fn failed(&self, key: &Key, _error: &DiError) {
///         self.0.lock().unwrap().push(format!("fail {}", key));
///     }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// let registry = Registry::builder().observer(recorder.clone()).build();
/// registry.register(|| Ok::<_, BoxError>(5u8)).unwrap();
/// registry.get::<u8>().unwrap();
/// registry.get::<u8>().unwrap();
///
/// assert_eq!(*recorder.0.lock().unwrap(), vec!["start u8", "done u8"]);
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before a factory is invoked for `key`.
    fn resolving(&self, key: &Key);

    /// Called after the factory for `key` succeeded and its instance was cached.
    ///
    /// `duration` covers dependency resolution and the factory call.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when resolving `key` failed, either in a dependency or in the
    /// factory itself.
    fn failed(&self, key: &Key, error: &DiError);
}

/// Collection of installed observers.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    /// Returns true if any observers are registered.
    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that emits `tracing` events.
///
/// Starts and completions are logged at `DEBUG`, failures at `WARN`, all
/// under the `ferrous_registry` target with a `service` field.
///
/// ```
/// use ferrous_registry::{LoggingObserver, Registry};
/// use std::sync::Arc;
///
/// let registry = Registry::builder()
///     .observer(Arc::new(LoggingObserver::new()))
///     .build();
/// # let _ = registry;
/// ```
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    label: &'static str,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self { label: "registry" }
    }

    /// Creates a logging observer whose events carry `label`, to tell
    /// several registries apart.
    pub fn with_label(label: &'static str) -> Self {
        Self { label }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn resolving(&self, key: &Key) {
        tracing::debug!(target: "ferrous_registry", registry = self.label, service = key.display_name(), "resolving");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::debug!(
            target: "ferrous_registry",
            registry = self.label,
            service = key.display_name(),
            elapsed_us = duration.as_micros() as u64,
            "resolved"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::warn!(
            target: "ferrous_registry",
            registry = self.label,
            service = key.display_name(),
            error = %error,
            "resolution failed"
        );
    }
}
