use std::sync::Arc;

use crate::config::RegistryOptions;
use crate::observer::{LoggingObserver, Observers, ResolutionObserver};

use super::Registry;

/// Builder for a [`Registry`] with custom options or observers.
///
/// ```
/// use ferrous_registry::{LoggingObserver, Registry};
/// use std::sync::Arc;
///
/// let registry = Registry::builder()
///     .max_depth(64)
///     .observer(Arc::new(LoggingObserver::with_label("app")))
///     .build();
/// assert_eq!(registry.options().max_depth, 64);
/// ```
pub struct RegistryBuilder {
    options: RegistryOptions,
    observers: Observers,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            options: RegistryOptions::default(),
            observers: Observers::new(),
        }
    }

    /// Replaces all options at once.
    pub fn options(mut self, options: RegistryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }

    /// Adds an observer. Observers are notified in the order they were added.
    pub fn observer(mut self, observer: Arc<dyn ResolutionObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self) -> Registry {
        let mut observers = self.observers;
        if self.options.log_resolutions {
            observers.add(Arc::new(LoggingObserver::new()));
        }
        Registry::from_parts(self.options, observers)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_registry_new() {
        let built = RegistryBuilder::new().build();
        assert_eq!(built.options(), Registry::new().options());
        assert!(!built.inner.observers.has_observers());
    }

    #[test]
    fn default_builder_starts_without_observers() {
        let builder = RegistryBuilder::default();
        assert!(!builder.observers.has_observers());
        assert_eq!(builder.options, RegistryOptions::default());
    }

    #[test]
    fn log_resolutions_installs_logging_observer() {
        let registry = RegistryBuilder::new()
            .options(RegistryOptions {
                log_resolutions: true,
                ..RegistryOptions::default()
            })
            .build();
        assert!(registry.inner.observers.has_observers());
    }

    #[test]
    fn max_depth_overrides_options() {
        let registry = RegistryBuilder::new()
            .options(RegistryOptions::default())
            .max_depth(3)
            .build();
        assert_eq!(registry.options().max_depth, 3);
    }
}
