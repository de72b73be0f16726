//! Registry configuration.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::internal::circular::MAX_DEPTH;

/// Tunables for a [`Registry`](crate::Registry).
///
/// With the `config` feature the options can be loaded from JSON; missing
/// fields fall back to their defaults.
///
/// # Examples
///
/// ```
/// use ferrous_registry::{Registry, RegistryOptions};
///
/// let options = RegistryOptions {
///     max_depth: 32,
///     ..RegistryOptions::default()
/// };
/// let registry = Registry::with_options(options);
/// assert_eq!(registry.options().max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct RegistryOptions {
    /// Longest dependency chain a single resolution may walk.
    pub max_depth: usize,
    /// Install a [`LoggingObserver`](crate::LoggingObserver) at build time.
    pub log_resolutions: bool,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            log_resolutions: false,
        }
    }
}

#[cfg(feature = "config")]
impl RegistryOptions {
    /// Parses options from a JSON document.
    ///
    /// ```
    /// use ferrous_registry::RegistryOptions;
    ///
    /// let options = RegistryOptions::from_json(r#"{ "log_resolutions": true }"#).unwrap();
    /// assert!(options.log_resolutions);
    /// assert_eq!(options.max_depth, RegistryOptions::default().max_depth);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
