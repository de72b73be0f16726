//! Error types for the registry.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Boxed error returned by user factories and injected functions.
pub type BoxError = Box<dyn StdError + Send + Sync>;

/// Shared form of a user error, so [`DiError`] can stay `Clone`.
pub type SharedError = Arc<dyn StdError + Send + Sync>;

/// Registry errors
///
/// Registration-time contract violations, resolution failures and the
/// verbatim errors produced by user factories.
///
/// `DuplicateRegistration` and `NotRegistered` are meant to be matched on
/// directly; the signature kinds carry a message describing the expected shape.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{DiError, Registry};
///
/// struct Unregistered;
///
/// let registry = Registry::new();
/// match registry.get::<Unregistered>() {
///     Err(DiError::NotRegistered(name)) => assert!(name.ends_with("Unregistered")),
///     other => panic!("unexpected: {:?}", other.map(|_| ())),
/// }
/// ```
#[derive(Debug, Clone, thiserror::Error)]
pub enum DiError {
    /// Resolution target is not a writable slot
    #[error("Resolution target is not a writable slot: {0}")]
    NotAPointer(&'static str),
    /// Registered factory is not a callable
    #[error("Factory is not a function: {0}")]
    InvalidFactoryKind(&'static str),
    /// Registered factory has the wrong arity or result types
    #[error("Factory has wrong type: {0}")]
    InvalidFactorySignature(String),
    /// A factory is already bound to this type
    #[error("Service already registered: {0}")]
    DuplicateRegistration(&'static str),
    /// No factory bound to this type
    #[error("Service not registered: {0}")]
    NotRegistered(&'static str),
    /// Injected function does not return exactly one error result
    #[error("Function has wrong type: {0}")]
    InvalidFunctionSignature(&'static str),
    /// A factory or injected function returned this error
    #[error(transparent)]
    Failed(SharedError),
    /// Stored value could not be downcast to the requested type
    #[error("Type mismatch for: {0}")]
    TypeMismatch(&'static str),
    /// Circular dependency detected (includes path)
    #[error("Circular dependency: {}", .0.join(" -> "))]
    Circular(Vec<&'static str>),
    /// Maximum recursion depth exceeded
    #[error("Max depth {0} exceeded")]
    DepthExceeded(usize),
}

impl DiError {
    /// Wraps an error returned by user code.
    pub fn failed<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        DiError::Failed(Arc::from(error.into()))
    }

    /// The original error returned by a factory or injected function, if any.
    ///
    /// ```rust
    /// use ferrous_registry::DiError;
    /// use std::io;
    ///
    /// let err = DiError::failed(io::Error::new(io::ErrorKind::Other, "disk gone"));
    /// let io_err = err.failure().unwrap().downcast_ref::<io::Error>().unwrap();
    /// assert_eq!(io_err.to_string(), "disk gone");
    /// ```
    pub fn failure(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        match self {
            DiError::Failed(inner) => Some(inner.as_ref()),
            _ => None,
        }
    }
}

/// Result type for registry operations
pub type DiResult<T> = Result<T, DiError>;

/// Plain message error, used by dynamic callables that fail with text only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(pub String);

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}
