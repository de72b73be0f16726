//! Resolver traits for service resolution.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

/// Core resolver trait for object-safe service resolution.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// typed generic methods built on top of this trait.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single service by key, constructing it and its
    /// dependencies on first use.
    ///
    /// # Returns
    ///
    /// * `Ok(AnyArc)` - The cached instance as `Arc<dyn Any>`
    /// * `Err(DiError)` - Not registered, a failing factory, a cycle, ...
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc>;
}

/// High-level resolver interface with generic methods.
///
/// # Examples
///
/// ```
/// use ferrous_registry::{BoxError, Registry, Resolver};
///
/// fn port(resolver: &impl Resolver) -> u16 {
///     *resolver.get_required::<u16>()
/// }
///
/// let registry = Registry::new();
/// registry.register(|| Ok::<_, BoxError>(8080u16)).unwrap();
/// assert_eq!(port(&registry), 8080);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves service `T`.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<T>)` - The singleton instance; every call returns the same `Arc`
    /// * `Err(DiError)` - Resolution error, propagated unchanged from the deepest failure
    fn get<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        self.resolve_any(&Key::of::<T>())?
            .downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves service `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics with the resolution error if `T` cannot be resolved.
    fn get_required<T: Any + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_else(|e| {
            panic!("Failed to resolve {}: {}", std::any::type_name::<T>(), e)
        })
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
