//! The registry: type-keyed factories, lazily built singletons and
//! function injection.
//!
//! Every operation takes one exclusive lock over both tables and holds it for
//! the whole call, including the recursive resolution of dependencies. Calls
//! therefore serialize completely, and a singleton can never be constructed
//! twice.
//!
//! Factories and injected functions run while that lock is held. They must
//! receive their dependencies as parameters; calling back into the same
//! registry from inside a factory body deadlocks.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::RegistryOptions;
use crate::dynamic::{self, DynFn};
use crate::error::DiResult;
use crate::factory::{Factory, Injectable};
use crate::key::Key;
use crate::observer::Observers;
use crate::registration::{AnyArc, Registration, Tables};
use crate::traits::{Resolver, ResolverCore};

mod builder;
mod resolve;

pub use builder::RegistryBuilder;
use resolve::Resolution;

/// Thread-safe dependency-injection container with singleton semantics.
///
/// `Registry` is a cheap handle: clones share the same tables.
///
/// # Examples
///
/// ```
/// use ferrous_registry::{BoxError, Registry};
/// use std::sync::Arc;
///
/// struct A { name: String }
/// struct B { a: Arc<A> }
///
/// let registry = Registry::new();
/// registry.register(|| Ok::<_, BoxError>(A { name: "x".into() })).unwrap();
/// registry.register(|a: Arc<A>| Ok::<_, BoxError>(B { a })).unwrap();
///
/// let b = registry.get::<B>().unwrap();
/// let a = registry.get::<A>().unwrap();
/// assert_eq!(b.a.name, "x");
/// assert!(Arc::ptr_eq(&a, &b.a));
/// ```
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

pub(crate) struct RegistryInner {
    tables: Mutex<Tables>,
    observers: Observers,
    options: RegistryOptions,
}

impl Registry {
    /// Creates an empty registry with default options.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates an empty registry with the given options.
    pub fn with_options(options: RegistryOptions) -> Self {
        Self::builder().options(options).build()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub(crate) fn from_parts(options: RegistryOptions, observers: Observers) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                tables: Mutex::new(Tables::new()),
                observers,
                options,
            }),
        }
    }

    pub fn options(&self) -> &RegistryOptions {
        &self.inner.options
    }

    // --- Registration ---

    /// Binds `factory` as the constructor of its output type.
    ///
    /// The service type and its dependencies come from the factory's
    /// signature. Nothing is constructed until the service is first requested.
    ///
    /// # Errors
    ///
    /// [`DiError::DuplicateRegistration`](crate::DiError::DuplicateRegistration) if the type already has a factory;
    /// the existing binding stays in place.
    pub fn register<T, Deps, F>(&self, factory: F) -> DiResult<()>
    where
        T: Any + Send + Sync,
        Deps: 'static,
        F: Factory<Deps, T>,
    {
        let dependencies = factory.dependencies();
        let registration = Registration::new(
            dependencies,
            Box::new(move |deps| factory.construct(deps).map(|value| Arc::new(value) as AnyArc)),
        );
        self.insert(Key::of::<T>(), registration)
    }

    /// Binds a runtime-described factory to `target`.
    ///
    /// `factory` must be a [`DynFn`] declaring two results, `(target, error)`.
    ///
    /// # Errors
    ///
    /// In check order: [`DiError::InvalidFactoryKind`](crate::DiError::InvalidFactoryKind) if `factory` is not a
    /// `DynFn`, [`DiError::InvalidFactorySignature`](crate::DiError::InvalidFactorySignature) for a wrong result arity
    /// or result types, [`DiError::DuplicateRegistration`](crate::DiError::DuplicateRegistration) if `target` is taken.
    pub fn register_dyn(&self, target: Key, factory: Box<dyn Any + Send + Sync>) -> DiResult<()> {
        let registration = dynamic::factory_from_any(target, factory)?;
        self.insert(target, registration)
    }

    fn insert(&self, key: Key, registration: Registration) -> DiResult<()> {
        let deps = registration.dependencies.len();
        self.inner.tables.lock().insert(key, registration)?;
        tracing::debug!(target: "ferrous_registry", service = key.display_name(), deps, "registered factory");
        Ok(())
    }

    // --- Resolution ---

    /// Resolves service `T`, constructing it and its dependencies on first use.
    ///
    /// # Errors
    ///
    /// [`DiError::NotRegistered`](crate::DiError::NotRegistered) for `T` or any transitive dependency,
    /// [`DiError::Failed`](crate::DiError::Failed) with the factory's own error, or
    /// [`DiError::Circular`](crate::DiError::Circular) / [`DiError::DepthExceeded`](crate::DiError::DepthExceeded) for a bad graph.
    /// Dependencies built before the failure stay cached; `T` does not.
    pub fn get<T: Any + Send + Sync>(&self) -> DiResult<Arc<T>> {
        Resolver::get::<T>(self)
    }

    /// Resolves service `T`, panicking on failure.
    pub fn get_required<T: Any + Send + Sync>(&self) -> Arc<T> {
        Resolver::get_required::<T>(self)
    }

    /// Resolves the service named by `out` and writes it into the slot.
    ///
    /// # Errors
    ///
    /// [`DiError::NotAPointer`](crate::DiError::NotAPointer) if `out` is not a [`DynSlot`](crate::DynSlot),
    /// whether or not its type is registered; otherwise as [`Registry::get`].
    pub fn get_dyn(&self, out: &mut dyn Any) -> DiResult<()> {
        let slot = dynamic::slot_from_any(out)?;
        let instance = self.resolve_any(&slot.key())?;
        slot.fill(instance);
        Ok(())
    }

    // --- Injection ---

    /// Resolves every parameter of `function` and calls it once.
    ///
    /// The lock is held through the call, so `function` must not use this
    /// registry. Its own error comes back unchanged as
    /// [`DiError::Failed`](crate::DiError::Failed).
    ///
    /// ```
    /// use ferrous_registry::{BoxError, Registry};
    /// use std::sync::Arc;
    ///
    /// let registry = Registry::new();
    /// registry.register(|| Ok::<_, BoxError>(2u32)).unwrap();
    /// registry.register(|| Ok::<_, BoxError>(3u64)).unwrap();
    ///
    /// let sum = registry
    ///     .inject(|a: Arc<u32>, b: Arc<u64>| Ok::<_, BoxError>(*a as u64 + *b))
    ///     .unwrap();
    /// assert_eq!(sum, 5);
    /// ```
    pub fn inject<Deps, R, F>(&self, function: F) -> DiResult<R>
    where
        F: Injectable<Deps, R>,
    {
        let mut tables = self.inner.tables.lock();
        let deps = self.resolution(&mut tables).resolve_all(&function.dependencies())?;
        function.invoke(deps)
    }

    /// Resolves every parameter of a runtime-described function and calls it.
    ///
    /// # Errors
    ///
    /// [`DiError::InvalidFunctionSignature`](crate::DiError::InvalidFunctionSignature) unless
    /// `function` is a [`DynFn`] with a single error result; the first
    /// resolution failure; or the function's own error as
    /// [`DiError::Failed`](crate::DiError::Failed).
    pub fn inject_dyn(&self, function: Box<dyn Any + Send + Sync>) -> DiResult<()> {
        let function: DynFn = dynamic::function_from_any(function)?;
        let mut tables = self.inner.tables.lock();
        let deps = self.resolution(&mut tables).resolve_all(function.signature().params())?;
        dynamic::function_outcome(function.call(deps))
    }

    fn resolution<'t>(&'t self, tables: &'t mut Tables) -> Resolution<'t> {
        let (factories, instances) = tables.split();
        Resolution::new(factories, instances, &self.inner.observers, self.inner.options.max_depth)
    }

    // --- Introspection ---

    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.is_key_registered(&Key::of::<T>())
    }

    pub fn is_key_registered(&self, key: &Key) -> bool {
        self.inner.tables.lock().is_registered(key)
    }

    /// Whether `T` has already been constructed and cached.
    pub fn is_resolved<T: ?Sized + 'static>(&self) -> bool {
        self.is_key_resolved(&Key::of::<T>())
    }

    pub fn is_key_resolved(&self, key: &Key) -> bool {
        self.inner.tables.lock().is_resolved(key)
    }

    /// Number of registered factories.
    pub fn len(&self) -> usize {
        self.inner.tables.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let tables = self.inner.tables.lock();
        let mut lines: Vec<String> = tables
            .iter()
            .map(|(key, reg, resolved)| {
                let deps: Vec<&str> = reg.dependencies.iter().map(Key::display_name).collect();
                format!(
                    "  {}({}){}",
                    key.display_name(),
                    deps.join(", "),
                    if resolved { " [resolved]" } else { "" }
                )
            })
            .collect();
        lines.sort();

        let mut s = String::from("=== Registry Debug ===\n");
        for line in lines {
            s.push_str(&line);
            s.push('\n');
        }
        s
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("registered", &self.len())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl ResolverCore for Registry {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        let mut tables = self.inner.tables.lock();
        self.resolution(&mut tables).resolve(*key)
    }
}
