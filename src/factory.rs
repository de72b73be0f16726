//! Typed factories and injectable functions.
//!
//! A factory is any `Fn(Arc<D1>, .., Arc<Dn>) -> Result<T, E>` (up to eight
//! dependencies). The dependency list and the produced type are read off the
//! signature, so a malformed factory is a compile error rather than a runtime
//! one. Injectable functions are the `FnOnce` counterpart used by
//! [`Registry::inject`](crate::Registry::inject).

use std::any::Any;
use std::sync::Arc;

use crate::error::{BoxError, DiError, DiResult};
use crate::key::Key;
use crate::registration::AnyArc;

/// A constructor for service `T` whose dependencies are the tuple `Deps`.
///
/// Implemented for closures and functions taking `Arc<_>` parameters and
/// returning `Result<T, E>` where `E: Into<BoxError>`.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{BoxError, Registry};
/// use std::sync::Arc;
///
/// struct Config { url: String }
/// struct Database { url: String }
///
/// fn database(config: Arc<Config>) -> Result<Database, BoxError> {
///     Ok(Database { url: config.url.clone() })
/// }
///
/// let registry = Registry::new();
/// registry.register(|| Ok::<_, BoxError>(Config { url: "postgres://localhost".into() })).unwrap();
/// registry.register(database).unwrap();
///
/// assert_eq!(registry.get::<Database>().unwrap().url, "postgres://localhost");
/// ```
pub trait Factory<Deps, T>: Send + Sync + 'static {
    /// Keys of the parameters, in declaration order.
    fn dependencies(&self) -> Vec<Key>;

    /// Calls the factory with already-resolved dependencies.
    fn construct(&self, deps: Vec<AnyArc>) -> DiResult<T>;
}

/// A function whose parameters are all services, called once by
/// [`Registry::inject`](crate::Registry::inject).
pub trait Injectable<Deps, R> {
    /// Keys of the parameters, in declaration order.
    fn dependencies(&self) -> Vec<Key>;

    /// Calls the function with already-resolved dependencies.
    fn invoke(self, deps: Vec<AnyArc>) -> DiResult<R>;
}

/// Takes the next resolved dependency and downcasts it to `D`.
pub(crate) fn take_dependency<D>(deps: &mut impl Iterator<Item = AnyArc>) -> DiResult<Arc<D>>
where
    D: Any + Send + Sync,
{
    let name = std::any::type_name::<D>();
    deps.next()
        .ok_or(DiError::NotRegistered(name))?
        .downcast::<D>()
        .map_err(|_| DiError::TypeMismatch(name))
}

macro_rules! impl_callables {
    ($($dep:ident),*) => {
        impl<Func, T, E, $($dep,)*> Factory<($($dep,)*), T> for Func
        where
            Func: Fn($(Arc<$dep>),*) -> Result<T, E> + Send + Sync + 'static,
            E: Into<BoxError>,
            $($dep: Any + Send + Sync,)*
        {
            fn dependencies(&self) -> Vec<Key> {
                vec![$(Key::of::<$dep>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn construct(&self, deps: Vec<AnyArc>) -> DiResult<T> {
                let mut deps = deps.into_iter();
                $(let $dep = take_dependency::<$dep>(&mut deps)?;)*
                (self)($($dep),*).map_err(DiError::failed)
            }
        }

        impl<Func, R, E, $($dep,)*> Injectable<($($dep,)*), R> for Func
        where
            Func: FnOnce($(Arc<$dep>),*) -> Result<R, E>,
            E: Into<BoxError>,
            $($dep: Any + Send + Sync,)*
        {
            fn dependencies(&self) -> Vec<Key> {
                vec![$(Key::of::<$dep>()),*]
            }

            #[allow(non_snake_case, unused_mut, unused_variables)]
            fn invoke(self, deps: Vec<AnyArc>) -> DiResult<R> {
                let mut deps = deps.into_iter();
                $(let $dep = take_dependency::<$dep>(&mut deps)?;)*
                (self)($($dep),*).map_err(DiError::failed)
            }
        }
    };
}

impl_callables!();
impl_callables!(D1);
impl_callables!(D1, D2);
impl_callables!(D1, D2, D3);
impl_callables!(D1, D2, D3, D4);
impl_callables!(D1, D2, D3, D4, D5);
impl_callables!(D1, D2, D3, D4, D5, D6);
impl_callables!(D1, D2, D3, D4, D5, D6, D7);
impl_callables!(D1, D2, D3, D4, D5, D6, D7, D8);
