//! Runtime-described callables.
//!
//! The typed API checks factory shapes at compile time. Callables assembled at
//! runtime (plugin hosts, scripting bridges) carry their shape as a
//! [`Signature`] instead, and are validated when handed to
//! [`Registry::register_dyn`](crate::Registry::register_dyn) or
//! [`Registry::inject_dyn`](crate::Registry::inject_dyn).
//!
//! # Examples
//!
//! ```rust
//! use ferrous_registry::{DynFn, DynSlot, DynValue, Key, Registry, Signature};
//!
//! struct Greeting(String);
//!
//! let registry = Registry::new();
//! let factory = DynFn::new(
//!     Signature::new().returns::<Greeting>().returns_error(),
//!     |_deps| vec![DynValue::service(Greeting("hi".into())), DynValue::ok()],
//! );
//! registry.register_dyn(Key::of::<Greeting>(), Box::new(factory)).unwrap();
//!
//! let mut slot = DynSlot::new::<Greeting>();
//! registry.get_dyn(&mut slot).unwrap();
//! assert_eq!(slot.downcast::<Greeting>().unwrap().0, "hi");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{BoxError, DiError, DiResult, SharedError};
use crate::key::Key;
use crate::registration::{AnyArc, Registration};

/// Declared parameter and result types of a [`DynFn`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    params: Vec<Key>,
    results: Vec<Key>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a service parameter of type `T`.
    pub fn param<T: ?Sized + 'static>(self) -> Self {
        self.param_key(Key::of::<T>())
    }

    pub fn param_key(mut self, key: Key) -> Self {
        self.params.push(key);
        self
    }

    /// Appends a result of type `T`.
    pub fn returns<T: ?Sized + 'static>(self) -> Self {
        self.returns_key(Key::of::<T>())
    }

    pub fn returns_key(mut self, key: Key) -> Self {
        self.results.push(key);
        self
    }

    /// Appends the error result.
    pub fn returns_error(self) -> Self {
        self.returns_key(Key::error())
    }

    pub fn params(&self) -> &[Key] {
        &self.params
    }

    pub fn results(&self) -> &[Key] {
        &self.results
    }
}

/// One result produced by a [`DynFn`] body.
pub enum DynValue {
    /// A constructed service.
    Service(AnyArc),
    /// The error result; `None` means success.
    Error(Option<SharedError>),
}

impl DynValue {
    pub fn service<T: Any + Send + Sync>(value: T) -> Self {
        DynValue::Service(Arc::new(value))
    }

    /// An empty error result.
    pub fn ok() -> Self {
        DynValue::Error(None)
    }

    pub fn err<E: Into<BoxError>>(error: E) -> Self {
        DynValue::Error(Some(Arc::from(error.into())))
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynValue::Service(_) => f.write_str("Service(..)"),
            DynValue::Error(None) => f.write_str("Error(None)"),
            DynValue::Error(Some(e)) => write!(f, "Error({})", e),
        }
    }
}

type DynBody = dyn Fn(Vec<AnyArc>) -> Vec<DynValue> + Send + Sync;

/// A callable whose shape is only known at runtime.
///
/// The body receives the resolved parameters in signature order and must
/// return one [`DynValue`] per declared result.
#[derive(Clone)]
pub struct DynFn {
    signature: Signature,
    body: Arc<DynBody>,
}

impl DynFn {
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(Vec<AnyArc>) -> Vec<DynValue> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(body),
        }
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn call(&self, args: Vec<AnyArc>) -> Vec<DynValue> {
        (self.body)(args)
    }
}

impl fmt::Debug for DynFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynFn").field("signature", &self.signature).finish()
    }
}

/// Writable target for [`Registry::get_dyn`](crate::Registry::get_dyn).
#[derive(Clone)]
pub struct DynSlot {
    key: Key,
    value: Option<AnyArc>,
}

impl DynSlot {
    /// An empty slot for service `T`.
    pub fn new<T: ?Sized + 'static>() -> Self {
        Self::for_key(Key::of::<T>())
    }

    pub fn for_key(key: Key) -> Self {
        Self { key, value: None }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn value(&self) -> Option<&AnyArc> {
        self.value.as_ref()
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }

    /// The stored instance as `Arc<T>`, if filled with a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.value.clone()?.downcast::<T>().ok()
    }

    pub(crate) fn fill(&mut self, value: AnyArc) {
        self.value = Some(value);
    }
}

impl fmt::Debug for DynSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynSlot")
            .field("key", &self.key)
            .field("filled", &self.is_filled())
            .finish()
    }
}

/// Accepts `out` as a resolution target.
pub(crate) fn slot_from_any(out: &mut dyn Any) -> DiResult<&mut DynSlot> {
    out.downcast_mut::<DynSlot>()
        .ok_or(DiError::NotAPointer("expected `&mut DynSlot`"))
}

/// Validates a dynamic factory for `target` and erases it into a registration.
pub(crate) fn factory_from_any(target: Key, factory: Box<dyn Any + Send + Sync>) -> DiResult<Registration> {
    let factory = factory
        .downcast::<DynFn>()
        .map_err(|_| DiError::InvalidFactoryKind(target.display_name()))?;

    let results = factory.signature.results();
    if results.len() != 2 {
        return Err(DiError::InvalidFactorySignature(
            "it must return two values".to_string(),
        ));
    }
    if results[1] != Key::error() || results[0] != target {
        return Err(DiError::InvalidFactorySignature(expected_factory(target)));
    }

    let dependencies = factory.signature.params.clone();
    Ok(Registration::new(
        dependencies,
        Box::new(move |deps| {
            let mut results = factory.call(deps).into_iter();
            match (results.next(), results.next()) {
                (_, Some(DynValue::Error(Some(error)))) => Err(DiError::Failed(error)),
                (Some(DynValue::Service(value)), Some(DynValue::Error(None))) => {
                    if (*value).type_id() != target.id() {
                        return Err(DiError::TypeMismatch(target.display_name()));
                    }
                    Ok(value)
                }
                _ => Err(DiError::InvalidFactorySignature(expected_factory(target))),
            }
        }),
    ))
}

/// Validates a dynamic function for injection.
pub(crate) fn function_from_any(function: Box<dyn Any + Send + Sync>) -> DiResult<DynFn> {
    let function = function
        .downcast::<DynFn>()
        .map_err(|_| DiError::InvalidFunctionSignature("it is not a function"))?;

    let results = function.signature.results();
    if results.len() != 1 {
        return Err(DiError::InvalidFunctionSignature("it must return only 1 value"));
    }
    if results[0] != Key::error() {
        return Err(DiError::InvalidFunctionSignature("it must return error"));
    }
    Ok(*function)
}

/// Maps the results of an injected dynamic function to its error.
pub(crate) fn function_outcome(results: Vec<DynValue>) -> DiResult<()> {
    match results.into_iter().next() {
        Some(DynValue::Error(None)) => Ok(()),
        Some(DynValue::Error(Some(error))) => Err(DiError::Failed(error)),
        _ => Err(DiError::InvalidFunctionSignature("it must return error")),
    }
}

fn expected_factory(target: Key) -> String {
    format!("it must return ({}, error)", target.display_name())
}
