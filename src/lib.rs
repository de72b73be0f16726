//! # ferrous-registry
//!
//! A small, thread-safe dependency-injection registry for Rust.
//!
//! ## Features
//!
//! - **Constructor injection**: a factory's parameters are its dependencies
//! - **Lazy singletons**: each service is built on first use and shared afterwards
//! - **Function injection**: call any function with its parameters resolved
//! - **Circular dependency detection**: cycles fail fast with the full path
//! - **Runtime-described callables**: validated registration for dynamic hosts
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_registry::{BoxError, Registry};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! let registry = Registry::new();
//! registry
//!     .register(|| Ok::<_, BoxError>(Database { url: "postgres://localhost".into() }))
//!     .unwrap();
//! registry
//!     .register(|db: Arc<Database>| Ok::<_, BoxError>(UserService { db }))
//!     .unwrap();
//!
//! let users = registry.get::<UserService>().unwrap();
//! assert_eq!(users.db.url, "postgres://localhost");
//!
//! // Every lookup returns the same instance.
//! assert!(Arc::ptr_eq(&users.db, &registry.get::<Database>().unwrap()));
//! ```
//!
//! ## Function Injection
//!
//! ```rust
//! use ferrous_registry::{BoxError, Registry};
//! use std::sync::Arc;
//!
//! struct Config { workers: usize }
//!
//! let registry = Registry::new();
//! registry.register(|| Ok::<_, BoxError>(Config { workers: 4 })).unwrap();
//!
//! let workers = registry
//!     .inject(|config: Arc<Config>| Ok::<_, BoxError>(config.workers))
//!     .unwrap();
//! assert_eq!(workers, 4);
//! ```
//!
//! ## Errors
//!
//! Factory errors are passed through untouched inside [`DiError::Failed`]:
//!
//! ```rust
//! use ferrous_registry::{BoxError, DiError, Message, Registry};
//!
//! #[derive(Debug)]
//! struct Flaky;
//!
//! let registry = Registry::new();
//! registry
//!     .register(|| Err::<Flaky, BoxError>(Message("no network".into()).into()))
//!     .unwrap();
//!
//! let err = registry.get::<Flaky>().unwrap_err();
//! assert!(matches!(err, DiError::Failed(_)));
//! assert_eq!(err.to_string(), "no network");
//! ```
//!
//! ## Concurrency
//!
//! One exclusive lock guards the registry for the whole of each call, so
//! concurrent requests for the same service construct it exactly once.
//! Factories and injected functions must not call back into the registry.

pub mod config;
pub mod dynamic;
pub mod error;
pub mod factory;
pub mod key;
pub mod observer;
pub mod traits;

// Internal modules
mod internal;
mod registration;
mod registry;

// Re-export core types
pub use config::RegistryOptions;
pub use dynamic::{DynFn, DynSlot, DynValue, Signature};
pub use error::{BoxError, DiError, DiResult, Message, SharedError};
pub use factory::{Factory, Injectable};
pub use key::{key_of_type, Key};
pub use observer::{LoggingObserver, ResolutionObserver};
pub use registration::AnyArc;
pub use registry::{Registry, RegistryBuilder};
pub use traits::{Resolver, ResolverCore};
