//! Service key types for the registry.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::BoxError;

/// Key for service storage and lookup.
///
/// A key identifies one service contract: the `TypeId` of the service type
/// plus its `type_name` for diagnostics. Both the factory table and the
/// instance table are keyed by it.
///
/// # Examples
///
/// ```rust
/// use ferrous_registry::{Key, key_of_type};
///
/// struct Database;
///
/// let a = Key::of::<Database>();
/// let b = key_of_type::<Database>();
/// assert_eq!(a, b);
/// assert!(a.display_name().ends_with("Database"));
/// assert_ne!(a, Key::of::<String>());
/// ```
#[derive(Clone, Copy)]
pub struct Key {
    id: TypeId,
    name: &'static str,
}

impl Key {
    /// Key of the service type `T`.
    #[inline(always)]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Key standing for the error result in a dynamic [`Signature`](crate::Signature).
    ///
    /// ```rust
    /// use ferrous_registry::{BoxError, Key};
    ///
    /// assert_eq!(Key::error(), Key::of::<BoxError>());
    /// assert_eq!(Key::error().display_name(), "error");
    /// ```
    pub fn error() -> Self {
        Key {
            id: TypeId::of::<BoxError>(),
            name: "error",
        }
    }

    /// The `TypeId` backing this key.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Get the type name for display
    pub fn display_name(&self) -> &'static str {
        self.name
    }
}

// Identity is the TypeId alone; the name is diagnostics only
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Key {}

impl Hash for Key {
    #[inline(always)]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// Helper function for creating type keys
#[inline(always)]
pub fn key_of_type<T: ?Sized + 'static>() -> Key {
    Key::of::<T>()
}
