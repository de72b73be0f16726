//! Service registration types.

use std::any::Any;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;

#[cfg(feature = "ahash")]
pub(crate) type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
pub(crate) type Map<K, V> = std::collections::HashMap<K, V>;

/// Type-erased shared instance, as stored in the instance table.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased constructor: receives the resolved dependencies in declared order.
pub(crate) type Constructor = Box<dyn Fn(Vec<AnyArc>) -> DiResult<AnyArc> + Send + Sync>;

/// A bound factory with the dependency list it declared
pub(crate) struct Registration {
    pub(crate) dependencies: Vec<Key>,
    pub(crate) ctor: Constructor,
}

impl Registration {
    pub(crate) fn new(dependencies: Vec<Key>, ctor: Constructor) -> Self {
        Self { dependencies, ctor }
    }
}

pub(crate) type FactoryTable = Map<Key, Registration>;
pub(crate) type InstanceTable = Map<Key, AnyArc>;

/// Factory and instance tables, guarded together by the registry lock.
#[derive(Default)]
pub(crate) struct Tables {
    factories: FactoryTable,
    instances: InstanceTable,
}

impl Tables {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Binds a factory. The table is append-only: an existing binding wins.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) -> DiResult<()> {
        if self.factories.contains_key(&key) {
            return Err(DiError::DuplicateRegistration(key.display_name()));
        }
        self.factories.insert(key, registration);
        Ok(())
    }

    #[inline]
    pub(crate) fn is_registered(&self, key: &Key) -> bool {
        self.factories.contains_key(key)
    }

    #[inline]
    pub(crate) fn is_resolved(&self, key: &Key) -> bool {
        self.instances.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.factories.len()
    }

    /// Borrows the factory table shared and the instance table exclusively.
    pub(crate) fn split(&mut self) -> (&FactoryTable, &mut InstanceTable) {
        (&self.factories, &mut self.instances)
    }

    #[cfg(feature = "diagnostics")]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration, bool)> {
        self.factories
            .iter()
            .map(move |(k, r)| (k, r, self.instances.contains_key(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_registration() -> Registration {
        Registration::new(Vec::new(), Box::new(|_| Ok(Arc::new(()) as AnyArc)))
    }

    #[test]
    fn duplicate_insert_keeps_first_binding() {
        let mut tables = Tables::new();
        tables.insert(Key::of::<u8>(), unit_registration()).unwrap();

        let dup = Registration::new(vec![Key::of::<u16>()], Box::new(|_| Ok(Arc::new(()) as AnyArc)));
        let err = tables.insert(Key::of::<u8>(), dup).unwrap_err();
        assert!(matches!(err, DiError::DuplicateRegistration("u8")));

        let (factories, _) = tables.split();
        assert!(factories[&Key::of::<u8>()].dependencies.is_empty());
        assert_eq!(tables.len(), 1);
    }

    #[test]
    fn registered_is_not_resolved() {
        let mut tables = Tables::new();
        tables.insert(Key::of::<u8>(), unit_registration()).unwrap();
        assert!(tables.is_registered(&Key::of::<u8>()));
        assert!(!tables.is_resolved(&Key::of::<u8>()));
    }
}
