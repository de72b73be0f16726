/// Property-based tests for service resolution
///
/// These tests verify that resolution behavior follows expected patterns
/// regardless of the values, registration order or request order used.

use ferrous_registry::{BoxError, DiError, Registry};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct ServiceA {
    value: String,
}

#[derive(Debug, Clone)]
struct ServiceB {
    number: u64,
}

#[derive(Debug)]
struct ServiceC {
    a: Arc<ServiceA>,
    b: Arc<ServiceB>,
}

// Property: a zero-dependency factory resolves to exactly what it produced,
// and repeated lookups return the same instance.
proptest! {
    #[test]
    fn singleton_resolution_consistency(service_value in "\\PC{0,50}", lookups in 1usize..10) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let value = service_value.clone();

        let registry = Registry::new();
        registry.register(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxError>(ServiceA { value: value.clone() })
        }).unwrap();

        let first = registry.get::<ServiceA>().unwrap();
        for _ in 0..lookups {
            prop_assert!(Arc::ptr_eq(&first, &registry.get::<ServiceA>().unwrap()));
        }
        prop_assert_eq!(&first.value, &service_value);
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

// Property: lookups match registration state.
proptest! {
    #[test]
    fn registration_state_decides_lookup(register_service in any::<bool>(), number in any::<u64>()) {
        let registry = Registry::new();
        if register_service {
            registry.register(move || Ok::<_, BoxError>(ServiceB { number })).unwrap();
        }

        match registry.get::<ServiceB>() {
            Ok(b) => {
                prop_assert!(register_service);
                prop_assert_eq!(b.number, number);
            }
            Err(DiError::NotRegistered(_)) => prop_assert!(!register_service),
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }
}

// Property: registration order does not matter, only that every dependency
// is present by the time of the first lookup.
proptest! {
    #[test]
    fn registration_order_is_irrelevant(order in Just(vec![0usize, 1, 2]).prop_shuffle(), number in any::<u64>()) {
        let registry = Registry::new();
        for step in order {
            match step {
                0 => registry.register(|| Ok::<_, BoxError>(ServiceA { value: "a".to_string() })).unwrap(),
                1 => registry.register(move || Ok::<_, BoxError>(ServiceB { number })).unwrap(),
                _ => registry
                    .register(|a: Arc<ServiceA>, b: Arc<ServiceB>| Ok::<_, BoxError>(ServiceC { a, b }))
                    .unwrap(),
            }
        }

        let c = registry.get::<ServiceC>().unwrap();
        prop_assert_eq!(c.b.number, number);
        prop_assert!(Arc::ptr_eq(&c.a, &registry.get::<ServiceA>().unwrap()));
        prop_assert!(Arc::ptr_eq(&c.b, &registry.get::<ServiceB>().unwrap()));
    }
}

// Property: whatever the request order, each factory runs once.
proptest! {
    #[test]
    fn request_order_never_rebuilds(requests in prop::collection::vec(0usize..3, 1..20)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::new();
        {
            let calls = calls.clone();
            registry.register(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(ServiceA { value: "a".to_string() })
            }).unwrap();
        }
        {
            let calls = calls.clone();
            registry.register(move || {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(ServiceB { number: 1 })
            }).unwrap();
        }
        {
            let calls = calls.clone();
            registry.register(move |a: Arc<ServiceA>, b: Arc<ServiceB>| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(ServiceC { a, b })
            }).unwrap();
        }

        let mut distinct = [false; 3];
        for request in &requests {
            match request {
                0 => { registry.get::<ServiceA>().unwrap(); distinct[0] = true; }
                1 => { registry.get::<ServiceB>().unwrap(); distinct[1] = true; }
                _ => { registry.get::<ServiceC>().unwrap(); distinct = [true; 3]; }
            }
        }

        let expected = distinct.iter().filter(|seen| **seen).count();
        prop_assert_eq!(calls.load(Ordering::SeqCst), expected);
    }
}

// Property: a failing factory is retried on every lookup until it succeeds.
proptest! {
    #[test]
    fn failures_are_never_cached(failures in 0usize..5) {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let registry = Registry::new();
        registry.register(move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            if attempt < failures {
                Err(BoxError::from(format!("attempt {} failed", attempt)))
            } else {
                Ok(ServiceB { number: attempt as u64 })
            }
        }).unwrap();

        for attempt in 0..failures {
            let err = registry.get::<ServiceB>().unwrap_err();
            prop_assert_eq!(err.to_string(), format!("attempt {} failed", attempt));
        }
        prop_assert_eq!(registry.get::<ServiceB>().unwrap().number, failures as u64);
        prop_assert_eq!(attempts.load(Ordering::SeqCst), failures + 1);
    }
}
