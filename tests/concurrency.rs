/// Concurrent access integration tests
///
/// These tests verify that the registry behaves correctly under concurrent
/// access: singletons are constructed exactly once and every thread observes
/// the same instance.

use ferrous_registry::{BoxError, Registry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

// ===== Test Services =====

#[derive(Debug)]
struct SlowService {
    id: usize,
}

#[derive(Debug)]
struct Consumer {
    slow: Arc<SlowService>,
}

fn slow_registry(calls: &Arc<AtomicUsize>) -> Registry {
    let calls = calls.clone();
    let registry = Registry::new();
    registry
        .register(move || {
            let id = calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            Ok::<_, BoxError>(SlowService { id })
        })
        .unwrap();
    registry
        .register(|slow: Arc<SlowService>| Ok::<_, BoxError>(Consumer { slow }))
        .unwrap();
    registry
}

#[test]
fn test_concurrent_get_constructs_once() {
    const THREADS: usize = 16;

    let calls = Arc::new(AtomicUsize::new(0));
    let registry = slow_registry(&calls);
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.get::<SlowService>().unwrap()
            })
        })
        .collect();

    let instances: Vec<Arc<SlowService>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    for instance in &instances {
        assert_eq!(instance.id, 0);
        assert!(Arc::ptr_eq(instance, &instances[0]));
    }
}

#[test]
fn test_concurrent_dependents_share_dependency() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = slow_registry(&calls);

    crossbeam_utils::thread::scope(|s| {
        let consumer = s.spawn(|_| registry.get::<Consumer>().unwrap());
        let direct = s.spawn(|_| registry.get::<SlowService>().unwrap());

        let consumer = consumer.join().unwrap();
        let direct = direct.join().unwrap();
        assert!(Arc::ptr_eq(&consumer.slow, &direct));
    })
    .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_registration_allows_one_winner() {
    const THREADS: usize = 8;

    let registry = Registry::new();
    let barrier = Barrier::new(THREADS);
    let winners = AtomicUsize::new(0);

    crossbeam_utils::thread::scope(|s| {
        for i in 0..THREADS {
            let registry = &registry;
            let barrier = &barrier;
            let winners = &winners;
            s.spawn(move |_| {
                barrier.wait();
                if registry.register(move || Ok::<_, BoxError>(i)).is_ok() {
                    winners.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    })
    .unwrap();

    assert_eq!(winners.load(Ordering::SeqCst), 1);
    assert!(*registry.get::<usize>().unwrap() < THREADS);
}

#[test]
fn test_concurrent_inject() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = slow_registry(&calls);
    let total = AtomicUsize::new(0);

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|_| {
                registry
                    .inject(|consumer: Arc<Consumer>| {
                        total.fetch_add(consumer.slow.id + 1, Ordering::SeqCst);
                        Ok::<_, BoxError>(())
                    })
                    .unwrap();
            });
        }
    })
    .unwrap();

    assert_eq!(total.load(Ordering::SeqCst), 4);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_failures_do_not_poison() {
    struct Never;

    let registry = Registry::new();
    registry
        .register(|| Err::<Never, BoxError>("always fails".into()))
        .unwrap();
    registry.register(|| Ok::<_, BoxError>(1u8)).unwrap();

    crossbeam_utils::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|_| {
                assert!(registry.get::<Never>().is_err());
                assert_eq!(*registry.get::<u8>().unwrap(), 1);
            });
        }
    })
    .unwrap();
}

#[test]
fn test_panicking_factory_does_not_poison() {
    struct Fragile;

    let registry = Registry::new();
    registry
        .register(|| -> Result<Fragile, BoxError> { panic!("factory exploded") })
        .unwrap();
    registry.register(|| Ok::<_, BoxError>(2u16)).unwrap();

    let clone = registry.clone();
    let joined = thread::spawn(move || {
        let _ = clone.get::<Fragile>();
    })
    .join();
    assert!(joined.is_err());

    assert!(!registry.is_resolved::<Fragile>());
    assert_eq!(*registry.get::<u16>().unwrap(), 2);
}
