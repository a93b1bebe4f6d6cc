//! Integration tests for concurrent first access to every race-free strategy.
//!
//! Each test releases all threads at once through a `Barrier` so they hit the empty
//! holder together, and the construction callback sleeps to keep the window open.
//! The callback must run exactly once and every thread must get the same instance.

use singleton_prototype::{
    BoxError, DoubleChecked, Eager, EnumeratedSingleton, HolderState, Locked, OnceHolder,
    SingleInstanceHolder, Singleton, Strategy,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 100;

#[derive(Debug)]
struct Connection {
    url: String,
    pool_size: usize,
}

fn slow_connection(calls: &AtomicUsize) -> Result<Connection, BoxError> {
    calls.fetch_add(1, Ordering::SeqCst);
    thread::sleep(Duration::from_millis(20));
    Ok(Connection {
        url: "postgres://localhost/app".to_string(),
        pool_size: 8,
    })
}

/// Runs `THREADS` concurrent `get_instance` calls and returns what each thread saw.
fn hammer<H>(holder: &H) -> Vec<Arc<Connection>>
where
    H: SingleInstanceHolder<Connection> + Sync,
{
    let barrier = &Barrier::new(THREADS);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    holder.get_instance().unwrap()
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

fn assert_single_identity(instances: &[Arc<Connection>]) {
    assert_eq!(instances.len(), THREADS);
    let first = &instances[0];
    for instance in instances {
        assert!(Arc::ptr_eq(first, instance));
    }
    // Fully constructed value visible to every thread.
    assert_eq!(first.url, "postgres://localhost/app");
    assert_eq!(first.pool_size, 8);
}

#[test]
fn test_double_checked_constructs_exactly_once() {
    let calls = AtomicUsize::new(0);
    let holder = DoubleChecked::new(|| slow_connection(&calls));

    assert_eq!(holder.state(), HolderState::Uninitialized);

    let instances = hammer(&holder);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_single_identity(&instances);
    assert_eq!(holder.state(), HolderState::Initialized);
}

#[test]
fn test_locked_constructs_exactly_once() {
    let calls = AtomicUsize::new(0);
    let holder = Locked::new(|| slow_connection(&calls));

    let instances = hammer(&holder);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_single_identity(&instances);
}

#[test]
fn test_once_holder_constructs_exactly_once() {
    let calls = AtomicUsize::new(0);
    let holder = OnceHolder::new(|| slow_connection(&calls));

    let instances = hammer(&holder);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_single_identity(&instances);
}

#[test]
fn test_eager_constructs_exactly_once() {
    let calls = AtomicUsize::new(0);
    let holder = Eager::try_new(|| slow_connection(&calls)).unwrap();

    let instances = hammer(&holder);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_single_identity(&instances);
}

#[test]
fn test_selectable_strategies_construct_exactly_once() {
    for strategy in [Strategy::Eager, Strategy::DoubleChecked, Strategy::Holder] {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let singleton =
            Singleton::with_strategy(strategy, move || slow_connection(&calls_clone)).unwrap();

        let instances = hammer(&singleton);

        assert_eq!(calls.load(Ordering::SeqCst), 1, "strategy {}", strategy);
        assert_single_identity(&instances);
    }
}

#[test]
fn test_concurrent_failures_then_success() {
    // Every thread of the first wave fails; the holder must stay retryable and the
    // second wave must still agree on one instance.
    let calls = AtomicUsize::new(0);
    let failing = std::sync::atomic::AtomicBool::new(true);
    let holder = DoubleChecked::new(|| {
        if failing.load(Ordering::SeqCst) {
            Err("database unavailable".into())
        } else {
            slow_connection(&calls)
        }
    });

    let barrier = Barrier::new(8);
    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                barrier.wait();
                assert!(holder.get_instance().is_err());
            });
        }
    });
    assert_eq!(holder.state(), HolderState::Uninitialized);

    failing.store(false, Ordering::SeqCst);
    let instances = hammer(&holder);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_single_identity(&instances);
}

singleton_prototype::enum_singleton! {
    enum Clock
}

#[test]
fn test_enumerated_singleton_is_shared() {
    let barrier = &Barrier::new(THREADS);

    let addresses: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    Clock::get_instance() as *const Clock as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(addresses.iter().all(|a| *a == addresses[0]));
    assert_eq!(Clock::strategy(), Strategy::Enumerated);
}
