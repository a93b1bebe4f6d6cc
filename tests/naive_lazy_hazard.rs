//! Regression tests documenting the check-then-construct hazard of `NaiveLazy`.
//!
//! These tests assert that the hazard CAN happen, not that it is fixed. The holder stays
//! memory safe: displaced instances are kept alive, only identity is lost.

use singleton_prototype::{BoxError, NaiveLazy, SingleInstanceHolder, Strategy};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

const THREADS: usize = 16;
const ATTEMPTS: usize = 20;

struct Report {
    constructions: usize,
    distinct_instances: usize,
    displaced: usize,
}

fn contended_first_access() -> Report {
    let calls = AtomicUsize::new(0);
    let holder = NaiveLazy::new(|| -> Result<usize, BoxError> {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(25));
        Ok(n)
    });

    let barrier = &Barrier::new(THREADS);
    let holder_ref = &holder;
    let instances: Vec<Arc<usize>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    holder_ref.get_instance().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let distinct: HashSet<*const usize> = instances.iter().map(Arc::as_ptr).collect();

    Report {
        constructions: calls.load(Ordering::SeqCst),
        distinct_instances: distinct.len(),
        displaced: holder.displaced_count(),
    }
}

#[test]
fn test_naive_lazy_can_construct_more_than_once() {
    // A single round almost always races; retry a bounded number of times so a lucky
    // scheduler cannot make the test flaky.
    let report = (0..ATTEMPTS)
        .map(|_| contended_first_access())
        .find(|report| report.constructions > 1);

    let report = report.expect("naive lazy holder never raced under contention");
    assert!(report.constructions > 1);
    assert!(report.distinct_instances > 1);
    assert_eq!(report.displaced, report.constructions - 1);
}

#[test]
fn test_naive_lazy_settles_after_the_race() {
    let holder = NaiveLazy::new(|| Ok(String::from("settled")));

    let first = holder.get_instance().unwrap();
    for _ in 0..10 {
        assert!(Arc::ptr_eq(&first, &holder.get_instance().unwrap()));
    }
    assert_eq!(holder.displaced_count(), 0);
}

#[test]
fn test_naive_lazy_is_flagged_as_hazardous() {
    let holder = NaiveLazy::new(|| Ok(0u8));
    assert_eq!(holder.strategy(), Strategy::NaiveLazy);
    assert!(holder.strategy().may_construct_twice());
    assert!(!holder.strategy().is_selectable());
}
