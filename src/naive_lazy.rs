use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::holder::{construct, share_published, BoxError, InitFn};
use crate::{HolderError, HolderState, SingleInstanceHolder, Strategy};

/// Lazy holder that checks and then constructs with no mutual exclusion.
///
/// Two threads that both see an empty holder both run the callback. The last one to
/// publish wins; the instance it displaces stays alive (callers may still hold it) until
/// the holder is dropped. Identity across callers is therefore NOT guaranteed under
/// contention. Kept as a reference for the hazard; use [`crate::DoubleChecked`] instead.
///
/// [`state`](SingleInstanceHolder::state) reports `Initializing` while any caller is
/// still inside the callback, even if a concurrent attempt has already failed.
pub struct NaiveLazy<T, F = InitFn<T>> {
    instance: AtomicPtr<T>,
    attempts: AtomicUsize,
    displaced: Mutex<Vec<Arc<T>>>,
    init: F,
    _owns: PhantomData<Arc<T>>,
}

impl<T, F> NaiveLazy<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    pub const fn new(init: F) -> Self {
        Self {
            instance: AtomicPtr::new(ptr::null_mut()),
            attempts: AtomicUsize::new(0),
            displaced: Mutex::new(Vec::new()),
            init,
            _owns: PhantomData,
        }
    }

    /// Number of instances that were constructed and then replaced by a later publisher.
    pub fn displaced_count(&self) -> usize {
        self.displaced
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<T, F> SingleInstanceHolder<T> for NaiveLazy<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    fn get_instance(&self) -> Result<Arc<T>, HolderError> {
        let current = self.instance.load(Ordering::Acquire);
        if !current.is_null() {
            // SAFETY: published via Arc::into_raw; the holder or `displaced` keeps a
            // strong count for as long as `self` is borrowed.
            return Ok(unsafe { share_published(current) });
        }

        // Race window: another thread can pass the same check right here.
        let attempt = Attempt::enter(&self.attempts);
        let fresh = Arc::new(construct(&self.init, Strategy::NaiveLazy)?);
        let raw = Arc::into_raw(Arc::clone(&fresh)).cast_mut();
        let previous = self.instance.swap(raw, Ordering::AcqRel);
        drop(attempt);

        if !previous.is_null() {
            tracing::warn!(
                type_name = std::any::type_name::<T>(),
                "naive lazy holder constructed its instance more than once"
            );
            // SAFETY: `previous` was published by another caller and just unlinked, so
            // this takes over the holder's strong reference to it.
            let displaced = unsafe { Arc::from_raw(previous) };
            self.displaced
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(displaced);
        }

        Ok(fresh)
    }

    fn state(&self) -> HolderState {
        if !self.instance.load(Ordering::Acquire).is_null() {
            HolderState::Initialized
        } else if self.attempts.load(Ordering::Acquire) > 0 {
            HolderState::Initializing
        } else {
            HolderState::Uninitialized
        }
    }

    fn strategy(&self) -> Strategy {
        Strategy::NaiveLazy
    }
}

/// One caller inside the construction callback. Leaves on drop, so a failing or
/// panicking attempt is counted out too.
struct Attempt<'a>(&'a AtomicUsize);

impl<'a> Attempt<'a> {
    fn enter(attempts: &'a AtomicUsize) -> Self {
        attempts.fetch_add(1, Ordering::AcqRel);
        Self(attempts)
    }
}

impl Drop for Attempt<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

impl<T, F> Drop for NaiveLazy<T, F> {
    fn drop(&mut self) {
        let current = *self.instance.get_mut();
        if !current.is_null() {
            // SAFETY: the holder owns the strong reference created at publication.
            drop(unsafe { Arc::from_raw(current) });
        }
    }
}
