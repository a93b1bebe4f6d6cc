//! Double-checked locking over an atomically published pointer.
//!
//! The instance lives in an `Arc` whose raw pointer is stored in an [`AtomicPtr`].
//! Publication is a Release store made after the value is fully constructed; the
//! lock-free fast path is an Acquire load. A reader that sees a non-null pointer
//! therefore also sees every write made during construction. The mutex only guards the
//! slow path, where the pointer is re-checked before constructing.

use std::marker::PhantomData;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::holder::{construct, share_published, AtomicState, BoxError, InitFn};
use crate::{HolderError, HolderState, SingleInstanceHolder, Strategy};

/// Lazy holder using double-checked locking. The default strategy.
pub struct DoubleChecked<T, F = InitFn<T>> {
    /// Null until published; never changes afterwards.
    instance: AtomicPtr<T>,
    state: AtomicState,
    lock: Mutex<()>,
    init: F,
    _owns: PhantomData<Arc<T>>,
}

impl<T, F> DoubleChecked<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    pub const fn new(init: F) -> Self {
        Self {
            instance: AtomicPtr::new(ptr::null_mut()),
            state: AtomicState::new(HolderState::Uninitialized),
            lock: Mutex::new(()),
            init,
            _owns: PhantomData,
        }
    }

    /// The instance if it has already been published. Never blocks, never constructs.
    pub fn get(&self) -> Option<Arc<T>> {
        let current = self.instance.load(Ordering::Acquire);
        if current.is_null() {
            None
        } else {
            // SAFETY: published via Arc::into_raw and owned by `self` until drop.
            Some(unsafe { share_published(current) })
        }
    }

    fn initialize(&self) -> Result<Arc<T>, HolderError> {
        let _lock = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        // Second check: someone may have published while we waited for the lock.
        if let Some(instance) = self.get() {
            return Ok(instance);
        }

        let guard = self.state.begin();
        let instance = Arc::new(construct(&self.init, Strategy::DoubleChecked)?);
        let raw = Arc::into_raw(Arc::clone(&instance)).cast_mut();
        self.instance.store(raw, Ordering::Release);
        guard.finish();

        tracing::debug!(
            type_name = std::any::type_name::<T>(),
            "double-checked singleton published"
        );
        Ok(instance)
    }
}

impl<T, F> SingleInstanceHolder<T> for DoubleChecked<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    fn get_instance(&self) -> Result<Arc<T>, HolderError> {
        match self.get() {
            Some(instance) => Ok(instance),
            None => self.initialize(),
        }
    }

    fn state(&self) -> HolderState {
        if self.instance.load(Ordering::Acquire).is_null() {
            self.state.load()
        } else {
            HolderState::Initialized
        }
    }

    fn strategy(&self) -> Strategy {
        Strategy::DoubleChecked
    }
}

impl<T, F> Drop for DoubleChecked<T, F> {
    fn drop(&mut self) {
        let current = *self.instance.get_mut();
        if !current.is_null() {
            // SAFETY: the holder owns the strong reference created at publication.
            drop(unsafe { Arc::from_raw(current) });
        }
    }
}
