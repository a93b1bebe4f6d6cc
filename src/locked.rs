use std::sync::{Arc, Mutex, PoisonError};

use crate::holder::{construct, AtomicState, BoxError, InitFn};
use crate::{HolderError, HolderState, SingleInstanceHolder, Strategy};

/// Lazy holder that takes a mutex on every access.
///
/// Correct, but steady-state reads keep serializing behind the lock long after the
/// instance exists. Prefer [`crate::DoubleChecked`] where reads are hot.
pub struct Locked<T, F = InitFn<T>> {
    instance: Mutex<Option<Arc<T>>>,
    state: AtomicState,
    init: F,
}

impl<T, F> Locked<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    pub const fn new(init: F) -> Self {
        Self {
            instance: Mutex::new(None),
            state: AtomicState::new(HolderState::Uninitialized),
            init,
        }
    }
}

impl<T, F> SingleInstanceHolder<T> for Locked<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    fn get_instance(&self) -> Result<Arc<T>, HolderError> {
        // A panicking callback never leaves a half-written slot behind, so the poisoned
        // guard is still consistent.
        let mut slot = self.instance.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(instance) = slot.as_ref() {
            return Ok(Arc::clone(instance));
        }

        let guard = self.state.begin();
        let instance = Arc::new(construct(&self.init, Strategy::Locked)?);
        *slot = Some(Arc::clone(&instance));
        guard.finish();

        Ok(instance)
    }

    fn state(&self) -> HolderState {
        self.state.load()
    }

    fn strategy(&self) -> Strategy {
        Strategy::Locked
    }
}
