use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::holder::{construct, AtomicState, BoxError, InitFn};
use crate::{HolderError, HolderState, SingleInstanceHolder, Strategy};

/// Lazy holder that hands initialization to a one-time-initialization cell.
///
/// There is no locking in this type; [`OnceCell::get_or_try_init`] runs the callback at
/// most once at a time, blocks concurrent first callers until it finishes, and publishes
/// the value to all of them. A failed attempt leaves the cell empty for the next caller.
///
/// For a process-wide static with an infallible constructor see
/// [`define_singleton!`](crate::define_singleton), which nests the cell inside the
/// accessor function.
pub struct OnceHolder<T, F = InitFn<T>> {
    cell: OnceCell<Arc<T>>,
    state: AtomicState,
    init: F,
}

impl<T, F> OnceHolder<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    pub const fn new(init: F) -> Self {
        Self {
            cell: OnceCell::new(),
            state: AtomicState::new(HolderState::Uninitialized),
            init,
        }
    }

    pub fn get(&self) -> Option<Arc<T>> {
        self.cell.get().cloned()
    }
}

impl<T, F> SingleInstanceHolder<T> for OnceHolder<T, F>
where
    F: Fn() -> Result<T, BoxError>,
{
    fn get_instance(&self) -> Result<Arc<T>, HolderError> {
        let instance = self.cell.get_or_try_init(|| {
            let guard = self.state.begin();
            let value = construct(&self.init, Strategy::Holder)?;
            guard.finish();
            Ok::<_, HolderError>(Arc::new(value))
        })?;
        Ok(Arc::clone(instance))
    }

    fn state(&self) -> HolderState {
        if self.cell.get().is_some() {
            HolderState::Initialized
        } else {
            self.state.load()
        }
    }

    fn strategy(&self) -> Strategy {
        Strategy::Holder
    }
}
