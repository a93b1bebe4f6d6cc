use std::sync::Arc;

use crate::holder::{construct, BoxError};
use crate::{HolderError, HolderState, SingleInstanceHolder, Strategy};

/// Holder whose instance is built while the holder itself is built.
///
/// There is no race window: the holder cannot be observed before the instance exists.
/// The price is paying construction cost up front, and a failing constructor means the
/// holder is never created at all.
#[derive(Debug)]
pub struct Eager<T> {
    instance: Arc<T>,
}

impl<T> Eager<T> {
    pub fn new(value: T) -> Self {
        Self {
            instance: Arc::new(value),
        }
    }

    /// Runs `init` immediately.
    ///
    /// # Errors
    ///
    /// [`HolderError::ConstructionFailed`] if `init` fails.
    pub fn try_new<F>(init: F) -> Result<Self, HolderError>
    where
        F: FnOnce() -> Result<T, BoxError>,
    {
        construct(init, Strategy::Eager).map(Self::new)
    }

    /// Borrow the instance without touching the reference count.
    pub fn get(&self) -> &T {
        &self.instance
    }
}

impl<T> SingleInstanceHolder<T> for Eager<T> {
    fn get_instance(&self) -> Result<Arc<T>, HolderError> {
        Ok(Arc::clone(&self.instance))
    }

    fn state(&self) -> HolderState {
        HolderState::Initialized
    }

    fn strategy(&self) -> Strategy {
        Strategy::Eager
    }
}
