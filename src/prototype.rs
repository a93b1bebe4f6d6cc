//! The copy capability required from registry prototypes.
//!
//! # Copy depth
//!
//! The contract is a *shallow* copy: every top-level field of the copy is independent
//! storage, while nested objects shared through a handle (`Arc`, `Arc<Mutex<_>>`, ...)
//! are aliased, not duplicated. For an ordinary `#[derive(Clone)]` struct this is exactly
//! what `Clone` produces, which is what [`prototype_via_clone!`](crate::prototype_via_clone)
//! relies on. A type that needs a deep copy implements [`Prototype::try_clone`] by hand and
//! rebuilds its nested handles.

use thiserror::Error;

/// A prototype's copy operation could not produce a valid copy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CloneError {
    pub reason: String,
}

impl CloneError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A template object that can produce independent copies of itself.
pub trait Prototype: Sized {
    /// Returns a new value of the same shape. Must not mutate `self`.
    ///
    /// # Errors
    ///
    /// [`CloneError`] if no valid copy can be made. Plain-data prototypes never fail.
    fn try_clone(&self) -> Result<Self, CloneError>;
}

impl<T: Prototype> Prototype for Box<T> {
    fn try_clone(&self) -> Result<Self, CloneError> {
        (**self).try_clone().map(Box::new)
    }
}

impl Prototype for String {
    fn try_clone(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}

/// Element-wise `Clone`: elements that are `Arc` handles stay aliased.
impl<T: Clone> Prototype for Vec<T> {
    fn try_clone(&self) -> Result<Self, CloneError> {
        Ok(self.clone())
    }
}
