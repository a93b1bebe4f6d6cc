//! Core trait shared by every singleton holder.
//!
//! A holder owns the lifecycle of one process-wide value. The value is handed out as an
//! `Arc<T>`, so identity can be checked with [`Arc::ptr_eq`] and the instance outlives
//! any single access.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::{HolderError, Strategy};

/// Boxed error returned by a construction callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Type-erased construction callback, used as the default callback type of the lazy holders.
pub type InitFn<T> = Box<dyn Fn() -> Result<T, BoxError> + Send + Sync + 'static>;

/// Lifecycle of a holder. Transitions only ever go forward, except that a failed
/// construction returns the holder to `Uninitialized` so the next caller can retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HolderState {
    Uninitialized,
    Initializing,
    Initialized,
}

impl fmt::Display for HolderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HolderState::Uninitialized => write!(f, "uninitialized"),
            HolderState::Initializing => write!(f, "initializing"),
            HolderState::Initialized => write!(f, "initialized"),
        }
    }
}

/// Access point of a singleton.
///
/// Implementors only decide *how* the instance gets constructed and published; callers
/// always see the same contract: every successful `get_instance` call on one holder
/// returns the same instance (the naive strategy is the one documented exception).
pub trait SingleInstanceHolder<T> {
    /// Returns the shared instance, constructing it if this is the triggering call.
    ///
    /// # Errors
    ///
    /// [`HolderError::ConstructionFailed`] if the construction callback failed. The
    /// holder stays uninitialized and the next call retries.
    fn get_instance(&self) -> Result<Arc<T>, HolderError>;

    /// Current lifecycle state. Only a snapshot under concurrent access.
    fn state(&self) -> HolderState;

    /// The initialization strategy this holder implements.
    fn strategy(&self) -> Strategy;

    fn is_initialized(&self) -> bool {
        self.state() == HolderState::Initialized
    }
}

// -------------------------------------------------------------------------------------------------
// Shared plumbing for the lazy holders
// -------------------------------------------------------------------------------------------------

const UNINITIALIZED: u8 = 0;
const INITIALIZING: u8 = 1;
const INITIALIZED: u8 = 2;

/// Lock-free state flag. Stores use Release and loads use Acquire so the flag can be
/// read alongside the published instance.
#[derive(Debug)]
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) const fn new(state: HolderState) -> Self {
        Self(AtomicU8::new(match state {
            HolderState::Uninitialized => UNINITIALIZED,
            HolderState::Initializing => INITIALIZING,
            HolderState::Initialized => INITIALIZED,
        }))
    }

    pub(crate) fn load(&self) -> HolderState {
        match self.0.load(Ordering::Acquire) {
            INITIALIZED => HolderState::Initialized,
            INITIALIZING => HolderState::Initializing,
            _ => HolderState::Uninitialized,
        }
    }

    pub(crate) fn store(&self, state: HolderState) {
        let raw = match state {
            HolderState::Uninitialized => UNINITIALIZED,
            HolderState::Initializing => INITIALIZING,
            HolderState::Initialized => INITIALIZED,
        };
        self.0.store(raw, Ordering::Release);
    }

    /// Marks the holder as initializing and returns a guard that puts it back to
    /// `Uninitialized` unless [`InitializingGuard::finish`] is called. Covers both a
    /// failing and a panicking callback.
    pub(crate) fn begin(&self) -> InitializingGuard<'_> {
        self.store(HolderState::Initializing);
        InitializingGuard {
            state: self,
            finished: false,
        }
    }
}

pub(crate) struct InitializingGuard<'a> {
    state: &'a AtomicState,
    finished: bool,
}

impl InitializingGuard<'_> {
    pub(crate) fn finish(mut self) {
        self.finished = true;
        self.state.store(HolderState::Initialized);
    }
}

impl Drop for InitializingGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state.store(HolderState::Uninitialized);
        }
    }
}

/// Runs a construction callback, logging and wrapping its failure.
pub(crate) fn construct<T, F>(init: F, strategy: Strategy) -> Result<T, HolderError>
where
    F: FnOnce() -> Result<T, BoxError>,
{
    let type_name = std::any::type_name::<T>();
    tracing::debug!(type_name, %strategy, "constructing singleton instance");

    init().map_err(|source| {
        tracing::debug!(type_name, %strategy, error = %source, "singleton construction failed");
        HolderError::ConstructionFailed { type_name, source }
    })
}

/// Produces a new strong reference to an instance published through `Arc::into_raw`.
///
/// # Safety
///
/// `ptr` must come from `Arc::into_raw` and the publishing holder must still own that
/// strong reference for the duration of the call.
pub(crate) unsafe fn share_published<T>(ptr: *const T) -> Arc<T> {
    Arc::increment_strong_count(ptr);
    Arc::from_raw(ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_state_round_trip() {
        let state = AtomicState::new(HolderState::Uninitialized);
        assert_eq!(state.load(), HolderState::Uninitialized);

        state.store(HolderState::Initializing);
        assert_eq!(state.load(), HolderState::Initializing);

        state.store(HolderState::Initialized);
        assert_eq!(state.load(), HolderState::Initialized);
    }

    #[test]
    fn test_guard_resets_when_dropped_unfinished() {
        let state = AtomicState::new(HolderState::Uninitialized);
        {
            let _guard = state.begin();
            assert_eq!(state.load(), HolderState::Initializing);
        }
        assert_eq!(state.load(), HolderState::Uninitialized);
    }

    #[test]
    fn test_guard_finish_marks_initialized() {
        let state = AtomicState::new(HolderState::Uninitialized);
        state.begin().finish();
        assert_eq!(state.load(), HolderState::Initialized);
    }

    #[test]
    fn test_construct_wraps_failure() {
        let init = || -> Result<u32, BoxError> { Err("backend offline".into()) };
        let err = construct(init, Strategy::Locked).unwrap_err();
        assert!(matches!(
            err,
            HolderError::ConstructionFailed { type_name: "u32", .. }
        ));
        assert!(err.to_string().contains("backend offline"));
    }

    #[test]
    fn test_state_display() {
        assert_eq!(HolderState::Initializing.to_string(), "initializing");
    }
}
