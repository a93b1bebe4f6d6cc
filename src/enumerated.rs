//! Singletons as single-variant enums.
//!
//! The set of instances is fixed when the type is defined. There is no construction at
//! runtime, so there is nothing to race on, and parsing the variant name back always
//! yields the one existing variant instead of a new allocation.

use std::fmt::Display;
use std::str::FromStr;

use crate::{Strategy, UnknownVariant};

/// A type with exactly one value, reachable through a `'static` access point.
///
/// Usually implemented with [`enum_singleton!`](crate::enum_singleton).
pub trait EnumeratedSingleton:
    Copy + Eq + Display + FromStr<Err = UnknownVariant> + Send + Sync + 'static
{
    /// The one instance. Every call returns the same address.
    fn get_instance() -> &'static Self;

    fn strategy() -> Strategy {
        Strategy::Enumerated
    }

    /// Rebuilds the instance from its textual form, returning the `'static` instance
    /// rather than a fresh value.
    ///
    /// # Errors
    ///
    /// [`UnknownVariant`] if `name` does not spell the variant.
    fn restore(name: &str) -> Result<&'static Self, UnknownVariant> {
        let parsed = name.parse::<Self>()?;
        let instance = Self::get_instance();
        debug_assert!(parsed == *instance);
        Ok(instance)
    }
}
