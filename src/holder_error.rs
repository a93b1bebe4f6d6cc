use thiserror::Error;

use crate::holder::BoxError;
use crate::Strategy;

/// Failure of a singleton holder.
#[derive(Debug, Error)]
pub enum HolderError {
    /// The construction callback returned an error. The holder stays uninitialized.
    #[error("failed to construct singleton instance of {type_name}: {source}")]
    ConstructionFailed {
        type_name: &'static str,
        source: BoxError,
    },

    /// The strategy cannot be selected at runtime through [`crate::Singleton`].
    #[error("strategy `{0}` is not selectable at runtime")]
    UnsupportedStrategy(Strategy),
}

/// A name that does not match any variant of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {type_name} variant `{found}`")]
pub struct UnknownVariant {
    pub type_name: &'static str,
    pub found: String,
}
