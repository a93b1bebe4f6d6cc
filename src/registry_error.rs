use thiserror::Error;

use crate::CloneError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error("Failed to acquire registry lock")]
    RegistryLock,
    #[error("Prototype not found in registry: {id}")]
    NotFound { id: String },
    #[error("Failed to clone prototype {id}: {source}")]
    CloneFailed { id: String, source: CloneError },
}
