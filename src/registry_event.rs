/// Events emitted by a prototype registry during operations.
///
/// These events are passed to the tracing callback set via `set_trace_callback`.
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use singleton_prototype::RegistryEvent;
///
/// let event = RegistryEvent::Register { id: "1".to_string(), replaced: false };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A prototype was registered.
    Register {
        id: String,
        /// Whether an existing prototype under the same id was overwritten
        replaced: bool,
    },

    /// A copy was requested.
    Get {
        id: String,
        /// Whether a prototype was registered under `id`
        found: bool,
    },

    /// An id existence check was performed.
    Contains { id: String, found: bool },
}

impl std::fmt::Display for RegistryEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryEvent::Register { id, replaced } => {
                write!(f, "register {{ id: {}, replaced: {} }}", id, replaced)
            }
            RegistryEvent::Get { id, found } => {
                write!(f, "get {{ id: {}, found: {} }}", id, found)
            }
            RegistryEvent::Contains { id, found } => {
                write!(f, "contains {{ id: {}, found: {} }}", id, found)
            }
        }
    }
}
