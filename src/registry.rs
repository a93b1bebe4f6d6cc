//! A thread-safe registry of prototypes that hands out copies on every read.
//!
//! Prototypes are registered once (usually after an expensive load) and then copied on
//! demand, so callers never pay the construction cost again and never share mutable
//! state through the registry. The stored prototype itself is never handed out.
//!
//! # Examples
//!
//! ```
//! use singleton_prototype::{prototype_via_clone, PrototypeRegistry};
//!
//! #[derive(Clone)]
//! struct Shape {
//!     kind: String,
//! }
//! prototype_via_clone!(Shape);
//!
//! let registry = PrototypeRegistry::new();
//! registry.register("1", Shape { kind: "circle".to_string() });
//!
//! let mut copy = registry.get("1").unwrap();
//! copy.kind.push_str("-outlined");
//!
//! assert_eq!(registry.get("1").unwrap().kind, "circle");
//! ```

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{Prototype, RegistryError, RegistryEvent};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `RegistryEvent` every time the registry is
/// interacted with. It must be thread-safe because the registry itself may be shared.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Keyed store of prototypes with clone-on-read retrieval.
///
/// Entries are only ever added or replaced, never implicitly removed.
pub struct PrototypeRegistry<T> {
    entries: RwLock<HashMap<String, Arc<T>>>,
    trace: RwLock<Option<Arc<TraceCallback>>>,
}

impl<T> PrototypeRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            trace: RwLock::new(None),
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Sets a tracing callback that will be invoked on every registry interaction.
    ///
    /// The callback runs after every registry lock has been released, so it may call back
    /// into the same registry. Concurrent operations invoke it concurrently.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Clears the tracing callback (disables registry tracing).
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    fn emit_event(&self, event: &RegistryEvent) {
        // lock poisoning unlikely; if poisoned, keep emitting with recovered lock
        let callback = self
            .trace
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Inserts `prototype` under `id`, replacing any prototype already registered there.
    ///
    /// Registration never fails. A poisoned lock is recovered because an insert cannot
    /// leave the map half-written.
    pub fn register(&self, id: impl Into<String>, prototype: T) {
        self.register_arc(id, Arc::new(prototype));
    }

    /// Registers a prototype that is already behind an `Arc`.
    ///
    /// The registry keeps a handle to the same allocation, so the caller's `Arc` and the
    /// registry see the same prototype. Copies handed out by [`get`](Self::get) are still
    /// independent.
    pub fn register_arc(&self, id: impl Into<String>, prototype: Arc<T>) {
        let id = id.into();

        let previous = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), prototype);

        let replaced = previous.is_some();
        if replaced {
            tracing::warn!(id = %id, "replacing registered prototype");
        } else {
            tracing::debug!(id = %id, "registered prototype");
        }

        self.emit_event(&RegistryEvent::Register { id, replaced });
    }

    /// Checks whether a prototype is registered under `id`.
    ///
    /// # Errors
    ///
    /// [`RegistryError::RegistryLock`] if the registry lock is poisoned.
    pub fn contains(&self, id: &str) -> Result<bool, RegistryError> {
        let found = self
            .entries
            .read()
            .map(|m| m.contains_key(id))
            .map_err(|_| RegistryError::RegistryLock)?;

        self.emit_event(&RegistryEvent::Contains {
            id: id.to_string(),
            found,
        });

        Ok(found)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl<T: Prototype> PrototypeRegistry<T> {
    /// Returns a fresh copy of the prototype registered under `id`.
    ///
    /// The registry lock is released before the copy is made, so a slow or failing
    /// `try_clone` never blocks or corrupts the registry.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if nothing is registered under `id`
    /// - [`RegistryError::CloneFailed`] if the prototype could not be copied
    /// - [`RegistryError::RegistryLock`] if the registry lock is poisoned
    pub fn get(&self, id: &str) -> Result<T, RegistryError> {
        let map = self
            .entries
            .read()
            .map_err(|_| RegistryError::RegistryLock)?;

        let stored = map.get(id).cloned();

        drop(map);

        let found = stored.is_some();
        let result = match stored {
            Some(prototype) => {
                prototype
                    .try_clone()
                    .map_err(|source| RegistryError::CloneFailed {
                        id: id.to_string(),
                        source,
                    })
            }
            None => {
                tracing::debug!(id, "prototype not found");
                Err(RegistryError::NotFound { id: id.to_string() })
            }
        };

        self.emit_event(&RegistryEvent::Get {
            id: id.to_string(),
            found,
        });

        result
    }
}

impl<T> Default for PrototypeRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PrototypeRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrototypeRegistry")
            .field("ids", &self.ids())
            .finish_non_exhaustive()
    }
}

impl<T, K: Into<String>> Extend<(K, T)> for PrototypeRegistry<T> {
    fn extend<I: IntoIterator<Item = (K, T)>>(&mut self, iter: I) {
        for (id, prototype) in iter {
            self.register(id, prototype);
        }
    }
}

impl<T, K: Into<String>> FromIterator<(K, T)> for PrototypeRegistry<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut registry = Self::new();
        registry.extend(iter);
        registry
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
