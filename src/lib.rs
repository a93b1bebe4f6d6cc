//! # Singleton Prototype
//!
//! Thread-safe creational building blocks: singleton holders with selectable
//! initialization strategies, and a prototype registry that hands out independent copies
//! of pre-built templates instead of constructing them again.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_prototype::{
//!     prototype_via_clone, DoubleChecked, PrototypeRegistry, SingleInstanceHolder,
//! };
//! use std::sync::Arc;
//!
//! // A singleton constructed on first access
//! let config = DoubleChecked::new(|| Ok("postgres://localhost".to_string()));
//! let a = config.get_instance().unwrap();
//! let b = config.get_instance().unwrap();
//! assert!(Arc::ptr_eq(&a, &b));
//!
//! // A registry of prototypes, copied on every read
//! #[derive(Clone)]
//! struct Shape {
//!     kind: String,
//! }
//! prototype_via_clone!(Shape);
//!
//! let shapes = PrototypeRegistry::new();
//! shapes.register("1", Shape { kind: "circle".to_string() });
//! assert_eq!(shapes.get("1").unwrap().kind, "circle");
//! ```
//!
//! ## Strategies
//!
//! | Strategy | Type | Race-free | Lock on steady-state reads |
//! |---|---|---|---|
//! | Eager | [`Eager`] | yes | no |
//! | Naive lazy | [`NaiveLazy`] | **no** | no |
//! | Fully locked | [`Locked`] | yes | yes |
//! | Double-checked | [`DoubleChecked`] | yes | no |
//! | Holder | [`OnceHolder`], [`define_singleton!`] | yes | no |
//! | Enumerated | [`EnumeratedSingleton`], [`enum_singleton!`] | yes | no |
//!
//! All lazy holders reset to uninitialized after a failed construction, so the next
//! caller retries. [`Singleton`] selects among the production-grade strategies at runtime.
//!
//! ## Logging
//!
//! Construction, replacement and lookup misses are reported through `tracing`. The
//! prototype registry additionally supports a per-registry trace callback receiving
//! [`RegistryEvent`]s.

mod double_checked;
mod eager;
mod enumerated;
mod holder;
mod holder_error;
mod locked;
mod macros;
mod naive_lazy;
mod once_holder;
mod prototype;
mod registry;
mod registry_error;
mod registry_event;
mod singleton;
mod strategy;

pub use double_checked::DoubleChecked;
pub use eager::Eager;
pub use enumerated::EnumeratedSingleton;
pub use holder::{BoxError, HolderState, InitFn, SingleInstanceHolder};
pub use holder_error::{HolderError, UnknownVariant};
pub use locked::Locked;
pub use naive_lazy::NaiveLazy;
pub use once_holder::OnceHolder;
pub use prototype::{CloneError, Prototype};
pub use registry::{PrototypeRegistry, TraceCallback};
pub use registry_error::RegistryError;
pub use registry_event::RegistryEvent;
pub use singleton::Singleton;
pub use strategy::Strategy;
