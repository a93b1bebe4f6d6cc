//! Macros for declaring process-wide singletons and prototype registries.
//!
//! Each macro generates a module holding a hidden static plus ergonomic free functions,
//! so several isolated singletons or registries can coexist without any shared state.

/// Declares a lazily constructed process-wide singleton using the holder idiom.
///
/// The instance lives in a one-time-initialized static nested inside the generated
/// module. It is built on the first call to `get_instance()`, concurrent first callers
/// block until it is ready, and every caller gets the same `&'static` reference. The
/// initializer is infallible; a panic inside it poisons nothing but propagates to the
/// triggering caller and the next caller retries.
///
/// # Examples
///
/// ```rust
/// use singleton_prototype::define_singleton;
///
/// pub struct Settings {
///     pub retries: u32,
/// }
///
/// define_singleton!(settings: Settings = Settings { retries: 3 });
///
/// fn main() {
///     assert!(!settings::is_initialized());
///     assert_eq!(settings::get_instance().retries, 3);
///     assert!(std::ptr::eq(settings::get_instance(), settings::get_instance()));
/// }
/// ```
#[macro_export]
macro_rules! define_singleton {
    ($(#[$meta:meta])* $vis:vis $name:ident : $ty:ty = $init:expr) => {
        $(#[$meta])*
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            // Holder for the instance (module-private)
            static HOLDER: ::std::sync::OnceLock<$ty> = ::std::sync::OnceLock::new();

            /// Returns the process-wide instance, constructing it on first call.
            pub fn get_instance() -> &'static $ty {
                HOLDER.get_or_init(|| $init)
            }

            /// Whether the instance has been constructed yet.
            pub fn is_initialized() -> bool {
                HOLDER.get().is_some()
            }

            pub fn strategy() -> $crate::Strategy {
                $crate::Strategy::Holder
            }
        }
    };
}

/// Declares a closed-set singleton: a single-variant enum implementing
/// [`EnumeratedSingleton`](crate::EnumeratedSingleton).
///
/// The variant is called `Instance`, prints as `Instance`, and parses back into the
/// same variant.
///
/// # Examples
///
/// ```rust
/// use singleton_prototype::{enum_singleton, EnumeratedSingleton};
///
/// enum_singleton! {
///     /// Process-wide id generator.
///     pub enum IdGenerator
/// }
///
/// impl IdGenerator {
///     pub fn prefix(&self) -> &'static str {
///         "id"
///     }
/// }
///
/// assert_eq!(IdGenerator::get_instance().prefix(), "id");
/// assert_eq!("Instance".parse::<IdGenerator>().unwrap(), IdGenerator::Instance);
/// ```
#[macro_export]
macro_rules! enum_singleton {
    ($(#[$meta:meta])* $vis:vis enum $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            Instance,
        }

        impl $crate::EnumeratedSingleton for $name {
            fn get_instance() -> &'static Self {
                static INSTANCE: $name = $name::Instance;
                &INSTANCE
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str("Instance")
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::UnknownVariant;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    "Instance" => Ok($name::Instance),
                    other => Err($crate::UnknownVariant {
                        type_name: ::std::any::type_name::<$name>(),
                        found: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// Implements [`Prototype`](crate::Prototype) through `Clone` for one or more types.
///
/// `Clone` on a struct copies every top-level field and clones `Arc` handles by
/// reference, which is exactly the shallow copy contract.
#[macro_export]
macro_rules! prototype_via_clone {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Prototype for $ty {
                fn try_clone(&self) -> ::std::result::Result<Self, $crate::CloneError> {
                    Ok(::std::clone::Clone::clone(self))
                }
            }
        )+
    };
}

/// Creates a process-wide prototype registry with a single macro invocation.
///
/// The macro generates a module containing:
/// - Storage static (hidden)
/// - Free functions delegating to the [`PrototypeRegistry`](crate::PrototypeRegistry)
///
/// # Examples
///
/// ```rust
/// use singleton_prototype::{define_prototype_registry, prototype_via_clone};
///
/// #[derive(Clone)]
/// pub struct Template {
///     pub body: String,
/// }
/// prototype_via_clone!(Template);
///
/// define_prototype_registry!(templates: Template);
///
/// fn main() {
///     templates::register("welcome", Template { body: "Hi!".to_string() });
///     let copy = templates::get("welcome").unwrap();
///     assert_eq!(copy.body, "Hi!");
///     assert!(templates::get("farewell").is_err());
/// }
/// ```
///
/// # Multiple Registries
///
/// Each invocation is completely isolated, even for the same prototype type.
#[macro_export]
macro_rules! define_prototype_registry {
    ($(#[$meta:meta])* $vis:vis $name:ident : $ty:ty) => {
        $(#[$meta])*
        $vis mod $name {
            #[allow(unused_imports)]
            use super::*;

            // Storage for registered prototypes (module-private)
            static REGISTRY: ::std::sync::LazyLock<$crate::PrototypeRegistry<$ty>> =
                ::std::sync::LazyLock::new(|| $crate::PrototypeRegistry::new());

            /// The underlying registry, for trait-free access to every operation.
            pub fn registry() -> &'static $crate::PrototypeRegistry<$ty> {
                &REGISTRY
            }

            /// Register a prototype, replacing any previous one under the same id.
            pub fn register(id: impl Into<String>, prototype: $ty) {
                REGISTRY.register(id, prototype)
            }

            /// Retrieve an independent copy of a registered prototype.
            pub fn get(id: &str) -> ::std::result::Result<$ty, $crate::RegistryError> {
                REGISTRY.get(id)
            }

            /// Check if a prototype is registered under `id`.
            pub fn contains(id: &str) -> ::std::result::Result<bool, $crate::RegistryError> {
                REGISTRY.contains(id)
            }

            /// Registered ids in sorted order.
            pub fn ids() -> Vec<String> {
                REGISTRY.ids()
            }

            /// Set a tracing callback for registry operations.
            pub fn set_trace_callback(callback: impl Fn(&$crate::RegistryEvent) + Send + Sync + 'static) {
                REGISTRY.set_trace_callback(callback)
            }

            /// Clear the tracing callback.
            pub fn clear_trace_callback() {
                REGISTRY.clear_trace_callback()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    pub struct Banner {
        text: String,
    }

    crate::prototype_via_clone!(Banner);

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    fn build_banner() -> Banner {
        BUILDS.fetch_add(1, Ordering::SeqCst);
        Banner {
            text: "welcome".to_string(),
        }
    }

    define_singleton!(banner: Banner = build_banner());

    #[test]
    fn test_define_singleton_macro() {
        let a = banner::get_instance();
        let b = banner::get_instance();

        assert!(std::ptr::eq(a, b));
        assert!(banner::is_initialized());
        assert_eq!(a.text, "welcome");
        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert_eq!(banner::strategy(), crate::Strategy::Holder);
    }

    define_prototype_registry!(reg_a: Banner);
    define_prototype_registry!(reg_b: Banner);

    #[test]
    fn test_multiple_registries() {
        reg_a::register("x", Banner { text: "a".into() });
        reg_b::register("x", Banner { text: "b".into() });

        assert_eq!(reg_a::get("x").unwrap().text, "a");
        assert_eq!(reg_b::get("x").unwrap().text, "b");
        assert!(!reg_b::contains("only-a").unwrap());
    }

    define_prototype_registry!(traced: Banner);

    #[test]
    fn test_tracing() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let events_clone = events.clone();

        traced::set_trace_callback(move |event| {
            events_clone.lock().unwrap().push(format!("{}", event));
        });

        traced::register("t", Banner { text: "t".into() });
        let _ = traced::get("t");
        let _ = traced::contains("t");
        traced::clear_trace_callback();

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.len(), 3);
        assert!(recorded[0].contains("register"));
        assert!(recorded[1].contains("get"));
        assert!(recorded[2].contains("contains"));
        assert_eq!(traced::ids(), vec!["t".to_string()]);
    }
}
