use std::fmt;
use std::sync::Arc;

use crate::holder::BoxError;
use crate::{
    DoubleChecked, Eager, HolderError, HolderState, OnceHolder, SingleInstanceHolder, Strategy,
};

/// A singleton whose strategy is picked at runtime.
///
/// Only the production-grade strategies are selectable: [`Strategy::Eager`],
/// [`Strategy::DoubleChecked`] and [`Strategy::Holder`]. The naive and fully locked
/// holders are available as their own types; enumerated singletons exist only at
/// compile time.
///
/// # Examples
///
/// ```rust
/// use singleton_prototype::{Singleton, SingleInstanceHolder, Strategy};
/// use std::sync::Arc;
///
/// let config = Singleton::with_strategy(Strategy::Holder, || Ok(String::from("prod"))).unwrap();
///
/// let a = config.get_instance().unwrap();
/// let b = config.get_instance().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct Singleton<T> {
    inner: Box<dyn SingleInstanceHolder<T> + Send + Sync>,
}

impl<T: Send + Sync + 'static> Singleton<T> {
    /// Lazy singleton using the default strategy.
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(DoubleChecked::new(init)),
        }
    }

    /// # Errors
    ///
    /// - [`HolderError::UnsupportedStrategy`] for naive, locked and enumerated strategies
    /// - [`HolderError::ConstructionFailed`] if the strategy is eager and `init` fails
    pub fn with_strategy<F>(strategy: Strategy, init: F) -> Result<Self, HolderError>
    where
        F: Fn() -> Result<T, BoxError> + Send + Sync + 'static,
    {
        let inner: Box<dyn SingleInstanceHolder<T> + Send + Sync> = match strategy {
            Strategy::Eager => Box::new(Eager::try_new(init)?),
            Strategy::DoubleChecked => Box::new(DoubleChecked::new(init)),
            Strategy::Holder => Box::new(OnceHolder::new(init)),
            Strategy::NaiveLazy | Strategy::Locked | Strategy::Enumerated => {
                return Err(HolderError::UnsupportedStrategy(strategy))
            }
        };
        Ok(Self { inner })
    }
}

impl<T> SingleInstanceHolder<T> for Singleton<T> {
    fn get_instance(&self) -> Result<Arc<T>, HolderError> {
        self.inner.get_instance()
    }

    fn state(&self) -> HolderState {
        self.inner.state()
    }

    fn strategy(&self) -> Strategy {
        self.inner.strategy()
    }
}

impl<T> fmt::Debug for Singleton<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Singleton")
            .field("strategy", &self.inner.strategy())
            .field("state", &self.inner.state())
            .finish()
    }
}
