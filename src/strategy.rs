//! Names of the available initialization strategies.
//!
//! `Strategy` doubles as runtime configuration: it parses from and prints as a
//! kebab-case name, so a strategy can be chosen from a config value or a CLI flag by the
//! calling application.

use std::fmt;
use std::str::FromStr;

use crate::UnknownVariant;

/// How a singleton instance gets constructed and published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Constructed when the holder is created.
    Eager,
    /// Check-then-construct with no mutual exclusion. May construct more than once.
    NaiveLazy,
    /// Every access goes through a mutex.
    Locked,
    /// Lock-free read of the published instance, mutex only on the slow path.
    #[default]
    DoubleChecked,
    /// Delegated to a one-time initialization primitive.
    Holder,
    /// A single-variant enum; there is no runtime construction.
    Enumerated,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Eager,
        Strategy::NaiveLazy,
        Strategy::Locked,
        Strategy::DoubleChecked,
        Strategy::Holder,
        Strategy::Enumerated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Eager => "eager",
            Strategy::NaiveLazy => "naive-lazy",
            Strategy::Locked => "locked",
            Strategy::DoubleChecked => "double-checked",
            Strategy::Holder => "holder",
            Strategy::Enumerated => "enumerated",
        }
    }

    /// Whether [`crate::Singleton::with_strategy`] accepts this strategy.
    pub fn is_selectable(&self) -> bool {
        matches!(
            self,
            Strategy::Eager | Strategy::DoubleChecked | Strategy::Holder
        )
    }

    /// Whether concurrent first access can run the construction callback more than once.
    pub fn may_construct_twice(&self) -> bool {
        matches!(self, Strategy::NaiveLazy)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| UnknownVariant {
                type_name: "strategy",
                found: s.to_string(),
            })
    }
}
