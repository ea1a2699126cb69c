//! Closed sets of selectable strategies, shared by the crates that implement
//! them and by configuration loading.
//!
//! Names are resolved once, at setup.  An unrecognized name is the only fatal
//! condition in the simulator and surfaces as [`WhError::UnknownStrategy`]
//! from `FromStr` (or from serde when the config is loaded from a file).

use std::fmt;
use std::str::FromStr;

use crate::WhError;

/// Generate a strategy-kind enum with its canonical name, accepted aliases,
/// `Display`, and a fail-fast `FromStr`.  Aliases are accepted by serde too,
/// though only `FromStr` trims and folds case.
macro_rules! strategy_kind {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident as $label:literal {
            $( $(#[$vattr:meta])* $variant:ident => $canon:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
        $vis enum $name {
            $(
                $(#[$vattr])*
                $(#[cfg_attr(feature = "serde", serde(alias = $alias))])*
                $variant
            ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical name, as accepted by `FromStr` and written by serde.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $canon ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = WhError;

            fn from_str(s: &str) -> Result<Self, WhError> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $( $canon $(| $alias)* => Ok($name::$variant), )+
                    _ => Err(WhError::UnknownStrategy { kind: $label, name: s.to_owned() }),
                }
            }
        }
    };
}

strategy_kind! {
    /// How the task manager picks a destination cell.
    pub enum GoalStrategyKind as "goal strategy" {
        /// First free, unclaimed, non-start cell out of uniform samples.
        #[default]
        Random => "random",
        /// Like `Random`, but far from every claimed goal.
        Spread => "spread",
        /// Prefer cells surrounded by many obstacles (picking faces).
        HighDensity => "high_density" | "high-density",
    }
}

strategy_kind! {
    /// What a blocked agent does.
    pub enum ConflictStrategyKind as "conflict strategy" {
        /// Wait up to `max_retries` ticks, then replan and cool down.
        #[default]
        WaitThenReplan => "wait_then_replan" | "wait-then-replan",
        AlwaysWait => "always_wait" | "wait",
        AlwaysReplan => "always_replan" | "replan",
        IdleOnBlock => "idle_on_block" | "idle",
    }
}

strategy_kind! {
    /// Which world-stepping protocol advances a tick.
    pub enum SteppingKind as "stepping protocol" {
        /// Agents move one after another against incrementally committed state.
        #[default]
        Sequential => "sequential" | "default",
        /// Intent, resolve, commit, update.
        TwoPhase => "two_phase" | "two-phase",
    }
}
