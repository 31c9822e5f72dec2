//! Builder API for ergonomic markup construction.
//!
//! This module provides fluent builders and macros for describing state
//! machines without writing markup structs or JSON by hand.

pub mod error;
pub mod machine;
pub mod macros;
pub mod transition;

pub use error::BuildError;
pub use machine::MarkupBuilder;
pub use transition::TransitionBuilder;

use crate::core::TransitionMarkup;

/// Create a simple unconditional transition.
///
/// # Example
///
/// ```
/// use stategraph::builder::simple_transition;
///
/// let transition = simple_transition("walk", "A", "B");
/// assert_eq!(transition.dest.as_deref(), Some("B"));
/// ```
pub fn simple_transition(
    trigger: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
) -> TransitionMarkup {
    TransitionMarkup::new(trigger, from, to)
}

/// Create a transition guarded by named conditions.
///
/// # Example
///
/// ```
/// use stategraph::builder::guarded_transition;
///
/// let transition = guarded_transition("sprint", "C", "D", ["is_fast"]);
/// assert_eq!(transition.conditions, vec!["is_fast"]);
/// ```
pub fn guarded_transition<I, S>(
    trigger: impl Into<String>,
    from: impl Into<String>,
    to: impl Into<String>,
    conditions: I,
) -> TransitionMarkup
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    TransitionMarkup::new(trigger, from, to).with_conditions(conditions)
}
