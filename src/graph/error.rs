//! Problems found while reading machine markup.

use thiserror::Error;

/// A markup problem that was skipped while building a graph.
///
/// Issues never abort graph construction. They are returned next to the
/// best-effort graph so strict callers can treat them as build failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum MarkupIssue {
    #[error("Markup incomplete: {context}")]
    Incomplete { context: String },

    #[error("State name '{name}' contains the reserved separator '{separator}'")]
    ReservedSeparator { name: String, separator: String },

    #[error("State name '{0}' is reserved for a composite's anchor")]
    ReservedName(String),

    #[error("Qualified state name '{0}' is declared more than once")]
    DuplicateState(String),

    #[error("Transition '{trigger}' has no source state")]
    MissingSource { trigger: String },

    #[error("Transition '{trigger}' references unknown state '{state}'")]
    UnknownState { trigger: String, state: String },

    #[error("Initial state '{initial}' is not a child of '{state}'")]
    UnknownInitial { state: String, initial: String },
}
