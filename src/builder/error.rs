//! Build errors for markup and transition builders.

use thiserror::Error;

/// Errors that can occur when building machine markup and transitions.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("State name is empty")]
    EmptyStateName,

    #[error("Initial state '{0}' is not declared. Add it with .state(name)")]
    UnknownInitialState(String),

    #[error("Transition trigger not specified. Call .trigger(name)")]
    MissingTrigger,

    #[error("Transition source state not specified. Call .from(state)")]
    MissingFromState,

    #[error("Transition target state not specified. Call .to(state) or .internal()")]
    MissingToState,
}
