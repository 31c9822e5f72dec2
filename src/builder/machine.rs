//! Builder for constructing machine markup.

use crate::builder::error::BuildError;
use crate::builder::transition::TransitionBuilder;
use crate::core::{InitialState, MachineMarkup, StateMarkup, TransitionMarkup};

/// Builder for constructing machine markup with a fluent API.
///
/// # Example
///
/// ```
/// use stategraph::builder::{MarkupBuilder, TransitionBuilder};
///
/// let markup = MarkupBuilder::new()
///     .states(["A", "B"])
///     .initial("A")
///     .transition(TransitionBuilder::new().trigger("walk").from("A").to("B"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// assert_eq!(markup.states.len(), 2);
/// assert_eq!(markup.transitions[0].trigger, "walk");
/// ```
pub struct MarkupBuilder {
    name: String,
    states: Vec<StateMarkup>,
    transitions: Vec<TransitionMarkup>,
    initial: Option<InitialState>,
    auto_transitions: bool,
}

impl MarkupBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
            auto_transitions: true,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a top-level state.
    pub fn state(mut self, state: impl Into<StateMarkup>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Add several top-level states at once.
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateMarkup>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Set the initial state (optional).
    pub fn initial(mut self, initial: impl Into<InitialState>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    /// Add a transition using a builder.
    /// Returns an error if the builder fails validation.
    pub fn transition(mut self, builder: TransitionBuilder) -> Result<Self, BuildError> {
        let transition = builder.build()?;
        self.transitions.push(transition);
        Ok(self)
    }

    /// Add a pre-built transition.
    pub fn add_transition(mut self, transition: TransitionMarkup) -> Self {
        self.transitions.push(transition);
        self
    }

    /// Add multiple transitions at once.
    pub fn transitions(mut self, transitions: Vec<TransitionMarkup>) -> Self {
        self.transitions.extend(transitions);
        self
    }

    /// Generate `to_<state>` transitions (on by default).
    pub fn auto_transitions(mut self, enabled: bool) -> Self {
        self.auto_transitions = enabled;
        self
    }

    /// Build the markup.
    /// Returns an error for empty state names or an undeclared initial state.
    pub fn build(self) -> Result<MachineMarkup, BuildError> {
        if self.states.iter().any(|state| state.name.is_empty()) {
            return Err(BuildError::EmptyStateName);
        }

        if let Some(initial) = &self.initial {
            let names: Vec<&str> = match initial {
                InitialState::Single(name) => vec![name.as_str()],
                InitialState::Parallel(names) => names.iter().map(String::as_str).collect(),
            };
            if let Some(missing) = names
                .into_iter()
                .find(|name| !self.states.iter().any(|state| state.name == *name))
            {
                return Err(BuildError::UnknownInitialState(missing.to_string()));
            }
        }

        Ok(MachineMarkup {
            name: self.name,
            states: self.states,
            transitions: self.transitions,
            initial: self.initial,
            auto_transitions: self.auto_transitions,
        })
    }
}

impl Default for MarkupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
