//! Builder for constructing transition markup.

use crate::builder::error::BuildError;
use crate::core::TransitionMarkup;

/// Builder for constructing transitions with a fluent API.
#[derive(Clone, Debug, Default)]
pub struct TransitionBuilder {
    trigger: Option<String>,
    sources: Vec<String>,
    dest: Option<String>,
    internal: bool,
    conditions: Vec<String>,
    unless: Vec<String>,
    label: Option<String>,
}

impl TransitionBuilder {
    /// Create a new transition builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trigger name (required).
    pub fn trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Add a source state (at least one required). `"*"` means every state.
    pub fn from(mut self, state: impl Into<String>) -> Self {
        self.sources.push(state.into());
        self
    }

    /// Set the target state. `"="` loops back to each source.
    pub fn to(mut self, state: impl Into<String>) -> Self {
        self.dest = Some(state.into());
        self.internal = false;
        self
    }

    /// Mark the transition as internal: it has no target state.
    pub fn internal(mut self) -> Self {
        self.dest = None;
        self.internal = true;
        self
    }

    /// Add a condition that must hold.
    pub fn when(mut self, condition: impl Into<String>) -> Self {
        self.conditions.push(condition.into());
        self
    }

    /// Add a condition that must not hold.
    pub fn unless(mut self, condition: impl Into<String>) -> Self {
        self.unless.push(condition.into());
        self
    }

    /// Show `label` instead of the trigger name.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build the transition.
    pub fn build(self) -> Result<TransitionMarkup, BuildError> {
        let trigger = self
            .trigger
            .filter(|trigger| !trigger.is_empty())
            .ok_or(BuildError::MissingTrigger)?;
        if self.sources.is_empty() {
            return Err(BuildError::MissingFromState);
        }
        if self.dest.is_none() && !self.internal {
            return Err(BuildError::MissingToState);
        }

        Ok(TransitionMarkup {
            trigger,
            source: self.sources,
            dest: self.dest,
            conditions: self.conditions,
            unless: self.unless,
            label: self.label,
        })
    }
}
