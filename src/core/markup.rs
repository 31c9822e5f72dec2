//! Declarative machine markup.
//!
//! Markup is the read-only description of a machine that the graph layer
//! consumes: states (possibly nested), transitions scoped to the state that
//! declares them, and the flags that control generated transitions. It is
//! usually produced by the state machine engine, but it can also be loaded
//! from JSON or assembled with [`MarkupBuilder`](crate::builder::MarkupBuilder).

use crate::machine::DiagramError;
use serde::{Deserialize, Deserializer, Serialize};

/// Default sub-state(s) entered when a composite state is entered.
///
/// A list of names declares a parallel state whose children are all
/// entered at once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialState {
    Single(String),
    Parallel(Vec<String>),
}

impl InitialState {
    /// Whether this declaration enters several orthogonal regions.
    pub fn is_parallel(&self) -> bool {
        matches!(self, Self::Parallel(_))
    }

    /// The single default child, if this is not a parallel declaration.
    pub fn single(&self) -> Option<&str> {
        match self {
            Self::Single(name) => Some(name),
            Self::Parallel(_) => None,
        }
    }
}

impl From<&str> for InitialState {
    fn from(name: &str) -> Self {
        Self::Single(name.to_string())
    }
}

impl From<String> for InitialState {
    fn from(name: String) -> Self {
        Self::Single(name)
    }
}

impl From<Vec<&str>> for InitialState {
    fn from(names: Vec<&str>) -> Self {
        Self::Parallel(names.into_iter().map(str::to_string).collect())
    }
}

/// A single state and, recursively, its children.
///
/// Names are relative to the enclosing scope. Transitions declared on a
/// state are scoped to it as well, so `source: "a"` inside state `C`
/// refers to `C_a` once qualified.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StateRepr")]
pub struct StateMarkup {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_enter: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_exit: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_timeout: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StateMarkup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<TransitionMarkup>,
}

impl StateMarkup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_on_enter<I, S>(mut self, callbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on_enter = callbacks.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_on_exit<I, S>(mut self, callbacks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.on_exit = callbacks.into_iter().map(Into::into).collect();
        self
    }

    /// Set a timeout in seconds and the callbacks fired when it elapses.
    pub fn with_timeout<I, S>(mut self, seconds: f64, on_timeout: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.timeout = Some(seconds);
        self.on_timeout = on_timeout.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_initial(mut self, initial: impl Into<InitialState>) -> Self {
        self.initial = Some(initial.into());
        self
    }

    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<StateMarkup>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transitions(mut self, transitions: Vec<TransitionMarkup>) -> Self {
        self.transitions = transitions;
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// A state is parallel when its initial declaration lists several regions.
    pub fn is_parallel(&self) -> bool {
        self.initial.as_ref().is_some_and(InitialState::is_parallel)
    }
}

impl From<&str> for StateMarkup {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for StateMarkup {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// A transition as authored.
///
/// `dest: None` declares an internal transition. The special source `"*"`
/// stands for every state of the declaring scope and the special
/// destination `"="` for the source itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransitionRepr")]
pub struct TransitionMarkup {
    pub trigger: String,
    pub source: Vec<String>,
    pub dest: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl TransitionMarkup {
    pub const WILDCARD_ALL: &'static str = "*";
    pub const WILDCARD_SAME: &'static str = "=";

    pub fn new(
        trigger: impl Into<String>,
        source: impl Into<String>,
        dest: impl Into<String>,
    ) -> Self {
        Self {
            trigger: trigger.into(),
            source: vec![source.into()],
            dest: Some(dest.into()),
            ..Self::default()
        }
    }

    /// A transition that fires callbacks without leaving `source`.
    pub fn internal(trigger: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
            source: vec![source.into()],
            dest: None,
            ..Self::default()
        }
    }

    /// Add another source state; the transition is declared once per source.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source.push(source.into());
        self
    }

    pub fn with_conditions<I, S>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions = conditions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_unless<I, S>(mut self, unless: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unless = unless.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn is_internal(&self) -> bool {
        self.dest.is_none()
    }
}

fn default_auto_transitions() -> bool {
    true
}

/// The root scope of a machine.
///
/// # Example
///
/// ```rust
/// use stategraph::core::MachineMarkup;
///
/// let markup = MachineMarkup::from_json(r#"{
///     "states": ["A", "B", {"name": "C", "children": ["1", "2"], "initial": "1"}],
///     "transitions": [
///         ["walk", "A", "B"],
///         {"trigger": "run", "source": "B", "dest": "C", "conditions": "is_fast"}
///     ],
///     "auto_transitions": false
/// }"#).unwrap();
///
/// assert_eq!(markup.states.len(), 3);
/// assert!(markup.has_nested_states());
/// assert_eq!(markup.transitions[1].conditions, vec!["is_fast"]);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineMarkup {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub states: Vec<StateMarkup>,
    #[serde(default)]
    pub transitions: Vec<TransitionMarkup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<InitialState>,
    /// Generate a `to_<state>` transition from every state to every state.
    #[serde(default = "default_auto_transitions")]
    pub auto_transitions: bool,
}

impl Default for MachineMarkup {
    fn default() -> Self {
        Self {
            name: String::new(),
            states: Vec::new(),
            transitions: Vec::new(),
            initial: None,
            auto_transitions: true,
        }
    }
}

impl MachineMarkup {
    pub fn from_json(json: &str) -> Result<Self, DiagramError> {
        serde_json::from_str(json).map_err(|err| DiagramError::InvalidMarkup(err.to_string()))
    }

    pub fn to_json(&self) -> Result<String, DiagramError> {
        serde_json::to_string_pretty(self).map_err(|err| DiagramError::InvalidMarkup(err.to_string()))
    }

    pub fn add_state(&mut self, state: impl Into<StateMarkup>) {
        self.states.push(state.into());
    }

    pub fn add_transition(&mut self, transition: TransitionMarkup) {
        self.transitions.push(transition);
    }

    pub fn has_nested_states(&self) -> bool {
        self.states.iter().any(StateMarkup::has_children)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(item) => vec![item],
            Self::Many(items) => items,
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    OneOrMany::deserialize(deserializer).map(OneOrMany::into_vec)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StateRepr {
    Name(String),
    Full(StateFields),
}

#[derive(Deserialize)]
struct StateFields {
    name: String,
    #[serde(default)]
    label: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    tags: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    on_enter: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    on_exit: Vec<String>,
    #[serde(default)]
    timeout: Option<f64>,
    #[serde(default, deserialize_with = "one_or_many")]
    on_timeout: Vec<String>,
    #[serde(default)]
    initial: Option<InitialState>,
    #[serde(default, alias = "states")]
    children: Vec<StateMarkup>,
    #[serde(default)]
    transitions: Vec<TransitionMarkup>,
}

impl From<StateRepr> for StateMarkup {
    fn from(repr: StateRepr) -> Self {
        match repr {
            StateRepr::Name(name) => Self::new(name),
            StateRepr::Full(fields) => Self {
                name: fields.name,
                label: fields.label,
                tags: fields.tags,
                on_enter: fields.on_enter,
                on_exit: fields.on_exit,
                timeout: fields.timeout,
                on_timeout: fields.on_timeout,
                initial: fields.initial,
                children: fields.children,
                transitions: fields.transitions,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TransitionRepr {
    Triple(String, OneOrMany, Option<String>),
    Full(TransitionFields),
}

#[derive(Deserialize)]
struct TransitionFields {
    #[serde(default)]
    trigger: String,
    #[serde(default, deserialize_with = "one_or_many")]
    source: Vec<String>,
    #[serde(default)]
    dest: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    conditions: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    unless: Vec<String>,
    #[serde(default)]
    label: Option<String>,
}

impl From<TransitionRepr> for TransitionMarkup {
    fn from(repr: TransitionRepr) -> Self {
        match repr {
            TransitionRepr::Triple(trigger, source, dest) => Self {
                trigger,
                source: source.into_vec(),
                dest,
                ..Self::default()
            },
            TransitionRepr::Full(fields) => Self {
                trigger: fields.trigger,
                source: fields.source,
                dest: fields.dest,
                conditions: fields.conditions,
                unless: fields.unless,
                label: fields.label,
            },
        }
    }
}
