//! Breadth-first flattening of nested state scopes.
//!
//! Every scope (the machine root or a composite state) is visited once with
//! the path of names leading to it. Transitions declared in a scope are
//! qualified with that path, and states are registered exactly once, when
//! their parent scope is visited.

use crate::core::{
    MachineMarkup, StateDescriptor, StateMarkup, TransitionDescriptor, TransitionMarkup,
};
use crate::graph::error::MarkupIssue;
use indexmap::IndexSet;
use std::collections::VecDeque;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Suffix of the synthetic node a composite's default-entry edge starts from.
pub const ANCHOR_SUFFIX: &str = "_anchor";

/// Flat view of a machine: qualified states and transitions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatMachine {
    pub states: Vec<StateDescriptor>,
    pub transitions: Vec<TransitionDescriptor>,
    pub issues: Vec<MarkupIssue>,
}

impl FlatMachine {
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn state(&self, qualified_name: &str) -> Option<&StateDescriptor> {
        self.states
            .iter()
            .find(|state| state.qualified_name == qualified_name)
    }

    /// Every collected issue as an accumulated validation result.
    pub fn validation(&self) -> Validation<(), NonEmptyVec<MarkupIssue>> {
        let checks: Vec<Validation<(), NonEmptyVec<MarkupIssue>>> = self
            .issues
            .iter()
            .map(|issue| Validation::fail(issue.clone()))
            .collect();

        Validation::all_vec(checks).map(|_| ())
    }
}

#[derive(Clone, Copy)]
struct Scope<'a> {
    states: &'a [StateMarkup],
    transitions: &'a [TransitionMarkup],
}

impl<'a> From<&'a MachineMarkup> for Scope<'a> {
    fn from(markup: &'a MachineMarkup) -> Self {
        Self {
            states: &markup.states,
            transitions: &markup.transitions,
        }
    }
}

impl<'a> From<&'a StateMarkup> for Scope<'a> {
    fn from(state: &'a StateMarkup) -> Self {
        Self {
            states: &state.children,
            transitions: &state.transitions,
        }
    }
}

/// Turns nested markup into qualified, flat descriptors.
#[derive(Clone, Copy, Debug)]
pub struct Flattener<'a> {
    separator: &'a str,
}

impl<'a> Flattener<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self { separator }
    }

    /// Join a scope path and a relative name into a qualified name.
    pub fn qualify(&self, prefix: &[String], name: &str) -> String {
        if prefix.is_empty() {
            return name.to_string();
        }
        let mut qualified = prefix.join(self.separator);
        qualified.push_str(self.separator);
        qualified.push_str(name);
        qualified
    }

    fn is_valid_name(&self, name: &str) -> bool {
        !name.is_empty() && (self.separator.is_empty() || !name.contains(self.separator))
    }

    pub fn flatten(&self, markup: &MachineMarkup) -> FlatMachine {
        let mut flat = FlatMachine::default();
        let mut registered: IndexSet<String> = IndexSet::new();
        let mut declared: Vec<TransitionDescriptor> = Vec::new();
        let reserved = self.anchor_names(&markup.states);

        let mut queue: VecDeque<(Vec<String>, Scope<'_>)> = VecDeque::new();
        queue.push_back((Vec::new(), Scope::from(markup)));

        while let Some((prefix, scope)) = queue.pop_front() {
            for transition in scope.transitions {
                let sources = self.sources(&prefix, scope, transition, &reserved);
                self.expand_transition(&prefix, transition, sources, &mut declared, &mut flat.issues);
            }

            for state in scope.states {
                if state.name.is_empty() {
                    flat.issues.push(MarkupIssue::Incomplete {
                        context: format!(
                            "state without a name in scope '{}'",
                            prefix.join(self.separator)
                        ),
                    });
                    continue;
                }
                if !self.is_valid_name(&state.name) {
                    flat.issues.push(MarkupIssue::ReservedSeparator {
                        name: state.name.clone(),
                        separator: self.separator.to_string(),
                    });
                    continue;
                }

                let qualified = self.qualify(&prefix, &state.name);
                if reserved.contains(&qualified) {
                    flat.issues.push(MarkupIssue::ReservedName(qualified));
                    continue;
                }
                if !registered.insert(qualified.clone()) {
                    flat.issues.push(MarkupIssue::DuplicateState(qualified));
                    continue;
                }

                let mut path = prefix.clone();
                path.push(state.name.clone());

                if let Some(anchor) =
                    self.anchor_for(&qualified, &path, state, &reserved, &mut flat.issues)
                {
                    declared.push(anchor);
                }
                flat.states
                    .push(self.describe(&prefix, &path, qualified, state, &reserved));

                if state.has_children() {
                    queue.push_back((path, Scope::from(state)));
                }
            }
        }

        declared.retain(|transition| {
            if transition.is_anchor {
                return true;
            }
            let unknown = std::iter::once(transition.source.as_str())
                .chain(transition.dest.as_deref())
                .find(|name| !registered.contains(*name));
            match unknown {
                Some(name) => {
                    flat.issues.push(MarkupIssue::UnknownState {
                        trigger: transition.trigger.clone(),
                        state: name.to_string(),
                    });
                    false
                }
                None => true,
            }
        });

        if markup.auto_transitions {
            flat.transitions = auto_transitions(&registered);
        }
        flat.transitions.extend(declared);

        if !flat.issues.is_empty() {
            for issue in &flat.issues {
                tracing::debug!(issue = %issue, "Skipped markup element");
            }
            tracing::error!(
                issues = flat.issues.len(),
                "Graph creation incomplete"
            );
        }

        flat
    }

    fn describe(
        &self,
        prefix: &[String],
        path: &[String],
        qualified_name: String,
        state: &StateMarkup,
        reserved: &IndexSet<String>,
    ) -> StateDescriptor {
        let children: IndexSet<String> = state
            .children
            .iter()
            .filter(|child| self.is_valid_name(&child.name))
            .map(|child| self.qualify(path, &child.name))
            .filter(|child| !reserved.contains(child))
            .collect();

        let initial = state
            .initial
            .as_ref()
            .and_then(|initial| initial.single())
            .map(|initial| self.qualify(path, initial))
            .filter(|initial| children.contains(initial));

        StateDescriptor {
            qualified_name,
            name: state.name.clone(),
            label: state.label.clone(),
            tags: state.tags.clone(),
            on_enter: state.on_enter.clone(),
            on_exit: state.on_exit.clone(),
            timeout: state.timeout,
            on_timeout: state.on_timeout.clone(),
            is_parallel: state.is_parallel(),
            parent: (!prefix.is_empty()).then(|| prefix.join(self.separator)),
            children: children.into_iter().collect(),
            initial,
        }
    }

    fn anchor_for(
        &self,
        qualified: &str,
        path: &[String],
        state: &StateMarkup,
        reserved: &IndexSet<String>,
        issues: &mut Vec<MarkupIssue>,
    ) -> Option<TransitionDescriptor> {
        let initial = state.initial.as_ref()?.single()?;
        if !state.has_children() {
            return None;
        }
        if !state.children.iter().any(|child| child.name == initial) {
            issues.push(MarkupIssue::UnknownInitial {
                state: qualified.to_string(),
                initial: initial.to_string(),
            });
            return None;
        }

        // A default child that collides with an anchor is reported on its own.
        let target = self.qualify(path, initial);
        if reserved.contains(&target) {
            return None;
        }
        Some(TransitionDescriptor::anchor(
            format!("{qualified}{ANCHOR_SUFFIX}"),
            target,
        ))
    }

    /// Anchor node names of every composite with a single default child.
    ///
    /// These names are reserved: no declared state may take one of them.
    fn anchor_names(&self, states: &[StateMarkup]) -> IndexSet<String> {
        let mut names = IndexSet::new();
        let mut queue: VecDeque<(Vec<String>, &[StateMarkup])> = VecDeque::new();
        queue.push_back((Vec::new(), states));

        while let Some((path, states)) = queue.pop_front() {
            for state in states.iter().filter(|s| self.is_valid_name(&s.name)) {
                if !state.has_children() {
                    continue;
                }
                let qualified = self.qualify(&path, &state.name);
                if state.initial.as_ref().and_then(|i| i.single()).is_some() {
                    names.insert(format!("{qualified}{ANCHOR_SUFFIX}"));
                }
                let mut child_path = path.clone();
                child_path.push(state.name.clone());
                queue.push_back((child_path, state.children.as_slice()));
            }
        }
        names
    }

    /// Qualified sources of a transition, with `*` expanded.
    fn sources(
        &self,
        prefix: &[String],
        scope: Scope<'_>,
        transition: &TransitionMarkup,
        reserved: &IndexSet<String>,
    ) -> IndexSet<String> {
        let mut sources: IndexSet<String> = IndexSet::new();
        for source in &transition.source {
            if source == TransitionMarkup::WILDCARD_ALL {
                sources.extend(
                    self.descendants(prefix, scope.states)
                        .into_iter()
                        .filter(|name| !reserved.contains(name)),
                );
            } else {
                sources.insert(self.qualify(prefix, source));
            }
        }
        sources
    }

    fn expand_transition(
        &self,
        prefix: &[String],
        transition: &TransitionMarkup,
        sources: IndexSet<String>,
        out: &mut Vec<TransitionDescriptor>,
        issues: &mut Vec<MarkupIssue>,
    ) {
        if transition.trigger.is_empty() {
            issues.push(MarkupIssue::Incomplete {
                context: format!(
                    "transition without a trigger in scope '{}'",
                    prefix.join(self.separator)
                ),
            });
            return;
        }
        if transition.source.is_empty() || transition.source.iter().any(String::is_empty) {
            issues.push(MarkupIssue::MissingSource {
                trigger: transition.trigger.clone(),
            });
            return;
        }

        for source in sources {
            let dest = match transition.dest.as_deref() {
                None => None,
                Some(TransitionMarkup::WILDCARD_SAME) => Some(source.clone()),
                Some(dest) => Some(self.qualify(prefix, dest)),
            };
            out.push(TransitionDescriptor {
                trigger: transition.trigger.clone(),
                source,
                dest,
                conditions: transition.conditions.clone(),
                unless: transition.unless.clone(),
                label: transition.label.clone(),
                is_auto: false,
                is_anchor: false,
            });
        }
    }

    /// Qualified names of every state below a scope, breadth first.
    fn descendants(&self, prefix: &[String], states: &[StateMarkup]) -> IndexSet<String> {
        let mut names = IndexSet::new();
        let mut queue: VecDeque<(Vec<String>, &[StateMarkup])> = VecDeque::new();
        queue.push_back((prefix.to_vec(), states));

        while let Some((path, states)) = queue.pop_front() {
            for state in states.iter().filter(|s| self.is_valid_name(&s.name)) {
                names.insert(self.qualify(&path, &state.name));
                if state.has_children() {
                    let mut child_path = path.clone();
                    child_path.push(state.name.clone());
                    queue.push_back((child_path, state.children.as_slice()));
                }
            }
        }
        names
    }
}

fn auto_transitions(states: &IndexSet<String>) -> Vec<TransitionDescriptor> {
    states
        .iter()
        .flat_map(|dest| {
            states.iter().map(move |source| TransitionDescriptor {
                trigger: format!("to_{dest}"),
                source: source.clone(),
                dest: Some(dest.clone()),
                conditions: Vec::new(),
                unless: Vec::new(),
                label: None,
                is_auto: true,
                is_anchor: false,
            })
        })
        .collect()
}
