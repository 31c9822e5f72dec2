//! Fluent construction of [`DiagramConfig`].

use crate::config::DiagramConfig;
use crate::render::Engine;
use crate::style::StyleSheet;

/// Builder for diagram configuration
///
/// Unset options keep the values of [`DiagramConfig::default`].
pub struct DiagramConfigBuilder {
    config: DiagramConfig,
}

impl DiagramConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: DiagramConfig::default(),
        }
    }

    /// Set the default graph title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    /// Append guard names to transition labels
    pub fn show_conditions(mut self, show: bool) -> Self {
        self.config.show_conditions = show;
        self
    }

    /// Add tags, callbacks and timeouts to state labels
    pub fn show_state_attributes(mut self, show: bool) -> Self {
        self.config.show_state_attributes = show;
        self
    }

    /// Draw generated `to_<state>` transitions
    pub fn show_auto_transitions(mut self, show: bool) -> Self {
        self.config.show_auto_transitions = show;
        self
    }

    pub fn engine(mut self, engine: Engine) -> Self {
        self.config.engine = engine;
        self
    }

    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.config.separator = separator.into();
        self
    }

    pub fn binding_name(mut self, name: impl Into<String>) -> Self {
        self.config.binding_name = name.into();
        self
    }

    /// Set one graph-level attribute
    pub fn machine_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.machine_attributes.insert(key.into(), value.into());
        self
    }

    /// Set one attribute applied to machines with nested states
    pub fn hierarchical_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config
            .hierarchical_attributes
            .insert(key.into(), value.into());
        self
    }

    pub fn style_sheet(mut self, sheet: StyleSheet) -> Self {
        self.config.style_sheet = sheet;
        self
    }

    /// Build the configuration
    pub fn build(self) -> DiagramConfig {
        self.config
    }
}

impl Default for DiagramConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_options() {
        let config = DiagramConfigBuilder::new()
            .title("Traffic")
            .show_auto_transitions(true)
            .show_state_attributes(true)
            .engine(Engine::Mermaid)
            .separator(".")
            .binding_name("diagram")
            .machine_attribute("rankdir", "TB")
            .hierarchical_attribute("nodesep", "2")
            .build();

        assert_eq!(config.title, "Traffic");
        assert!(config.show_auto_transitions);
        assert!(config.show_state_attributes);
        assert!(!config.show_conditions);
        assert_eq!(config.engine, Engine::Mermaid);
        assert_eq!(config.separator, ".");
        assert_eq!(config.binding_name, "diagram");
        assert_eq!(config.machine_attributes["rankdir"], "TB");
        assert_eq!(config.hierarchical_attributes["nodesep"], "2");
    }

    #[test]
    fn empty_builder_is_default() {
        assert_eq!(DiagramConfigBuilder::default().build(), DiagramConfig::default());
    }
}
