//! Generator configuration (`eventide.toml`)

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::doc::{required_arguments, TemplateError};

/// The configuration filename looked up next to the project.
pub const CONFIG_FILE: &str = "eventide.toml";

/// Errors that can occur when loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("template '{field}' is malformed: {source}")]
    Template {
        field: &'static str,
        #[source]
        source: TemplateError,
    },

    #[error("template '{field}' uses {found} placeholders, at most {allowed} allowed")]
    TooManyPlaceholders {
        field: &'static str,
        found: usize,
        allowed: usize,
    },

    #[error("wrapper prefix '{0}' is not a valid identifier prefix")]
    InvalidPrefix(String),
}

/// How member summaries refer to the wrapped member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryStyle {
    /// `<see cref="Ns.Type.Member" />`
    #[default]
    CrossReference,
    /// The bare member name
    Plain,
}

/// Documentation templates. `{0}` receives the type or member reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct DocTemplates {
    pub events_wrapper: String,
    pub static_events_wrapper: String,
    pub methods_wrapper: String,
    pub constructor: String,
    /// Literal text for the constructor's instance parameter
    pub constructor_parameter: String,
    pub event: String,
    pub method: String,
    /// Per-parameter text; `{0}` receives the parameter name
    pub parameter: String,
    /// Literal text for the receiver of an instance method wrapper
    pub method_receiver: String,
    /// Literal return text for non-void methods
    pub method_returns: String,
}

impl Default for DocTemplates {
    fn default() -> Self {
        Self {
            events_wrapper: "A class which wraps the events contained within the {0} class as observables."
                .to_string(),
            static_events_wrapper:
                "A class which wraps the static events contained within the {0} class as observables."
                    .to_string(),
            methods_wrapper: "A class which exposes the methods of the {0} class as observables."
                .to_string(),
            constructor: "Initializes a new instance of the {0} class.".to_string(),
            constructor_parameter: "The instance whose events are wrapped.".to_string(),
            event: "Gets an observable which signals when the {0} event triggers.".to_string(),
            method: "Gets an observable which signals the result of invoking {0}.".to_string(),
            parameter: "The {0} argument forwarded to the wrapped method.".to_string(),
            method_receiver: "The instance on which the method is invoked.".to_string(),
            method_returns: "An observable which signals the return value once the invocation completes."
                .to_string(),
        }
    }
}

impl DocTemplates {
    fn fields(&self) -> [(&'static str, &str, usize); 10] {
        [
            ("events-wrapper", self.events_wrapper.as_str(), 1),
            ("static-events-wrapper", self.static_events_wrapper.as_str(), 1),
            ("methods-wrapper", self.methods_wrapper.as_str(), 1),
            ("constructor", self.constructor.as_str(), 1),
            ("constructor-parameter", self.constructor_parameter.as_str(), 0),
            ("event", self.event.as_str(), 1),
            ("method", self.method.as_str(), 1),
            ("parameter", self.parameter.as_str(), 1),
            ("method-receiver", self.method_receiver.as_str(), 0),
            ("method-returns", self.method_returns.as_str(), 0),
        ]
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case", default)]
pub struct GeneratorConfig {
    pub templates: DocTemplates,
    pub summary_style: SummaryStyle,
    /// Use the wrapped member's own summary text when it has one
    pub mirror_source_docs: bool,
    /// Also wrap public methods (not just events)
    pub include_methods: bool,
    /// Prefix for generated wrapper class names
    pub wrapper_prefix: String,
    /// Extra package names never fed to the generator
    pub exclude_packages: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            templates: DocTemplates::default(),
            summary_style: SummaryStyle::default(),
            mirror_source_docs: true,
            include_methods: false,
            wrapper_prefix: "Rx".to_string(),
            exclude_packages: Vec::new(),
        }
    }
}

impl GeneratorConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Check every template parses and takes at most the arguments it is given.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, template, allowed) in self.templates.fields() {
            let found = required_arguments(template)
                .map_err(|source| ConfigError::Template { field, source })?;
            if found > allowed {
                return Err(ConfigError::TooManyPlaceholders {
                    field,
                    found,
                    allowed,
                });
            }
        }

        let prefix_ok = self
            .wrapper_prefix
            .chars()
            .enumerate()
            .all(|(i, c)| c == '_' || c.is_ascii_alphabetic() || (i > 0 && c.is_ascii_digit()));
        if !prefix_ok {
            return Err(ConfigError::InvalidPrefix(self.wrapper_prefix.clone()));
        }

        Ok(())
    }
}
