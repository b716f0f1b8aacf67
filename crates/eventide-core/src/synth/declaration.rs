//! Generated declarations and the wrappers that contain them

use crate::doc::DocBlock;
use crate::metadata::generic_list;

/// How a source member is exposed, which also decides its wrapper class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamingScheme {
    /// Instance events, exposed on `{prefix}{Type}Events`
    InstanceEvents,
    /// Static events, exposed on `{prefix}{Type}StaticEvents`
    StaticEvents,
    /// Methods, exposed as extension methods on `{prefix}{Type}Methods`
    Methods,
}

impl NamingScheme {
    fn suffix(self) -> &'static str {
        match self {
            NamingScheme::InstanceEvents => "Events",
            NamingScheme::StaticEvents => "StaticEvents",
            NamingScheme::Methods => "Methods",
        }
    }

    /// Wrapper class name for a source type.
    pub fn wrapper_name(self, prefix: &str, type_name: &str) -> String {
        format!("{prefix}{type_name}{}", self.suffix())
    }

    /// Whether the wrapper is a static class.
    pub fn is_static(self) -> bool {
        !matches!(self, NamingScheme::InstanceEvents)
    }
}

/// A generated class wrapping one source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wrapper {
    pub scheme: NamingScheme,
    pub namespace: String,
    pub name: String,
    /// Generic parameters of the wrapper class itself
    pub generic_parameters: Vec<String>,
    /// Qualified source type, e.g. `global::Ns.Button<T>`
    pub source_type: String,
    /// Source type as written in cross-references, e.g. `Ns.Button<T>`
    pub source_display: String,
}

impl Wrapper {
    /// Namespace-qualified wrapper name including generic parameters.
    pub fn qualified_name(&self) -> String {
        let generics = generic_list(&self.generic_parameters);
        if self.namespace.is_empty() {
            format!("{}{generics}", self.name)
        } else {
            format!("{}.{}{generics}", self.namespace, self.name)
        }
    }
}

/// What a declaration is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `IObservable<T> Name => ...;`
    ObservableProperty,
    /// `static IObservable<T> NameObservable(this Source instance, ...) => ...;`
    ObservableMethod,
    /// Wrapper constructor taking the wrapped instance
    Constructor,
}

/// A parameter of a generated declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedParameter {
    pub name: String,
    pub type_name: String,
    /// Extension method receiver (`this`)
    pub is_receiver: bool,
}

impl GeneratedParameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_receiver: false,
        }
    }

    pub fn receiver(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            is_receiver: true,
            ..Self::new(name, type_name)
        }
    }
}

/// One generated member with its documentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Qualified name of the containing wrapper
    pub container: String,
    /// Qualified source type the declaration wraps
    pub source: String,
    pub name: String,
    pub is_static: bool,
    pub generic_parameters: Vec<String>,
    pub parameters: Vec<GeneratedParameter>,
    /// Declared type; `None` for constructors
    pub return_type: Option<String>,
    /// Expression body
    pub body: String,
    pub doc: DocBlock,
}

impl Declaration {
    pub fn generic_arity(&self) -> usize {
        self.generic_parameters.len()
    }

    /// Identity used to drop duplicates across assemblies.
    pub fn key(&self) -> DeclarationKey {
        DeclarationKey {
            container: self.container.clone(),
            source: self.source.clone(),
            name: self.name.clone(),
            parameter_types: self
                .parameters
                .iter()
                .map(|p| p.type_name.clone())
                .collect(),
            generic_arity: self.generic_arity(),
        }
    }
}

/// Name, parameter types and generic arity within a container, scoped to
/// the wrapped source type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeclarationKey {
    pub container: String,
    pub source: String,
    pub name: String,
    pub parameter_types: Vec<String>,
    pub generic_arity: usize,
}
