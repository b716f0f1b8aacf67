//! In-memory metadata model
//!
//! This is the shape a decompiler hands to the generator, usually as a JSON
//! document per assembly. Types and members keep the order in which the
//! metadata presented them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AssemblyMetadata;

/// Errors raised while loading a metadata document.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read metadata document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse metadata document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("assembly has an empty full name")]
    MissingName,
}

/// One assembly and the types it declares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assembly {
    /// Display name, e.g. `Contoso.Widgets, Version=1.0.0.0, Culture=neutral, PublicKeyToken=null`
    pub full_name: String,
    /// Framework monikers this assembly was built for; empty means any
    #[serde(default)]
    pub target_frameworks: Vec<String>,
    /// Declared types in metadata order
    #[serde(default)]
    pub types: Vec<TypeDescriptor>,
}

impl Assembly {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            target_frameworks: Vec::new(),
            types: Vec::new(),
        }
    }

    /// Parse a metadata document.
    pub fn from_json(text: &str) -> Result<Self, MetadataError> {
        let assembly: Assembly = serde_json::from_str(text)?;
        if assembly.full_name.trim().is_empty() {
            return Err(MetadataError::MissingName);
        }
        Ok(assembly)
    }

    /// Load a metadata document from disk.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn with_type(mut self, ty: TypeDescriptor) -> Self {
        self.types.push(ty);
        self
    }

    /// Simple name: the part of the full name before the first comma.
    pub fn simple_name(&self) -> &str {
        self.full_name
            .split(',')
            .next()
            .unwrap_or(&self.full_name)
            .trim()
    }
}

impl AssemblyMetadata for Assembly {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn types(&self) -> &[TypeDescriptor] {
        &self.types
    }
}

/// A type declared in an assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescriptor {
    /// Containing namespace; empty for the global namespace
    #[serde(default)]
    pub namespace: String,
    /// Simple name without generic arity suffix
    pub name: String,
    /// Generic parameter names
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Members in declaration order
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeDescriptor {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            generic_parameters: Vec::new(),
            is_public: true,
            members: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    /// Namespace-qualified name without generic parameters.
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Namespace-qualified name with generic parameters, e.g. `Ns.Box<T>`.
    pub fn display_name(&self) -> String {
        format!("{}{}", self.full_name(), generic_list(&self.generic_parameters))
    }

    pub fn generic_arity(&self) -> usize {
        self.generic_parameters.len()
    }
}

/// Kind of a type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MemberKind {
    Event,
    Method,
    Property,
    Field,
}

/// A member of a type, as reported by the metadata reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDescriptor {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default = "default_true")]
    pub is_public: bool,
    /// Parameters in declaration order (methods)
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Return type; `None` means void
    #[serde(default)]
    pub return_type: Option<String>,
    /// Method generic parameter names
    #[serde(default)]
    pub generic_parameters: Vec<String>,
    /// Handler delegate signature (events)
    #[serde(default)]
    pub handler: Option<DelegateSignature>,
    /// The member overrides or implements a documented member
    #[serde(default)]
    pub has_inherited_doc: bool,
    /// Summary text from the original API documentation
    #[serde(default)]
    pub summary: Option<String>,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_static: false,
            is_public: true,
            parameters: Vec::new(),
            return_type: None,
            generic_parameters: Vec::new(),
            handler: None,
            has_inherited_doc: false,
            summary: None,
        }
    }

    /// An instance event with the given handler.
    pub fn event(name: impl Into<String>, handler: DelegateSignature) -> Self {
        let mut member = Self::new(name, MemberKind::Event);
        member.handler = Some(handler);
        member
    }

    pub fn with_parameter(mut self, name: &str, type_name: &str) -> Self {
        self.parameters.push(ParameterDescriptor::new(name, type_name));
        self
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.name.as_str())
    }

    pub fn generic_arity(&self) -> usize {
        self.generic_parameters.len()
    }

    pub fn returns_void(&self) -> bool {
        is_void(self.return_type.as_deref())
    }
}

/// A method or delegate parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// Passed by reference (`ref`, `out` or `in`)
    #[serde(default)]
    pub is_by_ref: bool,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            is_by_ref: false,
        }
    }
}

/// Signature of an event's handler delegate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegateSignature {
    /// Delegate type, e.g. `System.EventHandler<Ns.ClickEventArgs>`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Parameters of the delegate's invoke method
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    /// Return type of the invoke method; `None` means void
    #[serde(default)]
    pub return_type: Option<String>,
}

impl DelegateSignature {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parameters: Vec::new(),
            return_type: None,
        }
    }

    /// The `(object sender, TArgs e)` shape of `System.EventHandler<TArgs>`.
    pub fn event_handler(args_type: &str) -> Self {
        Self {
            type_name: format!("System.EventHandler<{args_type}>"),
            parameters: vec![
                ParameterDescriptor::new("sender", "object"),
                ParameterDescriptor::new("e", args_type),
            ],
            return_type: None,
        }
    }

    pub fn with_parameter(mut self, name: &str, type_name: &str) -> Self {
        self.parameters.push(ParameterDescriptor::new(name, type_name));
        self
    }

    pub fn returns_void(&self) -> bool {
        is_void(self.return_type.as_deref())
    }
}

fn default_true() -> bool {
    true
}

fn is_void(type_name: Option<&str>) -> bool {
    matches!(type_name, None | Some("void" | "System.Void"))
}

/// `<A, B>` for a non-empty list, empty otherwise.
pub(crate) fn generic_list(params: &[String]) -> String {
    if params.is_empty() {
        String::new()
    } else {
        format!("<{}>", params.join(", "))
    }
}
