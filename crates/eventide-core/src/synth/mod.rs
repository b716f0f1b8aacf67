//! Member synthesis
//!
//! Turns eligible source members into wrapper declarations:
//! - events become observable properties on a per-type wrapper class
//! - methods (when the policy admits them) become observable extension methods
//!
//! Each declaration carries a documentation block chosen from the member's
//! shape. Members that cannot be expressed are reported as
//! [`SynthesisError`] and skipped by [`Synthesizer::synthesize_type`].

mod declaration;
mod types;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{GeneratorConfig, SummaryStyle};
use crate::doc::{format_template, DocBlock, DocBuilder, TemplateError};
use crate::metadata::{
    generic_list, DelegateSignature, MemberDescriptor, MemberKind, MemberPolicy, TypeDescriptor,
};

pub use declaration::{
    Declaration, DeclarationKey, DeclarationKind, GeneratedParameter, NamingScheme, Wrapper,
};
pub use types::{identifier, qualify, UNIT_TYPE};

const OBSERVABLE: &str = "global::System.Reactive.Linq.Observable";

/// Name of the field holding the wrapped instance.
pub const DATA_FIELD: &str = "_data";

/// Name of the constructor parameter receiving the wrapped instance.
pub const DATA_PARAMETER: &str = "data";

/// Why a member could not be turned into a declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    #[error("event '{member}' has no handler signature")]
    MissingHandler { member: String },

    #[error("event '{member}' uses handler '{handler}' which returns a value")]
    NonVoidHandler { member: String, handler: String },

    #[error("member '{member}' has by-ref parameter '{parameter}'")]
    ByRefParameter { member: String, parameter: String },

    #[error("member '{member}' uses pointer type '{type_name}'")]
    PointerType { member: String, type_name: String },

    #[error("method '{member}' redeclares generic parameter '{parameter}' of its type")]
    GenericNameClash { member: String, parameter: String },

    #[error("member '{member}' of kind {kind:?} cannot be wrapped")]
    UnsupportedKind { member: String, kind: MemberKind },

    #[error("wrapper '{wrapper}' for '{source_type}' is already generated for '{owner}'")]
    WrapperNameClash {
        wrapper: String,
        source_type: String,
        owner: String,
    },

    #[error("documentation template failed: {0}")]
    Template(#[from] TemplateError),
}

/// A synthesized member together with the wrapper it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedMember {
    pub wrapper: Wrapper,
    pub declaration: Declaration,
}

/// Declarations emitted once, when a wrapper is first opened in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperPreamble {
    pub doc: DocBlock,
    pub constructor: Option<Declaration>,
}

/// All declarations of one wrapper produced from one source type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapperGroup {
    pub wrapper: Wrapper,
    pub preamble: WrapperPreamble,
    /// Declarations in source member order
    pub declarations: Vec<Declaration>,
}

/// Result of synthesizing every member of one type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSynthesis {
    pub type_name: String,
    /// Groups in order of their first member. Member order is kept within a
    /// group only; instance and static members of one type interleaved in
    /// source come out grouped by wrapper.
    pub groups: Vec<WrapperGroup>,
    /// Eligible members that were skipped
    pub skipped: usize,
}

/// Shape of the value an event observable signals.
enum ElementShape {
    Unit,
    Single(usize),
    Tuple,
}

/// Builds declarations from member descriptors.
pub struct Synthesizer<'a> {
    config: &'a GeneratorConfig,
    policy: &'a dyn MemberPolicy,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a GeneratorConfig, policy: &'a dyn MemberPolicy) -> Self {
        Self { config, policy }
    }

    /// The naming scheme for a member, if its kind can be wrapped at all.
    pub fn scheme_for(member: &MemberDescriptor) -> Option<NamingScheme> {
        match (member.kind, member.is_static) {
            (MemberKind::Event, false) => Some(NamingScheme::InstanceEvents),
            (MemberKind::Event, true) => Some(NamingScheme::StaticEvents),
            (MemberKind::Method, _) => Some(NamingScheme::Methods),
            (MemberKind::Property | MemberKind::Field, _) => None,
        }
    }

    /// The wrapper class that holds `ty`'s members under `scheme`.
    pub fn wrapper(&self, ty: &TypeDescriptor, scheme: NamingScheme) -> Wrapper {
        let generic_parameters = match scheme {
            NamingScheme::Methods => Vec::new(),
            NamingScheme::InstanceEvents | NamingScheme::StaticEvents => {
                ty.generic_parameters.clone()
            }
        };
        Wrapper {
            scheme,
            namespace: ty.namespace.clone(),
            name: scheme.wrapper_name(&self.config.wrapper_prefix, &ty.name),
            generic_parameters,
            source_type: qualify(&ty.display_name(), &ty.generic_parameters),
            source_display: ty.display_name(),
        }
    }

    /// Class documentation and, for instance wrappers, the constructor.
    pub fn preamble(&self, wrapper: &Wrapper) -> Result<WrapperPreamble, SynthesisError> {
        let templates = &self.config.templates;
        let class_template = match wrapper.scheme {
            NamingScheme::InstanceEvents => &templates.events_wrapper,
            NamingScheme::StaticEvents => &templates.static_events_wrapper,
            NamingScheme::Methods => &templates.methods_wrapper,
        };
        let doc = DocBuilder::see_also(class_template, &wrapper.source_display)?.build();

        let constructor = if wrapper.scheme == NamingScheme::InstanceEvents {
            let doc = DocBuilder::see_also(&templates.constructor, &wrapper.qualified_name())?
                .param(DATA_PARAMETER, templates.constructor_parameter.as_str())
                .build();
            Some(Declaration {
                kind: DeclarationKind::Constructor,
                container: wrapper.qualified_name(),
                source: wrapper.source_type.clone(),
                name: wrapper.name.clone(),
                is_static: false,
                generic_parameters: Vec::new(),
                parameters: vec![GeneratedParameter::new(
                    DATA_PARAMETER,
                    wrapper.source_type.clone(),
                )],
                return_type: None,
                body: format!("{DATA_FIELD} = {DATA_PARAMETER}"),
                doc,
            })
        } else {
            None
        };

        Ok(WrapperPreamble { doc, constructor })
    }

    /// Synthesize one member. `Ok(None)` means the policy did not select it.
    pub fn synthesize(
        &self,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
    ) -> Result<Option<SynthesizedMember>, SynthesisError> {
        if !self.policy.is_eligible(ty, member) {
            return Ok(None);
        }

        let scheme = Self::scheme_for(member).ok_or_else(|| SynthesisError::UnsupportedKind {
            member: member.name.clone(),
            kind: member.kind,
        })?;
        let wrapper = self.wrapper(ty, scheme);

        let declaration = match scheme {
            NamingScheme::InstanceEvents | NamingScheme::StaticEvents => {
                self.event_declaration(ty, member, &wrapper)?
            }
            NamingScheme::Methods => self.method_declaration(ty, member, &wrapper)?,
        };

        Ok(Some(SynthesizedMember {
            wrapper,
            declaration,
        }))
    }

    /// Synthesize every member of `ty`, logging and counting skips.
    pub fn synthesize_type(&self, ty: &TypeDescriptor) -> TypeSynthesis {
        let mut synthesis = TypeSynthesis {
            type_name: ty.display_name(),
            ..TypeSynthesis::default()
        };

        for member in &ty.members {
            let synthesized = match self.synthesize(ty, member) {
                Ok(Some(synthesized)) => synthesized,
                Ok(None) => continue,
                Err(err) => {
                    warn!(
                        type_name = %synthesis.type_name,
                        member = %member.name,
                        error = %err,
                        "skipping member"
                    );
                    synthesis.skipped += 1;
                    continue;
                }
            };

            let SynthesizedMember {
                wrapper,
                declaration,
            } = synthesized;
            if let Some(group) = synthesis.groups.iter_mut().find(|g| g.wrapper == wrapper) {
                group.declarations.push(declaration);
                continue;
            }

            match self.preamble(&wrapper) {
                Ok(preamble) => synthesis.groups.push(WrapperGroup {
                    wrapper,
                    preamble,
                    declarations: vec![declaration],
                }),
                Err(err) => {
                    warn!(
                        wrapper = %wrapper.qualified_name(),
                        member = %member.name,
                        error = %err,
                        "skipping member, wrapper documentation failed"
                    );
                    synthesis.skipped += 1;
                }
            }
        }

        debug!(
            type_name = %synthesis.type_name,
            wrappers = synthesis.groups.len(),
            skipped = synthesis.skipped,
            "synthesized type"
        );
        synthesis
    }

    fn event_declaration(
        &self,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
        wrapper: &Wrapper,
    ) -> Result<Declaration, SynthesisError> {
        let handler = member
            .handler
            .as_ref()
            .ok_or_else(|| SynthesisError::MissingHandler {
                member: member.name.clone(),
            })?;
        if !handler.returns_void() {
            return Err(SynthesisError::NonVoidHandler {
                member: member.name.clone(),
                handler: handler.type_name.clone(),
            });
        }
        check_parameters(member, &handler.parameters)?;

        let generics = &ty.generic_parameters;
        let (element_type, element_value, lambda_params) = event_element(handler, generics);
        let handler_type = qualify(&handler.type_name, generics);
        let target = if member.is_static {
            wrapper.source_type.clone()
        } else {
            DATA_FIELD.to_string()
        };
        let event = format!("{target}.{}", member.name);
        let body = format!(
            "{OBSERVABLE}.FromEvent<{handler_type}, {element_type}>(eventHandler => ({lambda_params}) => eventHandler({element_value}), x => {event} += x, x => {event} -= x)"
        );

        let doc = self.documented(ty, member, || {
            Ok(self.member_doc(ty, member, &self.config.templates.event)?.build())
        })?;

        Ok(Declaration {
            kind: DeclarationKind::ObservableProperty,
            container: wrapper.qualified_name(),
            source: wrapper.source_type.clone(),
            name: member.name.clone(),
            is_static: member.is_static,
            generic_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: Some(format!("global::System.IObservable<{element_type}>")),
            body,
            doc,
        })
    }

    fn method_declaration(
        &self,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
        wrapper: &Wrapper,
    ) -> Result<Declaration, SynthesisError> {
        check_parameters(member, &member.parameters)?;
        if let Some(clash) = member
            .generic_parameters
            .iter()
            .find(|g| ty.generic_parameters.contains(*g))
        {
            return Err(SynthesisError::GenericNameClash {
                member: member.name.clone(),
                parameter: clash.clone(),
            });
        }
        if let Some(return_type) = member.return_type.as_deref().filter(|t| types::is_pointer(t)) {
            return Err(SynthesisError::PointerType {
                member: member.name.clone(),
                type_name: return_type.to_string(),
            });
        }

        let mut generic_parameters = ty.generic_parameters.clone();
        generic_parameters.extend(member.generic_parameters.iter().cloned());

        let mut parameters = Vec::with_capacity(member.parameters.len() + 1);
        let receiver = if member.is_static {
            None
        } else {
            let name = receiver_name(member);
            parameters.push(GeneratedParameter::receiver(
                name.clone(),
                wrapper.source_type.clone(),
            ));
            Some(name)
        };

        let arguments: Vec<String> = member
            .parameters
            .iter()
            .enumerate()
            .map(|(i, p)| identifier(&p.name, &format!("arg{i}")))
            .collect();
        for (param, name) in member.parameters.iter().zip(&arguments) {
            parameters.push(GeneratedParameter::new(
                name.clone(),
                qualify(&param.type_name, &generic_parameters),
            ));
        }

        let element_type = if member.returns_void() {
            UNIT_TYPE.to_string()
        } else {
            qualify(
                member.return_type.as_deref().unwrap_or_default(),
                &generic_parameters,
            )
        };
        let target = receiver.unwrap_or_else(|| wrapper.source_type.clone());
        let body = format!(
            "{OBSERVABLE}.Start(() => {target}.{}{}({}))",
            member.name,
            generic_list(&member.generic_parameters),
            arguments.join(", ")
        );

        let doc = self.documented(ty, member, || {
            let templates = &self.config.templates;
            let mut builder = self.member_doc(ty, member, &templates.method)?;
            if let Some(receiver) = parameters.iter().find(|p| p.is_receiver) {
                builder = builder.param(receiver.name.as_str(), templates.method_receiver.as_str());
            }
            builder = builder
                .param_template(&templates.parameter, arguments.iter().map(String::as_str))?;
            if !member.returns_void() {
                builder = builder.returns(templates.method_returns.as_str());
            }
            Ok(builder.build())
        })?;

        Ok(Declaration {
            kind: DeclarationKind::ObservableMethod,
            container: wrapper.qualified_name(),
            source: wrapper.source_type.clone(),
            name: format!("{}Observable", member.name),
            is_static: true,
            generic_parameters,
            parameters,
            return_type: Some(format!("global::System.IObservable<{element_type}>")),
            body,
            doc,
        })
    }

    /// Summary builder for a member: mirrored source text, cross-reference or
    /// plain name, depending on configuration.
    fn member_doc(
        &self,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
        template: &str,
    ) -> Result<DocBuilder, TemplateError> {
        if self.config.mirror_source_docs {
            if let Some(summary) = member.summary.as_deref().filter(|s| !s.trim().is_empty()) {
                return Ok(DocBuilder::new(summary));
            }
        }
        match self.config.summary_style {
            SummaryStyle::CrossReference => {
                let target = format!("{}.{}", ty.display_name(), member.name);
                DocBuilder::see_also(template, &target)
            }
            SummaryStyle::Plain => Ok(DocBuilder::new(format_template(template, &[&member.name])?)),
        }
    }

    /// The inherit-doc marker when the member inherits documentation,
    /// otherwise the block produced by `build`. Templates are not touched for
    /// inherited members.
    fn documented<F>(
        &self,
        ty: &TypeDescriptor,
        member: &MemberDescriptor,
        build: F,
    ) -> Result<DocBlock, SynthesisError>
    where
        F: FnOnce() -> Result<DocBlock, SynthesisError>,
    {
        if self.policy.has_inherited_doc(ty, member) {
            Ok(DocBlock::inherit())
        } else {
            build()
        }
    }
}

fn check_parameters(
    member: &MemberDescriptor,
    parameters: &[crate::metadata::ParameterDescriptor],
) -> Result<(), SynthesisError> {
    for param in parameters {
        if param.is_by_ref {
            return Err(SynthesisError::ByRefParameter {
                member: member.name.clone(),
                parameter: param.name.clone(),
            });
        }
        if types::is_pointer(&param.type_name) {
            return Err(SynthesisError::PointerType {
                member: member.name.clone(),
                type_name: param.type_name.clone(),
            });
        }
    }
    Ok(())
}

/// Element type, element expression and lambda parameter list for an event.
fn event_element(handler: &DelegateSignature, generics: &[String]) -> (String, String, String) {
    let names: Vec<String> = handler
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| identifier(&p.name, &format!("arg{i}")))
        .collect();

    let shape = match handler.parameters.as_slice() {
        [] => ElementShape::Unit,
        [_] => ElementShape::Single(0),
        [sender, _] if types::is_object(&sender.type_name) => ElementShape::Single(1),
        _ => ElementShape::Tuple,
    };

    let (element_type, element_value) = match shape {
        ElementShape::Unit => (UNIT_TYPE.to_string(), format!("{UNIT_TYPE}.Default")),
        ElementShape::Single(index) => (
            qualify(&handler.parameters[index].type_name, generics),
            names[index].clone(),
        ),
        ElementShape::Tuple => {
            let fields: Vec<String> = handler
                .parameters
                .iter()
                .zip(&names)
                .map(|(p, name)| format!("{} {name}", qualify(&p.type_name, generics)))
                .collect();
            (format!("({})", fields.join(", ")), format!("({})", names.join(", ")))
        }
    };

    (element_type, element_value, names.join(", "))
}

/// A receiver name that does not collide with the method's own parameters.
fn receiver_name(member: &MemberDescriptor) -> String {
    let mut name = "instance".to_string();
    while member.parameters.iter().any(|p| p.name == name) {
        name.push('_');
    }
    name
}
