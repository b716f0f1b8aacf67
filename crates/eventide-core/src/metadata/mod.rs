//! Read-only view of reflected library metadata
//!
//! The generator never reads binaries itself. A host supplies assemblies
//! through [`AssemblyMetadata`] and decides eligibility through
//! [`MemberPolicy`]; [`Assembly`] is the serde model most hosts hand over.

mod model;

pub use model::{
    Assembly, DelegateSignature, MemberDescriptor, MemberKind, MetadataError,
    ParameterDescriptor, TypeDescriptor,
};
pub(crate) use model::generic_list;

/// An assembly as presented by the metadata reader.
pub trait AssemblyMetadata {
    /// Canonical display name used for identity.
    fn full_name(&self) -> &str;

    /// Declared types in a stable order.
    fn types(&self) -> &[TypeDescriptor];
}

impl<T: AssemblyMetadata + ?Sized> AssemblyMetadata for &T {
    fn full_name(&self) -> &str {
        (**self).full_name()
    }

    fn types(&self) -> &[TypeDescriptor] {
        (**self).types()
    }
}

/// Host policy deciding which members become wrappers.
pub trait MemberPolicy: Send + Sync {
    /// Whether `member` should produce a wrapper declaration.
    fn is_eligible(&self, ty: &TypeDescriptor, member: &MemberDescriptor) -> bool;

    /// Whether documentation for `member` already exists on a base or
    /// interface declaration.
    fn has_inherited_doc(&self, ty: &TypeDescriptor, member: &MemberDescriptor) -> bool;
}

/// Public events on public types, plus public methods when enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy {
    pub include_methods: bool,
}

impl DefaultPolicy {
    pub fn new(include_methods: bool) -> Self {
        Self { include_methods }
    }
}

impl MemberPolicy for DefaultPolicy {
    fn is_eligible(&self, ty: &TypeDescriptor, member: &MemberDescriptor) -> bool {
        if !ty.is_public || !member.is_public {
            return false;
        }
        match member.kind {
            MemberKind::Event => true,
            MemberKind::Method => self.include_methods,
            MemberKind::Property | MemberKind::Field => false,
        }
    }

    fn has_inherited_doc(&self, _ty: &TypeDescriptor, member: &MemberDescriptor) -> bool {
        member.has_inherited_doc
    }
}
