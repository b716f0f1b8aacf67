//! Eventide Core - observable wrapper generation for reflected .NET libraries
//!
//! This crate provides the generation pipeline:
//! - Identity: assembly equality by full name and input deduplication
//! - Doc: XML documentation comment rendering from text templates
//! - Synth: member synthesis into observable wrapper declarations
//! - Driver: traversal, cross-assembly deduplication and streamed output

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generator configuration loaded from `eventide.toml`
pub mod config;

/// Documentation comment templates and blocks
pub mod doc;

/// Assembly identity comparison
pub mod identity;

/// Metadata model and host seams
pub mod metadata;

/// Member synthesis
pub mod synth;

/// Traversal and aggregation driver
pub mod driver;

pub use config::{ConfigError, DocTemplates, GeneratorConfig, SummaryStyle, CONFIG_FILE};
pub use driver::{generate, GenerateError, GenerationReport, GenerationState, Generator};
pub use identity::{dedup_assemblies, AssemblyNameComparer, AssemblyReference, ByFullName};
pub use metadata::{
    Assembly, AssemblyMetadata, DefaultPolicy, DelegateSignature, MemberDescriptor, MemberKind,
    MemberPolicy, MetadataError, ParameterDescriptor, TypeDescriptor,
};
pub use synth::{Declaration, DeclarationKey, SynthesisError, Synthesizer};
