//! Traversal and aggregation driver
//!
//! Walks resolved assemblies in input order, types in metadata order and
//! members in declaration order, synthesizes wrappers, drops declarations
//! already emitted earlier in the run, and streams each wrapper block to the
//! sink as soon as it is complete.

mod emit;

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::metadata::{AssemblyMetadata, DefaultPolicy, MemberPolicy};
use crate::synth::{
    Declaration, DeclarationKey, NamingScheme, SynthesisError, Synthesizer, TypeSynthesis,
};

use emit::CodeWriter;

/// Errors that abort a generation run.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// The resolved assembly list was empty.
    #[error("no assemblies were resolved, nothing to generate from")]
    NoAssemblies,

    /// Writing to the output sink failed.
    #[error("failed to write generated output: {0}")]
    Sink(#[from] std::io::Error),

    /// The caller cancelled the run.
    #[error("generation was cancelled")]
    Cancelled,
}

/// Where a generation run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    NotStarted,
    WritingHeader,
    /// Writing the body; `assembly` is the index of the current assembly
    WritingBody { assembly: usize },
    Completed,
    Failed,
}

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub assemblies: usize,
    pub types: usize,
    /// Declarations written to the sink, constructors included
    pub emitted: usize,
    /// Declarations dropped because an identical one was already written
    pub duplicates: usize,
    /// Eligible members that could not be synthesized
    pub skipped: usize,
}

/// The source type and scheme a wrapper name was first generated for.
struct WrapperOwner {
    scheme: NamingScheme,
    source: String,
    /// Preamble already written
    opened: bool,
}

/// Run-scoped dedup state; the single owner of "first seen".
#[derive(Default)]
struct Aggregator {
    seen: HashSet<DeclarationKey>,
    wrappers: HashMap<String, WrapperOwner>,
    report: GenerationReport,
}

impl Aggregator {
    /// Write the fresh part of one type's synthesis to `sink`.
    fn emit<W: Write>(&mut self, synthesis: TypeSynthesis, sink: &mut W) -> std::io::Result<()> {
        self.report.types += 1;
        self.report.skipped += synthesis.skipped;

        for group in synthesis.groups {
            let qualified = group.wrapper.qualified_name();
            let owner = self
                .wrappers
                .entry(qualified.clone())
                .or_insert_with(|| WrapperOwner {
                    scheme: group.wrapper.scheme,
                    source: group.wrapper.source_type.clone(),
                    opened: false,
                });
            if owner.scheme != group.wrapper.scheme || owner.source != group.wrapper.source_type {
                let clash = SynthesisError::WrapperNameClash {
                    wrapper: qualified,
                    source_type: group.wrapper.source_type.clone(),
                    owner: owner.source.clone(),
                };
                for declaration in &group.declarations {
                    warn!(member = %declaration.name, error = %clash, "skipping member");
                }
                self.report.skipped += group.declarations.len();
                continue;
            }

            let seen = &mut self.seen;
            let report = &mut self.report;
            let fresh: Vec<&Declaration> = group
                .declarations
                .iter()
                .filter(|declaration| {
                    let inserted = seen.insert(declaration.key());
                    if !inserted {
                        debug!(
                            container = %declaration.container,
                            name = %declaration.name,
                            "dropping duplicate declaration"
                        );
                        report.duplicates += 1;
                    }
                    inserted
                })
                .collect();
            if fresh.is_empty() {
                continue;
            }

            let preamble = if owner.opened {
                None
            } else {
                owner.opened = true;
                Some(&group.preamble)
            };

            report.emitted += fresh.len();
            if preamble.is_some_and(|p| p.constructor.is_some()) {
                report.emitted += 1;
            }

            let mut writer = CodeWriter::new();
            writer.write_group(&group.wrapper, preamble, &fresh);
            sink.write_all(writer.finish().as_bytes())?;
        }
        Ok(())
    }
}

/// Generates observable wrappers for a set of resolved assemblies.
pub struct Generator {
    config: GeneratorConfig,
    policy: Box<dyn MemberPolicy>,
    header_lines: Vec<String>,
    parallel: bool,
    cancel: Option<Arc<AtomicBool>>,
    state: GenerationState,
}

impl Generator {
    /// Create a generator using the default member policy for `config`.
    pub fn new(config: GeneratorConfig) -> Self {
        let policy = DefaultPolicy::new(config.include_methods);
        Self {
            config,
            policy: Box::new(policy),
            header_lines: Vec::new(),
            parallel: false,
            cancel: None,
            state: GenerationState::NotStarted,
        }
    }

    /// Replace the member policy.
    #[must_use]
    pub fn with_policy(mut self, policy: impl MemberPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Lines listed under "Sources" in the file header.
    #[must_use]
    pub fn with_header_lines(mut self, lines: Vec<String>) -> Self {
        self.header_lines = lines;
        self
    }

    /// Synthesize assemblies on the rayon pool. Output order is unchanged.
    #[must_use]
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Stop at the next type boundary once `flag` is set.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    /// Write the header and every wrapper for `assemblies` to `sink`.
    pub fn generate<A, W>(
        &mut self,
        assemblies: &[A],
        sink: &mut W,
    ) -> Result<GenerationReport, GenerateError>
    where
        A: AssemblyMetadata + Sync,
        W: Write,
    {
        self.state = GenerationState::NotStarted;
        let result = self.run(assemblies, sink);
        self.state = match &result {
            Ok(report) => {
                info!(
                    assemblies = report.assemblies,
                    types = report.types,
                    emitted = report.emitted,
                    duplicates = report.duplicates,
                    skipped = report.skipped,
                    "generation complete"
                );
                GenerationState::Completed
            }
            Err(_) => GenerationState::Failed,
        };
        result
    }

    fn run<A, W>(&mut self, assemblies: &[A], sink: &mut W) -> Result<GenerationReport, GenerateError>
    where
        A: AssemblyMetadata + Sync,
        W: Write,
    {
        if assemblies.is_empty() {
            return Err(GenerateError::NoAssemblies);
        }

        self.state = GenerationState::WritingHeader;
        let mut header = CodeWriter::new();
        header.write_header(&self.header_lines);
        sink.write_all(header.finish().as_bytes())?;

        let mut aggregator = Aggregator::default();
        aggregator.report.assemblies = assemblies.len();
        let synth = Synthesizer::new(&self.config, self.policy.as_ref());

        if self.parallel {
            let cancel = self.cancel.clone();
            let synthesized: Vec<Option<Vec<TypeSynthesis>>> = assemblies
                .par_iter()
                .map(|assembly| {
                    assembly
                        .types()
                        .iter()
                        .map(|ty| (!is_cancelled(cancel.as_ref())).then(|| synth.synthesize_type(ty)))
                        .collect()
                })
                .collect();

            for (index, (assembly, types)) in assemblies.iter().zip(synthesized).enumerate() {
                self.state = GenerationState::WritingBody { assembly: index };
                debug!(assembly = assembly.full_name(), "writing assembly");
                let types = types.ok_or(GenerateError::Cancelled)?;
                for synthesis in types {
                    aggregator.emit(synthesis, sink)?;
                }
            }
        } else {
            for (index, assembly) in assemblies.iter().enumerate() {
                self.state = GenerationState::WritingBody { assembly: index };
                debug!(
                    assembly = assembly.full_name(),
                    types = assembly.types().len(),
                    "processing assembly"
                );
                for ty in assembly.types() {
                    if is_cancelled(self.cancel.as_ref()) {
                        return Err(GenerateError::Cancelled);
                    }
                    aggregator.emit(synth.synthesize_type(ty), sink)?;
                }
            }
        }

        sink.flush()?;
        Ok(aggregator.report)
    }
}

fn is_cancelled(flag: Option<&Arc<AtomicBool>>) -> bool {
    flag.is_some_and(|flag| flag.load(Ordering::Relaxed))
}

/// Generate with the default configuration and policy.
pub fn generate<A, W>(assemblies: &[A], sink: &mut W) -> Result<GenerationReport, GenerateError>
where
    A: AssemblyMetadata + Sync,
    W: Write,
{
    Generator::new(GeneratorConfig::default()).generate(assemblies, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{Assembly, DelegateSignature, MemberDescriptor, MemberKind, TypeDescriptor};

    fn widgets(full_name: &str) -> Assembly {
        Assembly::new(full_name).with_type(
            TypeDescriptor::new("Contoso.Widgets", "Button").with_member(MemberDescriptor::event(
                "Clicked",
                DelegateSignature::event_handler("System.EventArgs"),
            )),
        )
    }

    /// Sink that fails every write.
    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn empty_input_fails_before_writing() {
        let mut generator = Generator::new(GeneratorConfig::default());
        let mut output = Vec::new();
        let err = generator.generate::<Assembly, _>(&[], &mut output).unwrap_err();
        assert!(matches!(err, GenerateError::NoAssemblies));
        assert!(output.is_empty());
        assert_eq!(generator.state(), GenerationState::Failed);
    }

    #[test]
    fn completes_and_reports() {
        let mut generator = Generator::new(GeneratorConfig::default());
        assert_eq!(generator.state(), GenerationState::NotStarted);
        let mut output = Vec::new();
        let report = generator.generate(&[widgets("A")], &mut output).unwrap();
        assert_eq!(generator.state(), GenerationState::Completed);
        assert_eq!(report.assemblies, 1);
        assert_eq!(report.types, 1);
        // constructor + Clicked
        assert_eq!(report.emitted, 2);
        assert_eq!(report.duplicates, 0);
    }

    #[test]
    fn duplicates_across_assemblies_are_dropped() {
        let mut output = Vec::new();
        let report = generate(&[widgets("A"), widgets("A.Facade")], &mut output).unwrap();
        assert_eq!(report.duplicates, 1);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches(" Clicked => ").count(), 1);
        assert_eq!(text.matches("class RxButtonEvents").count(), 1);
    }

    #[test]
    fn reopened_wrapper_has_no_second_preamble() {
        let extra = Assembly::new("B").with_type(
            TypeDescriptor::new("Contoso.Widgets", "Button").with_member(MemberDescriptor::event(
                "Pressed",
                DelegateSignature::event_handler("System.EventArgs"),
            )),
        );
        let mut output = Vec::new();
        generate(&[widgets("A"), extra], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("public partial class RxButtonEvents").count(), 2);
        assert_eq!(text.matches("private readonly").count(), 1);
        assert!(text.find(" Clicked => ").unwrap() < text.find(" Pressed => ").unwrap());
    }

    #[test]
    fn wrapper_name_clash_skips_instead_of_deduplicating() {
        let mut static_clicked =
            MemberDescriptor::event("Clicked", DelegateSignature::event_handler("System.EventArgs"));
        static_clicked.is_static = true;
        let assembly = Assembly::new("A")
            .with_type(TypeDescriptor::new("Ns", "ButtonStatic").with_member(
                MemberDescriptor::event("Clicked", DelegateSignature::event_handler("System.EventArgs")),
            ))
            .with_type(TypeDescriptor::new("Ns", "Button").with_member(static_clicked));

        let mut output = Vec::new();
        let report = generate(&[assembly], &mut output).unwrap();
        assert_eq!(report.duplicates, 0);
        assert_eq!(report.skipped, 1);
        // constructor + ButtonStatic.Clicked
        assert_eq!(report.emitted, 2);

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("class RxButtonStaticEvents").count(), 1);
        assert!(text.contains("public partial class RxButtonStaticEvents\n"));
        assert!(text.contains("x => _data.Clicked += x"));
        assert!(!text.contains("global::Ns.Button.Clicked"));
    }

    #[test]
    fn sink_failure_is_fatal() {
        let mut generator = Generator::new(GeneratorConfig::default());
        let err = generator.generate(&[widgets("A")], &mut BrokenSink).unwrap_err();
        assert!(matches!(err, GenerateError::Sink(_)));
        assert_eq!(generator.state(), GenerationState::Failed);
    }

    #[test]
    fn member_failures_do_not_fail_the_run() {
        let broken = Assembly::new("Broken").with_type(
            TypeDescriptor::new("Ns", "Thing").with_member(MemberDescriptor::new("Raw", MemberKind::Event)),
        );
        let mut output = Vec::new();
        let report = generate(&[broken], &mut output).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.emitted, 0);
        let text = String::from_utf8(output).unwrap();
        assert!(text.starts_with("// <auto-generated />"));
        assert!(!text.contains("class"));
    }

    #[test]
    fn cancellation_fails_the_run() {
        let flag = Arc::new(AtomicBool::new(true));
        let mut generator =
            Generator::new(GeneratorConfig::default()).with_cancellation(Arc::clone(&flag));
        let mut output = Vec::new();
        let err = generator.generate(&[widgets("A")], &mut output).unwrap_err();
        assert!(matches!(err, GenerateError::Cancelled));
        assert_eq!(generator.state(), GenerationState::Failed);

        let mut generator = generator.with_parallelism(true);
        let err = generator.generate(&[widgets("A")], &mut Vec::new()).unwrap_err();
        assert!(matches!(err, GenerateError::Cancelled));
    }

    #[test]
    fn parallel_output_matches_sequential() {
        let inputs = vec![widgets("A"), widgets("B"), widgets("C")];
        let mut sequential = Vec::new();
        Generator::new(GeneratorConfig::default())
            .generate(&inputs, &mut sequential)
            .unwrap();
        let mut parallel = Vec::new();
        Generator::new(GeneratorConfig::default())
            .with_parallelism(true)
            .generate(&inputs, &mut parallel)
            .unwrap();
        assert_eq!(sequential, parallel);
    }
}
