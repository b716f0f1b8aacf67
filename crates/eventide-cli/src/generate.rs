//! Implementation of the `eventide generate` command.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use eventide_core::{dedup_assemblies, Assembly, GenerationReport, Generator, GeneratorConfig};
use eventide_pkg::{
    collect_libraries, resolve_frameworks, ExclusionSet, LibraryIdentity, Lockfile,
    PackageReference, TargetFramework,
};
use tracing::{debug, error, info, warn};

/// Options for a generation run.
#[derive(Debug, Default)]
pub struct GenerateOptions {
    /// File receiving the generated source.
    pub output: PathBuf,
    /// Lock file recording the libraries of the last run.
    pub lock_file: PathBuf,
    /// Package references as `name@range`.
    pub packages: Vec<String>,
    /// Glob patterns of metadata documents.
    pub metadata: Vec<String>,
    pub target_framework: Option<String>,
    pub framework_version: Option<String>,
    pub platform_version: Option<String>,
    pub project_type_guids: Option<String>,
    /// Generator configuration; defaults apply when `None`.
    pub config: Option<GeneratorConfig>,
    /// Synthesize assemblies in parallel.
    pub parallel: bool,
}

/// What a generation run did.
#[derive(Debug)]
pub enum GenerateOutcome {
    /// Lock file and output matched the requested libraries; nothing written.
    UpToDate,
    Generated(GenerationReport),
}

/// Run the generation flow described by `options`.
pub fn generate(mut options: GenerateOptions) -> Result<GenerateOutcome> {
    if options.output.as_os_str().to_string_lossy().trim().is_empty() {
        bail!("Output file is not set");
    }

    let frameworks = resolve_frameworks(
        options.target_framework.as_deref(),
        options.framework_version.as_deref(),
        options.platform_version.as_deref(),
        options.project_type_guids.as_deref(),
    )?
    .ok_or_else(|| anyhow!("Neither TargetFramework nor ProjectTypeGuids have been correctly set."))?;

    let config = options.config.take().unwrap_or_default();
    let references = options
        .packages
        .iter()
        .map(|reference| reference.parse::<PackageReference>())
        .collect::<Result<Vec<_>, _>>()?;
    let exclusions = ExclusionSet::with_defaults(&config.exclude_packages);
    let libraries = collect_libraries(&references, &exclusions);

    if is_up_to_date(&options.lock_file, &options.output, &libraries) {
        info!(output = %options.output.display(), "output is up to date");
        return Ok(GenerateOutcome::UpToDate);
    }

    let report = match regenerate(&options, &frameworks, config, &libraries) {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "generation failed");
            invalidate_lock(&options.lock_file);
            return Err(err);
        }
    };

    Lockfile::new(libraries)
        .save(&options.lock_file)
        .with_context(|| format!("Failed to write '{}'", options.lock_file.display()))?;

    Ok(GenerateOutcome::Generated(report))
}

/// Generate into memory and replace the output file only once the whole
/// run succeeded.
fn regenerate(
    options: &GenerateOptions,
    frameworks: &[TargetFramework],
    config: GeneratorConfig,
    libraries: &[LibraryIdentity],
) -> Result<GenerationReport> {
    let assemblies = load_assemblies(&options.metadata, frameworks)?;
    let header_lines: Vec<String> = libraries.iter().map(ToString::to_string).collect();

    let mut generator = Generator::new(config)
        .with_header_lines(header_lines)
        .with_parallelism(options.parallel);
    let mut buffer = Vec::new();
    let report = generator.generate(&assemblies, &mut buffer)?;

    fs::write(&options.output, &buffer)
        .with_context(|| format!("Failed to write '{}'", options.output.display()))?;
    Ok(report)
}

/// Remove the lock file so the next run cannot consider stale output current.
fn invalidate_lock(lock_file: &Path) {
    match fs::remove_file(lock_file) {
        Ok(()) => debug!(lock_file = %lock_file.display(), "removed lock file"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            warn!(lock_file = %lock_file.display(), error = %err, "failed to remove lock file")
        }
    }
}

/// Whether a previous run already produced output for exactly `libraries`.
/// An unreadable lock file only means "regenerate".
fn is_up_to_date(lock_file: &Path, output: &Path, libraries: &[LibraryIdentity]) -> bool {
    if !lock_file.exists() || !output.exists() {
        return false;
    }
    match Lockfile::load(lock_file) {
        Ok(lock) => lock.is_up_to_date(libraries),
        Err(err) => {
            warn!(lock_file = %lock_file.display(), error = %err, "ignoring unreadable lock file");
            false
        }
    }
}

/// Load every metadata document matched by `patterns`, keep assemblies usable
/// from one of `frameworks`, and drop repeated full names.
fn load_assemblies(patterns: &[String], frameworks: &[TargetFramework]) -> Result<Vec<Assembly>> {
    let mut assemblies = Vec::new();
    for pattern in patterns {
        let entries =
            glob::glob(pattern).with_context(|| format!("Invalid metadata pattern '{pattern}'"))?;
        for entry in entries {
            let path = entry?;
            let assembly = Assembly::load(&path)
                .with_context(|| format!("Failed to load metadata '{}'", path.display()))?;
            if targets_any(&assembly, frameworks) {
                assemblies.push(assembly);
            } else {
                debug!(
                    assembly = %assembly.full_name,
                    "skipping assembly built for other frameworks"
                );
            }
        }
    }
    Ok(dedup_assemblies(assemblies))
}

fn targets_any(assembly: &Assembly, frameworks: &[TargetFramework]) -> bool {
    if assembly.target_frameworks.is_empty() {
        return true;
    }
    assembly.target_frameworks.iter().any(|moniker| match TargetFramework::parse(moniker) {
        Ok(built_for) => frameworks.iter().any(|f| f.accepts(&built_for)),
        Err(err) => {
            warn!(assembly = %assembly.full_name, error = %err, "ignoring target framework");
            false
        }
    })
}
