//! Eventide CLI - Command-line interface for the eventide wrapper generator

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use eventide_core::{GeneratorConfig, CONFIG_FILE};
use std::path::{Path, PathBuf};

mod doc;
mod generate;

#[derive(Parser)]
#[command(name = "eventide")]
#[command(version = eventide_core::VERSION)]
#[command(about = "Generate observable wrappers for .NET library events", long_about = None)]
struct Cli {
    /// Show debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate wrappers for the referenced packages
    Generate {
        /// Output source file
        #[arg(short, long)]
        output: PathBuf,

        /// Lock file recording the packages of the last run
        #[arg(long, default_value = eventide_pkg::LOCK_FILE)]
        lock_file: PathBuf,

        /// Package reference as name@range (repeatable)
        #[arg(short, long = "package")]
        packages: Vec<String>,

        /// Glob pattern of metadata documents (repeatable)
        #[arg(short, long, required = true)]
        metadata: Vec<String>,

        /// Target framework monikers, separated by ';'
        #[arg(long)]
        target_framework: Option<String>,

        /// Framework version such as v4.7.2
        #[arg(long)]
        framework_version: Option<String>,

        /// Platform version for UWP projects
        #[arg(long)]
        platform_version: Option<String>,

        /// Project type guids, separated by ';'
        #[arg(long)]
        project_type_guids: Option<String>,

        /// Generator configuration (defaults to ./eventide.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Synthesize assemblies in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Render a documentation comment block
    Doc {
        /// Summary text, or a format template when --see-also is given
        #[arg(long)]
        summary: String,

        /// Cross-reference target substituted into the summary
        #[arg(long)]
        see_also: Option<String>,

        /// Parameter doc as name=text (repeatable)
        #[arg(long = "param")]
        params: Vec<String>,

        /// Template applied to every name in --params
        #[arg(long)]
        param_template: Option<String>,

        /// Parameter names for --param-template (comma-separated)
        #[arg(long = "params", value_delimiter = ',', requires = "param_template")]
        param_names: Vec<String>,

        /// Return value text
        #[arg(long)]
        returns: Option<String>,

        /// Emit only the inherit-doc marker
        #[arg(long, conflicts_with_all = ["see_also", "params", "param_template", "returns"])]
        inherit: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            output,
            lock_file,
            packages,
            metadata,
            target_framework,
            framework_version,
            platform_version,
            project_type_guids,
            config,
            parallel,
        } => {
            let options = generate::GenerateOptions {
                output,
                lock_file,
                packages,
                metadata,
                target_framework,
                framework_version,
                platform_version,
                project_type_guids,
                config: Some(load_config(config.as_deref())?),
                parallel,
            };
            match generate::generate(options)? {
                generate::GenerateOutcome::UpToDate => println!("Up to date"),
                generate::GenerateOutcome::Generated(report) => println!(
                    "Generated {} declarations from {} assemblies ({} duplicates, {} skipped)",
                    report.emitted, report.assemblies, report.duplicates, report.skipped
                ),
            }
        }

        Commands::Doc {
            summary,
            see_also,
            params,
            param_template,
            param_names,
            returns,
            inherit,
        } => {
            let options = doc::DocOptions {
                summary,
                see_also,
                params,
                param_template,
                param_names,
                returns,
                inherit,
            };
            print!("{}", doc::render_doc(options)?);
        }
    }

    Ok(())
}

/// Initialize logging to stderr; RUST_LOG takes precedence over --verbose.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration from `path`, or from `eventide.toml` in the
/// current directory when present.
fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    let default_path = Path::new(CONFIG_FILE);
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None if default_path.exists() => GeneratorConfig::load(default_path)
            .with_context(|| format!("Failed to load config '{CONFIG_FILE}'")),
        None => Ok(GeneratorConfig::default()),
    }
}
