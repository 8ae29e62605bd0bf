//! SOAP Client Generator CLI
//!
//! Command-line interface for generating lean async SOAP clients from WSDL
//! documents.

mod parameters;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use parameters::parse_parameters;
use soap_client_generator_analyzer::{AnalysisResult, ListingAnalyzer};
use soap_client_generator_common::GeneratorConfig;
use soap_client_generator_generator::{Pipeline, RunSummary, SvcUtil};
use soap_client_generator_parser::parse_listing;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "soap-client-generator")]
#[command(version, about = "Generate async SOAP clients from WSDL documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run svcutil on a document and generate the client source file
    #[command(after_help = "EXAMPLES:\n  \
        # Generate from a live service\n  \
        soap-client-generator generate http://host/Weather.svc?wsdl WeatherClient.cs Acme.Weather\n\n  \
        # Use a different svcutil\n  \
        soap-client-generator generate weather.wsdl WeatherClient.cs Acme.Weather /tool:C:\\Tools\\SvcUtil.exe")]
    Generate {
        /// Path or URI of the service description document
        document: String,

        /// Output source file
        output: PathBuf,

        /// Namespace of the generated code
        namespace: String,

        /// Trailing `/key:value` parameters (`/tool:<path>`, `/svcutil:<path>`)
        parameters: Vec<String>,
    },

    /// Generate the client source file from an existing svcutil listing
    Convert {
        /// svcutil-generated source listing
        listing: PathBuf,

        /// Output source file
        output: PathBuf,

        /// Namespace of the generated code
        namespace: String,
    },

    /// Show the services, contracts and enums found in a listing
    Inspect {
        /// svcutil-generated source listing
        listing: PathBuf,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(error) = run(cli) {
        eprintln!("{} {:#}", "ERROR:".red().bold(), error);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    if cli.verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    match cli.command {
        Commands::Generate {
            document,
            output,
            namespace,
            parameters,
        } => generate_command(
            &document,
            &output,
            &namespace,
            &parameters,
            cli.config.as_deref(),
            cli.verbose,
        ),
        Commands::Convert {
            listing,
            output,
            namespace,
        } => convert_command(&listing, &output, &namespace, cli.config.as_deref()),
        Commands::Inspect { listing, json } => inspect_command(&listing, json, cli.verbose),
    }
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            GeneratorConfig::load(path).context("Failed to load configuration")
        }
        None => Ok(GeneratorConfig::default()),
    }
}

fn generate_command(
    document: &str,
    output: &Path,
    namespace: &str,
    parameters: &[String],
    config_path: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let parameters = parse_parameters(parameters)?;
    let mut config = load_config(config_path)?;
    if let Some(tool) = parameters.tool {
        config = config.with_tool_path(tool);
    }

    println!("{} SvcUtil: {}", "→".cyan(), config.tool.path.display());
    println!("{} Document: {}", "→".cyan(), document);
    println!("{} Code file: {}", "→".cyan(), output.display());
    println!("{} Namespace: {}", "→".cyan(), namespace.yellow());
    if verbose {
        println!("  Tool arguments: {}", config.tool.arguments.join(" "));
        println!("  Client base type: {}", config.output.client_base_type);
    }

    let tool = SvcUtil::new(&config.tool);
    let pipeline = Pipeline::new(tool, config.output).context("Failed to create generator")?;

    println!("{} Processing {}...", "→".cyan(), document);
    let summary = pipeline
        .run_document(document, output, namespace)
        .context("Failed to generate client")?;

    print_summary(&summary, output);
    Ok(())
}

fn convert_command(
    listing: &Path,
    output: &Path,
    namespace: &str,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = load_config(config_path)?;

    println!("{} Converting listing: {}", "→".cyan(), listing.display());
    let pipeline = Pipeline::new(SvcUtil::new(&config.tool), config.output)
        .context("Failed to create generator")?;
    let summary = pipeline
        .run_listing(listing, output, namespace)
        .with_context(|| format!("Failed to convert {}", listing.display()))?;

    print_summary(&summary, output);
    Ok(())
}

fn inspect_command(listing_path: &Path, json: bool, verbose: bool) -> Result<()> {
    let source = fs::read_to_string(listing_path)
        .with_context(|| format!("Failed to read {}", listing_path.display()))?;
    let listing = parse_listing(&source).context("Failed to parse listing")?;
    let result = ListingAnalyzer::new(&listing).analyze();

    if json {
        let value = serde_json::json!({
            "model": result.model,
            "warnings": result.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_analysis(&result, verbose);
    Ok(())
}

fn print_analysis(result: &AnalysisResult, verbose: bool) {
    let model = &result.model;

    println!("\n{}", "✓ Analysis successful!".green().bold());
    println!("  Services: {}", model.services.len());
    println!("  Operations: {}", result.operation_count());
    println!("  Contracts: {}", model.contracts.len());
    println!("  Enums: {}", model.enums.len());

    if !model.services.is_empty() {
        println!("\n{}", "Services:".bold());
        for service in &model.services {
            println!(
                "  • {} ({} operations)",
                service.name.cyan(),
                service.operations.len()
            );
            if verbose {
                for operation in &service.operations {
                    println!("    {} → {}", operation.name, operation.action);
                }
            }
        }
    }

    if !model.contracts.is_empty() {
        println!("\n{}", "Contracts:".bold());
        for contract in &model.contracts {
            println!(
                "  • {} ({} fields, {} properties)",
                contract.name.cyan(),
                contract.fields.len(),
                contract.properties.len()
            );
        }
    }

    if !model.enums.is_empty() {
        println!("\n{}", "Enums:".bold());
        for descriptor in &model.enums {
            println!(
                "  • {} ({} members)",
                descriptor.name.cyan(),
                descriptor.members.len()
            );
        }
    }

    print_warnings(&result.warnings);
}

fn print_summary(summary: &RunSummary, output: &Path) {
    println!("\n{}", "✓ Generation complete!".green().bold());
    println!(
        "  {} services, {} operations, {} contracts, {} enums",
        summary.services, summary.operations, summary.contracts, summary.enums
    );
    println!("  📄 {}", output.display());
    print_warnings(&summary.warnings);
}

fn print_warnings<T: std::fmt::Display>(warnings: &[T]) {
    if warnings.is_empty() {
        return;
    }
    println!("\n{}", "Warnings:".yellow().bold());
    for warning in warnings {
        println!("  {} {}", "⚠".yellow(), warning);
    }
}
