use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schemadelta_core::{ComparisonReport, Config, ReportSummary, Schema};
use schemadelta_engine::{SchemaCompareReporter, SchemaComparer, SchemaStatistics};
use schemadelta_loader::{SchemaContext, SchemaLoader};

/// SchemaDelta - Report the differences between two versions of a schema
#[derive(Parser)]
#[command(name = "schemadelta")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: schemadelta.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare two schema files and print the change report
    Compare {
        /// Schema A (the "before" side)
        schema_a: PathBuf,

        /// Schema B (the "after" side)
        schema_b: PathBuf,

        /// Extra directory searched for referenced schemas (repeatable)
        #[arg(short, long = "ref-path")]
        ref_path: Vec<PathBuf>,

        /// Also write the report lines to a text file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report as JSON
        #[arg(short, long)]
        json: Option<PathBuf>,
    },

    /// Show per-class property counts for a schema
    Info {
        /// Schema file
        schema: PathBuf,

        /// Extra directory searched for referenced schemas (repeatable)
        #[arg(short, long = "ref-path")]
        ref_path: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Compare {
            schema_a,
            schema_b,
            ref_path,
            output,
            json,
        } => compare_command(
            &config,
            &schema_a,
            &schema_b,
            &ref_path,
            output.as_deref(),
            json.as_deref(),
            cli.verbose,
        ),
        Commands::Info { schema, ref_path } => info_command(&config, &schema, &ref_path),
    }
}

fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(config_path) = path {
        return Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()));
    }

    let default_path = Path::new("schemadelta.toml");
    if default_path.exists() {
        return Config::from_file(default_path).context("Failed to load schemadelta.toml");
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

/// Reference search paths: command line first, then config
fn search_paths(config: &Config, ref_paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut paths = ref_paths.to_vec();
    paths.extend(config.resolved_reference_paths());
    paths
}

/// Each schema gets its own context so both sides may share a name
fn load_schema(path: &Path, reference_paths: &[PathBuf], verbose: bool) -> Result<std::sync::Arc<Schema>> {
    if verbose {
        eprintln!("{} {}", "Loading schema from:".cyan(), path.display());
    }

    let mut context = SchemaContext::new();
    SchemaLoader::load_file(path, &mut context, reference_paths)
        .with_context(|| format!("Failed to load schema {}", path.display()))
}

/// Compare command - print one line per report entry
fn compare_command(
    config: &Config,
    schema_a_path: &Path,
    schema_b_path: &Path,
    ref_paths: &[PathBuf],
    output: Option<&Path>,
    json: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let reference_paths = search_paths(config, ref_paths);
    let schema_a = load_schema(schema_a_path, &reference_paths, verbose)?;
    let schema_b = load_schema(schema_b_path, &reference_paths, verbose)?;

    let changes = SchemaComparer::new().compare(&schema_a, &schema_b);
    let kept = changes.filtered(|d| !config.is_suppressed(d.code));
    if kept.len() < changes.len() {
        tracing::warn!(
            suppressed = changes.len() - kept.len(),
            "Skipping suppressed diagnostics"
        );
    }

    let mut lines: Vec<String> = Vec::new();
    let stats = SchemaCompareReporter::new(&schema_a, &schema_b)
        .report(&kept, &mut lines)
        .context("Failed to format schema changes")?;

    for line in &lines {
        println!("{}", colorize(line));
    }

    let report = ComparisonReport::new(
        schema_a.name.clone(),
        schema_b.name.clone(),
        ReportSummary::from(stats),
        lines,
    );

    if let Some(path) = output {
        std::fs::write(path, report.to_text())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if verbose {
            eprintln!("{} {}", "Report saved to:".green(), path.display());
        }
    }

    if let Some(path) = json {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        if verbose {
            eprintln!("{} {}", "JSON report saved to:".green(), path.display());
        }
    }

    if config.output.summary {
        print_report_summary(&report);
    }

    Ok(())
}

/// Color the leading change symbol of a report line
fn colorize(line: &str) -> String {
    let mut chars = line.chars();
    let Some(symbol) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();

    let symbol = match symbol {
        '+' => "+".green(),
        '-' => "-".red(),
        '!' => "!".yellow(),
        other => other.to_string().normal(),
    };

    format!("{}{}", symbol, rest)
}

fn print_report_summary(report: &ComparisonReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Comparison Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Schema A:  {}", report.schema_a);
    println!("Schema B:  {}", report.schema_b);
    println!("Timestamp: {}", report.timestamp);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total differences: {}", report.summary.total);
    println!("  Added:    {}", report.summary.added.to_string().green());
    println!("  Removed:  {}", report.summary.removed.to_string().red());
    println!("  Modified: {}", report.summary.modified.to_string().yellow());
    println!();

    if report.has_changes() {
        println!("Fingerprint: {}", report.fingerprint);
    } else {
        println!("{}", "✓ Schemas are identical".green().bold());
    }

    println!("{}", "=".repeat(60).bright_blue());
}

/// Info command - property counts per class
fn info_command(config: &Config, schema_path: &Path, ref_paths: &[PathBuf]) -> Result<()> {
    let reference_paths = search_paths(config, ref_paths);
    let schema = load_schema(schema_path, &reference_paths, false)?;

    let metadata = SchemaStatistics::class_metadata(&schema);
    let sorted = SchemaStatistics::sort_by_property_count(&metadata);
    let summary = SchemaStatistics::property_count_summary(&metadata);

    println!("\n{}", "=".repeat(60).bright_blue());
    println!(
        "{} {} ({})",
        "Schema".bold().bright_blue(),
        schema.name.bold().bright_blue(),
        schema.version
    );
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    if sorted.is_empty() {
        println!("{}", "No classes in schema".yellow());
    } else {
        println!("{}", "Classes by property count:".bold());
        for class in &sorted {
            println!("  {:>4}  {}", class.property_count, class.class_name);
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  Classes: {}", metadata.len());
    println!("  Min:     {}", summary.min);
    println!("  Max:     {}", summary.max);
    println!("  Avg:     {:.2}", summary.avg);

    Ok(())
}
