use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cqlmigrate_catalog::{SchemaSnapshot, SnapshotCatalog};
use cqlmigrate_core::{Config, MigrationReport, SchemaChange};
use cqlmigrate_engine::{create_column_family, Migrator};

const DEFAULT_CONFIG: &str = "cqlmigrate.toml";

/// cqlmigrate - Additive schema migrations for CQL keyspaces
#[derive(Parser)]
#[command(name = "cqlmigrate")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: cqlmigrate.toml)
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
    /// Check that every column family can be created
    Validate,

    /// Print CREATE statements for the desired column families
    Ddl {
        /// Only print this column family
        #[arg(long)]
        column_family: Option<String>,
    },

    /// Compute the statements needed to migrate a live schema snapshot
    Plan {
        /// JSON snapshot of the live keyspace, relative to the config file
        #[arg(short, long)]
        live: PathBuf,

        /// Output file for the plan report, relative to the config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let config = Config::from_file(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::debug!(config = %config_path.display(), keyspace = %config.keyspace, "loaded config");

    if cli.verbose {
        eprintln!(
            "{} keyspace {} ({} column families)",
            "Using".cyan(),
            config.keyspace,
            config.column_families.len()
        );
    }

    match cli.command {
        Commands::Validate => validate_command(&config),
        Commands::Ddl { column_family } => ddl_command(&config, column_family.as_deref()),
        Commands::Plan { live, output } => {
            let live = config.resolve_path(&live);
            let output = output.map(|path| config.resolve_path(&path));
            plan_command(&config, &live, output.as_deref()).await
        }
    }
}

/// Log to stderr; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Validate command - check every column family definition
fn validate_command(config: &Config) -> Result<()> {
    let mut invalid = 0;

    for (name, column_family) in config.column_families.iter() {
        match column_family.validate(name) {
            Ok(()) => println!("{} {}", "✓".green(), name),
            Err(e) => {
                println!("{} {}: {}", "✗".red(), name, e);
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{} invalid column famil{}", invalid, if invalid == 1 { "y" } else { "ies" });
    }

    println!(
        "{} {} column families valid",
        "OK".green().bold(),
        config.column_families.len()
    );
    Ok(())
}

/// DDL command - print CREATE statements
fn ddl_command(config: &Config, only: Option<&str>) -> Result<()> {
    if let Some(name) = only {
        let column_family = config
            .column_families
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Column family not declared: {}", name))?;
        println!("{};", create_column_family(name, column_family)?);
        return Ok(());
    }

    for (name, column_family) in config.column_families.iter() {
        println!("{};", create_column_family(name, column_family)?);
    }
    Ok(())
}

/// Plan command - dry-run against a live snapshot
async fn plan_command(config: &Config, live: &Path, output: Option<&Path>) -> Result<()> {
    let snapshot = SchemaSnapshot::from_file(live)
        .with_context(|| format!("Failed to load snapshot from {}", live.display()))?;
    let catalog = SnapshotCatalog::new(snapshot);

    let report = Migrator::new()
        .plan(&config.keyspace, &config.column_families, &catalog)
        .await?;

    for statement in report.statements() {
        println!("{};", statement);
    }
    print_plan_summary(&report);

    if let Some(path) = output {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        eprintln!("{} {}", "Report saved to:".green(), path.display());
    }

    Ok(())
}

fn print_plan_summary(report: &MigrationReport) {
    if report.is_empty() {
        eprintln!("{} keyspace {} is up-to-date", "✓".green(), report.keyspace);
        return;
    }

    eprintln!();
    eprintln!("{}", format!("Plan for keyspace {}", report.keyspace).bold());
    for change in &report.changes {
        match change {
            SchemaChange::CreateColumnFamily { column_family, .. } => {
                eprintln!("  {} {}", "create".green(), column_family);
            }
            SchemaChange::AddColumn {
                column_family,
                column,
                column_type,
                ..
            } => {
                eprintln!("  {} {}.{} ({})", "add".yellow(), column_family, column, column_type);
            }
        }
    }
    eprintln!(
        "{} column families to create, {} columns to add",
        report.summary.column_families_created, report.summary.columns_added
    );
}
