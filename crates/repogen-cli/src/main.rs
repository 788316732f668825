//! repogen CLI - Generate C# data-access code from a table schema file.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::{info, warn, Level};

use repogen::{CSharpSqlServerGenerator, CodeGenerator, Column, GenerationConfig, Table};

#[derive(Parser)]
#[command(name = "repogen")]
#[command(about = "Generate C# models and repositories from a table schema")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "repogen.yaml")]
    config: PathBuf,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate model and repository files for every table in the schema
    Generate {
        /// Path to the YAML schema file
        #[arg(long)]
        schema: PathBuf,

        /// Directory to write generated files into
        #[arg(long, default_value = "generated")]
        out_dir: PathBuf,
    },

    /// Validate the configuration and schema without writing anything
    Check {
        /// Path to the YAML schema file
        #[arg(long)]
        schema: PathBuf,
    },
}

/// Top-level shape of the schema file.
#[derive(Debug, Deserialize)]
struct SchemaFile {
    tables: Vec<TableSpec>,
}

#[derive(Debug, Deserialize)]
struct TableSpec {
    #[serde(default = "default_schema")]
    schema: String,
    name: String,
    columns: Vec<Column>,
}

fn default_schema() -> String {
    "dbo".to_string()
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity);

    let config = GenerationConfig::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Generate { schema, out_dir } => {
            let tables = load_tables(&schema)?;
            let generator = CSharpSqlServerGenerator::new(config)?;
            generate_all(&generator, &tables, &out_dir)?;
        }
        Commands::Check { schema } => {
            let tables = load_tables(&schema)?;
            let generator = CSharpSqlServerGenerator::new(config)?;
            let ext = generator.file_extension();
            for table in &tables {
                info!(
                    "{} -> {}.{ext}, {}Repository.{ext}",
                    table.full_name(),
                    table.class_name,
                    table.class_name
                );
            }
            info!("Configuration and schema are valid ({} tables)", tables.len());
        }
    }

    Ok(())
}

fn load_tables(path: &Path) -> anyhow::Result<Vec<Table>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read schema file {path:?}"))?;
    let schema_file: SchemaFile = serde_yaml::from_str(&content)
        .with_context(|| format!("failed to parse schema file {path:?}"))?;

    let mut tables = Vec::with_capacity(schema_file.tables.len());
    for spec in schema_file.tables {
        if spec.columns.is_empty() {
            warn!("Skipping table {}.{}: no columns", spec.schema, spec.name);
            continue;
        }
        tables.push(Table::new(spec.schema, spec.name, spec.columns));
    }
    Ok(tables)
}

fn generate_all(
    generator: &CSharpSqlServerGenerator,
    tables: &[Table],
    out_dir: &Path,
) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {out_dir:?}"))?;

    for table in tables {
        let ext = generator.file_extension();

        let model_path = out_dir.join(format!("{}.{ext}", table.class_name));
        fs::write(&model_path, generator.generate_model(table)?)
            .with_context(|| format!("failed to write {model_path:?}"))?;

        let repo_path = out_dir.join(format!("{}Repository.{ext}", table.class_name));
        fs::write(&repo_path, generator.generate_repository(table)?)
            .with_context(|| format!("failed to write {repo_path:?}"))?;

        info!("Generated {} and {}", model_path.display(), repo_path.display());
    }

    info!("Generated {} tables into {}", tables.len(), out_dir.display());
    Ok(())
}

fn setup_logging(verbosity: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
