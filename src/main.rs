use clap::{Parser, ValueEnum};
use ddlgen::{ParseError, SchemaError, compile};
use std::fs;
use std::path::PathBuf;
use std::process;
use thiserror::Error;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Target {
    /// CREATE script
    Sql,
    /// TypeScript declarations
    Types,
    /// DROP script
    Drop,
}

#[derive(Parser)]
#[command(name = "ddlgen", version, about = "Render SQL DDL and TypeScript types from a schema file")]
struct Cli {
    /// Schema source file
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// What to generate
    #[arg(short, long, value_enum, default_value_t = Target::Sql)]
    target: Target,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let input = fs::read_to_string(&cli.input).map_err(|source| CliError::Read {
        path: cli.input.clone(),
        source,
    })?;

    let registry = compile(&input)?;
    info!(
        "Compiled {}: {} table(s), {} custom type(s)",
        cli.input.display(),
        registry.tables().len(),
        registry.custom_types().len()
    );

    let rendered = match cli.target {
        Target::Sql => registry.generate_sql_schema()?,
        Target::Types => registry.generate_typescript()?,
        Target::Drop => registry.generate_drop_sql()?,
    };

    match &cli.output {
        Some(path) => fs::write(path, &rendered).map_err(|source| CliError::Write {
            path: path.clone(),
            source,
        })?,
        None => print!("{}", rendered),
    }
    Ok(())
}
