//! poorman CLI
//!
//! Command-line tool generating model files from a SQLite schema.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use poorman::prelude::*;
use poorman_core::SchemaError;

/// Generate model source files from a SQLite schema.
#[derive(Parser)]
#[command(name = "poorman")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where to read the schema from.
///
/// A schema file wins over a sqlite3 database file, which wins over a
/// database URL.
#[derive(Args)]
struct SourceArgs {
    /// Database URL read through sqlx.
    #[arg(short, long, env = "DATABASE_URL")]
    database: Option<String>,

    /// Database file dumped with the sqlite3 shell.
    #[arg(long)]
    sqlite3: Option<PathBuf>,

    /// File containing a schema dump.
    #[arg(long)]
    schema_file: Option<PathBuf>,

    /// The sqlite3 executable.
    #[arg(long, default_value = "sqlite3")]
    sqlite3_program: String,
}

impl SourceArgs {
    fn source(self) -> anyhow::Result<SchemaSource> {
        match (self.schema_file, self.sqlite3, self.database) {
            (Some(path), _, _) => Ok(SchemaSource::DumpFile { path }),
            (None, Some(database), _) => Ok(SchemaSource::Sqlite3Cli {
                program: self.sqlite3_program,
                database,
            }),
            (None, None, Some(url)) => Ok(SchemaSource::Database { url }),
            (None, None, None) => {
                anyhow::bail!("No schema source: pass --database, --sqlite3 or --schema-file")
            }
        }
    }
}

/// How to parse the schema.
#[derive(Args)]
struct ParseArgs {
    /// Skip column lines without a type instead of failing.
    #[arg(long)]
    skip_malformed: bool,

    /// Only treat JSON column comments that are JSON objects as embedded types.
    #[arg(long)]
    strict_json: bool,
}

impl ParseArgs {
    fn parse(&self, text: &str) -> std::result::Result<Schema, SchemaError> {
        let mut options = ParseOptions::default();
        if self.skip_malformed {
            options = options.skip_malformed();
        }
        let mut parser = SchemaParser::new()
            .with_options(options)
            .with_observer(TracingObserver);
        if self.strict_json {
            parser.with_extractor(JsonObjectExtractor).parse(text)
        } else {
            parser.parse(text)
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one model file per table.
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        parse: ParseArgs,

        /// Output directory.
        #[arg(short, long, default_value = "out")]
        out_dir: PathBuf,

        /// Template file (built-in Go model template if not specified).
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Formatter run as `<formatter> -w <file>` on every written file.
        #[arg(long, default_value = "goimports")]
        formatter: String,

        /// Do not run the formatter.
        #[arg(long)]
        no_format: bool,

        /// Print generated files without writing them (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the parsed schema as JSON.
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        parse: ParseArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            source,
            parse,
            out_dir,
            template,
            formatter,
            no_format,
            dry_run,
        } => {
            let text = source.source()?.load().await?;
            let schema = parse.parse(&text)?;
            info!(tables = schema.len(), "Parsed schema");

            let mut renderer = MiniJinjaRenderer::new();
            let template = match template {
                Some(path) => renderer.add_template_file(&path)?,
                None => DEFAULT_TEMPLATE.to_string(),
            };
            let config = GenerateConfig {
                out_dir,
                template,
                dry_run,
            };

            let mut generator = Generator::new(renderer, FsWriter, config);
            if !no_format {
                generator = generator.formatter(CommandFormatter::new(formatter));
            }
            let report = generator.generate(&schema)?;

            if dry_run {
                for file in &report.files {
                    println!("// {}\n{}", file.path.display(), file.text);
                }
            } else if report.format_failures > 0 {
                info!(
                    failures = report.format_failures,
                    "Some files were written unformatted"
                );
            }
        }

        Commands::Inspect { source, parse } => {
            let text = source.source()?.load().await?;
            let schema = parse.parse(&text)?;
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
    }

    Ok(())
}
