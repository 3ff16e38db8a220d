//! Mender CLI entry point

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "mender")]
#[command(about = "Graph-aware line editing with snapshot history for large OpenAPI schema documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Context directory holding the document (defaults to current directory)
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a line range, or the first lines of the document
    Preview {
        #[arg(long, requires = "end")]
        start: Option<i64>,
        #[arg(long, requires = "start")]
        end: Option<i64>,
    },
    /// Search for matching lines
    Search {
        /// Literal text to find
        #[arg(long, conflicts_with = "pattern", required_unless_present = "pattern")]
        text: Option<String>,
        /// Regular expression to find
        #[arg(long)]
        pattern: Option<String>,
        /// Context lines around each match
        #[arg(short, long)]
        context: Option<i64>,
    },
    /// Replace every occurrence and print the diff
    Replace {
        /// Literal text to replace
        #[arg(long, conflicts_with = "pattern", required_unless_present = "pattern")]
        old: Option<String>,
        /// Regular expression to replace (replacement text is literal)
        #[arg(long)]
        pattern: Option<String>,
        /// Replacement text
        #[arg(long)]
        new: String,
        #[arg(short, long)]
        context: Option<i64>,
    },
    /// Insert text after a line (0 inserts at the top)
    Insert {
        #[arg(long)]
        line: i64,
        #[arg(long)]
        text: String,
        #[arg(short, long)]
        context: Option<i64>,
    },
    /// List paths that depend on a component
    Related {
        /// Component reference, e.g. `#/components/schemas/Pet`
        component_ref: String,
        #[arg(short, long, default_value = "1")]
        max_distance: i64,
    },
    /// Keep only the named paths in the document
    ExtractPaths {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// Run a raw JSON tool call and print the JSON result
    Call {
        json: String,
    },
    /// Snapshot the document if it changed
    Commit,
    /// Show document and history state
    Status,
    /// Diff a snapshot against the current document
    Diff {
        /// Snapshot to compare with (defaults to the one before the newest)
        snapshot: Option<String>,
        /// Elide the middle of diffs longer than this
        #[arg(long)]
        max_lines: Option<usize>,
    },
    /// List snapshots, oldest first
    Snapshots,
    /// Restore the document from a snapshot
    Restore {
        id: String,
    },
    /// Remove cached graphs
    ClearCache,
    /// Show version
    Version,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output.
    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "mender={log_level},mender_core={log_level},mender_indexer={log_level},\
             mender_editor={log_level},mender_history={log_level},mender_tools={log_level}"
        ))
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Mender v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!("Context directory: {}", cli.root.display());

    let root = cli.root;
    match cli.command {
        Commands::Preview { start, end } => commands::preview(&root, start, end),
        Commands::Search { text, pattern, context } => commands::search(&root, text, pattern, context),
        Commands::Replace { old, pattern, new, context } => {
            commands::replace(&root, old, pattern, new, context)
        }
        Commands::Insert { line, text, context } => commands::insert(&root, line, text, context),
        Commands::Related { component_ref, max_distance } => {
            commands::related(&root, component_ref, max_distance)
        }
        Commands::ExtractPaths { paths } => commands::extract_paths(&root, paths),
        Commands::Call { json } => commands::call(&root, &json),
        Commands::Commit => commands::commit(&root),
        Commands::Status => commands::status(&root),
        Commands::Diff { snapshot, max_lines } => commands::diff(&root, snapshot, max_lines),
        Commands::Snapshots => commands::snapshots(&root),
        Commands::Restore { id } => commands::restore(&root, &id),
        Commands::ClearCache => commands::clear_cache(&root),
        Commands::Version => {
            println!("Mender v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
