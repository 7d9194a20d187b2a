//! SourceFlow CLI - Command-line interface for SourceFlow
//!
//! Turns per-file analysis records into a cross-file call graph and writes
//! diagrams of it.

use clap::{Parser, Subcommand};
use colored::Colorize;
use sourceflow_render::Format;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "sourceflow")]
#[command(author = "SourceFlow Contributors")]
#[command(version)]
#[command(about = "Call graphs and execution paths from per-file code analysis", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config to .sourceflow/config.json
    Init {
        /// Project root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// List the code files that would be analyzed
    Scan {
        /// Project root (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Analyze a project and write the summary and diagrams
    Analyze {
        /// Project root
        root: PathBuf,

        /// Directory of per-file analyzer responses
        #[arg(short, long)]
        records: PathBuf,

        /// Output directory (defaults to <root>/results)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replay <output>/analysis_data.json instead of analyzing again
        #[arg(long)]
        skip_analysis: bool,

        /// Limit function and dependency diagrams to the N most connected nodes
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Diagram formats to write
        #[arg(short, long = "format", default_value = "mermaid", num_args = 1..)]
        formats: Vec<Format>,
    },

    /// Regenerate diagrams from an exported analysis_data.json
    Render {
        /// Exported summary
        input: PathBuf,

        /// Output directory (defaults to the input's directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Project root whose config supplies ranking settings
        #[arg(short, long)]
        project: Option<PathBuf>,

        /// Limit function and dependency diagrams to the N most connected nodes
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Diagram formats to write
        #[arg(short, long = "format", default_value = "mermaid", num_args = 1..)]
        formats: Vec<Format>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Scan { path } => commands::scan(&path),
        Commands::Analyze {
            root,
            records,
            output,
            skip_analysis,
            max_nodes,
            formats,
        } => commands::analyze(
            &root,
            &records,
            output.as_deref(),
            skip_analysis,
            max_nodes,
            &formats,
        ),
        Commands::Render {
            input,
            output,
            project,
            max_nodes,
            formats,
        } => commands::render(
            &input,
            output.as_deref(),
            project.as_deref(),
            max_nodes,
            &formats,
        ),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
