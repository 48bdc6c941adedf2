//! Knit CLI - build stitch graphs from knitting patterns
//!
//! Simulates the needles for each pattern and exports the resulting fabric
//! as DOT, adjacency matrices or JSON node/edge documents.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::KnitConfig;
use output::{ErrorMessage, Output, OutputConfig, OutputFormat};

/// Turn knitting patterns into stitch graphs.
#[derive(Parser)]
#[command(name = "knit")]
#[command(author, version)]
#[command(about = "Turn knitting patterns into stitch graphs")]
#[command(
    long_about = "Reads knitting patterns row by row, simulates the two needles and\nexports the fabric as a graph: one node per stitch, horizontal edges\nalong a row and vertical edges from each stitch to the ones worked into it."
)]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  knit build swatch.txt            Print the DOT graph of one pattern
  knit batch patterns/ -o out      Build every pattern in a directory
  knit inspect swatch.txt -s 12    Fabric statistics and one stitch's neighbours
  knit validate patterns/          Sort files by recognized stitch vocabulary")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Never truncate long table cells
    #[arg(long, global = true)]
    no_truncate: bool,

    /// Compact output (borderless tables, single-line JSON)
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the stitch graph of one pattern
    #[command(visible_alias = "b")]
    Build {
        /// Pattern file
        pattern: PathBuf,

        /// Technique definition file (overrides config)
        #[arg(short, long, env = "KNIT_TECHNIQUES")]
        techniques: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = build::ExportKind::Dot)]
        export: build::ExportKind,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build every pattern under a directory in parallel
    Batch {
        /// Pattern directory (or a single file)
        #[arg(default_value = ".")]
        input: PathBuf,

        /// Directory receiving the dot/matrix/json subdirectories
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Technique definition file (overrides config)
        #[arg(short, long, env = "KNIT_TECHNIQUES")]
        techniques: Option<PathBuf>,

        /// Worker threads (default: one per CPU)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Also write JSON node/edge documents
        #[arg(long)]
        json: bool,

        /// Skip adjacency matrices
        #[arg(long)]
        no_matrix: bool,
    },

    /// Show fabric statistics for one pattern
    Inspect {
        /// Pattern file
        pattern: PathBuf,

        /// Technique definition file (overrides config)
        #[arg(short, long, env = "KNIT_TECHNIQUES")]
        techniques: Option<PathBuf>,

        /// Also show the neighbourhood of this stitch
        #[arg(short, long)]
        stitch: Option<usize>,
    },

    /// Classify pattern files by recognized stitch vocabulary
    Validate {
        /// Pattern directory (or a single file)
        #[arg(default_value = ".")]
        input: PathBuf,

        /// Directory receiving the list and summary files
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// Technique definition file (overrides config)
        #[arg(short, long, env = "KNIT_TECHNIQUES")]
        techniques: Option<PathBuf>,
    },

    /// Convert a laid-out node/edge document to node-link JSON
    Convert {
        /// Node/edge JSON document with x/y coordinates
        input: PathBuf,

        /// Output file (default: <input>_nodelink.json)
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: completions::Shell,

        /// Show installation instructions instead of generating completions
        #[arg(long)]
        instructions: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = KnitConfig::load(std::path::Path::new("."));

    // CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });
    let output_config = OutputConfig::from_flags(format, cli.no_truncate, cli.compact);

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    let result = match command {
        Commands::Build {
            pattern,
            techniques,
            export,
            output,
        } => build::run(
            &pattern,
            techniques.as_deref(),
            export,
            output.as_deref(),
            &config,
            &output_config,
        ),
        Commands::Batch {
            input,
            out_dir,
            techniques,
            threads,
            json,
            no_matrix,
        } => {
            let args = batch::BatchArgs {
                input,
                out_dir,
                techniques,
                threads,
                json,
                no_matrix,
            };
            batch::run(&args, &config, cli.quiet, &output_config)
        }
        Commands::Inspect {
            pattern,
            techniques,
            stitch,
        } => inspect::run(&pattern, techniques.as_deref(), stitch, &config, &output_config),
        Commands::Validate {
            input,
            out_dir,
            techniques,
        } => validate::run(&input, &out_dir, techniques.as_deref(), &config, &output_config),
        Commands::Convert { input, output } => {
            convert::run(&input, output.as_deref(), &output_config)
        }
        Commands::Completions {
            shell,
            instructions,
        } => {
            if instructions {
                completions::run_instructions(shell, &output_config)
            } else {
                let mut cmd = Cli::command();
                completions::generate_completions_with_cmd(shell, &mut cmd);
                Ok(())
            }
        }
    };

    // Keep stdout parseable for JSON consumers
    if let (Err(e), OutputFormat::Json) = (&result, format) {
        let message = ErrorMessage::with_details(e.to_string(), format!("{:#}", e));
        Output::with_config(message, &output_config).render()?;
        std::process::exit(1);
    }

    result
}
