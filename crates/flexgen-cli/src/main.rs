//! flexgen command-line tool
//!
//! Runs the annotation pipeline over C++ sources and rewrites them in place.

mod commands;
mod config;
mod diagnostic;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "flexgen")]
#[command(about = "Annotation-driven code generation for C++ sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Colored output: auto, always, never
    #[arg(long, global = true, value_parser = ["auto", "always", "never"])]
    color: Option<String>,

    /// Configuration file (default: nearest flexgen.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process files and write the generated code back
    Run {
        /// Files or directories to process
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
        /// Report files that would change without writing them
        #[arg(long)]
        check: bool,
        /// Print the output of a single file instead of writing it
        #[arg(long, conflicts_with = "check")]
        stdout: bool,
        /// Output format: pretty or json
        #[arg(long, default_value = "pretty", value_parser = ["pretty", "json"])]
        format: String,
        /// Worker threads (default: number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Report handler failures and continue with the rest of the file
        #[arg(long)]
        keep_going: bool,
        /// Program that executes `executeCode*` payloads (code on stdin)
        #[arg(long)]
        interpreter: Option<String>,
        /// Argument passed to the interpreter program (repeatable)
        #[arg(long = "interpreter-arg", allow_hyphen_values = true)]
        interpreter_args: Vec<String>,
    },

    /// Decode one annotation marker and print it as JSON
    Decode {
        /// Marker text, e.g. "{gen};{attr};reflectable"
        marker: String,
    },

    /// List registered handlers
    Handlers,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;
    let color = output::resolve_color_choice(cli.color.as_deref());

    match cli.command {
        Commands::Run {
            paths,
            check,
            stdout,
            format,
            jobs,
            keep_going,
            interpreter,
            interpreter_args,
        } => {
            commands::run::execute(commands::run::RunOptions {
                paths,
                check,
                stdout,
                json: format == "json",
                jobs,
                keep_going,
                interpreter,
                interpreter_args,
                config: cli.config,
                color,
            })?;
        }

        Commands::Decode { marker } => {
            commands::decode::execute(&marker)?;
        }

        Commands::Handlers => {
            commands::handlers::execute(color);
        }
    }

    Ok(())
}
