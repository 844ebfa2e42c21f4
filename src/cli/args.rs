//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Import and export GEDCOM family-tree files
#[derive(Parser, Debug)]
#[command(name = "kinship")]
#[command(about = "Import and export GEDCOM family-tree files")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import a GEDCOM file into a family graph
    Import {
        /// Path to the GEDCOM file
        file: PathBuf,

        /// Output path for the mapped graph JSON
        #[arg(short, long, default_value = "./graph.json")]
        output: PathBuf,

        /// Write the findings report to this path as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Producer name recorded in config-driven output
        #[arg(long)]
        producer: Option<String>,

        /// Reject the batch on any finding, warnings included
        #[arg(long)]
        abort_on_warnings: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Validate a GEDCOM file without importing anything
    Validate {
        /// Path to the GEDCOM file
        file: PathBuf,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export a family graph to GEDCOM text
    Export {
        /// Path to the family graph JSON
        graph: PathBuf,

        /// Output path for the generated GEDCOM file
        #[arg(short, long, default_value = "./export.ged")]
        output: PathBuf,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Producer name emitted in the generated header
        #[arg(long)]
        producer: Option<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show version information
    Version,
}
