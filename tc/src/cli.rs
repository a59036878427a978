//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tc - compile-once Handlebars template cache
#[derive(Parser, Debug)]
#[command(name = "tc")]
#[command(author, version, about = "Compile-once Handlebars template cache", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Template sources; HTML files or template directories (replaces configured sources)
    #[arg(short, long = "source", global = true, value_name = "PATH")]
    pub sources: Vec<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a template with a data file
    Render {
        /// Template name
        #[arg(required = true)]
        name: String,

        /// JSON (.json) or YAML data file; empty context when omitted
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// List every template the sources can resolve
    List,

    /// Compile every template and report failures
    Check,

    /// Wrap template source in a named script block
    Wrap {
        /// Template name for the block
        #[arg(required = true)]
        name: String,

        /// File holding the template source (stdin when omitted)
        file: Option<PathBuf>,

        /// Use data-template-name instead of id
        #[arg(long)]
        ember: bool,
    },
}
