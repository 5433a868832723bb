//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Inspect tree-shaped row files the way a tree data grid renders them
#[derive(Parser, Debug)]
#[command(name = "treegrid")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the visible rows for an expansion state
    Show {
        /// Row file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Toggle these ids, in order (repeatable)
        #[arg(short, long = "expand", value_name = "ID")]
        expand: Vec<String>,
        /// Expand every node with children
        #[arg(short = 'a', long, conflicts_with = "depth")]
        expand_all: bool,
        /// Expand the first N levels (default from config)
        #[arg(long, value_name = "N")]
        depth: Option<usize>,
        /// Make these ids visible by expanding their ancestors (repeatable)
        #[arg(short, long = "reveal", value_name = "ID")]
        reveal: Vec<String>,
    },

    /// Print the full hierarchy as a tree
    Tree {
        /// Row file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Report orphans, cycles, duplicate ids and level mismatches
    Check {
        /// Row file (.json or .toml)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show {
        /// Directory whose local .treegrid.toml is applied
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },
    /// Print a commented config template
    Template,
    /// Show config file locations
    Path,
}
