//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::OutputFormat;

/// Location hierarchy resolver: descendants, ancestors and trees from partOf-linked records
#[derive(Parser, Debug)]
#[command(name = "loctree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Location source: JSON file or directory of *.json files
    #[arg(short, long, global = true, env = "LOCTREE_LOCATIONS", value_hint = ValueHint::AnyPath)]
    pub file: Option<PathBuf>,

    /// Output format (default from config)
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all descendants of a location (level order)
    Children {
        /// Root location id
        root: String,
    },

    /// Show hierarchy as tree (whole forest without root)
    Tree {
        /// Root location id
        root: Option<String>,
    },

    /// List descendants without children
    Leaves {
        /// Root location id
        root: String,
    },

    /// List parent chain of a location, nearest first
    Ancestors {
        /// Location id
        id: String,
    },

    /// List locations without a resolvable parent
    Roots,

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
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
