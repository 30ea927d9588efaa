//! CLI command definitions for tableau.
//!
//! This module defines the CLI structure using clap's derive macros. It is
//! part of the presentation layer: commands map one-to-one onto store
//! operations and queries.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::types::{Category, Priority, SortKey};

/// Single-user kanban task tracker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to the task database (overrides config)
    #[arg(short = 'D', long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Workflow stage the task starts in (default: a-lancer)
        #[arg(short = 'C', long, value_parser = parse_category)]
        category: Option<Category>,

        /// Task priority (default: none)
        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Edit fields of an existing task
    Edit {
        /// Task id
        id: String,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short = 'C', long, value_parser = parse_category)]
        category: Option<Category>,

        #[arg(short, long, value_parser = parse_priority)]
        priority: Option<Priority>,
    },

    /// Move a task to another stage
    Move {
        id: String,

        #[arg(value_parser = parse_category)]
        category: Category,
    },

    /// Delete a task
    Delete {
        id: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show the kanban board
    Board,

    /// Show the task table
    Table {
        /// Sort key; repeat the same key to flip the direction
        #[arg(short, long, value_parser = parse_sort_key)]
        sort: Vec<SortKey>,
    },

    /// Show tasks in the last-used view
    Show,

    /// Toggle between board and table view
    View,
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::from_str(s).ok_or_else(|| {
        format!(
            "unknown category '{}' (expected a-lancer, en-cours, a-finir or complet)",
            s
        )
    })
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::from_str(s).ok_or_else(|| {
        format!(
            "unknown priority '{}' (expected urgent, high, medium, low or none)",
            s
        )
    })
}

fn parse_sort_key(s: &str) -> Result<SortKey, String> {
    SortKey::from_str(s)
        .ok_or_else(|| format!("unknown sort key '{}' (expected category, date or name)", s))
}
