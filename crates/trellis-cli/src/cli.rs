use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "trellis",
    about = "Trellis — hierarchical taxonomy store for content platforms",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file.
    #[arg(long, global = true, default_value = "trellis.toml")]
    pub config: PathBuf,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and write a default config
    Init,
    /// Reconcile the post index and shard directory
    Recover,
    /// Inspect and edit the category tree
    #[command(subcommand)]
    Category(CategoryCommand),
    /// Inspect and edit posts
    #[command(subcommand)]
    Post(PostCommand),
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// Print the category tree
    List,
    /// Create a category
    Create {
        name: String,
        /// Parent category id (omit for a root category)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename a category, retagging its posts
    Rename { id: String, name: String },
    /// Move a category under a new parent (omit --parent for the root)
    Move {
        id: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Delete a category; children become roots, posts fall back to the
    /// default category
    Delete { id: String },
    /// Reorder the siblings under a parent (ids in the desired order)
    Reorder {
        #[arg(long)]
        parent: Option<String>,
        ids: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum PostCommand {
    /// List all posts
    List,
    /// Add a post
    Add {
        slug: String,
        title: String,
        /// Category name (defaults to the default category)
        #[arg(long)]
        category: Option<String>,
        /// Store as a draft
        #[arg(long)]
        draft: bool,
    },
    /// Show one post (point read from its shard)
    Show { slug: String },
    /// Remove a post
    Remove { slug: String },
}
