//! CLI definitions for Softline.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use softline_protocols::ServiceKind;

/// Softline CLI.
#[derive(Parser)]
#[command(name = "softline")]
#[command(about = "Detect toxic text and rewrite it in a gentler tone")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/softline.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run one pipeline pass over a document and print the result as HTML
    Rewrite {
        /// Read the document from a file, one paragraph per line
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Page URL recorded with each replacement
        #[arg(long)]
        url: Option<String>,

        /// Rewrite style key (see `softline styles`)
        #[arg(short, long)]
        style: Option<String>,

        /// Backend to use: primary (openai) or secondary (huggingface)
        #[arg(short, long)]
        backend: Option<ServiceKind>,

        /// Inline text, one paragraph per line
        #[arg(required_unless_present = "file")]
        text: Option<String>,
    },

    /// Score texts and print the assessments as JSON
    Score {
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Show stored analytics
    Analytics {
        /// Clear history, daily stats and the total
        #[arg(long)]
        clear: bool,

        /// Print the raw snapshot as JSON
        #[arg(long, conflicts_with = "clear")]
        json: bool,

        /// Number of domains to list
        #[arg(long, default_value_t = 5)]
        top: usize,
    },

    /// List rewrite styles
    Styles,
}
