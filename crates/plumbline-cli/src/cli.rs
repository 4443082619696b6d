use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::page_range::PageRange;

/// Punctuation used when `--split-at-punctuation` is given without a value.
pub const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Extract text, words, tables and search hits from JSON page dumps.
#[derive(Debug, Parser)]
#[command(name = "plumbline", about, version)]
pub struct Cli {
    /// Log pipeline details to stderr (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract text from pages
    Text {
        /// Path to the page dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<PageRange>,

        /// Use layout-preserving text extraction
        #[arg(long)]
        layout: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },

    /// Extract words with bounding box coordinates
    Words {
        /// Path to the page dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<PageRange>,

        /// Horizontal tolerance for word grouping
        #[arg(long, default_value_t = 3.0)]
        x_tolerance: f64,

        /// Vertical tolerance for word grouping
        #[arg(long, default_value_t = 3.0)]
        y_tolerance: f64,

        /// Split words at these characters (all ASCII punctuation if no value is given)
        #[arg(
            long,
            value_name = "CHARS",
            num_args = 0..=1,
            default_missing_value = ASCII_PUNCTUATION
        )]
        split_at_punctuation: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Detect tables and extract their cell text
    Tables {
        /// Path to the page dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<PageRange>,

        /// Table setting override, repeatable (e.g. 'vertical_strategy=text')
        #[arg(long = "setting", value_name = "KEY=VALUE", value_parser = parse_setting)]
        settings: Vec<(String, String)>,

        /// Only the largest table of each page
        #[arg(long)]
        best: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Search for text patterns with position information
    Search {
        /// Path to the page dump
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Search pattern (regex unless --literal)
        #[arg(value_name = "PATTERN")]
        pattern: String,

        /// Page range (e.g. '1,3-5'). Default: all pages
        #[arg(long)]
        pages: Option<PageRange>,

        /// Treat the pattern as a literal string
        #[arg(long)]
        literal: bool,

        /// Match regardless of case
        #[arg(long)]
        ignore_case: bool,

        /// Search the layout-preserving text instead of the simple text
        #[arg(long)]
        layout: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = TextFormat::Text)]
        format: TextFormat,
    },
}

/// Output format for the text and search subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TextFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}

/// Output format for the words and tables subcommands.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Plain text (tab-separated or grid)
    Text,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

fn parse_setting(arg: &str) -> Result<(String, String), String> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{arg}'"))?;
    Ok((key.trim().to_string(), value.trim().to_string()))
}
