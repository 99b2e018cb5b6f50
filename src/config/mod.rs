#[cfg(feature = "cli")]
pub mod cli;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{NullRendering, OutputFormat};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "twarc-filter")]
#[command(about = "Keep selected fields of flattened tweets and write JSON lines or CSV")]
pub struct CliConfig {
    /// Input file with one tweet (or array of tweets) per JSON value; stdin when omitted
    #[arg(short, long)]
    pub infile: Option<PathBuf>,

    /// Output file; stdout when omitted
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Dotted field path to keep, e.g. referenced_tweets.author.username
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub extension: Option<OutputFormat>,

    /// Only keep tweets referencing another tweet with this relation (retweeted, quoted, replied_to)
    #[arg(long)]
    pub related: Option<String>,

    /// How null values are written into CSV cells
    #[arg(long, value_enum)]
    pub null_as: Option<NullRendering>,

    /// Treat the input as exactly one JSON value per line
    #[arg(long)]
    pub lines: bool,

    /// Skip malformed lines instead of aborting (needs --lines)
    #[arg(long)]
    pub skip_malformed: bool,

    /// Spread top-level arrays into one record per element
    #[arg(long)]
    pub split_arrays: bool,

    /// Abort on projection conflicts instead of keeping the first-seen value
    #[arg(long)]
    pub strict: bool,

    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Log CPU and memory usage after each pass
    #[arg(long)]
    pub monitor: bool,
}
