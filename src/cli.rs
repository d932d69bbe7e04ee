use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a bibliographic source and print the normalized result graph
    Search {
        /// Source to query: google or openlib
        #[arg(short, long, default_value = "openlib")]
        source: String,

        /// Author name to search for
        #[arg(short, long)]
        author: Option<String>,

        /// Book title to search for
        #[arg(short, long)]
        title: Option<String>,

        /// Maximum number of results, capped at 200
        #[arg(short, long, default_value_t = 50)]
        max_results: usize,

        /// Output language; any value other than "en" translates the
        /// textual fields of the result
        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Write the JSON report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Probe translation backend availability
    CheckTranslator,

    /// Write the default configuration to a file
    InitConfig {
        #[arg(short, long, default_value = "config.toml")]
        path: PathBuf,
    },
}
