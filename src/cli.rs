use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "lexcollect",
    version,
    about = "Collect pronunciations and romanizations from Wiktextract and CMUdict"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Extract IPA and romanizations from a Wiktextract JSONL dump
    Wiktionary {
        /// Wiktextract dump, one JSON record per line
        #[arg(required_unless_present = "list_rules")]
        input: Option<PathBuf>,

        /// Directory receiving ipa/, roman/ and ascii/ tables
        #[arg(required_unless_present = "list_rules")]
        output: Option<PathBuf>,

        /// Print the compiled extraction rules, one per line, then exit
        #[arg(long)]
        list_rules: bool,
    },
    /// Convert the CMU Pronouncing Dictionary to IPA
    Cmudict {
        /// CMUdict file
        input: PathBuf,

        /// Output file
        output: PathBuf,
    },
}

impl Args {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }
}
