pub mod cli;
pub mod cmudict;
pub mod config;
pub mod fs;
pub mod normalize;
pub mod query;
pub mod storage;
pub mod wiktionary;

use anyhow::{Context, Result};
use tracing::{debug, info};

use cli::{Args, Command};
use config::load_config;
use query::RuleSet;

/// Run one command. Returns the exit code: 0 = success, 2 = usage error.
pub fn run(args: Args) -> Result<i32> {
    let config = load_config(args.config.as_deref())?;

    if args.debug {
        match config.config_dir() {
            Some(dir) => debug!("config loaded from: {}", dir.display()),
            None => debug!("no config file found"),
        }
    }

    match args.command {
        Command::Wiktionary {
            input,
            output,
            list_rules,
        } => {
            let rules = RuleSet::standard().context("invalid extraction rule")?;

            // --list-rules: print every compiled rule and exit
            if list_rules {
                for group in rules.pronunciation.iter().chain(&rules.romanization) {
                    println!("{group}");
                }
                return Ok(0);
            }

            let (Some(input), Some(output)) = (input, output) else {
                eprintln!("error: wiktionary needs <INPUT> and <OUTPUT>");
                return Ok(2);
            };
            let stats = wiktionary::run_wiktionary(&input, &output, &config.wiktionary, &rules)?;
            debug!(lines = stats.lines, malformed = stats.malformed, "wiktionary finished");
            Ok(0)
        }
        Command::Cmudict { input, output } => {
            let written = cmudict::run_cmudict(&input, &output, &config.cmudict)?;
            info!("Wrote {} entries to {}", written, output.display());
            Ok(0)
        }
    }
}
