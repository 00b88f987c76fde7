use super::streams;
use crate::reports;
use clap::{ArgMatches, Args};
use std::path::PathBuf;
use subforge::config::SearchParams;
use subforge::optimizer::{Breaker, ProgressCallback, SearchOptions};
use subforge::SfResult;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct BreakArgs {
    #[command(flatten)]
    pub search: SearchParams,

    /// JSON search profile; flags given on the command line win
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ciphertext to break
    #[arg(short, long, conflicts_with = "ciphertext")]
    pub text: Option<String>,

    /// Read the ciphertext from a file instead of stdin
    #[arg(long)]
    pub ciphertext: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

struct RoundLogger;

impl ProgressCallback for RoundLogger {
    fn on_round(&self, round: usize, best_fitness: f64, consolidation: usize) -> bool {
        debug!(
            "Round {:4} | best fitness {:.2} | consolidation {}",
            round, best_fitness, consolidation
        );
        true
    }
}

pub fn run(args: BreakArgs, matches: Option<&ArgMatches>, breaker: &Breaker) -> SfResult<()> {
    let params = match &args.config {
        Some(path) => {
            info!("Loading search profile from {}", path.display());
            let mut params = SearchParams::load_from_file(path)?;
            if let Some(m) = matches {
                params.merge_from_cli(&args.search, m);
            }
            params
        }
        None => args.search.clone(),
    };
    params.validate()?;

    let ciphertext = streams::read_text(args.text.as_deref(), args.ciphertext.as_deref())?;
    let options = SearchOptions::from(&params);
    let result = breaker.search(&ciphertext, &options, &RoundLogger)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        reports::print_search_result(&result);
    }
    Ok(())
}
