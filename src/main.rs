use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use subforge::api::ModelLibrary;
use subforge::optimizer::Breaker;
use subforge::scorer::QuadgramModel;
use subforge::SfResult;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Breaks monoalphabetic substitution ciphers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Language of the quadgram table to load from the data directory
    #[arg(global = true, short, long, default_value = "EN")]
    lang: String,

    #[arg(global = true, long, default_value = "data/quadgrams")]
    data_dir: PathBuf,

    /// Explicit quadgram table (overrides --lang)
    #[arg(global = true, long)]
    model: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Recover the key of a ciphertext
    Break(cmd::break_cipher::BreakArgs),
    /// Encode plaintext with a known key
    Encode(cmd::transcode::EncodeArgs),
    /// Decode ciphertext with a known key
    Decode(cmd::transcode::DecodeArgs),
    /// Score how much a text resembles the modelled language
    Fitness(cmd::fitness::FitnessArgs),
    /// Show the metadata of a quadgram table
    Info(cmd::info::InfoArgs),
    /// Generate a quadgram table from corpus text
    Quadgrams(cmd::quadgrams::QuadgramsArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();

    if let Err(e) = run(cli, &matches) {
        error!("{}", e);
        process::exit(1);
    }
}

fn run(cli: Cli, matches: &ArgMatches) -> SfResult<()> {
    match &cli.command {
        Commands::Encode(args) => cmd::transcode::encode(args.clone()),
        Commands::Decode(args) => cmd::transcode::decode(args.clone()),
        Commands::Quadgrams(args) => cmd::quadgrams::run(args.clone()),
        Commands::Info(args) => {
            let model = load_model(&cli)?;
            cmd::info::run(args.clone(), &model)
        }
        Commands::Fitness(args) => cmd::fitness::run(args.clone(), &load_breaker(&cli)?),
        Commands::Break(args) => cmd::break_cipher::run(
            args.clone(),
            matches.subcommand_matches("break"),
            &load_breaker(&cli)?,
        ),
    }
}

fn load_from_file(path: &Path) -> SfResult<Arc<QuadgramModel>> {
    info!("Loading quadgrams from {}", path.display());
    Ok(Arc::new(QuadgramModel::load_from_path(path)?))
}

fn load_model(cli: &Cli) -> SfResult<Arc<QuadgramModel>> {
    match &cli.model {
        Some(path) => load_from_file(path),
        None => ModelLibrary::new(&cli.data_dir).get(&cli.lang),
    }
}

fn load_breaker(cli: &Cli) -> SfResult<Breaker> {
    match &cli.model {
        Some(path) => Ok(Breaker::new(load_from_file(path)?)),
        None => ModelLibrary::new(&cli.data_dir).breaker(&cli.lang),
    }
}
