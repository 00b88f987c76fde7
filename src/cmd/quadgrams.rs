use super::args::AlphabetArgs;
use super::streams;
use clap::Args;
use std::path::PathBuf;
use subforge::scorer::ModelBuilder;
use subforge::SfResult;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct QuadgramsArgs {
    /// Corpus file; repeat for several sources (stdin when omitted)
    #[arg(short, long)]
    pub corpus: Vec<PathBuf>,

    /// Where to write the table (stdout when omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,
}

pub fn run(args: QuadgramsArgs) -> SfResult<()> {
    let mut builder = ModelBuilder::new(args.alphabet.resolve()?)?;

    if args.corpus.is_empty() {
        builder.feed_reader(streams::open_input(None)?)?;
    } else {
        for path in &args.corpus {
            info!("Scanning {}", path.display());
            builder.feed_reader(streams::open_input(Some(path))?)?;
        }
    }

    let model = builder.build()?;
    model.save(streams::open_output(args.out.as_deref())?)?;

    if let Some(path) = &args.out {
        info!("Quadgrams written to {}", path.display());
    }
    Ok(())
}
