use crate::reports;
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use subforge::scorer::{loader, QuadgramModel};
use subforge::SfResult;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Also list the N heaviest quadgrams
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Export every quadgram weight as CSV
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Print the metadata as JSON
    #[arg(long, default_value_t = false, conflicts_with = "top")]
    pub json: bool,
}

pub fn run(args: InfoArgs, model: &QuadgramModel) -> SfResult<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(model.info())?);
    } else {
        reports::print_model_info(model.info(), model.observed_count());
    }

    if let Some(n) = args.top {
        reports::print_top_quadgrams(&model.top_quadgrams(n));
    }

    if let Some(path) = &args.csv {
        loader::export_csv(model, BufWriter::new(File::create(path)?))?;
        info!("Exported {} quadgrams to {}", model.observed_count(), path.display());
    }
    Ok(())
}
