use super::streams;
use clap::Args;
use std::path::PathBuf;
use subforge::optimizer::Breaker;
use subforge::SfResult;

#[derive(Args, Debug, Clone)]
pub struct FitnessArgs {
    /// Text to score
    #[arg(short, long, conflicts_with = "plaintext")]
    pub text: Option<String>,

    /// Read the text from a file instead of stdin
    #[arg(long)]
    pub plaintext: Option<PathBuf>,
}

pub fn run(args: FitnessArgs, breaker: &Breaker) -> SfResult<()> {
    let fitness = match &args.text {
        Some(text) => breaker.calc_fitness(text)?,
        None => breaker
            .model()
            .fitness_reader(streams::open_input(args.plaintext.as_deref())?)?,
    };
    println!("{:.2}", fitness);
    Ok(())
}
