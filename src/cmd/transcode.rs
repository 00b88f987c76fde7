use super::args::KeyArgs;
use super::streams;
use clap::Args;
use std::io::Write;
use std::path::PathBuf;
use subforge::key::SubstitutionKey;
use subforge::SfResult;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Encode with a random key (printed to stderr)
    #[arg(short, long, conflicts_with_all = ["key", "keyword"])]
    pub random: bool,

    /// Text to encode
    #[arg(short, long, conflicts_with = "plaintext")]
    pub text: Option<String>,

    /// Read the plaintext from a file instead of stdin
    #[arg(long)]
    pub plaintext: Option<PathBuf>,

    /// Write the ciphertext to a file instead of stdout
    #[arg(long)]
    pub ciphertext: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Text to decode
    #[arg(short, long, conflicts_with = "ciphertext")]
    pub text: Option<String>,

    /// Read the ciphertext from a file instead of stdin
    #[arg(long)]
    pub ciphertext: Option<PathBuf>,

    /// Write the plaintext to a file instead of stdout
    #[arg(long)]
    pub plaintext: Option<PathBuf>,
}

pub fn encode(args: EncodeArgs) -> SfResult<()> {
    let key = if args.random {
        let key = SubstitutionKey::random(args.key.alphabet.resolve()?, &mut fastrand::Rng::new());
        eprintln!("key = {}", key);
        key
    } else {
        args.key.require()?
    };
    debug!("Encoding with {:?}", key);

    let out = streams::open_output(args.ciphertext.as_deref())?;
    match &args.text {
        Some(text) => write_line(out, &key.encode(text)),
        None => key.encode_stream(streams::open_input(args.plaintext.as_deref())?, out),
    }?;
    if let Some(path) = &args.ciphertext {
        info!("Ciphertext written to {}", path.display());
    }
    Ok(())
}

pub fn decode(args: DecodeArgs) -> SfResult<()> {
    let key = args.key.require()?;
    debug!("Decoding with {:?}", key);

    let out = streams::open_output(args.plaintext.as_deref())?;
    match &args.text {
        Some(text) => write_line(out, &key.decode(text)),
        None => key.decode_stream(streams::open_input(args.ciphertext.as_deref())?, out),
    }?;
    if let Some(path) = &args.plaintext {
        info!("Plaintext written to {}", path.display());
    }
    Ok(())
}

fn write_line(mut out: Box<dyn Write>, text: &str) -> SfResult<()> {
    writeln!(out, "{}", text)?;
    out.flush()?;
    Ok(())
}
