use clap::Args;
use subforge::key::{Alphabet, KnownAlphabet, SubstitutionKey};
use subforge::{SfResult, SubForgeError};

#[derive(Args, Debug, Clone)]
pub struct AlphabetArgs {
    /// Alphabet as a string of distinct characters
    #[arg(short, long, conflicts_with = "preset")]
    pub alphabet: Option<String>,

    /// Built-in alphabet (latin, german, spanish, swedish, danish)
    #[arg(short, long)]
    pub preset: Option<KnownAlphabet>,
}

impl AlphabetArgs {
    pub fn resolve(&self) -> SfResult<Alphabet> {
        match (&self.alphabet, self.preset) {
            (Some(chars), _) => Alphabet::new(chars),
            (None, Some(preset)) => Ok(preset.alphabet()),
            (None, None) => Ok(Alphabet::default()),
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// Full key, one character per alphabet position
    #[arg(short, long, conflicts_with = "keyword")]
    pub key: Option<String>,

    /// Keyword expanded into a key
    #[arg(short = 'w', long)]
    pub keyword: Option<String>,

    #[command(flatten)]
    pub alphabet: AlphabetArgs,
}

impl KeyArgs {
    /// `None` when neither `--key` nor `--keyword` was given.
    pub fn resolve(&self) -> SfResult<Option<SubstitutionKey>> {
        let alphabet = self.alphabet.resolve()?;
        match (&self.key, &self.keyword) {
            (Some(key), _) => SubstitutionKey::new(key, alphabet).map(Some),
            (None, Some(word)) => SubstitutionKey::from_keyword(word, alphabet).map(Some),
            (None, None) => Ok(None),
        }
    }

    pub fn require(&self) -> SfResult<SubstitutionKey> {
        self.resolve()?.ok_or_else(|| {
            SubForgeError::Validation("either --key or --keyword is required".to_string())
        })
    }
}
