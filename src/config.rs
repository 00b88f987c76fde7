use crate::consts::{CONSOLIDATE_RANGE, DEFAULT_CONSOLIDATE, DEFAULT_MAX_TRIES, MAX_TRIES_RANGE};
use crate::error::{SfResult, SubForgeError};
use clap::{parser::ValueSource, ArgMatches, Args};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    /// Number of rounds that must rediscover the best key before it is accepted
    #[arg(short = 'n', long, default_value_t = DEFAULT_CONSOLIDATE)]
    pub consolidate: usize,

    /// Maximum number of rounds
    #[arg(short = 'm', long, default_value_t = DEFAULT_MAX_TRIES)]
    pub max_tries: usize,

    /// Worker threads for concurrent rounds (0 = all cores)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub threads: usize,

    /// Seed for reproducible searches
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            consolidate: DEFAULT_CONSOLIDATE,
            max_tries: DEFAULT_MAX_TRIES,
            threads: 0,
            seed: None,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> SfResult<()> {
        if !CONSOLIDATE_RANGE.contains(&self.consolidate) {
            return Err(SubForgeError::Configuration(format!(
                "consolidate must be within {}..={} (got {})",
                CONSOLIDATE_RANGE.start(),
                CONSOLIDATE_RANGE.end(),
                self.consolidate
            )));
        }
        if !MAX_TRIES_RANGE.contains(&self.max_tries) {
            return Err(SubForgeError::Configuration(format!(
                "max_tries must be within {}..={} (got {})",
                MAX_TRIES_RANGE.start(),
                MAX_TRIES_RANGE.end(),
                self.max_tries
            )));
        }
        Ok(())
    }

    /// Reads a JSON search profile. Missing fields take their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SfResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            SubForgeError::Configuration(format!(
                "Failed to read search profile '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            SubForgeError::Configuration(format!(
                "Failed to parse search profile '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Overlays the values typed on the command line onto `self`.
    pub fn merge_from_cli(&mut self, cli: &SearchParams, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(consolidate);
        update_if_present!(max_tries);
        update_if_present!(threads);
        update_if_present!(seed);
    }
}
