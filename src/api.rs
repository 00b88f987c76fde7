use crate::error::{SfResult, SubForgeError};
use crate::optimizer::Breaker;
use crate::scorer::QuadgramModel;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

const MODEL_EXTENSION: &str = "json";

/// Quadgram tables stored as `<data_dir>/<LANG>.json`, loaded on first use
/// and shared afterwards.
pub struct ModelLibrary {
    data_dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<QuadgramModel>>>,
}

impl ModelLibrary {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, lang: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", normalize(lang), MODEL_EXTENSION))
    }

    /// Language codes with a table in the data directory, sorted.
    pub fn languages(&self) -> SfResult<Vec<String>> {
        if !self.data_dir.is_dir() {
            warn!("Model directory {:?} does not exist", self.data_dir);
            return Ok(Vec::new());
        }

        let mut langs = Vec::new();
        for entry in fs::read_dir(&self.data_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                langs.push(normalize(stem));
            }
        }
        langs.sort();
        langs.dedup();
        Ok(langs)
    }

    pub fn get(&self, lang: &str) -> SfResult<Arc<QuadgramModel>> {
        let lang = normalize(lang);
        {
            let cache = self.cache.read().map_err(poisoned)?;
            if let Some(model) = cache.get(&lang) {
                return Ok(model.clone());
            }
        }

        let path = self.path_for(&lang);
        info!("Loading {} quadgrams from {:?}", lang, path);
        let model = Arc::new(QuadgramModel::load_from_path(&path)?);

        let mut cache = self.cache.write().map_err(poisoned)?;
        Ok(cache.entry(lang).or_insert(model).clone())
    }

    /// Registers an in-memory model under `lang`, replacing any cached one.
    pub fn insert(&self, lang: &str, model: QuadgramModel) -> SfResult<Arc<QuadgramModel>> {
        let model = Arc::new(model);
        let mut cache = self.cache.write().map_err(poisoned)?;
        cache.insert(normalize(lang), model.clone());
        Ok(model)
    }

    pub fn breaker(&self, lang: &str) -> SfResult<Breaker> {
        Ok(Breaker::new(self.get(lang)?))
    }
}

fn normalize(lang: &str) -> String {
    lang.trim().to_uppercase()
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> SubForgeError {
    SubForgeError::Model("model cache lock poisoned".to_string())
}
