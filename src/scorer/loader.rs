use super::engine;
use super::{ModelInfo, QuadgramFile, QuadgramModel, UNSEEN_WEIGHT};
use crate::consts::{QUADGRAM_LEN, QUADGRAM_TABLE_SIZE};
use crate::error::{SfResult, SubForgeError};
use crate::key::Alphabet;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::debug;

fn model_err(msg: impl Into<String>) -> SubForgeError {
    SubForgeError::Model(msg.into())
}

pub fn load<R: Read>(reader: R) -> SfResult<QuadgramModel> {
    let file: QuadgramFile = serde_json::from_reader(reader)
        .map_err(|e| model_err(format!("Malformed quadgram file: {}", e)))?;
    from_file(file)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> SfResult<QuadgramModel> {
    let path = path.as_ref();
    debug!("Loading quadgrams from {}", path.display());
    let handle = File::open(path).map_err(|e| {
        model_err(format!(
            "Could not open quadgram file '{}': {}",
            path.display(),
            e
        ))
    })?;
    load(BufReader::new(handle))
}

fn from_file(file: QuadgramFile) -> SfResult<QuadgramModel> {
    let alphabet = Alphabet::new(&file.alphabet)
        .map_err(|e| model_err(format!("Invalid alphabet in quadgram file: {}", e)))?;
    alphabet
        .ensure_scorable()
        .map_err(|e| model_err(e.to_string()))?;

    if file.quadgrams.is_empty() {
        return Err(model_err("Quadgram file contains no quadgrams"));
    }

    let mut table = vec![UNSEEN_WEIGHT; QUADGRAM_TABLE_SIZE];
    let mut observed = Vec::with_capacity(file.quadgrams.len());

    for (quadgram, &weight) in &file.quadgrams {
        let idx = index_of_quadgram(quadgram, &alphabet)
            .ok_or_else(|| model_err(format!("'{}' is not a quadgram of the alphabet", quadgram)))?;
        if !weight.is_finite() || weight <= UNSEEN_WEIGHT {
            return Err(model_err(format!(
                "Weight of '{}' must be a positive number (got {})",
                quadgram, weight
            )));
        }
        table[idx] = weight;
        observed.push(idx as u32);
    }
    observed.sort_unstable();

    if index_of_quadgram(&file.most_frequent_quadgram, &alphabet)
        .map_or(true, |idx| table[idx] <= UNSEEN_WEIGHT)
    {
        return Err(model_err(format!(
            "Most frequent quadgram '{}' is missing from the table",
            file.most_frequent_quadgram
        )));
    }

    let info = ModelInfo {
        alphabet: alphabet.as_string(),
        nbr_quadgrams: file.nbr_quadgrams,
        most_frequent_quadgram: file.most_frequent_quadgram,
        average_fitness: file.average_fitness,
        max_fitness: file.max_fitness,
    };
    debug!(
        distinct = observed.len(),
        "Loaded quadgram model for alphabet '{}'", info.alphabet
    );

    Ok(QuadgramModel::from_parts(alphabet, table, observed, info))
}

/// Exact lookup: every character must already be in canonical case.
fn index_of_quadgram(quadgram: &str, alphabet: &Alphabet) -> Option<usize> {
    let symbols: Option<Vec<u8>> = quadgram
        .chars()
        .map(|c| alphabet.index_of(c).map(|i| i as u8))
        .collect();
    match symbols {
        Some(s) if s.len() == QUADGRAM_LEN => Some(engine::pack(&s)),
        _ => None,
    }
}

pub fn to_file(model: &QuadgramModel) -> QuadgramFile {
    let quadgrams: BTreeMap<String, f32> = model
        .observed()
        .map(|(idx, w)| (engine::unpack(idx, model.alphabet()), w))
        .collect();
    let info = model.info();
    QuadgramFile {
        alphabet: info.alphabet.clone(),
        nbr_quadgrams: info.nbr_quadgrams,
        most_frequent_quadgram: info.most_frequent_quadgram.clone(),
        max_fitness: info.max_fitness,
        average_fitness: info.average_fitness,
        quadgrams,
    }
}

pub fn save<W: Write>(model: &QuadgramModel, writer: W) -> SfResult<()> {
    let mut writer = writer;
    serde_json::to_writer(&mut writer, &to_file(model))?;
    writer.flush()?;
    Ok(())
}

pub fn save_to_path<P: AsRef<Path>>(model: &QuadgramModel, path: P) -> SfResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    save(model, BufWriter::new(File::create(path)?))?;
    debug!("Saved quadgrams to {}", path.display());
    Ok(())
}

/// Writes `quadgram,weight` rows, heaviest first.
pub fn export_csv<W: Write>(model: &QuadgramModel, writer: W) -> SfResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["quadgram", "weight"])?;
    for (quadgram, weight) in model.top_quadgrams(usize::MAX) {
        wtr.write_record([quadgram, format!("{:.4}", weight)])?;
    }
    wtr.flush()?;
    Ok(())
}

impl QuadgramModel {
    pub fn load<R: Read>(reader: R) -> SfResult<Self> {
        load(reader)
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> SfResult<Self> {
        load_from_path(path)
    }

    pub fn save<W: Write>(&self, writer: W) -> SfResult<()> {
        save(self, writer)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> SfResult<()> {
        save_to_path(self, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QuadgramModel {
        let mut b = super::super::ModelBuilder::new(Alphabet::default()).unwrap();
        b.feed_str("tiontiontion the tion");
        b.build().unwrap()
    }

    #[test]
    fn test_json_round_trip_keeps_weights() {
        let model = sample();
        let mut buf = Vec::new();
        model.save(&mut buf).unwrap();
        let back = QuadgramModel::load(buf.as_slice()).unwrap();
        assert_eq!(back.info().alphabet, model.info().alphabet);
        assert_eq!(back.info().nbr_quadgrams, model.info().nbr_quadgrams);
        assert_eq!(
            back.info().most_frequent_quadgram,
            model.info().most_frequent_quadgram
        );
        assert!((back.info().max_fitness - model.info().max_fitness).abs() < 1e-9);
        assert_eq!(back.weight("tion").unwrap(), model.weight("tion").unwrap());
        assert_eq!(back.observed_count(), model.observed_count());
    }

    #[test]
    fn test_truncated_json_is_model_error() {
        let model = sample();
        let mut buf = Vec::new();
        model.save(&mut buf).unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(
            QuadgramModel::load(buf.as_slice()),
            Err(SubForgeError::Model(_))
        ));
    }

    #[test]
    fn test_foreign_quadgram_rejected() {
        let json = r#"{"alphabet":"abcd","nbr_quadgrams":1,"most_frequent_quadgram":"abcd",
            "max_fitness":1.0,"average_fitness":0.1,"quadgrams":{"abcd":1.0,"abce":2.0}}"#;
        assert!(matches!(
            QuadgramModel::load(json.as_bytes()),
            Err(SubForgeError::Model(_))
        ));
    }

    #[test]
    fn test_csv_sorted_by_weight() {
        let model = sample();
        let mut buf = Vec::new();
        export_csv(&model, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("quadgram,weight"));
        assert!(lines.next().unwrap().starts_with("tion,"));
    }
}
