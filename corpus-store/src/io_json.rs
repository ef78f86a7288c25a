//! Corpus file readers: a JSON array of rows, or JSON Lines.
//!
//! Each row must carry `text` and `embedding`; other fields are ignored.
//! `embedding` is accepted either as a number array or as a string holding
//! one (`"[0.1, -0.2, ...]"`), which is how embeddings come out of a CSV
//! round-trip.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Deserializer, de};
use tracing::{debug, info};

use crate::errors::StoreError;
use crate::record::CorpusEntry;

/// Reads all corpus entries from `path`.
///
/// Files ending in `.jsonl` or `.ndjson` are read line by line (empty lines
/// skipped); anything else is parsed as a single JSON array.
///
/// # Errors
/// - [`StoreError::Io`] if the file cannot be read.
/// - [`StoreError::Parse`] if any row fails strict deserialization.
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<CorpusEntry>, StoreError> {
    let path = path.as_ref();
    let is_lines = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jsonl") || e.eq_ignore_ascii_case("ndjson"));

    info!(path = ?path, jsonl = is_lines, "reading corpus file");
    let reader = BufReader::new(File::open(path)?);

    let out = if is_lines {
        read_lines(reader)?
    } else {
        serde_json::from_reader::<_, Vec<CorpusEntry>>(reader)?
    };

    debug!("loaded {} corpus rows", out.len());
    Ok(out)
}

/// Parses JSON Lines from any buffered reader.
///
/// # Errors
/// [`StoreError::Parse`] naming the first malformed line.
pub fn read_lines(reader: impl BufRead) -> Result<Vec<CorpusEntry>, StoreError> {
    let mut out = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: CorpusEntry = serde_json::from_str(&line)
            .map_err(|e| StoreError::Parse(format!("line {} parse error: {}", i + 1, e)))?;
        out.push(entry);
    }
    Ok(out)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEmbedding {
    Numbers(Vec<f32>),
    Encoded(String),
}

/// Serde helper: embedding as `[f32]` or as a string containing a JSON array.
pub(crate) fn embedding_from_array_or_string<'de, D>(d: D) -> Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawEmbedding::deserialize(d)? {
        RawEmbedding::Numbers(v) => Ok(v),
        RawEmbedding::Encoded(s) => serde_json::from_str::<Vec<f32>>(s.trim())
            .map_err(|e| de::Error::custom(format!("embedding string is not a number array: {e}"))),
    }
}
