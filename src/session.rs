//! # Embedding Session
//!
//! Extraction needs the bit budget that was actually used at embedding time.
//! A [`Session`] carries that value (plus the ground-truth bits for error
//! measurement) from an embed call to a later extract call, explicitly, and
//! can be saved as JSON so the extract call may run in another process.

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::common::error::Result;
use crate::processing::eligibility::capacity;
use crate::processing::embed::EmbedResult;
use crate::processing::matrix::{BitSequence, IntensityMatrix};

/// What one embedding run left behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedRecord {
    /// Name of the cover image.
    pub cover: String,
    /// Name of the bit file.
    pub bits_file: String,
    /// The full bit sequence that was offered to the embedder.
    pub bits: BitSequence,
    pub bits_used: usize,
    /// RFC 3339 timestamp.
    pub recorded_at: String,
}

/// Explicit replacement for "whatever ran last" bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    last_embed: Option<EmbedRecord>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an embedding run, replacing any earlier one.
    pub fn record_embed(
        &mut self,
        cover: &str,
        bits_file: &str,
        bits: &BitSequence,
        result: &EmbedResult,
    ) {
        self.last_embed = Some(EmbedRecord {
            cover: cover.to_string(),
            bits_file: bits_file.to_string(),
            bits: bits.clone(),
            bits_used: result.bits_used,
            recorded_at: chrono::Local::now().to_rfc3339(),
        });
    }

    pub fn last_embed(&self) -> Option<&EmbedRecord> {
        self.last_embed.as_ref()
    }

    /// Budget to extract from `cover`: the last run's bits used, capped by capacity.
    pub fn extraction_budget(&self, cover: &IntensityMatrix) -> Option<usize> {
        self.last_embed
            .as_ref()
            .map(|record| record.bits_used.min(capacity(cover)))
    }

    /// Bits the last run was asked to hide.
    pub fn ground_truth(&self) -> Option<&BitSequence> {
        self.last_embed.as_ref().map(|record| &record.bits)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("💾 Session saved to {}", path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load `path`, or start empty if it does not exist yet.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::embed::embed;

    #[test]
    fn budget_follows_last_run() {
        let cover = IntensityMatrix::from_rows(&[vec![10, 100], vec![2, 50]]).unwrap();
        let bits = BitSequence::new(vec![1, 0, 1, 1, 0]);
        let result = embed(&cover, &bits);

        let mut session = Session::new();
        assert_eq!(session.extraction_budget(&cover), None);

        session.record_embed("cover.png", "bits.txt", &bits, &result);
        assert_eq!(result.bits_used, 3);
        assert_eq!(session.extraction_budget(&cover), Some(3));
        assert_eq!(session.ground_truth(), Some(&bits));

        // A smaller cover caps the budget at its own capacity.
        let small = IntensityMatrix::from_rows(&[vec![10]]).unwrap();
        assert_eq!(session.extraction_budget(&small), Some(1));
    }

    #[test]
    fn survives_a_save_and_load() {
        let cover = IntensityMatrix::filled(2, 2, 100);
        let bits = BitSequence::new(vec![1, 1]);
        let mut session = Session::new();
        session.record_embed("c.tif", "b.txt", &bits, &embed(&cover, &bits));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), session);
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load_or_default(dir.path().join("none.json")).unwrap();
        assert!(session.last_embed().is_none());
    }
}
