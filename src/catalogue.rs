//! Discovery catalogue.
//!
//! A meta round reveals one unrecognized input at a time. Each report is
//! recorded here, later joined by the reconstructed input and its answer.
//! The catalogue feeds the answer table of the next round, so instances
//! built from it recognize every input already seen and the meta instance
//! reports the next one. Saved to disk between rounds so a session resumes.

use crate::cache::AnswerRecord;
use crate::error::{OracleError, Result};
use crate::fingerprint::fingerprint;
use crate::meta::MetaReport;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

pub const CATALOGUE_VERSION: u32 = 1;

/// One input found by a meta round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discovery {
    #[serde(flatten)]
    pub meta: MetaReport,
    /// Reconstructed input, once the chunk round has run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    /// Answer for the input; without one the next round delegates
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Discovery {
    pub fn is_recovered(&self) -> bool {
        self.input.is_some()
    }

    pub fn to_record(&self) -> AnswerRecord {
        AnswerRecord {
            fingerprint: self.meta.fingerprint.clone(),
            answer: self.answer.clone(),
        }
    }
}

/// What [`Catalogue::record`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Added,
    Updated,
    Unchanged,
}

/// Ordered list of discoveries, in the order the meta rounds found them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogue {
    pub version: u32,
    #[serde(default)]
    pub entries: Vec<Discovery>,
}

impl Default for Catalogue {
    fn default() -> Self {
        Self {
            version: CATALOGUE_VERSION,
            entries: Vec::new(),
        }
    }
}

impl Catalogue {
    /// Load a saved catalogue; a missing file starts an empty one
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no catalogue yet, starting empty");
            return Ok(Self::default());
        }
        let catalogue: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        if catalogue.version != CATALOGUE_VERSION {
            return Err(OracleError::UnsupportedVersion(catalogue.version));
        }
        Ok(catalogue)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a fingerprint rendered as in a meta report
    pub fn get(&self, fingerprint: &str) -> Option<&Discovery> {
        self.entries
            .iter()
            .find(|e| e.meta.fingerprint.as_str() == fingerprint)
    }

    /// Discoveries still waiting for a chunk round
    pub fn pending(&self) -> impl Iterator<Item = &Discovery> {
        self.entries.iter().filter(|e| !e.is_recovered())
    }

    /// Record a meta report, optionally with the recovered input and answer.
    ///
    /// A recovered input must match the report's fingerprint and length. A
    /// report seen before must agree on its sizes; new information fills in
    /// the existing entry and a given answer replaces the stored one.
    pub fn record(
        &mut self,
        meta: MetaReport,
        input: Option<String>,
        answer: Option<String>,
    ) -> Result<Recorded> {
        if !meta.is_consistent() {
            return Err(OracleError::InconsistentMeta {
                encoded_length: meta.encoded_length,
                compressed_length: meta.compressed_length,
            });
        }
        if let Some(input) = &input {
            verify_input(&meta, input)?;
        }

        let Some(index) = self
            .entries
            .iter()
            .position(|e| e.meta.fingerprint == meta.fingerprint)
        else {
            info!(fingerprint = %meta.fingerprint, recovered = input.is_some(), "new discovery");
            self.entries.push(Discovery {
                meta,
                input,
                answer,
            });
            return Ok(Recorded::Added);
        };
        let existing = &mut self.entries[index];

        if existing.meta != meta {
            return Err(OracleError::CatalogueConflict {
                fingerprint: meta.fingerprint.to_string(),
                reason: "sizes differ from the recorded report".to_string(),
            });
        }
        let mut changed = false;
        if input.is_some() && existing.input.is_none() {
            existing.input = input;
            changed = true;
        }
        if answer.is_some() && existing.answer != answer {
            existing.answer = answer;
            changed = true;
        }
        if changed {
            debug!(fingerprint = %existing.meta.fingerprint, "discovery updated");
            Ok(Recorded::Updated)
        } else {
            Ok(Recorded::Unchanged)
        }
    }

    /// Answer records for every discovery, in discovery order
    pub fn answer_records(&self) -> Vec<AnswerRecord> {
        self.entries.iter().map(Discovery::to_record).collect()
    }
}

fn verify_input(meta: &MetaReport, input: &str) -> Result<()> {
    let actual = fingerprint(input);
    if actual != meta.fingerprint {
        return Err(OracleError::FingerprintMismatch {
            expected: meta.fingerprint.to_string(),
            actual: actual.to_string(),
        });
    }
    let chars = input.chars().count();
    if chars != meta.input_length {
        return Err(OracleError::LengthMismatch {
            what: "input_length",
            expected: meta.input_length,
            actual: chars,
        });
    }
    Ok(())
}
