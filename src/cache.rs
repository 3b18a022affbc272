use crate::error::{OracleError, Result};
use crate::fingerprint::{fingerprint, Fingerprint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// One entry of the generated answer table.
/// `answer: None` is the delegate sentinel, not a missing record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub fingerprint: Fingerprint,
    #[serde(default)]
    pub answer: Option<String>,
}

impl AnswerRecord {
    /// Record keyed by the fingerprint of `input`
    pub fn for_input(input: &str, answer: Option<String>) -> Self {
        Self {
            fingerprint: fingerprint(input),
            answer,
        }
    }
}

/// Result of a cache lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Known fingerprint with a stored answer, returned verbatim
    Found(&'a str),
    /// Known fingerprint without an answer; the solver must run
    Delegate,
    /// Unknown fingerprint; the only branch that reaches the codec
    NotFound,
}

/// Immutable fingerprint -> answer map, built once at startup
#[derive(Debug, Clone, Default)]
pub struct AnswerCache {
    entries: HashMap<Fingerprint, Option<String>>,
}

impl AnswerCache {
    /// Build the cache from table records.
    /// A fingerprint appearing twice is a generation defect and is rejected.
    pub fn build<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = AnswerRecord>,
    {
        let records = records.into_iter();
        let mut entries = HashMap::with_capacity(records.size_hint().0);
        for record in records {
            if entries.contains_key(&record.fingerprint) {
                return Err(OracleError::DuplicateFingerprint(
                    record.fingerprint.to_string(),
                ));
            }
            entries.insert(record.fingerprint, record.answer);
        }
        Ok(Self { entries })
    }

    /// Exact-match lookup
    pub fn lookup(&self, fingerprint: &Fingerprint) -> Lookup<'_> {
        match self.entries.get(fingerprint) {
            Some(Some(answer)) => Lookup::Found(answer),
            Some(None) => Lookup::Delegate,
            None => Lookup::NotFound,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Read an answer table (JSON array of records) from disk
pub fn read_answer_table(path: &Path) -> Result<Vec<AnswerRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write an answer table as a pretty JSON array (creates or overwrites)
pub fn write_answer_table(path: &Path, records: &[AnswerRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

/// Fold newly discovered records into an existing table.
///
/// Table order is kept and new fingerprints are appended. A discovered
/// answer replaces the table's; a discovered delegate never erases one.
pub fn merge_answers(mut table: Vec<AnswerRecord>, discovered: &[AnswerRecord]) -> Vec<AnswerRecord> {
    let mut index: HashMap<Fingerprint, usize> = table
        .iter()
        .enumerate()
        .map(|(i, record)| (record.fingerprint.clone(), i))
        .collect();
    for record in discovered {
        match index.get(&record.fingerprint) {
            Some(&i) => {
                if record.answer.is_some() {
                    table[i].answer = record.answer.clone();
                }
            }
            None => {
                index.insert(record.fingerprint.clone(), table.len());
                table.push(record.clone());
            }
        }
    }
    table
}
