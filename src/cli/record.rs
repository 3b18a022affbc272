use crate::cache::{merge_answers, read_answer_table, write_answer_table};
use crate::catalogue::{Catalogue, Recorded};
use crate::error::Result;
use crate::meta::MetaReport;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for the record command
#[derive(Debug, Clone, Default)]
pub struct RecordOptions {
    /// Recovered input written by `assemble`
    pub input: Option<PathBuf>,
    /// File holding the answer for the input, verbatim
    pub answer: Option<PathBuf>,
    /// Answer table to fold the catalogue into (created if absent)
    pub table: Option<PathBuf>,
}

/// Outcome of recording one discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSummary {
    pub recorded: Recorded,
    pub entries: usize,
    pub pending: usize,
    /// Records in the answer table, when one was written
    pub table_records: Option<usize>,
}

/// Record a saved meta output in the catalogue at `catalogue_path`,
/// then optionally fold every discovery into an answer table for the next
/// round of manifests.
pub fn record_discovery(
    catalogue_path: &Path,
    meta_path: &Path,
    options: &RecordOptions,
) -> Result<RecordSummary> {
    let meta = MetaReport::parse(&fs::read_to_string(meta_path)?)?;
    let input = options.input.as_deref().map(fs::read_to_string).transpose()?;
    let answer = options.answer.as_deref().map(fs::read_to_string).transpose()?;

    let mut catalogue = Catalogue::load(catalogue_path)?;
    let recorded = catalogue.record(meta, input, answer)?;
    catalogue.save(catalogue_path)?;

    let table_records = match &options.table {
        Some(table_path) => {
            let existing = if table_path.exists() {
                read_answer_table(table_path)?
            } else {
                Vec::new()
            };
            let merged = merge_answers(existing, &catalogue.answer_records());
            write_answer_table(table_path, &merged)?;
            Some(merged.len())
        }
        None => None,
    };

    Ok(RecordSummary {
        recorded,
        entries: catalogue.len(),
        pending: catalogue.pending().count(),
        table_records,
    })
}
