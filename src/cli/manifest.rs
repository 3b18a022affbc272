use crate::cache::{read_answer_table, AnswerCache};
use crate::error::Result;
use crate::manifest::{write_manifest, Compression, InstanceManifest, Mode};
use std::path::Path;

/// Options for the manifest command
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    pub mode: Mode,
    pub compression: Compression,
    pub solver: Option<Vec<String>>,
}

impl Default for ManifestOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Meta,
            compression: Compression::default(),
            solver: None,
        }
    }
}

/// Bake an answer table and instance settings into a manifest.
/// Returns the number of table records.
pub fn build_manifest(table_path: &Path, output_path: &Path, options: &ManifestOptions) -> Result<usize> {
    let answers = read_answer_table(table_path)?;
    // Reject duplicate keys here rather than at every invocation
    AnswerCache::build(answers.iter().cloned())?;

    let mut manifest = InstanceManifest::new(options.mode, answers);
    manifest.compression = options.compression;
    manifest.solver = options.solver.clone();
    manifest.validate()?;

    write_manifest(output_path, &manifest)?;
    Ok(manifest.answers.len())
}
