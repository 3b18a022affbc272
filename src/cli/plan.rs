use crate::error::Result;
use crate::meta::MetaReport;
use crate::pipeline::ChunkSpec;
use std::path::Path;

/// Offsets of the chunk instances needed to cover the blob a meta output describes,
/// one per line
pub fn plan_offsets(meta_path: &Path, size: usize) -> Result<String> {
    let report = MetaReport::parse(&std::fs::read_to_string(meta_path)?)?;
    let mut output = String::new();
    for spec in ChunkSpec::plan(report.encoded_length, size)? {
        output.push_str(&format!("{}\n", spec.offset));
    }
    Ok(output)
}
