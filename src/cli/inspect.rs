use crate::error::Result;
use crate::manifest::Compression;
use crate::meta::MetaReport;
use crate::pipeline::DEFAULT_CHUNK_SIZE;
use std::path::Path;

/// Meta report for a local file, plus what reconstructing it would take
pub fn show_inspect(path: &Path, compression: Compression) -> Result<String> {
    let input = std::fs::read_to_string(path)?;
    let report = MetaReport::inspect(&input, compression)?;

    let mut output = String::new();
    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!("Compression: {:?}\n", compression));
    output.push_str(&format!("Input length: {} chars\n", report.input_length));
    output.push_str(&format!("Compressed length: {} bytes\n", report.compressed_length));
    output.push_str(&format!("Encoded length: {} chars\n", report.encoded_length));
    output.push_str(&format!("Fingerprint: {}\n", report.fingerprint));
    output.push_str(&format!(
        "Fingerprint (hex): {}\n",
        report.fingerprint.to_hex().unwrap_or_default()
    ));
    output.push_str(&format!(
        "Chunks at {} chars: {}\n",
        DEFAULT_CHUNK_SIZE,
        report.encoded_length.div_ceil(DEFAULT_CHUNK_SIZE)
    ));

    Ok(output)
}
