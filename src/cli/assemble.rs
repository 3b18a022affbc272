use crate::assemble::Reassembler;
use crate::error::{OracleError, Result};
use crate::manifest::Compression;
use crate::meta::MetaReport;
use std::path::{Path, PathBuf};

/// One saved chunk output and the offset its instance serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFile {
    pub offset: usize,
    pub path: PathBuf,
}

impl std::str::FromStr for ChunkFile {
    type Err = OracleError;
    /// `OFFSET:PATH`
    fn from_str(s: &str) -> Result<Self> {
        let (offset, path) = s
            .split_once(':')
            .ok_or_else(|| OracleError::InvalidManifest(format!("expected OFFSET:PATH, got {}", s)))?;
        let offset = offset
            .trim()
            .parse()
            .map_err(|e| OracleError::InvalidManifest(format!("chunk offset {}: {}", offset, e)))?;
        Ok(Self {
            offset,
            path: PathBuf::from(path),
        })
    }
}

/// Options for the assemble command
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    pub compression: Compression,
    pub chunks: Vec<ChunkFile>,
}

/// Rebuild an input from a saved meta output and chunk outputs, write it to `output_path`.
/// Returns the number of characters recovered.
pub fn assemble_files(meta_path: &Path, output_path: &Path, options: &AssembleOptions) -> Result<usize> {
    let meta = MetaReport::parse(&std::fs::read_to_string(meta_path)?)?;
    let mut reassembler = Reassembler::new(meta, options.compression);
    for chunk in &options.chunks {
        reassembler.add_window(chunk.offset, &std::fs::read_to_string(&chunk.path)?)?;
    }

    let input = reassembler.finish()?;
    std::fs::write(output_path, &input)?;
    Ok(input.chars().count())
}
