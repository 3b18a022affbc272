use crate::cache::{AnswerCache, AnswerRecord};
use crate::error::{OracleError, Result};
use crate::pipeline::ChunkSpec;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Current manifest format version
pub const MANIFEST_VERSION: u32 = 1;

/// Compression algorithm options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Gzip,
    Zstd,
    Lz4,
    Brotli,
    None,
}

impl std::str::FromStr for Compression {
    type Err = OracleError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "gzip" | "deflate" => Ok(Self::Gzip),
            "zstd" => Ok(Self::Zstd),
            "lz4" => Ok(Self::Lz4),
            "brotli" => Ok(Self::Brotli),
            "none" => Ok(Self::None),
            _ => Err(OracleError::UnsupportedAlgorithm(format!(
                "compression: {}",
                s
            ))),
        }
    }
}

/// What an instance emits for an unrecognized input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One window of the encoded blob
    Chunk(ChunkSpec),
    /// The four-line size/fingerprint report
    Meta,
}

/// Everything fixed for an oracle instance at generation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceManifest {
    /// Format version
    pub version: u32,
    pub mode: Mode,
    /// Codec shared by the instances and the orchestrator
    #[serde(default)]
    pub compression: Compression,
    /// Solver program and arguments run on a delegate hit
    #[serde(default)]
    pub solver: Option<Vec<String>>,
    /// Generated answer table
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

impl InstanceManifest {
    pub fn new(mode: Mode, answers: Vec<AnswerRecord>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            mode,
            compression: Compression::default(),
            solver: None,
            answers,
        }
    }

    /// Reject manifests this build cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.version != MANIFEST_VERSION {
            return Err(OracleError::UnsupportedVersion(self.version));
        }
        if let Mode::Chunk(spec) = self.mode {
            ChunkSpec::new(spec.offset, spec.size)?;
        }
        if matches!(&self.solver, Some(cmd) if cmd.is_empty()) {
            return Err(OracleError::InvalidManifest("empty solver command".into()));
        }
        Ok(())
    }

    /// Build the answer cache from the embedded table
    pub fn answer_cache(&self) -> Result<AnswerCache> {
        AnswerCache::build(self.answers.iter().cloned())
    }

    /// Serialize manifest to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Deserialize and validate a manifest from JSON bytes
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let manifest: Self = serde_json::from_slice(data)?;
        manifest.validate()?;
        Ok(manifest)
    }
}

/// Read and validate a manifest from disk
pub fn read_manifest(path: &Path) -> Result<InstanceManifest> {
    let manifest: InstanceManifest = serde_json::from_reader(BufReader::new(File::open(path)?))?;
    manifest.validate()?;
    Ok(manifest)
}

/// Write a manifest to disk (creates or overwrites)
pub fn write_manifest(path: &Path, manifest: &InstanceManifest) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, manifest)?;
    writer.flush()?;
    Ok(())
}
