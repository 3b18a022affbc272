use crate::error::{OracleError, Result};
use serde::{Deserialize, Serialize};
use std::iter;

/// Window size used when a manifest does not set one
pub const DEFAULT_CHUNK_SIZE: usize = 500;

fn default_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

/// Fixed window of an encoded blob served by one oracle instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSpec {
    pub offset: usize,
    #[serde(default = "default_size")]
    pub size: usize,
}

impl ChunkSpec {
    pub fn new(offset: usize, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(OracleError::InvalidChunkSize(size));
        }
        Ok(Self { offset, size })
    }

    /// Number of characters this window yields for an encoded blob of `encoded_len`
    pub fn window_len(&self, encoded_len: usize) -> usize {
        self.size.min(encoded_len.saturating_sub(self.offset))
    }

    /// Specs at offsets 0, size, 2*size, ... below `encoded_len`.
    /// Their windows tile `[0, encoded_len)` with no gaps and no overlap.
    pub fn plan(encoded_len: usize, size: usize) -> Result<Vec<Self>> {
        if size == 0 {
            return Err(OracleError::InvalidChunkSize(size));
        }
        Ok((0..encoded_len)
            .step_by(size)
            .map(|offset| Self { offset, size })
            .collect())
    }
}

/// Characters `[offset, offset + min(size, len - offset))` of `encoded`.
/// Offsets at or past the end yield "" rather than failing.
pub fn slice(encoded: &str, spec: ChunkSpec) -> &str {
    if spec.size == 0 {
        return "";
    }
    // Character boundaries followed by the end of the string
    let mut bounds = encoded
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(encoded.len()));
    let Some(start) = bounds.nth(spec.offset) else {
        return "";
    };
    let end = bounds.nth(spec.size - 1).unwrap_or(encoded.len());
    &encoded[start..end]
}
