use crate::error::{OracleError, Result};
use crate::fingerprint::{fingerprint, Fingerprint};
use crate::manifest::Compression;
use crate::pipeline::EncodedBlob;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::SplitWhitespace;

/// Size and fingerprint diagnostics for one input, as reported by a meta instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaReport {
    /// Characters in the raw input
    pub input_length: usize,
    /// Characters in the encoded blob
    pub encoded_length: usize,
    /// Bytes in the compressed form
    pub compressed_length: usize,
    pub fingerprint: Fingerprint,
}

impl MetaReport {
    /// Report for an input whose blob has already been computed
    pub fn from_blob(input: &str, blob: &EncodedBlob) -> Self {
        Self {
            input_length: input.chars().count(),
            encoded_length: blob.encoded_len(),
            compressed_length: blob.compressed_len(),
            fingerprint: fingerprint(input),
        }
    }

    /// Compress and encode `input`, then report on it
    pub fn inspect(input: &str, compression: Compression) -> Result<Self> {
        let blob = EncodedBlob::from_input(input, compression)?;
        Ok(Self::from_blob(input, &blob))
    }

    /// Encoded length must be the base64 expansion of the compressed length
    pub fn is_consistent(&self) -> bool {
        self.compressed_length
            .div_ceil(3)
            .checked_mul(4)
            .is_some_and(|expected| expected == self.encoded_length)
    }

    /// Four-line wire form
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Parse the four whitespace-separated fields in order
    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = text.split_whitespace();
        Ok(Self {
            input_length: next_usize(&mut fields, "input_length")?,
            encoded_length: next_usize(&mut fields, "encoded_length")?,
            compressed_length: next_usize(&mut fields, "compressed_length")?,
            fingerprint: Fingerprint::from_rendered(
                fields
                    .next()
                    .ok_or(OracleError::MissingMetaField("fingerprint"))?,
            ),
        })
    }
}

fn next_usize(fields: &mut SplitWhitespace, name: &'static str) -> Result<usize> {
    fields
        .next()
        .ok_or(OracleError::MissingMetaField(name))?
        .parse()
        .map_err(|e| OracleError::InvalidMetaField(name, e))
}

impl fmt::Display for MetaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.input_length)?;
        writeln!(f, "{}", self.encoded_length)?;
        writeln!(f, "{}", self.compressed_length)?;
        writeln!(f, "{}", self.fingerprint)
    }
}
