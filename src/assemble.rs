//! Orchestrator side of the chunk protocol.
//!
//! A meta instance reports the encoded length and fingerprint of an
//! unrecognized input; chunk instances each return one window of the encoded
//! blob. The [`Reassembler`] stitches windows back together in offset order,
//! decodes the blob and verifies the result against the reported fingerprint.

use crate::error::{OracleError, Result};
use crate::fingerprint::fingerprint;
use crate::manifest::{Compression, Mode};
use crate::meta::MetaReport;
use crate::oracle::Oracle;
use crate::pipeline::{decode, decompress};
use crate::solver::NoopSolver;
use std::collections::BTreeMap;
use std::ops::Range;
use std::thread;
use tracing::{debug, info, warn};

/// Collects windows of one encoded blob and verifies the decoded input
#[derive(Debug, Clone)]
pub struct Reassembler {
    meta: MetaReport,
    compression: Compression,
    windows: BTreeMap<usize, String>,
}

impl Reassembler {
    pub fn new(meta: MetaReport, compression: Compression) -> Self {
        Self {
            meta,
            compression,
            windows: BTreeMap::new(),
        }
    }

    /// Record the window an instance returned for `offset`.
    ///
    /// Trailing whitespace is dropped. Empty windows carry nothing and are
    /// ignored. A second window for the same offset must agree with the first
    /// on their shared prefix; the longer of the two is kept.
    pub fn add_window(&mut self, offset: usize, text: &str) -> Result<()> {
        let text = text.trim_end();
        if text.is_empty() {
            return Ok(());
        }
        if !text.is_ascii() {
            return Err(OracleError::InvalidEncoding(format!(
                "window at offset {} is not ASCII",
                offset
            )));
        }
        let encoded_length = self.meta.encoded_length;
        if offset.saturating_add(text.len()) > encoded_length {
            return Err(OracleError::WindowOutOfRange {
                offset,
                length: text.len(),
                encoded_length,
            });
        }
        match self.windows.get_mut(&offset) {
            Some(existing) => {
                let shared = existing.len().min(text.len());
                if existing[..shared] != text[..shared] {
                    return Err(OracleError::ChunkMismatch(offset));
                }
                if text.len() > existing.len() {
                    *existing = text.to_string();
                }
                Ok(())
            }
            None => {
                self.windows.insert(offset, text.to_string());
                Ok(())
            }
        }
    }

    /// Ranges of the encoded blob no window covers yet
    pub fn missing(&self) -> Vec<Range<usize>> {
        let mut gaps = Vec::new();
        let mut cursor = 0;
        for (&offset, text) in &self.windows {
            if offset > cursor {
                gaps.push(cursor..offset);
            }
            cursor = cursor.max(offset + text.len());
        }
        if cursor < self.meta.encoded_length {
            gaps.push(cursor..self.meta.encoded_length);
        }
        gaps
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    /// Concatenate windows in offset order, trimming overlaps.
    /// Overlapping characters must agree.
    pub fn assemble(&self) -> Result<String> {
        check_consistent(&self.meta)?;
        let mut blob = String::new();
        for (&offset, text) in &self.windows {
            let cursor = blob.len();
            if offset > cursor {
                return Err(OracleError::CoverageGap {
                    start: cursor,
                    end: offset,
                });
            }
            let overlap = cursor - offset;
            if overlap >= text.len() {
                if blob[offset..offset + text.len()] != *text {
                    return Err(OracleError::ChunkMismatch(offset));
                }
                continue;
            }
            if blob[offset..] != text[..overlap] {
                return Err(OracleError::ChunkMismatch(offset));
            }
            blob.push_str(&text[overlap..]);
        }
        if blob.len() < self.meta.encoded_length {
            return Err(OracleError::CoverageGap {
                start: blob.len(),
                end: self.meta.encoded_length,
            });
        }
        Ok(blob)
    }

    /// Assemble, decode and verify. Any disagreement with the meta report is fatal.
    pub fn finish(&self) -> Result<String> {
        let blob = self.assemble()?;
        let compressed = decode(&blob)?;
        check_length("compressed_length", self.meta.compressed_length, compressed.len())?;

        let input = String::from_utf8(decompress(&compressed, self.compression)?)?;
        check_length("input_length", self.meta.input_length, input.chars().count())?;

        let actual = fingerprint(&input);
        if actual != self.meta.fingerprint {
            return Err(OracleError::FingerprintMismatch {
                expected: self.meta.fingerprint.to_string(),
                actual: actual.to_string(),
            });
        }
        info!(
            windows = self.windows.len(),
            encoded_length = blob.len(),
            fingerprint = %actual,
            "reconstructed input verified"
        );
        Ok(input)
    }
}

fn check_consistent(meta: &MetaReport) -> Result<()> {
    if !meta.is_consistent() {
        return Err(OracleError::InconsistentMeta {
            encoded_length: meta.encoded_length,
            compressed_length: meta.compressed_length,
        });
    }
    Ok(())
}

fn check_length(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(OracleError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}

/// One deployed oracle instance, as seen by the orchestrator
pub trait Endpoint: Sync {
    /// Output mode fixed for this instance
    fn mode(&self) -> Mode;
    /// Run the instance once against the hidden input and return its output
    fn query(&self) -> Result<String>;
}

/// In-process instance running an [`Oracle`] against a captured input
#[derive(Debug, Clone)]
pub struct LocalEndpoint {
    oracle: Oracle,
    input: String,
}

impl LocalEndpoint {
    pub fn new(oracle: Oracle, input: impl Into<String>) -> Self {
        Self {
            oracle,
            input: input.into(),
        }
    }
}

impl Endpoint for LocalEndpoint {
    fn mode(&self) -> Mode {
        self.oracle.mode()
    }

    fn query(&self) -> Result<String> {
        let mut out = Vec::new();
        self.oracle.respond(&self.input, &NoopSolver, &mut out)?;
        Ok(String::from_utf8(out)?)
    }
}

/// Rebuild an unrecognized input from a set of instances.
///
/// The first meta endpoint supplies the encoded length and fingerprint;
/// chunk endpoints whose offset falls inside the blob are queried in
/// parallel and their windows reassembled in offset order.
pub fn orchestrate(endpoints: &[&dyn Endpoint], compression: Compression) -> Result<String> {
    let meta_endpoint = endpoints
        .iter()
        .find(|e| e.mode() == Mode::Meta)
        .ok_or(OracleError::NoMetaEndpoint(endpoints.len()))?;
    let meta = MetaReport::parse(&meta_endpoint.query()?)?;
    if let Err(e) = check_consistent(&meta) {
        warn!(
            encoded_length = meta.encoded_length,
            compressed_length = meta.compressed_length,
            "meta report sizes disagree with base64 expansion"
        );
        return Err(e);
    }

    let mut chunks: Vec<(usize, &dyn Endpoint)> = endpoints
        .iter()
        .filter_map(|e| match e.mode() {
            Mode::Chunk(spec) if spec.offset < meta.encoded_length => Some((spec.offset, *e)),
            _ => None,
        })
        .collect();
    chunks.sort_by_key(|(offset, _)| *offset);
    debug!(
        chunks = chunks.len(),
        encoded_length = meta.encoded_length,
        "querying chunk endpoints"
    );

    let windows: Vec<(usize, Result<String>)> = thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .iter()
            .map(|&(offset, endpoint)| (offset, scope.spawn(move || endpoint.query())))
            .collect();
        handles
            .into_iter()
            .map(|(offset, handle)| {
                let window = handle.join().unwrap_or_else(|_| {
                    Err(OracleError::EndpointFailed(format!(
                        "endpoint at offset {} panicked",
                        offset
                    )))
                });
                (offset, window)
            })
            .collect()
    });

    let mut reassembler = Reassembler::new(meta, compression);
    for (offset, window) in windows {
        reassembler.add_window(offset, &window?)?;
    }
    reassembler.finish()
}
