use crate::cache::{AnswerCache, Lookup};
use crate::error::Result;
use crate::fingerprint::fingerprint;
use crate::manifest::{Compression, InstanceManifest, Mode};
use crate::meta::MetaReport;
use crate::pipeline::{slice, EncodedBlob};
use crate::solver::Solver;
use std::io::{Read, Write};
use tracing::debug;

/// What an invocation wrote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The cached answer, verbatim
    Answered,
    /// The solver ran and wrote its own output
    Delegated,
    /// A window of the encoded blob
    Chunk {
        encoded_length: usize,
        emitted: usize,
    },
    /// The diagnostic report
    Meta(MetaReport),
}

/// One oracle instance: an immutable answer cache plus the fixed output mode
#[derive(Debug, Clone)]
pub struct Oracle {
    cache: AnswerCache,
    mode: Mode,
    compression: Compression,
}

impl Oracle {
    pub fn new(cache: AnswerCache, mode: Mode, compression: Compression) -> Self {
        Self {
            cache,
            mode,
            compression,
        }
    }

    /// Build the instance a manifest describes
    pub fn from_manifest(manifest: &InstanceManifest) -> Result<Self> {
        manifest.validate()?;
        Ok(Self::new(
            manifest.answer_cache()?,
            manifest.mode,
            manifest.compression,
        ))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn cache(&self) -> &AnswerCache {
        &self.cache
    }

    /// Answer one input.
    ///
    /// Known inputs get their answer or the solver; only unknown inputs are
    /// compressed, encoded and then sliced or reported on.
    pub fn respond(
        &self,
        input: &str,
        solver: &dyn Solver,
        out: &mut dyn Write,
    ) -> Result<Response> {
        let fp = fingerprint(input);
        let hex = fp.to_hex().unwrap_or_default();

        match self.cache.lookup(&fp) {
            Lookup::Found(answer) => {
                debug!(fingerprint = %hex, "cached answer");
                out.write_all(answer.as_bytes())?;
                return Ok(Response::Answered);
            }
            Lookup::Delegate => {
                debug!(fingerprint = %hex, "delegating to solver");
                solver.solve(input, out)?;
                return Ok(Response::Delegated);
            }
            Lookup::NotFound => {}
        }

        let blob = EncodedBlob::from_input(input, self.compression)?;
        match self.mode {
            Mode::Chunk(spec) => {
                let window = slice(&blob.encoded, spec);
                debug!(
                    fingerprint = %hex,
                    encoded_length = blob.encoded_len(),
                    offset = spec.offset,
                    emitted = window.len(),
                    "unrecognized input, emitting window"
                );
                out.write_all(window.as_bytes())?;
                Ok(Response::Chunk {
                    encoded_length: blob.encoded_len(),
                    emitted: window.len(),
                })
            }
            Mode::Meta => {
                let report = MetaReport::from_blob(input, &blob);
                debug!(fingerprint = %hex, encoded_length = report.encoded_length, "unrecognized input, reporting");
                out.write_all(report.render().as_bytes())?;
                Ok(Response::Meta(report))
            }
        }
    }
}

/// Read the whole input stream to end.
///
/// Invalid UTF-8 sequences become U+FFFD so every input still gets a
/// response; the fingerprint covers the decoded text.
pub fn read_input<R: Read>(mut reader: R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
