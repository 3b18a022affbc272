//! Slice Oracle - hash-indexed answers with chunked transport of unknown inputs
//!
//! Each oracle instance carries a static table of known inputs (keyed by the
//! SHA-256 fingerprint of their exact bytes) and one fixed output mode. On an
//! invocation it either returns the stored answer, hands the input to a
//! solver, or, for an input it has never seen, emits one window of the
//! input's compressed and encoded form. Running instances with different
//! window offsets plus one meta instance lets an orchestrator rebuild the
//! input and verify it against the fingerprint. A [`Catalogue`] of recovered
//! inputs grows the table from one round to the next.
//!
//! ## Pipeline
//!
//! ```text
//! Input → Fingerprint → Lookup ─┬─ Found    → answer
//!                               ├─ Delegate → solver
//!                               └─ NotFound → Compress → Base64 ─┬─ Window → chunk
//!                                                                └─ Meta   → 4-line report
//! ```
//!
//! ## Example
//!
//! ```
//! use slice_oracle::assemble::{orchestrate, Endpoint, LocalEndpoint};
//! use slice_oracle::cache::AnswerCache;
//! use slice_oracle::manifest::{Compression, Mode};
//! use slice_oracle::pipeline::ChunkSpec;
//! use slice_oracle::Oracle;
//!
//! let input = "3\n1 2 3\n";
//! let instance = |mode| {
//!     LocalEndpoint::new(Oracle::new(AnswerCache::default(), mode, Compression::Gzip), input)
//! };
//! let meta = instance(Mode::Meta);
//! let first = instance(Mode::Chunk(ChunkSpec::new(0, 500).unwrap()));
//!
//! let endpoints: [&dyn Endpoint; 2] = [&meta, &first];
//! assert_eq!(orchestrate(&endpoints, Compression::Gzip).unwrap(), input);
//! ```

pub mod assemble;
pub mod cache;
pub mod catalogue;
pub mod cli;
pub mod error;
pub mod fingerprint;
pub mod manifest;
pub mod meta;
pub mod oracle;
pub mod pipeline;
pub mod solver;

pub use cache::{AnswerCache, AnswerRecord, Lookup};
pub use catalogue::{Catalogue, Discovery};
pub use error::{OracleError, Result};
pub use fingerprint::{fingerprint, Fingerprint};
pub use manifest::InstanceManifest;
pub use meta::MetaReport;
pub use oracle::{Oracle, Response};
