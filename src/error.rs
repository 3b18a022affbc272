use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Decompression error: {0}")]
    DecompressionError(String),

    #[error("Invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("Decoded payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid chunk size: {0}. Must be positive")]
    InvalidChunkSize(usize),

    #[error("Duplicate fingerprint in answer table: {0}")]
    DuplicateFingerprint(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported manifest version: {0}")]
    UnsupportedVersion(u32),

    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Missing meta field: {0}")]
    MissingMetaField(&'static str),

    #[error("Invalid meta field {0}: {1}")]
    InvalidMetaField(&'static str, std::num::ParseIntError),

    #[error("Window at offset {offset} with length {length} exceeds encoded length {encoded_length}")]
    WindowOutOfRange {
        offset: usize,
        length: usize,
        encoded_length: usize,
    },

    #[error("No meta-mode endpoint among {0} endpoints")]
    NoMetaEndpoint(usize),

    #[error("Endpoint failed: {0}")]
    EndpointFailed(String),

    #[error(
        "Meta report is inconsistent: encoded length {encoded_length} does not match compressed length {compressed_length}"
    )]
    InconsistentMeta {
        encoded_length: usize,
        compressed_length: usize,
    },

    #[error("Catalogue conflict for {fingerprint}: {reason}")]
    CatalogueConflict { fingerprint: String, reason: String },

    #[error("Windows disagree at offset {0}")]
    ChunkMismatch(usize),

    #[error("Encoded range [{start}, {end}) is not covered by any window")]
    CoverageGap { start: usize, end: usize },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Fingerprint mismatch: expected {expected}, reconstructed {actual}")]
    FingerprintMismatch { expected: String, actual: String },

    #[error("Solver failed: {0}")]
    SolverFailed(String),
}

pub type Result<T> = std::result::Result<T, OracleError>;
