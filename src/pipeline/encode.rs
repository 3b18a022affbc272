use crate::error::{OracleError, Result};
use crate::manifest::Compression;
use crate::pipeline::compress::{compress, decompress};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Printable (standard, padded base64) encoding of compressed bytes
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Inverse of [`encode`]
pub fn decode(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| OracleError::InvalidEncoding(format!("base64: {}", e)))
}

/// Encoded length for `byte_len` input bytes: 4 characters per started 3-byte group
pub fn encoded_len(byte_len: usize) -> usize {
    byte_len.div_ceil(3) * 4
}

/// An input after compression and encoding.
/// `encoded` is the object the chunk windows slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBlob {
    pub compressed: Vec<u8>,
    pub encoded: String,
}

impl EncodedBlob {
    /// Compress the UTF-8 bytes of `input` and encode the result
    pub fn from_input(input: &str, algorithm: Compression) -> Result<Self> {
        let compressed = compress(input.as_bytes(), algorithm)?;
        let encoded = encode(&compressed);
        Ok(Self {
            compressed,
            encoded,
        })
    }

    pub fn compressed_len(&self) -> usize {
        self.compressed.len()
    }

    /// Length in characters (base64 is ASCII, so also bytes)
    pub fn encoded_len(&self) -> usize {
        self.encoded.len()
    }
}

/// Decode, decompress and UTF-8 decode an encoded blob back to the input text
pub fn decode_input(encoded: &str, algorithm: Compression) -> Result<String> {
    let compressed = decode(encoded)?;
    let raw = decompress(&compressed, algorithm)?;
    Ok(String::from_utf8(raw)?)
}
