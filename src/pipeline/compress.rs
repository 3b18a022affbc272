use crate::error::{OracleError, Result};
use crate::manifest::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

/// Compress data using the specified algorithm
pub fn compress(data: &[u8], algorithm: Compression) -> Result<Vec<u8>> {
    match algorithm {
        Compression::Gzip => compress_gzip(data),
        Compression::Zstd => compress_zstd(data),
        Compression::Lz4 => compress_lz4(data),
        Compression::Brotli => compress_brotli(data),
        Compression::None => Ok(data.to_vec()),
    }
}

/// Decompress data using the specified algorithm
pub fn decompress(data: &[u8], algorithm: Compression) -> Result<Vec<u8>> {
    match algorithm {
        Compression::Gzip => decompress_gzip(data),
        Compression::Zstd => decompress_zstd(data),
        Compression::Lz4 => decompress_lz4(data),
        Compression::Brotli => decompress_brotli(data),
        Compression::None => Ok(data.to_vec()),
    }
}

// GzEncoder writes mtime 0 and no file name, so output only depends on
// the input and the flate2 backend version.
fn compress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| OracleError::CompressionError(format!("gzip: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| OracleError::CompressionError(format!("gzip: {}", e)))
}

fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    GzDecoder::new(data)
        .read_to_end(&mut output)
        .map_err(|e| OracleError::DecompressionError(format!("gzip: {}", e)))?;
    Ok(output)
}

fn compress_zstd(data: &[u8]) -> Result<Vec<u8>> {
    zstd::encode_all(data, 3)
        .map_err(|e| OracleError::CompressionError(format!("zstd: {}", e)))
}

fn decompress_zstd(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data)
        .map_err(|e| OracleError::DecompressionError(format!("zstd: {}", e)))
}

fn compress_lz4(data: &[u8]) -> Result<Vec<u8>> {
    Ok(lz4_flex::compress_prepend_size(data))
}

fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>> {
    lz4_flex::decompress_size_prepended(data)
        .map_err(|e| OracleError::DecompressionError(format!("lz4: {}", e)))
}

fn compress_brotli(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut writer = brotli::CompressorWriter::new(&mut output, 4096, 11, 22);
    writer
        .write_all(data)
        .map_err(|e| OracleError::CompressionError(format!("brotli: {}", e)))?;
    drop(writer);
    Ok(output)
}

fn decompress_brotli(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    let mut reader = brotli::Decompressor::new(data, 4096);
    reader
        .read_to_end(&mut output)
        .map_err(|e| OracleError::DecompressionError(format!("brotli: {}", e)))?;
    Ok(output)
}
