use std::io::{Read, Write};

use flate2::Compression;
use flate2::GzBuilder;
use flate2::read::GzDecoder;

use crate::document::model::AnimationDocument;
use crate::document::serialize::serialize;
use crate::foundation::error::{TgsError, TgsResult};

/// gzip member magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Refuse to inflate artifacts past this size (decompression bombs).
const MAX_INFLATED_BYTES: u64 = 64 * 1024 * 1024;

/// Default compression level (`Compression::best()`).
pub const DEFAULT_GZIP_LEVEL: u32 = 9;

/// Return `true` when `bytes` starts with the gzip magic.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= GZIP_MAGIC.len() && bytes[..2] == GZIP_MAGIC
}

/// Compress `data` into a single gzip member.
///
/// The header carries no file name and a zero modification time, so equal input gives
/// byte-identical output.
pub fn gzip(data: &[u8], level: u32) -> TgsResult<Vec<u8>> {
    if level > 9 {
        return Err(TgsError::config(format!(
            "gzip level must be in 0..=9, got {level}"
        )));
    }
    let mut encoder = GzBuilder::new()
        .mtime(0)
        .write(Vec::with_capacity(data.len() / 4), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| TgsError::io(format!("gzip write failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| TgsError::io(format!("gzip finish failed: {e}")))
}

/// Inflate a gzip stream, bounded by a fixed size limit.
pub(crate) fn inflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(bytes.len() * 4);
    GzDecoder::new(bytes)
        .take(MAX_INFLATED_BYTES + 1)
        .read_to_end(&mut out)?;
    if out.len() as u64 > MAX_INFLATED_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("inflated size exceeds {MAX_INFLATED_BYTES} bytes"),
        ));
    }
    Ok(out)
}

/// Serialize `doc` to compact JSON and gzip it at the default level.
pub fn encode(doc: &AnimationDocument) -> TgsResult<Vec<u8>> {
    encode_with_level(doc, DEFAULT_GZIP_LEVEL)
}

/// Serialize `doc` to compact JSON and gzip it at `level` (`0..=9`).
pub fn encode_with_level(doc: &AnimationDocument, level: u32) -> TgsResult<Vec<u8>> {
    let json = serialize(doc)?;
    let out = gzip(&json, level)?;
    tracing::trace!(json = json.len(), gzip = out.len(), "encoded artifact");
    Ok(out)
}

/// Inflate a `.tgs` artifact back to its JSON bytes.
pub fn decode_tgs(bytes: &[u8]) -> TgsResult<Vec<u8>> {
    if !is_gzip(bytes) {
        return Err(TgsError::io("input is not a gzip stream"));
    }
    inflate(bytes).map_err(|e| TgsError::io(format!("gzip read failed: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gzip.rs"]
mod tests;
