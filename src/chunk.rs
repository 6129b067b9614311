//! PNG chunk scanning.
//!
//! Walks a byte buffer front-to-back as a sequence of
//! `[length][type][data][crc]` records without copying any chunk data —
//! each [`Chunk`] is a non-owning reference into the source buffer.

use crate::crc32::Crc32;
use crate::error::{ApngError, Warning};

/// The canonical 8-byte PNG signature.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// A non-owning reference to one chunk in the source buffer.
#[derive(Debug, Clone, Copy)]
pub struct Chunk {
    /// The chunk's 4-byte ASCII type tag (e.g. `b"IHDR"`).
    pub chunk_type: [u8; 4],
    /// Byte offset of the chunk's data within the source buffer.
    pub data_offset: usize,
    /// Length of the chunk's data in bytes.
    pub length: u32,
}

impl Chunk {
    /// Returns this chunk's type tag as a `&str` if it's valid ASCII,
    /// otherwise a lossy placeholder. Intended for logging only.
    #[must_use]
    pub fn type_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.chunk_type)
    }

    /// Borrows this chunk's data bytes out of `source`.
    ///
    /// # Panics
    ///
    /// Panics if `source` is not the same buffer this chunk was scanned
    /// from (or a prefix-compatible one) — callers always pass the
    /// original buffer back, so this is a programmer error, not a runtime
    /// condition the crate models as recoverable.
    #[must_use]
    pub fn data<'a>(&self, source: &'a [u8]) -> &'a [u8] {
        &source[self.data_offset..self.data_offset + self.length as usize]
    }
}

/// The result of scanning a PNG byte buffer: the declared canvas
/// dimensions (read from `IHDR`), the ordered list of chunks, and any
/// non-fatal conditions noticed along the way.
#[derive(Debug, Clone)]
pub struct ChunkIndex {
    /// Canvas width in pixels, from `IHDR`.
    pub width: u32,
    /// Canvas height in pixels, from `IHDR`.
    pub height: u32,
    /// Every chunk in the file, in source order.
    pub chunks: Vec<Chunk>,
    /// Non-fatal conditions observed while scanning (currently just CRC
    /// mismatches).
    pub warnings: Vec<Warning>,
}

/// Validates the PNG signature and walks the chunk stream.
///
/// Each chunk's trailing CRC32 is checked against its type tag and data;
/// a mismatch is recorded as a [`Warning::CrcMismatch`] rather than
/// rejecting the file outright — a corrupt CRC in an otherwise-readable
/// chunk doesn't prevent decoding it.
///
/// # Errors
///
/// Returns [`ApngError::BadSignature`] if `source[0..8]` is not the PNG
/// signature, [`ApngError::BadPng`] if the first chunk isn't `IHDR`, or
/// [`ApngError::TruncatedChunk`] if a chunk's declared length runs past the
/// end of `source`.
pub fn scan(source: &[u8]) -> Result<ChunkIndex, ApngError> {
    if source.len() < 8 || source[0..8] != PNG_SIGNATURE {
        return Err(ApngError::BadSignature);
    }

    let crc_engine = Crc32::new();
    let mut chunks = Vec::new();
    let mut warnings = Vec::new();
    let mut cursor = 8usize;

    while cursor + 8 <= source.len() {
        let length = u32::from_be_bytes(source[cursor..cursor + 4].try_into().unwrap());
        let mut chunk_type = [0u8; 4];
        chunk_type.copy_from_slice(&source[cursor + 4..cursor + 8]);
        let data_offset = cursor + 8;

        let remaining = source.len().saturating_sub(data_offset);
        if (length as usize) > remaining {
            return Err(ApngError::TruncatedChunk {
                offset: cursor,
                length,
                remaining,
            });
        }

        let data = &source[data_offset..data_offset + length as usize];
        let crc_offset = data_offset + length as usize;
        if let Some(stored) = source.get(crc_offset..crc_offset + 4) {
            let stored_crc = u32::from_be_bytes(stored.try_into().unwrap());
            let computed_crc = crc_engine.checksum(chunk_type, data);
            if stored_crc != computed_crc {
                warnings.push(Warning::CrcMismatch {
                    chunk_type,
                    offset: data_offset,
                });
            }
        }

        chunks.push(Chunk {
            chunk_type,
            data_offset,
            length,
        });

        cursor = data_offset + length as usize + 4; // + trailing CRC
    }

    let first = chunks.first().ok_or(ApngError::BadPng { found: [0; 4] })?;
    if &first.chunk_type != b"IHDR" {
        return Err(ApngError::BadPng {
            found: first.chunk_type,
        });
    }
    let ihdr = first.data(source);
    let width = u32::from_be_bytes(ihdr[0..4].try_into().unwrap());
    let height = u32::from_be_bytes(ihdr[4..8].try_into().unwrap());

    Ok(ChunkIndex {
        width,
        height,
        chunks,
        warnings,
    })
}
