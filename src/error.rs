//! Error types for apngine operations.
//!
//! This module defines [`ApngError`], the fatal error type returned by
//! demux and decode operations, and [`Warning`], the non-fatal side channel
//! described by the demuxer's warning policy: a warning never aborts a
//! parse, it's recorded on the [`crate::model::Animation`] and also emitted
//! through [`tracing::warn!`] so it's visible even without inspecting the
//! returned value.

use thiserror::Error;

/// Fatal errors from demuxing or decoding an APNG/PNG byte buffer.
#[derive(Error, Debug)]
pub enum ApngError {
    /// The leading 8 bytes are not the canonical PNG signature.
    #[error("not a PNG file: bad signature")]
    BadSignature,

    /// The first chunk in the stream is not `IHDR`.
    #[error("not a valid PNG file: first chunk is {found:?}, expected IHDR")]
    BadPng {
        /// The 4-byte type tag actually found in the first chunk position.
        found: [u8; 4],
    },

    /// The input byte source could not be resolved (empty buffer, short
    /// read before a chunk header, etc).
    #[error("unsupported or truncated input: {reason}")]
    UnsupportedInput {
        /// Human-readable description of what made the input unusable.
        reason: String,
    },

    /// The external PNG decoder collaborator rejected a synthesized frame.
    #[error("decoder rejected frame {frame_index}: {message}")]
    DecoderError {
        /// Index of the frame that failed to decode.
        frame_index: usize,
        /// The decoder's own error message.
        message: String,
    },

    /// A chunk's declared length runs past the end of the source buffer.
    #[error("chunk at offset {offset} declares length {length} but only {remaining} bytes remain")]
    TruncatedChunk {
        /// Byte offset of the chunk's length field.
        offset: usize,
        /// The chunk's declared length.
        length: u32,
        /// Bytes actually remaining in the source buffer from `offset`.
        remaining: usize,
    },
}

/// Non-fatal conditions observed while demuxing.
///
/// Warnings never abort a parse; they're collected into
/// [`crate::model::Animation::warnings`] and also emitted via
/// [`tracing::warn!`] at the point they're detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The number of `fcTL` chunks found did not match `acTL`'s declared
    /// `num_frames`.
    FrameCountMismatch {
        /// `num_frames` as declared in `acTL`.
        declared: u32,
        /// Number of `fcTL` chunks actually found.
        found: u32,
    },

    /// An `fcTL`/`fdAT` sequence number was not monotonically
    /// non-decreasing relative to the previous one seen.
    SequenceOutOfOrder {
        /// The previously observed sequence number.
        previous: u32,
        /// The out-of-order sequence number that triggered the warning.
        found: u32,
    },

    /// A chunk's trailing CRC did not match the recomputed value. Raised by
    /// [`crate::chunk::scan`]; a corrupt CRC in an otherwise-readable chunk
    /// does not abort the scan.
    CrcMismatch {
        /// The 4-byte type tag of the chunk with a bad CRC.
        chunk_type: [u8; 4],
        /// Byte offset of the chunk's data.
        offset: usize,
    },

    /// A non-final frame's synthesized PNG bytes were rejected by the
    /// decoder. The frame is dropped rather than aborting the whole load;
    /// see [`crate::load`].
    FrameDecodeFailed {
        /// Index of the dropped frame in the original demuxed sequence.
        index: usize,
        /// The decoder's own error message.
        message: String,
    },

    /// An `fcTL`'s region extends past the canvas declared by `IHDR`. The
    /// frame is kept as-is; compositing against an undersized canvas is the
    /// host's problem to detect via [`crate::model::Region::fits_within`].
    RegionOutOfBounds {
        /// Index of the frame whose region overflows the canvas.
        index: usize,
        /// The out-of-bounds region.
        region: crate::model::Region,
        /// Canvas width declared by `IHDR`.
        canvas_width: u32,
        /// Canvas height declared by `IHDR`.
        canvas_height: u32,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FrameCountMismatch { declared, found } => write!(
                f,
                "acTL declared {declared} frames but {found} fcTL chunks were found"
            ),
            Self::SequenceOutOfOrder { previous, found } => write!(
                f,
                "sequence number out of order: {found} followed {previous}"
            ),
            Self::CrcMismatch { chunk_type, offset } => write!(
                f,
                "CRC mismatch in chunk {:?} at offset {offset}",
                String::from_utf8_lossy(chunk_type)
            ),
            Self::FrameDecodeFailed { index, message } => {
                write!(f, "frame {index} failed to decode and was skipped: {message}")
            }
            Self::RegionOutOfBounds { index, region, canvas_width, canvas_height } => write!(
                f,
                "frame {index} region ({}, {}, {}x{}) exceeds canvas {canvas_width}x{canvas_height}",
                region.x, region.y, region.width, region.height
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_signature_message() {
        let err = ApngError::BadSignature;
        assert_eq!(err.to_string(), "not a PNG file: bad signature");
    }

    #[test]
    fn bad_png_message_includes_found_tag() {
        let err = ApngError::BadPng { found: *b"IDAT" };
        let msg = err.to_string();
        assert!(msg.contains("IDAT"));
    }

    #[test]
    fn decoder_error_includes_frame_index() {
        let err = ApngError::DecoderError {
            frame_index: 3,
            message: "zlib stream corrupt".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains("zlib stream corrupt"));
    }

    #[test]
    fn frame_count_mismatch_display() {
        let w = Warning::FrameCountMismatch {
            declared: 5,
            found: 4,
        };
        let msg = w.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains('4'));
    }

    #[test]
    fn sequence_out_of_order_display() {
        let w = Warning::SequenceOutOfOrder {
            previous: 3,
            found: 2,
        };
        let msg = w.to_string();
        assert!(msg.contains("out of order"));
    }

    #[test]
    fn frame_decode_failed_display_includes_index_and_message() {
        let w = Warning::FrameDecodeFailed {
            index: 2,
            message: "zlib stream corrupt".to_string(),
        };
        let msg = w.to_string();
        assert!(msg.contains('2'));
        assert!(msg.contains("zlib stream corrupt"));
    }

    #[test]
    fn region_out_of_bounds_display_includes_dimensions() {
        let w = Warning::RegionOutOfBounds {
            index: 1,
            region: crate::model::Region { x: 5, y: 5, width: 10, height: 10 },
            canvas_width: 8,
            canvas_height: 8,
        };
        let msg = w.to_string();
        assert!(msg.contains("10x10"));
        assert!(msg.contains("8x8"));
    }
}
