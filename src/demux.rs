//! APNG control-chunk interpretation and standalone-PNG synthesis.
//!
//! Given the chunk index from [`crate::chunk`] and a CRC engine, this module
//! splits the interleaved `IDAT`/`fdAT` stream into one byte sequence per
//! frame and emits a [`FrameInfo`] alongside each.

use tracing::{debug, info, warn};

use crate::chunk::{Chunk, ChunkIndex};
use crate::crc32::Crc32;
use crate::error::Warning;
use crate::model::{BlendMode, Dispose, FrameInfo, Region};

const HEADER_CHUNK_TYPES: [[u8; 4]; 9] = [
    *b"IHDR", *b"PLTE", *b"gAMA", *b"pHYs", *b"tRNS", *b"iCCP", *b"sRGB", *b"sBIT", *b"sPLT",
];

fn is_header_chunk(chunk_type: &[u8; 4]) -> bool {
    HEADER_CHUNK_TYPES.contains(chunk_type)
}

/// One demuxed frame: the ordered list of image-data byte slices (borrowed
/// from the source buffer) that make up that frame's `IDAT` stream, plus its
/// [`FrameInfo`].
struct DemuxedFrame<'a> {
    parts: Vec<&'a [u8]>,
    info: FrameInfo,
}

/// The pre-decode result of demuxing: standalone PNG byte sequences paired
/// with their [`FrameInfo`], plus any warnings raised along the way.
///
/// This is an intermediate product — [`crate::compositor::player::Player`]
/// and callers generally want the decoded [`crate::model::Animation`]
/// instead, built by feeding each `png_bytes` entry through a
/// [`crate::decoder::PngDecoder`].
pub struct DemuxOutput {
    /// Whether the source contained an `acTL` chunk.
    pub is_apng: bool,
    /// Declared loop count from `acTL` (`0` = infinite); `0` for non-APNG.
    pub iterations: u32,
    /// Synthesized standalone PNG byte sequences, one per frame, in order.
    pub png_bytes: Vec<Vec<u8>>,
    /// Per-frame composition metadata, paired with `png_bytes`.
    pub frame_info: Vec<FrameInfo>,
    /// Non-fatal conditions observed while demuxing.
    pub warnings: Vec<Warning>,
}

/// Demuxes an APNG (or plain PNG) byte buffer into standalone per-frame PNG
/// byte sequences plus composition metadata.
///
/// `source` must be the same buffer `index` was scanned from.
#[must_use]
pub fn demux(source: &[u8], index: &ChunkIndex) -> DemuxOutput {
    let act_l = index.chunks.iter().find(|c| &c.chunk_type == b"acTL");

    let Some(act_l) = act_l else {
        info!("no acTL chunk found, treating input as a single static frame");
        return non_apng_output(source, index);
    };

    let data = act_l.data(source);
    let num_frames = u32::from_be_bytes(data[0..4].try_into().unwrap());
    let iterations = u32::from_be_bytes(data[4..8].try_into().unwrap());
    info!(num_frames, iterations, "parsed acTL");

    let header_chunks: Vec<Chunk> = index
        .chunks
        .iter()
        .filter(|c| is_header_chunk(&c.chunk_type))
        .copied()
        .collect();

    let mut files: Vec<DemuxedFrame> = Vec::new();
    let mut current_parts: Vec<&[u8]> = Vec::new();
    let mut current_info: Option<FrameInfo> = None;
    let mut seen_fctl_for_idat = false;
    let mut last_sequence: Option<u32> = None;
    let mut warnings = index.warnings.clone();

    for chunk in &index.chunks {
        match &chunk.chunk_type {
            t if t == b"fcTL" => {
                if !current_parts.is_empty() {
                    if let Some(info) = current_info.take() {
                        files.push(DemuxedFrame {
                            parts: std::mem::take(&mut current_parts),
                            info,
                        });
                    }
                }
                seen_fctl_for_idat = true;

                let fctl_data = chunk.data(source);
                let sequence = u32::from_be_bytes(fctl_data[0..4].try_into().unwrap());
                check_sequence(sequence, &mut last_sequence, &mut warnings);

                current_info = Some(parse_fctl(fctl_data));
            }
            t if t == b"IDAT" => {
                if seen_fctl_for_idat {
                    current_parts.push(chunk.data(source));
                }
            }
            t if t == b"fdAT" => {
                let payload = chunk.data(source);
                let sequence = u32::from_be_bytes(payload[0..4].try_into().unwrap());
                check_sequence(sequence, &mut last_sequence, &mut warnings);
                current_parts.push(&payload[4..]);
            }
            _ => {}
        }
    }

    if !current_parts.is_empty() {
        if let Some(info) = current_info.take() {
            files.push(DemuxedFrame {
                parts: current_parts,
                info,
            });
        }
    }

    let found = files.len() as u32;
    if found != num_frames {
        let w = Warning::FrameCountMismatch {
            declared: num_frames,
            found,
        };
        warn!(declared = num_frames, found, "acTL frame count mismatch");
        warnings.push(w);
    }

    let crc = Crc32::new();
    let ihdr = header_chunks
        .first()
        .expect("scan() guarantees the first chunk is IHDR");
    let ihdr_data = ihdr.data(source);

    let mut png_bytes = Vec::with_capacity(files.len());
    let mut frame_info = Vec::with_capacity(files.len());

    for (i, frame) in files.into_iter().enumerate() {
        let region = frame.info.region;
        if !region.fits_within(index.width, index.height) {
            warn!(frame = i, ?region, canvas_width = index.width, canvas_height = index.height, "fcTL region exceeds canvas");
            warnings.push(Warning::RegionOutOfBounds {
                index: i,
                region,
                canvas_width: index.width,
                canvas_height: index.height,
            });
        }
        let bytes = synthesize_frame_png(
            source,
            &header_chunks,
            ihdr_data,
            region.width,
            region.height,
            &frame.parts,
            &crc,
        );
        debug!(frame = i, width = region.width, height = region.height, "synthesized frame PNG");
        png_bytes.push(bytes);
        frame_info.push(frame.info);
    }

    DemuxOutput {
        is_apng: true,
        iterations,
        png_bytes,
        frame_info,
        warnings,
    }
}

fn check_sequence(sequence: u32, last: &mut Option<u32>, warnings: &mut Vec<Warning>) {
    if let Some(previous) = *last {
        if sequence < previous {
            warn!(previous, found = sequence, "sequence number out of order");
            warnings.push(Warning::SequenceOutOfOrder {
                previous,
                found: sequence,
            });
        }
    }
    *last = Some(sequence);
}

fn parse_fctl(data: &[u8]) -> FrameInfo {
    let width = u32::from_be_bytes(data[4..8].try_into().unwrap());
    let height = u32::from_be_bytes(data[8..12].try_into().unwrap());
    let x = u32::from_be_bytes(data[12..16].try_into().unwrap());
    let y = u32::from_be_bytes(data[16..20].try_into().unwrap());
    let delay_num = u16::from_be_bytes(data[20..22].try_into().unwrap());
    let delay_den = u16::from_be_bytes(data[22..24].try_into().unwrap());
    let dispose = data[24];
    let blend = data[25];

    FrameInfo {
        region: Region {
            x,
            y,
            width,
            height,
        },
        delay_ms: calculate_delay(delay_num, delay_den),
        dispose: Dispose::from(dispose),
        blend: BlendMode::from(blend),
    }
}

/// `delay_ms = (delay_num / substitute) * 1000`, where `substitute` is
/// `delay_den` unless `delay_den == 0`, in which case the result is
/// overwritten to exactly `10` regardless of `delay_num`.
fn calculate_delay(delay_num: u16, delay_den: u16) -> f64 {
    let substitute = if delay_den == 0 { 1.0 } else { f64::from(delay_den) };
    let computed = (f64::from(delay_num) / substitute) * 1000.0;
    if delay_den == 0 {
        10.0
    } else {
        computed
    }
}

#[allow(clippy::too_many_arguments)]
fn synthesize_frame_png(
    source: &[u8],
    header_chunks: &[Chunk],
    ihdr_data: &[u8],
    width: u32,
    height: u32,
    idat_parts: &[&[u8]],
    crc: &Crc32,
) -> Vec<u8> {
    let mut out = crate::chunk::PNG_SIGNATURE.to_vec();

    let mut patched_ihdr = ihdr_data.to_vec();
    patched_ihdr[0..4].copy_from_slice(&width.to_be_bytes());
    patched_ihdr[4..8].copy_from_slice(&height.to_be_bytes());
    write_chunk(&mut out, b"IHDR", &patched_ihdr, crc);

    for chunk in header_chunks.iter().skip(1) {
        write_chunk_verbatim(&mut out, chunk, source);
    }

    for part in idat_parts {
        write_chunk(&mut out, b"IDAT", part, crc);
    }

    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(b"IEND");
    out.extend_from_slice(&0xAE42_6082u32.to_be_bytes());

    out
}

fn write_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8], crc: &Crc32) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    out.extend_from_slice(&crc.checksum(*chunk_type, data).to_be_bytes());
}

fn write_chunk_verbatim(out: &mut Vec<u8>, chunk: &Chunk, source: &[u8]) {
    out.extend_from_slice(&chunk.length.to_be_bytes());
    out.extend_from_slice(&chunk.chunk_type);
    out.extend_from_slice(chunk.data(source));
    let crc_offset = chunk.data_offset + chunk.length as usize;
    out.extend_from_slice(&source[crc_offset..crc_offset + 4]);
}

fn non_apng_output(source: &[u8], index: &ChunkIndex) -> DemuxOutput {
    DemuxOutput {
        is_apng: false,
        iterations: 0,
        png_bytes: vec![source.to_vec()],
        frame_info: vec![FrameInfo {
            region: Region {
                x: 0,
                y: 0,
                width: index.width,
                height: index.height,
            },
            delay_ms: -1.0,
            dispose: Dispose::Background,
            blend: BlendMode::Source,
        }],
        warnings: index.warnings.clone(),
    }
}
