//! A [`PngDecoder`] backed by the `png` crate's streaming reader, handling
//! the Rgba/Rgb/GrayscaleAlpha/Grayscale/Indexed color types by expanding
//! each to RGBA8.

use std::io::Cursor;

use super::{PngDecoder, Raster};
use crate::error::ApngError;

/// The crate's shipped [`PngDecoder`], available behind the `png-decoder`
/// feature (on by default).
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCrateDecoder;

impl PngCrateDecoder {
    /// Builds a new decoder. Stateless — there is nothing to configure.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PngDecoder for PngCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<Raster, ApngError> {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().map_err(|e| ApngError::DecoderError {
            frame_index: 0,
            message: e.to_string(),
        })?;

        let mut buf = vec![0u8; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).map_err(|e| ApngError::DecoderError {
            frame_index: 0,
            message: e.to_string(),
        })?;

        let width = info.width;
        let height = info.height;
        let bytes_per_pixel = info.color_type.samples();
        let raw = &buf[..info.buffer_size()];

        let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
        let palette = reader.info().palette.clone();

        for px in raw.chunks_exact(bytes_per_pixel) {
            let (r, g, b, a) = match info.color_type {
                png::ColorType::Rgba => (px[0], px[1], px[2], px[3]),
                png::ColorType::Rgb => (px[0], px[1], px[2], 255),
                png::ColorType::GrayscaleAlpha => (px[0], px[0], px[0], px[1]),
                png::ColorType::Grayscale => (px[0], px[0], px[0], 255),
                png::ColorType::Indexed => {
                    let idx = px[0] as usize;
                    palette
                        .as_ref()
                        .filter(|p| idx * 3 + 2 < p.len())
                        .map_or((0, 0, 0, 255), |p| {
                            (p[idx * 3], p[idx * 3 + 1], p[idx * 3 + 2], 255)
                        })
                }
            };
            pixels.extend_from_slice(&[r, g, b, a]);
        }

        Ok(Raster::new(width, height, pixels))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::scan;

    fn solid_rgba_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut raw = Vec::new();
        {
            let mut png_encoder = png::Encoder::new(&mut raw, width, height);
            png_encoder.set_color(png::ColorType::Rgba);
            png_encoder.set_depth(png::BitDepth::Eight);
            let mut writer = png_encoder.write_header().unwrap();
            let mut row = Vec::with_capacity(width as usize * 4);
            for _ in 0..width {
                row.extend_from_slice(&rgba);
            }
            let mut frame = Vec::with_capacity(row.len() * height as usize);
            for _ in 0..height {
                frame.extend_from_slice(&row);
            }
            writer.write_image_data(&frame).unwrap();
        }
        raw
    }

    #[test]
    fn decodes_solid_color_raster() {
        let png_bytes = solid_rgba_png(4, 3, [10, 20, 30, 255]);
        assert!(scan(&png_bytes).is_ok());

        let decoder = PngCrateDecoder::new();
        let raster = decoder.decode(&png_bytes).unwrap();

        assert_eq!(raster.width, 4);
        assert_eq!(raster.height, 3);
        assert_eq!(raster.pixels.len(), 4 * 3 * 4);
        assert_eq!(&raster.pixels[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn malformed_bytes_yield_decoder_error() {
        let decoder = PngCrateDecoder::new();
        let err = decoder.decode(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, ApngError::DecoderError { .. }));
    }
}
