//! apngine - APNG demuxing and dispose/blend-correct frame compositing
//!
#![warn(missing_docs)]
//!
//! This library splits Animated PNG (APNG) files into standalone single-frame
//! PNG byte sequences with recomputed CRCs, then drives a small stateful
//! compositor that applies the correct dispose/blend rules for any requested
//! frame index or playback time.
//!
//! # Getting Started
//!
//! ```no_run
//! use apngine::decoder::png_crate::PngCrateDecoder;
//! use apngine::compositor::canvas::RgbaCanvas;
//! use apngine::compositor::player::{Player, PlayerOptions};
//!
//! let bytes = std::fs::read("animation.png").unwrap();
//! let animation = apngine::load(&bytes, &PngCrateDecoder::new()).unwrap();
//! let canvas = RgbaCanvas::new(animation.width, animation.height);
//! let mut player = Player::new(animation, canvas, PlayerOptions::default());
//! player.play();
//! while let Some(_delay_ms) = player.step() {
//!     // draw player.canvas() to the host's real surface here
//! }
//! ```
//!
//! # Logging
//!
//! apngine uses the [`tracing`](https://docs.rs/tracing) crate for structured
//! logging. The library does **not** initialize a tracing subscriber — your
//! application must do this if you want to see log output.
//!
//! ```no_run
//! tracing_subscriber::fmt()
//!     .with_max_level(tracing::Level::DEBUG)
//!     .init();
//! ```
//!
//! **Log Levels:**
//! - `ERROR`: not used directly — failures are returned as `Result::Err`.
//! - `WARN`: the non-fatal [`error::Warning`] channel (frame count mismatch,
//!   out-of-order sequence numbers, bad chunk CRCs, dropped undecodable
//!   frames).
//! - `INFO`: demux/player lifecycle (animation loaded, playback started/
//!   stopped/ended).
//! - `DEBUG`: per-frame detail (frame synthesized, frame rendered, frame
//!   drops in the blocking driver).
//! - `TRACE`: unused by default.
//!
//! # Thread Safety
//!
//! - [`model::Animation`]: `Send + Sync` when its raster type is (the bundled
//!   [`decoder::Raster`] is a plain `Vec<u8>` wrapper, so yes).
//! - [`compositor::player::Player`]: `Send`/`Sync` when its canvas type is.
//!   It's still meant to be driven from one thread at a time — there's no
//!   internal locking — but nothing in the type itself forbids sharing.
//! - [`error::ApngError`] and [`error::Warning`]: `Send + Sync`.
//!
//! # License
//!
//! Licensed under either of:
//! - MIT license ([LICENSE-MIT](../LICENSE-MIT) or <http://opensource.org/licenses/MIT>)
//! - Apache License, Version 2.0 ([LICENSE-APACHE](../LICENSE-APACHE) or <http://www.apache.org/licenses/LICENSE-2.0>)
//!
//! at your option.

pub mod chunk;
pub mod compositor;
pub mod crc32;
pub mod decoder;
pub mod demux;
pub mod error;
pub mod model;

pub use error::ApngError;
pub use model::Animation;

use decoder::{PngDecoder, Raster};
use tracing::warn;

/// Convenience type alias for Results using [`ApngError`].
pub type Result<T> = std::result::Result<T, ApngError>;

/// Scans, demuxes, and decodes `source` into a fully-populated
/// [`Animation`], using `decoder` for the per-frame pixel decode.
///
/// This is the one-call path most callers want; it composes
/// [`chunk::scan`], [`demux::demux`], and the supplied [`PngDecoder`]. Hosts
/// that need to inspect the intermediate standalone PNG bytes (or decode
/// asynchronously/out of order) should call those pieces directly instead.
///
/// # Errors
///
/// Returns [`ApngError`] if the source isn't a valid PNG, or if the decoder
/// rejects the last frame's synthesized bytes. A decode failure on any
/// earlier frame does not abort the call: the bad frame is dropped, a
/// [`error::Warning::FrameDecodeFailed`] is pushed onto the returned
/// animation's warnings (and emitted via [`tracing::warn!`]), and the
/// remaining frames are still returned.
pub fn load(source: &[u8], decoder: &dyn PngDecoder) -> Result<Animation<Raster>> {
    let index = chunk::scan(source)?;
    let output = demux::demux(source, &index);

    let total = output.png_bytes.len();
    let mut frames = Vec::with_capacity(total);
    let mut frame_info = Vec::with_capacity(total);
    let mut warnings = output.warnings;

    for (i, (png_bytes, info)) in output
        .png_bytes
        .into_iter()
        .zip(output.frame_info.into_iter())
        .enumerate()
    {
        match decoder.decode(&png_bytes) {
            Ok(raster) => {
                frames.push(model::RawFrame { png_bytes, raster });
                frame_info.push(info);
            }
            Err(err) if i + 1 == total => return Err(err),
            Err(err) => {
                let message = err.to_string();
                warn!(frame = i, %message, "frame failed to decode, skipping");
                warnings.push(error::Warning::FrameDecodeFailed { index: i, message });
            }
        }
    }

    let duration_ms = frame_info.iter().map(|f| f.delay_ms).sum();

    Ok(Animation {
        width: index.width,
        height: index.height,
        iterations: output.iterations,
        duration_ms,
        is_apng: output.is_apng,
        frames,
        frame_info,
        warnings,
    })
}
