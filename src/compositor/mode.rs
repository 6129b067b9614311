//! Playback mode sequencing: assembles the ordered `(frame, FrameInfo)`
//! sequence a [`crate::compositor::player::Player`] walks, given a base
//! animation and a [`PlaybackMode`].

use crate::decoder::Raster;
use crate::model::{Animation, FrameInfo, RawFrame};

/// How the player walks the frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackMode {
    /// Frames in source order.
    #[default]
    Forward,
    /// Frames in reverse source order.
    Backward,
    /// Source order followed by reverse order (length `2N`).
    PingPong,
}

/// One entry in an assembled playback sequence: indices back into the
/// underlying [`Animation`]'s `frames`/`frame_info`, so building a sequence
/// never clones raster data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Index into the source `Animation::frames`/`frame_info`.
    pub source_index: usize,
}

/// Builds the ordered sequence of source-frame indices for `mode` over an
/// animation with `frame_count` frames.
#[must_use]
pub fn assemble_sequence(frame_count: usize, mode: PlaybackMode) -> Vec<SequenceEntry> {
    let forward = || (0..frame_count).map(|i| SequenceEntry { source_index: i });

    match mode {
        PlaybackMode::Forward => forward().collect(),
        PlaybackMode::Backward => forward().rev().collect(),
        PlaybackMode::PingPong => forward().chain(forward().rev()).collect(),
    }
}

/// Looks up the frame info for a sequence position.
#[must_use]
pub fn frame_info_at<R>(animation: &Animation<R>, entry: SequenceEntry) -> FrameInfo {
    animation.frame_info[entry.source_index]
}

/// Looks up the raw frame for a sequence position.
#[must_use]
pub fn raw_frame_at<R>(animation: &Animation<R>, entry: SequenceEntry) -> &RawFrame<R> {
    &animation.frames[entry.source_index]
}

/// Convenience alias used by the player when working specifically with the
/// crate's bundled [`Raster`] raw-frame type.
pub type RasterAnimation = Animation<Raster>;
