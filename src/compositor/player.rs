//! The compositor/player state machine: canvas state across frames,
//! dispose/blend application, seeking, and the play/pause/stop loop.

use tracing::{debug, info};

use crate::decoder::Raster;
use crate::model::{BlendMode, Dispose};

use super::canvas::Canvas;
use super::mode::{assemble_sequence, frame_info_at, raw_frame_at, PlaybackMode, RasterAnimation, SequenceEntry};

/// Events emitted by the player as playback progresses, drained via
/// [`Player::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// A frame at sequence position `index` was just rendered.
    Frame {
        /// Position in the playback sequence (not the source frame index).
        index: usize,
    },
    /// The sequence wrapped back to its start.
    Iteration,
    /// Playback stopped because the configured iteration count was reached.
    Ended,
    /// `stop()` was called.
    Stop,
}

/// Player configuration: playback mode, loop overrides, and debug overlay
/// settings.
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    /// `< 0`: inherit from the animation's declared `iterations`. `0`:
    /// infinite. `> 0`: override.
    pub iterations: i64,
    /// If true, loop forever regardless of `iterations`.
    pub ignore_iterations: bool,
    /// Force the vsync-style scheduler for every frame in `run_blocking`,
    /// not just frames whose delay falls in `[16, 17]` ms.
    pub force_raf: bool,
    /// Forward, backward, or ping-pong sequencing.
    pub mode: PlaybackMode,
    /// Whether `render` draws the debug overlay (region outline + label).
    pub debug: bool,
    /// Stroke color for the debug region outline.
    pub debug_color_region: [u8; 4],
    /// Fill color for the debug label text.
    pub debug_color_text: [u8; 4],
    /// Anchor position for the debug label text.
    pub debug_text_position: (u32, u32),
    /// Font used for the debug label text, passed through to
    /// [`super::canvas::Canvas::fill_text`] as-is.
    pub debug_text_font: String,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            iterations: -1,
            ignore_iterations: false,
            force_raf: false,
            mode: PlaybackMode::Forward,
            debug: false,
            debug_color_region: [255, 0, 0, 255],
            debug_color_text: [255, 255, 255, 255],
            debug_text_position: (0, 0),
            debug_text_font: "monospace 10px".to_string(),
        }
    }
}

/// Builder for [`PlayerOptions`], in the style of the crate's other
/// configuration builders.
#[derive(Debug, Clone, Default)]
pub struct PlayerOptionsBuilder {
    options: PlayerOptions,
}

impl PlayerOptionsBuilder {
    /// Starts from [`PlayerOptions::default`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `iterations`.
    #[must_use]
    pub fn iterations(mut self, iterations: i64) -> Self {
        self.options.iterations = iterations;
        self
    }

    /// Sets `ignore_iterations`.
    #[must_use]
    pub fn ignore_iterations(mut self, ignore: bool) -> Self {
        self.options.ignore_iterations = ignore;
        self
    }

    /// Sets `force_raf`.
    #[must_use]
    pub fn force_raf(mut self, force: bool) -> Self {
        self.options.force_raf = force;
        self
    }

    /// Sets the playback mode.
    #[must_use]
    pub fn mode(mut self, mode: PlaybackMode) -> Self {
        self.options.mode = mode;
        self
    }

    /// Enables the debug overlay.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    /// Sets the debug label font.
    #[must_use]
    pub fn debug_text_font(mut self, font: impl Into<String>) -> Self {
        self.options.debug_text_font = font.into();
        self
    }

    /// Finalizes the builder.
    #[must_use]
    pub fn build(self) -> PlayerOptions {
        self.options
    }
}

/// The compositor/player. Owns the decoded [`RasterAnimation`], the output
/// canvas, and the auxiliary restore surface used to implement `dispose ==
/// Previous`.
pub struct Player<C: Canvas> {
    animation: RasterAnimation,
    canvas: C,
    restore_surface: C,
    restore_pending: bool,
    sequence: Vec<SequenceEntry>,
    cursor: usize,
    loops: u32,
    running: bool,
    commit: bool,
    effective_iterations: u32,
    options: PlayerOptions,
    events: Vec<PlayerEvent>,
}

impl<C: Canvas> Player<C> {
    /// Builds a player over `animation`, drawing onto `canvas` (which must
    /// already be sized `animation.width x animation.height`).
    #[must_use]
    pub fn new(animation: RasterAnimation, canvas: C, options: PlayerOptions) -> Self {
        let sequence = assemble_sequence(animation.frame_count(), options.mode);
        let restore_surface = C::blank(animation.width, animation.height);

        let effective_iterations = if options.iterations < 0 {
            if animation.is_apng {
                animation.iterations
            } else {
                0
            }
        } else {
            options.iterations as u32
        };

        info!(
            frames = animation.frame_count(),
            is_apng = animation.is_apng,
            effective_iterations,
            "player constructed"
        );

        Self {
            animation,
            canvas,
            restore_surface,
            restore_pending: false,
            sequence,
            cursor: 0,
            loops: 0,
            running: false,
            commit: true,
            effective_iterations,
            options,
            events: Vec::new(),
        }
    }

    /// The underlying canvas, reflecting the most recently rendered frame.
    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    /// The current position in the playback sequence.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of positions in the current playback sequence (mode-expanded;
    /// `2x` the frame count in ping-pong mode).
    #[must_use]
    pub fn sequence_len(&self) -> usize {
        self.sequence.len()
    }

    /// Number of completed iterations so far.
    #[must_use]
    pub fn loops_completed(&self) -> u32 {
        self.loops
    }

    /// Whether the player is actively advancing through frames.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The player's current configuration.
    #[must_use]
    pub fn options(&self) -> &PlayerOptions {
        &self.options
    }

    /// Whether a host driving its own event loop should prefer the
    /// display's vertical-sync scheduler over a plain timer for a step that
    /// returned `delay_ms`: true when `force_raf` is set, or the delay falls
    /// in the `[16, 17]` ms window a 60Hz display's vsync interval lands in.
    #[must_use]
    pub fn prefers_vsync(&self, delay_ms: f64) -> bool {
        self.options.force_raf || (16.0..=17.0).contains(&delay_ms)
    }

    /// Drains and returns all events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switches the playback mode, reassembling the sequence. Preserves
    /// `cursor` if it's still in range, otherwise resets to 0.
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.options.mode = mode;
        self.sequence = assemble_sequence(self.animation.frame_count(), mode);
        if self.cursor >= self.sequence.len() {
            self.cursor = 0;
        }
    }

    /// Applies the 6-step render procedure for sequence position `seq_idx`
    /// without emitting events.
    fn apply_frame(&mut self, seq_idx: usize) {
        let entry = self.sequence[seq_idx];
        let info = frame_info_at(&self.animation, entry);
        let raster: &Raster = &raw_frame_at(&self.animation, entry).raster;
        let region = info.region;

        if self.restore_pending {
            self.canvas.blit_full(&self.restore_surface);
            self.restore_pending = false;
        }

        if info.dispose == Dispose::Background {
            self.canvas.clear_rect(region.x, region.y, region.width, region.height);
        }

        if info.dispose == Dispose::Previous {
            self.restore_surface.clear_rect(0, 0, self.canvas.width(), self.canvas.height());
            self.canvas.copy_region(
                region.x,
                region.y,
                region.width,
                region.height,
                &mut self.restore_surface,
                region.x,
                region.y,
            );
            self.restore_pending = true;
        }

        if info.blend == BlendMode::Source {
            self.canvas.clear_rect(region.x, region.y, region.width, region.height);
        }

        match info.blend {
            BlendMode::Over => self.canvas.draw_raster(raster, region.x, region.y),
            BlendMode::Source => self.canvas.draw_raster_source(raster, region.x, region.y),
        }

        if self.options.debug {
            self.canvas.stroke_rect(region, self.options.debug_color_region);
            let label = format!(
                "F:{}  D:{:?}  B:{:?}",
                entry.source_index, info.dispose, info.blend
            );
            let (x, y) = self.options.debug_text_position;
            self.canvas.fill_text(
                &label,
                x,
                y,
                self.options.debug_color_text,
                &self.options.debug_text_font,
            );
        }

        debug!(seq_idx, source = entry.source_index, "rendered frame");
    }

    fn render_and_notify(&mut self, seq_idx: usize) {
        self.apply_frame(seq_idx);
        self.events.push(PlayerEvent::Frame { index: seq_idx });
    }

    /// Seeks to sequence position `n`, clamped to `[0, len-1]`. Clears the
    /// canvas and replays positions `0..=n` in order, then emits one
    /// [`PlayerEvent::Frame`].
    pub fn seek_to_index(&mut self, n: i64) {
        if self.sequence.is_empty() {
            return;
        }
        let max = self.sequence.len() - 1;
        let target = n.clamp(0, max as i64) as usize;

        self.canvas.clear_rect(0, 0, self.canvas.width(), self.canvas.height());
        self.restore_surface
            .clear_rect(0, 0, self.restore_surface.width(), self.restore_surface.height());
        self.restore_pending = false;

        for i in 0..=target {
            self.apply_frame(i);
        }
        self.cursor = target;
        self.events.push(PlayerEvent::Frame { index: target });
    }

    /// Seeks to the first sequence position whose cumulative delay reaches
    /// `time_ms`.
    pub fn seek_to_time(&mut self, time_ms: f64) {
        let mut cumulative = 0.0;
        let mut target = self.sequence.len().saturating_sub(1);
        for (i, entry) in self.sequence.iter().enumerate() {
            let delay = frame_info_at(&self.animation, *entry).delay_ms;
            cumulative += delay;
            if cumulative >= time_ms {
                target = i;
                break;
            }
        }
        self.seek_to_index(target as i64);
    }

    /// Starts playback. Does not itself advance time; callers drive
    /// progress via repeated [`Player::step`] calls, or use
    /// [`Player::run_blocking`].
    pub fn play(&mut self) {
        self.running = true;
        info!("playback started");
    }

    /// Pauses playback; does not reset `cursor`.
    pub fn pause(&mut self) {
        self.running = false;
        info!("playback paused");
    }

    /// Stops playback: pauses, resets to sequence position 0, renders once,
    /// and emits [`PlayerEvent::Stop`].
    pub fn stop(&mut self) {
        self.running = false;
        self.seek_to_index(0);
        self.events.push(PlayerEvent::Stop);
        info!("playback stopped");
    }

    /// Sets whether rendering/events happen while advancing. When `false`,
    /// the scheduler still advances `cursor` but skips drawing.
    pub fn set_commit(&mut self, commit: bool) {
        self.commit = commit;
    }

    /// Advances one sequence position, wrapping and counting iterations as
    /// needed. Called internally by [`Player::step`]; exposed for hosts that
    /// want to drive stepping without the delay bookkeeping `step` does.
    fn advance(&mut self) {
        self.cursor += 1;
        if self.cursor >= self.sequence.len() {
            self.cursor = 0;
            self.loops += 1;
            self.events.push(PlayerEvent::Iteration);
            debug!(loops = self.loops, "iteration completed");

            if !self.options.ignore_iterations
                && self.effective_iterations > 0
                && self.loops >= self.effective_iterations
            {
                self.running = false;
                self.events.push(PlayerEvent::Ended);
                info!("playback ended: iteration count reached");
            } else if !self.options.ignore_iterations && self.effective_iterations == 0 {
                // 0 means "infinite" per acTL, except the non-APNG
                // single-render case, which resolves iterations to 0 but
                // still stops after one pass.
                if !self.animation.is_apng {
                    self.running = false;
                    self.events.push(PlayerEvent::Ended);
                    info!("playback ended: single-frame source stops after one render");
                }
            }
        }
    }

    /// One scheduler tick: renders the current position if `commit` is set,
    /// then advances. Returns the delay (ms) the caller should wait before
    /// the next `step`, or `None` if playback is not running.
    pub fn step(&mut self) -> Option<f64> {
        if !self.running {
            return None;
        }
        if self.commit {
            self.render_and_notify(self.cursor);
        }
        let delay = frame_info_at(&self.animation, self.sequence[self.cursor]).delay_ms;
        self.advance();
        Some(delay.max(0.0))
    }
}
