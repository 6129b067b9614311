//! A blocking driver loop for hosts without their own event loop: measure
//! elapsed time, sleep the remainder, never try to "catch up" on a dropped
//! frame.

use std::time::{Duration, Instant};

use tracing::debug;

use super::canvas::Canvas;
use super::player::Player;

/// Drives `player` by repeatedly calling [`Player::step`] and sleeping for
/// the returned delay, until playback ends or `should_stop` returns `true`.
///
/// `should_stop` is polled once per tick (before sleeping), so callers can
/// request an early stop (e.g. a UI close event) without waiting for the
/// animation's own iteration count.
pub fn run_blocking<C: Canvas>(player: &mut Player<C>, mut should_stop: impl FnMut() -> bool) {
    player.play();
    let mut last_tick = Instant::now();

    loop {
        if should_stop() || !player.is_running() {
            break;
        }

        let Some(delay_ms) = player.step() else {
            break;
        };

        if player.prefers_vsync(delay_ms) {
            debug!(delay_ms, "vsync scheduler preferred, but run_blocking only has a timer");
        }

        let target = Duration::from_secs_f64((delay_ms / 1000.0).max(0.0));
        let elapsed = last_tick.elapsed();
        let sleep_duration = target.saturating_sub(elapsed);

        if sleep_duration > Duration::ZERO {
            std::thread::sleep(sleep_duration);
        } else if elapsed > target {
            debug!(?elapsed, ?target, "frame drop in run_blocking");
        }

        last_tick = Instant::now();
    }
}
