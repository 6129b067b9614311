//! Retiming utilities: pure mutators on a decoded [`crate::model::Animation`]'s
//! per-frame delays.
//!
//! Callers must not retime an animation that's in use by a running
//! [`crate::compositor::player::Player`].

use crate::model::Animation;

/// Multiplies every frame's `delay_ms` by `k` and recomputes `duration_ms`.
pub fn scale_delays<R>(animation: &mut Animation<R>, k: f64) {
    for info in &mut animation.frame_info {
        info.delay_ms *= k;
    }
    animation.recompute_duration();
}

/// Scales delays so `duration_ms` becomes `target_ms`.
///
/// A no-op if the current duration is zero (nothing to scale from).
pub fn set_total_duration<R>(animation: &mut Animation<R>, target_ms: f64) {
    if animation.duration_ms == 0.0 {
        return;
    }
    let k = target_ms / animation.duration_ms;
    scale_delays(animation, k);
}

/// Sets every frame's `delay_ms` to `delay_ms` and recomputes `duration_ms`.
pub fn set_uniform_delay<R>(animation: &mut Animation<R>, delay_ms: f64) {
    for info in &mut animation.frame_info {
        info.delay_ms = delay_ms;
    }
    animation.recompute_duration();
}
