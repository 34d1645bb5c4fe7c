//! Fixed timestep simulation tick
//!
//! Advances the ball speed deterministically: impulse first, then incline
//! deceleration, then the non-negative clamp.

use super::mode::PhysicsParams;
use super::state::SimState;
use crate::consts::*;
use crate::incline_deceleration;

/// What a single tick did (for logging and status updates)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickReport {
    /// Force consumed from the impulse slot this tick
    pub impulse: Option<f32>,
    pub speed_before: f32,
    pub speed_after: f32,
}

/// Advance `speed` by one step of length `dt`.
///
/// `impulse` of zero means no push. `incline` selects whether gravity and
/// friction act; it comes from the mode, not from the angle.
pub fn step_speed(speed: f32, impulse: f32, params: &PhysicsParams, incline: bool, dt: f32) -> f32 {
    let mut speed = speed;

    // Impulse: a = F/m held for one tick
    if impulse > 0.0 {
        let accel = impulse / params.effective_mass();
        speed += accel * dt * PIXEL_SCALE;
    }

    // Gravity along the slope plus friction, both opposing motion
    if speed > 0.0 && incline {
        let decel = incline_deceleration(params.angle_deg, params.mu);
        speed -= decel * dt * PIXEL_SCALE;
    }

    if speed.is_finite() { speed.max(0.0) } else { 0.0 }
}

/// Advance the simulation state by one fixed timestep
pub fn tick(state: &mut SimState, dt: f32) -> TickReport {
    let impulse = state.impulse.take();
    let params = state.params();
    let speed_before = state.speed();

    let speed_after = step_speed(
        speed_before,
        impulse.unwrap_or(0.0),
        &params,
        state.mode.is_incline(),
        dt,
    );
    state.set_speed(speed_after);
    state.time_ticks += 1;

    if let Some(force) = impulse {
        log::debug!(
            "Tick {}: impulse F={} on m={} -> speed {:.3} -> {:.3}",
            state.time_ticks,
            force,
            params.effective_mass(),
            speed_before,
            speed_after
        );
    } else {
        log::trace!("Tick {}: speed {:.3} -> {:.3}", state.time_ticks, speed_before, speed_after);
    }

    TickReport {
        impulse,
        speed_before,
        speed_after,
    }
}
