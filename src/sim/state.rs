//! Simulation state
//!
//! Everything the stepper mutates lives here. It exists for the lifetime of
//! one screen and is never persisted.

use serde::{Deserialize, Serialize};

use super::impulse::ImpulseSlot;
use super::mode::{Mode, PhysicsParams};

/// Complete simulation state (deterministic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Active mode
    pub mode: Mode,
    /// Member-tunable parameters (only consulted in `Mode::Member`)
    member_params: PhysicsParams,
    /// Current speed in pixels per rendered frame, never negative
    speed: f32,
    /// Pending one-shot force
    pub impulse: ImpulseSlot,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl SimState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            member_params: Mode::Member.default_params(),
            speed: 0.0,
            impulse: ImpulseSlot::new(),
            time_ticks: 0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Set speed, flooring at zero (non-finite becomes zero)
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    /// Parameters the stepper uses for the active mode
    pub fn params(&self) -> PhysicsParams {
        match self.mode {
            Mode::Member => self.member_params,
            mode => mode.default_params(),
        }
    }

    /// Replace the tunable parameters. Ignored outside member mode.
    pub fn set_params(&mut self, params: PhysicsParams) -> bool {
        if !self.mode.is_tunable() {
            log::debug!("Ignoring parameter change in {} mode", self.mode.as_str());
            return false;
        }
        self.member_params = params;
        true
    }

    /// Queue a one-shot force for the next tick
    pub fn push_impulse(&mut self, force: f32) -> bool {
        self.impulse.push(force)
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_follow_mode() {
        assert_eq!(SimState::new(Mode::Flat).params(), Mode::Flat.default_params());
        assert_eq!(SimState::new(Mode::Slope).params(), Mode::Slope.default_params());
        assert_eq!(SimState::new(Mode::Member).params(), Mode::Member.default_params());
    }

    #[test]
    fn test_set_params_member_only() {
        let custom = PhysicsParams::new(12.0, 20.0, 0.5);

        let mut slope = SimState::new(Mode::Slope);
        assert!(!slope.set_params(custom));
        assert_eq!(slope.params(), Mode::Slope.default_params());

        let mut member = SimState::new(Mode::Member);
        assert!(member.set_params(custom));
        assert_eq!(member.params(), custom);
    }

    #[test]
    fn test_set_speed_floors() {
        let mut state = SimState::default();
        state.set_speed(-4.0);
        assert_eq!(state.speed(), 0.0);
        state.set_speed(f32::NAN);
        assert_eq!(state.speed(), 0.0);
        state.set_speed(7.5);
        assert_eq!(state.speed(), 7.5);
    }
}
