//! Member-mode sliders
//!
//! Sliders report integer progress; these helpers map it to physical values
//! and format the labels shown above each slider.

use serde::{Deserialize, Serialize};

use crate::sim::{PhysicsParams, SimState};

/// The three tunable quantities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SliderKind {
    /// Mass, 1.0 - 20.0 kg in 0.1 kg steps
    Mass,
    /// Incline, 0.0 - 60.0° in 0.1° steps
    Angle,
    /// Friction coefficient, 0.00 - 1.00
    Friction,
}

impl SliderKind {
    pub const ALL: [SliderKind; 3] = [SliderKind::Mass, SliderKind::Angle, SliderKind::Friction];

    /// DOM element id of the range input
    pub fn element_id(&self) -> &'static str {
        match self {
            SliderKind::Mass => "mass",
            SliderKind::Angle => "angle",
            SliderKind::Friction => "mu",
        }
    }

    /// Highest progress value the slider reports
    pub fn max_progress(&self) -> u32 {
        match self {
            SliderKind::Mass => 190,
            SliderKind::Angle => 600,
            SliderKind::Friction => 100,
        }
    }

    /// Physical value for a progress position (clamped to the slider range)
    pub fn value_for(&self, progress: u32) -> f32 {
        let p = progress.min(self.max_progress()) as f32;
        match self {
            SliderKind::Mass => 1.0 + p / 10.0,
            SliderKind::Angle => p / 10.0,
            SliderKind::Friction => p / 100.0,
        }
    }

    /// Progress position for a physical value, truncating toward zero
    pub fn progress_for(&self, value: f32) -> u32 {
        let raw = match self {
            SliderKind::Mass => (value - 1.0) * 10.0,
            SliderKind::Angle => value * 10.0,
            SliderKind::Friction => value * 100.0,
        };
        if !raw.is_finite() || raw <= 0.0 {
            return 0;
        }
        (raw as u32).min(self.max_progress())
    }

    /// Read this slider's quantity out of a parameter tuple
    pub fn read(&self, params: &PhysicsParams) -> f32 {
        match self {
            SliderKind::Mass => params.mass_kg,
            SliderKind::Angle => params.angle_deg,
            SliderKind::Friction => params.mu,
        }
    }

    /// Return `params` with this slider's quantity replaced
    pub fn write(&self, params: PhysicsParams, value: f32) -> PhysicsParams {
        let mut params = params;
        match self {
            SliderKind::Mass => params.mass_kg = value,
            SliderKind::Angle => params.angle_deg = value,
            SliderKind::Friction => params.mu = value,
        }
        params
    }

    /// Label text for the current value. `{:?}` keeps the trailing `.0`
    /// on whole numbers ("5.0 kg").
    pub fn label(&self, params: &PhysicsParams) -> String {
        match self {
            SliderKind::Mass => format!("質量 m = {:?} kg", params.mass_kg),
            SliderKind::Angle => format!("坡度 θ = {:?}°", params.angle_deg),
            SliderKind::Friction => format!("摩擦係數 μ = {:?}", params.mu),
        }
    }
}

/// Apply a slider movement to the simulation. Returns the new parameters,
/// or `None` when the active mode is not tunable.
pub fn apply_slider(state: &mut SimState, kind: SliderKind, progress: u32) -> Option<PhysicsParams> {
    let value = kind.value_for(progress);
    let params = kind.write(state.params(), value);
    if state.set_params(params) {
        log::debug!("{:?} slider -> {}", kind, value);
        Some(params)
    } else {
        None
    }
}
