//! Screen modes and the parameter tuple each one selects

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Which variant of the demo is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Level ground: no gravity component, no friction
    #[default]
    Flat,
    /// Fixed 45° frictionless incline
    Slope,
    /// Incline with user-tunable mass, angle and friction
    Member,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Flat, Mode::Slope, Mode::Member];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Flat => "flat",
            Mode::Slope => "slope",
            Mode::Member => "member",
        }
    }

    /// Parse a mode name or its numeric index ("0", "1", "2")
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "flat" | "0" => Some(Mode::Flat),
            "slope" | "1" => Some(Mode::Slope),
            "member" | "custom" | "2" => Some(Mode::Member),
            _ => None,
        }
    }

    /// Whether gravity and friction act along the travel direction
    pub fn is_incline(&self) -> bool {
        !matches!(self, Mode::Flat)
    }

    /// Whether sliders may change the parameters
    pub fn is_tunable(&self) -> bool {
        matches!(self, Mode::Member)
    }

    /// Starting parameters for this mode
    pub fn default_params(&self) -> PhysicsParams {
        match self {
            Mode::Flat => PhysicsParams::new(DEFAULT_MASS_KG, 0.0, 0.0),
            Mode::Slope => PhysicsParams::new(DEFAULT_MASS_KG, SLOPE_ANGLE_DEG, 0.0),
            Mode::Member => PhysicsParams::new(DEFAULT_MASS_KG, MEMBER_ANGLE_DEG, MEMBER_MU),
        }
    }

    pub fn profile(&self) -> ModeProfile {
        match self {
            Mode::Flat => ModeProfile {
                slope_background: false,
                show_overlay: false,
                ball_tilt_deg: 0.0,
            },
            Mode::Slope | Mode::Member => ModeProfile {
                slope_background: true,
                show_overlay: true,
                ball_tilt_deg: SLOPE_BALL_TILT_DEG,
            },
        }
    }

    /// Status line shown when the screen opens
    pub fn status_text(&self) -> &'static str {
        match self {
            Mode::Flat => "模式：平面 (無重力 / 無摩擦)",
            Mode::Slope => "模式：斜面 (45°，有重力)",
            Mode::Member => "會員專屬：自訂 m / θ / μ",
        }
    }
}

/// Mass, incline and friction driving the stepper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    pub mass_kg: f32,
    pub angle_deg: f32,
    pub mu: f32,
}

impl PhysicsParams {
    pub const fn new(mass_kg: f32, angle_deg: f32, mu: f32) -> Self {
        Self {
            mass_kg,
            angle_deg,
            mu,
        }
    }

    /// Mass with the division-by-zero floor applied
    pub fn effective_mass(&self) -> f32 {
        if self.mass_kg.is_finite() {
            self.mass_kg.max(MASS_FLOOR)
        } else {
            MASS_FLOOR
        }
    }
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Mode::Flat.default_params()
    }
}

/// Visual flags a mode implies for the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    /// Use the slope background instead of the flat one
    pub slope_background: bool,
    /// Draw the road overlay along the bottom
    pub show_overlay: bool,
    /// Fixed ball rotation (degrees)
    pub ball_tilt_deg: f32,
}

impl Default for ModeProfile {
    fn default() -> Self {
        Mode::Flat.profile()
    }
}
