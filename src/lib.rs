//! Slope Roller - a ball pushed by voice commands along an adjustable incline
//!
//! Core modules:
//! - `sim`: Deterministic simulation (modes, impulse slot, fixed-step physics)
//! - `renderer`: Scene layout and the WebGPU sprite pipeline
//! - `voice`: Recognized-phrase interpretation
//! - `controls`: Slider progress <-> physical parameter mapping
//! - `app`: Per-screen session wiring everything together
//! - `settings`: User configuration

pub mod app;
pub mod controls;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod voice;

pub use app::Session;
pub use settings::Settings;
pub use sim::{Mode, PhysicsParams};

/// Simulation and layout constants
pub mod consts {
    /// Physics tick interval in milliseconds
    pub const TICK_INTERVAL_MS: u32 = 30;
    /// Fixed physics timestep in seconds
    pub const SIM_DT: f32 = TICK_INTERVAL_MS as f32 / 1000.0;
    /// Maximum ticks per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Converts m/s² into on-screen speed (pixels per frame)
    pub const PIXEL_SCALE: f32 = 55.0;
    /// Masses below this are treated as this
    pub const MASS_FLOOR: f32 = 0.1;

    /// Force delivered by one recognized shout
    pub const SHOUT_FORCE: f32 = 260.0;

    /// Default mass for every mode (kg)
    pub const DEFAULT_MASS_KG: f32 = 5.0;
    /// Fixed incline of the plain slope mode (degrees)
    pub const SLOPE_ANGLE_DEG: f32 = 45.0;
    /// Member mode starting incline (degrees)
    pub const MEMBER_ANGLE_DEG: f32 = 30.0;
    /// Member mode starting friction coefficient
    pub const MEMBER_MU: f32 = 0.20;

    /// Ball sprite edge length (pixels)
    pub const BALL_SIZE: u32 = 150;
    /// Ball tilt on incline modes (degrees, negative = nose up)
    pub const SLOPE_BALL_TILT_DEG: f32 = -15.0;
    /// Overlay height as a fraction of the viewport height
    pub const SLOPE_HEIGHT_RATIO: f32 = 0.45;
    /// Overlay width as a multiple of viewport width (hides edge seams)
    pub const SLOPE_WIDTH_SCALE: f32 = 1.2;
    /// How far the overlay is pushed below the viewport bottom
    pub const SLOPE_VERTICAL_OFFSET: f32 = 80.0;
    /// Ball top on the overlay, as a fraction of overlay height from its top
    pub const SLOPE_BALL_ANCHOR_RATIO: f32 = 0.35;
    /// Ball top in flat mode, measured up from the viewport bottom
    pub const FLAT_BALL_BOTTOM_OFFSET: f32 = 250.0;
}

/// Incline deceleration (m/s²) for an angle in degrees and a friction coefficient.
///
/// Gravity along the slope plus kinetic friction against the normal force.
#[inline]
pub fn incline_deceleration(angle_deg: f32, mu: f32) -> f32 {
    let rad = angle_deg.to_radians();
    consts::GRAVITY * rad.sin() + mu * consts::GRAVITY * rad.cos()
}
