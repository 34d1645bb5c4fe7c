//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Inputs enter through the impulse slot or the member parameters
//! - No rendering or platform dependencies

pub mod impulse;
pub mod mode;
pub mod state;
pub mod tick;

pub use impulse::ImpulseSlot;
pub use mode::{Mode, ModeProfile, PhysicsParams};
pub use state::SimState;
pub use tick::{TickReport, step_speed, tick};
