//! # Workflow Module
//!
//! The linear stage stepper shared by the contract request workflow and the
//! contract lifecycle indicator.
//!
//! - `stage`: stage keys and immutable stage sequences
//! - `controller`: position tracking and transitions
//! - `indicator`: completed / current / upcoming markers
//! - `renderer`: per-stage content projection

mod controller;
mod indicator;
mod renderer;
mod stage;

pub use controller::*;
pub use indicator::*;
pub use renderer::*;
pub use stage::*;
