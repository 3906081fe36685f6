//! Analytical core of the ice-cream factory dashboard.
//!
//! Five independent models sit behind the [`Model`] boundary:
//!
//! - [`planner`]: linear-programming production mix,
//! - [`inventory`]: economic order quantity,
//! - [`queue`]: M/M/1 steady state,
//! - [`forecast`]: least-squares trend and moving average,
//! - [`breakeven`]: break-even volume.
//!
//! Every call is a pure function of its input. Nothing is cached between calls.

pub mod helpers;

pub mod breakeven;
pub mod error;
pub mod forecast;
pub mod inventory;
pub mod model;
pub mod planner;
pub mod queue;
pub mod simplex;

pub use error::{ComputationError, DomainError, ValidationError};
pub use model::{Curve, CurvePoint, FieldSpec, Model, DEFAULT_SAMPLES};
