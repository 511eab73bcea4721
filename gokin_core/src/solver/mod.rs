//! Nonlinear program abstractions shared by every backend

mod problem;
mod backend;
mod outcome;
mod param;
mod solver_error;

pub use problem::*;
pub use backend::*;
pub use outcome::*;
pub use param::*;
pub use solver_error::*;
