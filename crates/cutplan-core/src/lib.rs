//! Cutting plan optimizer: places rectangular parts on material sheets and
//! reports which parts could not be placed.

pub mod config;
mod error;
pub mod optimizer;
pub mod packer;
mod types;
mod validate;

pub use config::CuttingConfig;
pub use error::{CuttingError, Result};
pub use optimizer::{calculate_utilization_rate, optimize_cutting, CuttingOptimizer};
pub use types::*;
pub use validate::{drop_zero_size_parts, validate_input};
