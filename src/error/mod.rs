//! Error module orchestrator; implementation lives in the private `types`
//! module.

mod types;

pub use types::{Result, WindowError};
