//! Content module orchestrator; implementation lives in the private `core`
//! module.

mod core;

pub use core::{CellContent, CellValue, ContentGrid};
