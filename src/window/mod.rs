//! Window module orchestrator; implementation lives in the private `core`
//! module.

mod core;

pub use core::{TitleAlign, Window, WindowOption};
