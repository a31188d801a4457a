//! Surface module orchestrator following the module conventions used across
//! the crate: public API re-exported here, implementation in `core`.

mod core;

pub use core::{BOX_LIGHT, BoxChars, Frame, Surface};
