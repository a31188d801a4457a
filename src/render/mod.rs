//! Render module orchestrator; implementation lives in the private `core`
//! module.

mod core;

pub use core::{AnsiRenderer, RendererSettings};
