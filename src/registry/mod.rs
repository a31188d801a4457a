//! Registry module orchestrator; implementation lives in the private `core`
//! module.

mod core;

pub use core::{GeometryView, Notification, WindowRegistry};
