//! Terminal window-layout and focus-management engine.
//!
//! Named, independently-positioned windows on a character grid, each with
//! optional border and aligned title, a content grid of static or lazily
//! evaluated cells, and a cyclic focus order. Windows draw into off-screen
//! surfaces; a registry broadcast recomputes geometry on terminal resize and
//! a single batched flush per loop iteration commits everything to the
//! terminal.

pub mod content;
pub mod cursor;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod render;
pub mod shell;
pub mod surface;
pub mod width;
pub mod window;

pub use content::{CellContent, CellValue, ContentGrid};
pub use error::{Result, WindowError};
pub use geometry::{GeometrySource, Rect, Size};
pub use logging::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use metrics::{MetricSnapshot, ShellMetrics};
pub use registry::{GeometryView, Notification, WindowRegistry};
pub use render::{AnsiRenderer, RendererSettings};
pub use shell::{CliDriver, CliDriverError, DriverResult, KeyBindings, Shell, ShellConfig, ShellEvent};
pub use surface::{Frame, Surface};
pub use width::display_width;
pub use window::{TitleAlign, Window, WindowOption};
