//! Terminal geometry primitives shared across the engine.

/// Integer size measured in terminal character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Rectangle area anchored within the terminal grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Placement rule for a window, re-evaluated against the current terminal
/// size on every resize. Implemented by any `Fn(Size) -> Rect` closure, so
/// call sites never need a global terminal-size lookup.
pub trait GeometrySource: Send {
    fn rect(&self, terminal: Size) -> Rect;
}

impl<F> GeometrySource for F
where
    F: Fn(Size) -> Rect + Send,
{
    fn rect(&self, terminal: Size) -> Rect {
        self(terminal)
    }
}
