use std::io::Write;

use crate::cursor;
use crate::error::Result;
use crate::surface::Frame;

/// Renderer runtime parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererSettings {
    pub restore_cursor: Option<(u16, u16)>,
}

/// ANSI escape code renderer committing batched window frames to a terminal
/// handle. One call writes every frame and flushes the writer exactly once,
/// so the terminal never observes a partially painted batch.
pub struct AnsiRenderer {
    settings: RendererSettings,
}

impl AnsiRenderer {
    pub fn new(settings: RendererSettings) -> Self {
        Self { settings }
    }

    pub fn with_default() -> Self {
        Self::new(RendererSettings::default())
    }

    pub fn settings_mut(&mut self) -> &mut RendererSettings {
        &mut self.settings
    }

    pub fn render(&mut self, writer: &mut impl Write, frames: &[Frame]) -> Result<()> {
        for frame in frames {
            for (offset, line) in frame.lines.iter().enumerate() {
                let row = frame.rect.y.saturating_add(offset as u16).saturating_add(1);
                let col = frame.rect.x.saturating_add(1);
                write!(writer, "{}{}", cursor::move_to(row, col), line)?;
            }
        }

        if let Some((row, col)) = self.settings.restore_cursor {
            write!(writer, "{}", cursor::move_to(row + 1, col + 1))?;
        }

        writer.flush()?;
        Ok(())
    }
}
