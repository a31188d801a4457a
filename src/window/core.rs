use crate::content::{CellValue, ContentGrid};
use crate::error::{Result, WindowError};
use crate::geometry::{GeometrySource, Rect, Size};
use crate::surface::{BOX_LIGHT, Frame, Surface};
use crate::width::display_width;

/// Horizontal placement of a window title along the top border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Decoration switches applied at construction time. Each application
/// triggers a resize so the decorated result is immediately visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowOption {
    Bordered,
    Borderless,
    Titled,
    Untitled,
    TitleLeft,
    TitleCenter,
    TitleRight,
}

/// A named, independently positioned rectangular terminal region with an
/// optional border and title, a selection flag, and one content grid.
///
/// All drawing lands on the window's own [`Surface`]; nothing reaches the
/// terminal until the registry's batched flush.
pub struct Window {
    name: String,
    geometry: Box<dyn GeometrySource>,
    bordered: bool,
    titled: bool,
    title_align: TitleAlign,
    selected: bool,
    content: ContentGrid,
    surface: Surface,
    terminal: Size,
}

impl Window {
    /// Build a window and draw its initial frame. Fails with
    /// `InvalidGeometry` when the source yields a zero-extent rect.
    pub fn new(
        name: impl Into<String>,
        geometry: impl GeometrySource + 'static,
        terminal: Size,
    ) -> Result<Self> {
        let name = name.into();
        let rect = resolve(&name, &geometry, terminal)?;
        let mut window = Self {
            name,
            geometry: Box::new(geometry),
            bordered: true,
            titled: true,
            title_align: TitleAlign::Left,
            selected: false,
            content: ContentGrid::new(),
            surface: Surface::new(rect),
            terminal,
        };
        window.redraw();
        Ok(window)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn rect(&self) -> Rect {
        self.surface.rect()
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn content(&self) -> &ContentGrid {
        &self.content
    }

    /// Apply one decoration switch and re-lay the window out. The geometry
    /// is solved before the flag flips, so a failure mutates nothing.
    pub fn apply_option(&mut self, option: WindowOption) -> Result<()> {
        let rect = self.solve(self.terminal)?;
        match option {
            WindowOption::Bordered => self.bordered = true,
            WindowOption::Borderless => self.bordered = false,
            WindowOption::Titled => self.titled = true,
            WindowOption::Untitled => self.titled = false,
            WindowOption::TitleLeft => self.title_align = TitleAlign::Left,
            WindowOption::TitleCenter => self.title_align = TitleAlign::Center,
            WindowOption::TitleRight => self.title_align = TitleAlign::Right,
        }
        self.apply_rect(self.terminal, rect);
        Ok(())
    }

    /// Give the window focus emphasis and redraw.
    pub fn mark_selected(&mut self) {
        self.selected = true;
        self.redraw();
    }

    /// Drop focus emphasis and redraw.
    pub fn unmark_selected(&mut self) {
        self.selected = false;
        self.redraw();
    }

    /// Evaluate the geometry source against `terminal` without applying the
    /// result. Lets callers validate a whole broadcast before any window
    /// moves.
    pub fn solve(&self, terminal: Size) -> Result<Rect> {
        resolve(&self.name, self.geometry.as_ref(), terminal)
    }

    /// Re-evaluate the geometry source against `terminal`, reposition the
    /// surface and redraw. A failed solve leaves the window untouched.
    /// Idempotent: a second call with the same terminal size yields
    /// identical geometry and identical rendered output.
    pub fn resize(&mut self, terminal: Size) -> Result<()> {
        let rect = self.solve(terminal)?;
        self.apply_rect(terminal, rect);
        Ok(())
    }

    /// Commit an already-solved rect: reposition the surface and redraw.
    pub(crate) fn apply_rect(&mut self, terminal: Size, rect: Rect) {
        self.terminal = terminal;
        self.surface.move_resize(rect);
        self.redraw();
    }

    /// Append content and re-lay the window out, per the content-mutation
    /// contract.
    pub fn push_content(&mut self, value: CellValue) -> Result<()> {
        self.content.push_cell(value);
        self.resize(self.terminal)
    }

    /// Overwrite a grid cell in place and redraw.
    pub fn replace_content(&mut self, row: usize, col: usize, value: CellValue) -> Result<()> {
        self.content.replace(row, col, value)?;
        self.redraw();
        Ok(())
    }

    pub fn content_dimensions(&self) -> (usize, usize) {
        self.content.dimensions()
    }

    /// Interior rectangle in surface-local coordinates: the full area minus
    /// a 1-cell margin on every side when bordered.
    pub fn interior(&self) -> Rect {
        let rect = self.surface.rect();
        if self.bordered {
            Rect::new(
                1,
                1,
                rect.width.saturating_sub(2),
                rect.height.saturating_sub(2),
            )
        } else {
            Rect::new(0, 0, rect.width, rect.height)
        }
    }

    /// Hand the pending frame to the flush pass, if the surface changed.
    pub fn take_frame(&mut self) -> Option<Frame> {
        self.surface.take_frame()
    }

    /// Force the next flush to re-emit this window unconditionally.
    pub fn invalidate(&mut self) {
        self.surface.invalidate();
    }

    /// Draw border, title and content into the surface and mark it pending.
    fn redraw(&mut self) {
        self.surface.clear();
        if self.bordered {
            self.surface.draw_box(&BOX_LIGHT);
        }
        if self.titled {
            self.put_title();
        }
        let interior = self.interior();
        self.content.render(&mut self.surface, interior);
        self.surface.mark_pending();
    }

    fn put_title(&mut self) {
        let title = format!(" {} ", self.name);
        let len = display_width(&title).min(u16::MAX as usize) as u16;
        let width = self.surface.width();
        let start = match self.title_align {
            TitleAlign::Left => 2,
            TitleAlign::Center => width.saturating_sub(len) / 2,
            TitleAlign::Right => width.saturating_sub(len + 2),
        };
        self.surface.put_str(0, start, &title, self.selected);
    }
}

fn resolve(name: &str, geometry: &dyn GeometrySource, terminal: Size) -> Result<Rect> {
    let rect = geometry.rect(terminal);
    if rect.width == 0 || rect.height == 0 {
        return Err(WindowError::InvalidGeometry {
            name: name.to_string(),
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(rect)
}
