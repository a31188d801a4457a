use std::fmt;

use crate::error::{Result, WindowError};
use crate::geometry::Rect;
use crate::surface::Surface;
use crate::width::display_width;

/// Text for one cell: a fixed string or a producer re-invoked on every
/// render. Producers may read arbitrary external state (sibling geometry,
/// terminal size) through whatever capability they captured; their output is
/// never cached.
pub enum CellValue {
    Static(String),
    Dynamic(Box<dyn Fn() -> String + Send>),
}

impl CellValue {
    pub fn dynamic<F>(producer: F) -> Self
    where
        F: Fn() -> String + Send + 'static,
    {
        Self::Dynamic(Box::new(producer))
    }
}

impl From<&str> for CellValue {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for CellValue {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

impl fmt::Debug for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// One text slot inside a [`ContentGrid`].
///
/// Cells start disabled and become enabled the moment a value is assigned;
/// a disabled cell renders nothing and reports an empty value.
#[derive(Debug)]
pub struct CellContent {
    enabled: bool,
    value: CellValue,
}

impl Default for CellContent {
    fn default() -> Self {
        Self {
            enabled: false,
            value: CellValue::Static(String::new()),
        }
    }
}

impl CellContent {
    pub fn set_static(&mut self, text: impl Into<String>) {
        self.set_value(CellValue::Static(text.into()));
    }

    pub fn set_dynamic<F>(&mut self, producer: F)
    where
        F: Fn() -> String + Send + 'static,
    {
        self.set_value(CellValue::dynamic(producer));
    }

    pub fn set_value(&mut self, value: CellValue) {
        self.value = value;
        self.enabled = true;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Current text: the literal string, or the producer's return value
    /// evaluated right now. Disabled cells yield the empty string.
    pub fn current_value(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        match &self.value {
            CellValue::Static(text) => text.clone(),
            CellValue::Dynamic(producer) => producer(),
        }
    }

    /// Render the cell centered within its column slice. Values wider than
    /// the slice are a caller contract violation; the offset saturates and
    /// the surface clips the overflow.
    fn render(&self, surface: &mut Surface, row: u16, col_start: u16, slice_width: u16) {
        if !self.enabled {
            return;
        }
        let value = self.current_value();
        let len = display_width(&value).min(u16::MAX as usize) as u16;
        let x = col_start + slice_width.saturating_sub(len) / 2;
        surface.put_str(row, x, &value, false);
    }
}

/// Row-major collection of cells rendered inside a window's interior.
///
/// Every row keeps the same column count once population is finished; a
/// grid with zero rows is a valid, empty window.
#[derive(Debug, Default)]
pub struct ContentGrid {
    rows: Vec<Vec<CellContent>>,
    row_cursor: usize,
}

impl ContentGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a slot exists at the population cursor: the first row when the
    /// grid is empty, a single disabled cell when the cursor row is empty.
    /// Deliberately conservative: each call touches at most one cell, so
    /// row-uniform column counts hold by construction.
    pub fn push_slot(&mut self) {
        if self.rows.is_empty() {
            self.rows.push(Vec::new());
        }
        if self.rows[self.row_cursor].is_empty() {
            self.rows[self.row_cursor].push(CellContent::default());
        }
    }

    /// Append a value at the population cursor, allocating the slot first if
    /// needed.
    pub fn push_cell(&mut self, value: CellValue) {
        self.push_slot();
        if let Some(cell) = self.rows[self.row_cursor].last_mut() {
            cell.set_value(value);
        }
    }

    /// Overwrite the cell at (`row`, `col`) in place.
    pub fn replace(&mut self, row: usize, col: usize, value: CellValue) -> Result<()> {
        let (rows, cols) = dims(&self.rows);
        let cell = self
            .rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(WindowError::OutOfRange {
                row,
                col,
                rows,
                cols,
            })?;
        cell.set_value(value);
        Ok(())
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<&CellContent> {
        self.rows.get(row).and_then(|r| r.get(col)).ok_or_else(|| {
            let (rows, cols) = dims(&self.rows);
            WindowError::OutOfRange {
                row,
                col,
                rows,
                cols,
            }
        })
    }

    /// (row count, column count of the first row); zero columns when empty.
    pub fn dimensions(&self) -> (usize, usize) {
        dims(&self.rows)
    }

    /// Paint the grid into `interior` (surface-local coordinates): one
    /// surface row per grid row, equal-width column slices with the division
    /// remainder left as right padding. Rows beyond the interior height are
    /// simply not visible.
    pub fn render(&self, surface: &mut Surface, interior: Rect) {
        for (row_idx, row) in self.rows.iter().enumerate() {
            if row_idx >= interior.height as usize {
                break;
            }
            if row.is_empty() {
                continue;
            }
            let slice = interior.width / row.len() as u16;
            if slice == 0 {
                continue;
            }
            for (col_idx, cell) in row.iter().enumerate() {
                cell.render(
                    surface,
                    interior.y + row_idx as u16,
                    interior.x + col_idx as u16 * slice,
                    slice,
                );
            }
        }
    }
}

fn dims(rows: &[Vec<CellContent>]) -> (usize, usize) {
    (rows.len(), rows.first().map(Vec::len).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn surface(width: u16, height: u16) -> Surface {
        Surface::new(Rect::new(0, 0, width, height))
    }

    #[test]
    fn cells_start_disabled_and_empty() {
        let cell = CellContent::default();
        assert!(!cell.is_enabled());
        assert_eq!(cell.current_value(), "");
    }

    #[test]
    fn assigning_a_value_enables_the_cell() {
        let mut cell = CellContent::default();
        cell.set_static("42");
        assert!(cell.is_enabled());
        assert_eq!(cell.current_value(), "42");
    }

    #[test]
    fn producers_are_reinvoked_every_read() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut cell = CellContent::default();
        let seen = Arc::clone(&counter);
        cell.set_dynamic(move || format!("{}", seen.fetch_add(1, Ordering::SeqCst)));

        assert_eq!(cell.current_value(), "0");
        assert_eq!(cell.current_value(), "1");
    }

    #[test]
    fn disabled_cells_touch_no_columns() {
        let mut target = surface(10, 1);
        let mut grid = ContentGrid::new();
        grid.push_slot();
        assert_eq!(grid.dimensions(), (1, 1));
        grid.render(&mut target, Rect::new(0, 0, 10, 1));
        assert_eq!(target.row_text(0), " ".repeat(10));
    }

    #[test]
    fn rendered_cell_is_centered_in_its_slice() {
        let mut target = surface(10, 1);
        let mut grid = ContentGrid::new();
        grid.push_cell("abcd".into());
        grid.render(&mut target, Rect::new(0, 0, 10, 1));
        // (10 - 4) / 2 = 3
        assert_eq!(target.row_text(0), "   abcd   ");
    }

    #[test]
    fn replace_round_trips_without_caching() {
        let mut grid = ContentGrid::new();
        grid.push_cell("old".into());
        grid.replace(0, 0, "new".into()).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().current_value(), "new");

        grid.replace(0, 0, CellValue::dynamic(|| "live".to_string()))
            .unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().current_value(), "live");
    }

    #[test]
    fn replace_outside_bounds_fails() {
        let mut grid = ContentGrid::new();
        grid.push_cell("only".into());
        let err = grid.replace(0, 5, "x".into()).unwrap_err();
        assert!(matches!(
            err,
            WindowError::OutOfRange {
                row: 0,
                col: 5,
                rows: 1,
                cols: 1,
            }
        ));
        // The cell in range still updates after a failed replace.
        grid.replace(0, 0, "fresh".into()).unwrap();
        assert_eq!(grid.cell(0, 0).unwrap().current_value(), "fresh");
    }

    #[test]
    fn rows_below_the_interior_are_invisible() {
        let mut target = surface(6, 1);
        let mut grid = ContentGrid::new();
        grid.push_cell("top".into());
        // Interior one row tall; nothing should panic or overflow.
        grid.render(&mut target, Rect::new(0, 0, 6, 1));
        assert_eq!(target.row_text(0), " top  ");
    }

    #[test]
    fn empty_grid_is_a_valid_window() {
        let grid = ContentGrid::new();
        assert_eq!(grid.dimensions(), (0, 0));
        let mut target = surface(4, 2);
        grid.render(&mut target, Rect::new(0, 0, 4, 2));
        assert_eq!(target.row_text(0), "    ");
    }
}
