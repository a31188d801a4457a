use blake3::Hash;

use crate::cursor;
use crate::geometry::Rect;

/// Characters used to frame a bordered window.
#[derive(Debug, Clone, Copy)]
pub struct BoxChars {
    pub tl: char,
    pub tr: char,
    pub bl: char,
    pub br: char,
    pub h: char,
    pub v: char,
}

/// Light box-drawing set, the only border style the engine ships.
pub const BOX_LIGHT: BoxChars = BoxChars {
    tl: '┌',
    tr: '┐',
    bl: '└',
    br: '┘',
    h: '─',
    v: '│',
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    reverse: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            reverse: false,
        }
    }
}

/// A positioned batch of rendered lines ready for the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub rect: Rect,
    pub lines: Vec<String>,
}

/// Off-screen character buffer for one window.
///
/// Draw calls land here, never on the terminal; the owning window marks the
/// surface pending and a later batched flush turns it into a [`Frame`]. A
/// content hash suppresses frames whose bytes and placement did not change,
/// so repeated identical redraws cost nothing downstream.
#[derive(Debug)]
pub struct Surface {
    rect: Rect,
    cells: Vec<Vec<Cell>>,
    pending: bool,
    hash: Option<Hash>,
}

impl Surface {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cells: blank_cells(rect),
            pending: false,
            hash: None,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> u16 {
        self.rect.width
    }

    pub fn height(&self) -> u16 {
        self.rect.height
    }

    /// Reset every cell to a blank, unemphasized space.
    pub fn clear(&mut self) {
        for row in &mut self.cells {
            row.fill(Cell::default());
        }
    }

    /// Reposition and resize the buffer, discarding previous content.
    pub fn move_resize(&mut self, rect: Rect) {
        self.rect = rect;
        self.cells = blank_cells(rect);
    }

    /// Write `text` starting at (`row`, `col`) in surface-local coordinates.
    /// Writes past the right or bottom edge clip silently.
    pub fn put_str(&mut self, row: u16, col: u16, text: &str, reverse: bool) {
        let Some(cells) = self.cells.get_mut(row as usize) else {
            return;
        };
        for (offset, ch) in text.chars().enumerate() {
            let Some(cell) = cells.get_mut(col as usize + offset) else {
                break;
            };
            *cell = Cell { ch, reverse };
        }
    }

    /// Draw the window frame along the outer edge.
    pub fn draw_box(&mut self, chars: &BoxChars) {
        let (w, h) = (self.rect.width, self.rect.height);
        if w == 0 || h == 0 {
            return;
        }
        let (right, bottom) = (w - 1, h - 1);
        for col in 0..w {
            self.put_char(0, col, chars.h);
            self.put_char(bottom, col, chars.h);
        }
        for row in 0..h {
            self.put_char(row, 0, chars.v);
            self.put_char(row, right, chars.v);
        }
        self.put_char(0, 0, chars.tl);
        self.put_char(0, right, chars.tr);
        self.put_char(bottom, 0, chars.bl);
        self.put_char(bottom, right, chars.br);
    }

    fn put_char(&mut self, row: u16, col: u16, ch: char) {
        if let Some(cell) = self
            .cells
            .get_mut(row as usize)
            .and_then(|r| r.get_mut(col as usize))
        {
            cell.ch = ch;
        }
    }

    /// Queue the surface for the next batched flush.
    pub fn mark_pending(&mut self) {
        self.pending = true;
    }

    /// Force the next flush to re-emit even if the content is unchanged.
    pub fn invalidate(&mut self) {
        self.hash = None;
        self.pending = true;
    }

    /// Take the pending frame, if any. Returns `None` when the surface is
    /// not pending or when its composed bytes and placement match the last
    /// emitted frame.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !self.pending {
            return None;
        }
        self.pending = false;

        let lines: Vec<String> = (0..self.rect.height)
            .map(|row| self.compose_line(row))
            .collect();

        let mut digest = blake3::Hasher::new();
        digest.update(&self.rect.x.to_le_bytes());
        digest.update(&self.rect.y.to_le_bytes());
        for line in &lines {
            digest.update(line.as_bytes());
            digest.update(b"\n");
        }
        let new_hash = digest.finalize();

        if self.hash.map(|h| h == new_hash).unwrap_or(false) {
            return None;
        }
        self.hash = Some(new_hash);

        Some(Frame {
            rect: self.rect,
            lines,
        })
    }

    fn compose_line(&self, row: u16) -> String {
        let mut line = String::new();
        let mut reversed = false;
        for cell in &self.cells[row as usize] {
            if cell.reverse != reversed {
                line.push_str(if cell.reverse {
                    cursor::reverse_on()
                } else {
                    cursor::reverse_off()
                });
                reversed = cell.reverse;
            }
            line.push(cell.ch);
        }
        if reversed {
            line.push_str(cursor::reverse_off());
        }
        line
    }

    /// Plain-text view of one row, without emphasis sequences. Intended for
    /// inspection and assertions, not for the renderer.
    pub fn row_text(&self, row: u16) -> String {
        self.cells
            .get(row as usize)
            .map(|cells| cells.iter().map(|c| c.ch).collect())
            .unwrap_or_default()
    }

    /// Whether the cell at (`row`, `col`) carries reverse-video emphasis.
    pub fn is_reversed(&self, row: u16, col: u16) -> bool {
        self.cells
            .get(row as usize)
            .and_then(|r| r.get(col as usize))
            .map(|c| c.reverse)
            .unwrap_or(false)
    }
}

fn blank_cells(rect: Rect) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); rect.width as usize]; rect.height as usize]
}
