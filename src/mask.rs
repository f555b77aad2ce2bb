//! Per-pixel collision masks.
//!
//! Sprites are ASCII art where every non-space character is an opaque cell
//! covering `cell_w` x `cell_h` logical pixels.  The mask is expanded to
//! pixel resolution so two sprites at arbitrary pixel offsets can be tested
//! for overlapping opaque pixels.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask from art rows.  Rows shorter than the widest row are
    /// treated as padded with transparent cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], cell_w: i32, cell_h: i32) -> Self {
        let cols = rows
            .iter()
            .map(|r| r.as_ref().chars().count())
            .max()
            .unwrap_or(0) as i32;
        let width = cols * cell_w;
        let height = rows.len() as i32 * cell_h;
        let mut bits = vec![false; (width * height).max(0) as usize];

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.as_ref().chars().enumerate() {
                if ch == ' ' {
                    continue;
                }
                let x0 = col as i32 * cell_w;
                let y0 = row as i32 * cell_h;
                for y in y0..y0 + cell_h {
                    let start = (y * width + x0) as usize;
                    bits[start..start + cell_w as usize].fill(true);
                }
            }
        }

        Self { width, height, bits }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Opacity at a pixel; anything outside the mask is transparent.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// Number of opaque pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when `other`, placed at `(dx, dy)` relative to this mask's
    /// top-left corner, shares at least one opaque pixel with this mask.
    pub fn overlaps(&self, other: &Mask, dx: i32, dy: i32) -> bool {
        let x_start = dx.max(0);
        let x_end = (dx + other.width).min(self.width);
        let y_start = dy.max(0);
        let y_end = (dy + other.height).min(self.height);

        for y in y_start..y_end {
            for x in x_start..x_end {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return true;
                }
            }
        }
        false
    }
}
