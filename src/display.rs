use crate::constants::{HIGH_RES_HEIGHT, HIGH_RES_WIDTH};

/// # Display
/// The bit surface sprite and scroll operations draw onto.
///
/// Cells are addressed as `(x, y)` with the origin at the top left. The
/// interpreter only ever addresses cells inside the logical resolution of the
/// current mode (64x32 or 128x64), so an implementation must be at least
/// 128x64 to support high resolution programs. Changing mode never clears it.
pub trait Display {
    /// Turn every cell off
    fn clear(&mut self);

    /// Whether the cell at `(x, y)` is on
    fn get(&self, x: usize, y: usize) -> bool;

    /// Turn the cell at `(x, y)` on or off
    fn set(&mut self, x: usize, y: usize, on: bool);
}

/// # FrameBuffer
/// An in-memory 128x64 Display, indexed as `[y][x]`.
///
/// Hosts can render it directly through `rows`, or provide their own Display.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: [[bool; HIGH_RES_WIDTH]; HIGH_RES_HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[false; HIGH_RES_WIDTH]; HIGH_RES_HEIGHT],
        }
    }

    /// The rows of the surface, top first
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.pixels.iter().map(|row| &row[..])
    }

    /// Number of cells that are on
    pub fn lit(&self) -> usize {
        self.pixels.iter().flatten().filter(|&&on| on).count()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for FrameBuffer {
    fn clear(&mut self) {
        self.pixels = [[false; HIGH_RES_WIDTH]; HIGH_RES_HEIGHT];
    }

    fn get(&self, x: usize, y: usize) -> bool {
        self.pixels
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    fn set(&mut self, x: usize, y: usize, on: bool) {
        if let Some(cell) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
            *cell = on;
        }
    }
}
