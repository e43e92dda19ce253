//! Chunk bookkeeping for the scheduler and the renderer
//!
//! Chunks are square tiles of the grid used only for dirty tracking. Two
//! bitmaps are kept:
//! - `dirty`: chunks the processor must visit on its next tick
//! - `changed`: chunks the renderer has not consumed yet
//!
//! A write on a chunk edge also schedules the neighbouring chunk so that
//! elements sitting across the border react in the next tick.

/// Per-chunk dirty/changed flags
#[derive(Debug, Clone)]
pub struct ChunkTracker {
    chunk_size: usize,
    cols: usize,
    rows: usize,
    dirty: Vec<bool>,
    changed: Vec<bool>,
}

impl ChunkTracker {
    /// Create a tracker covering a `width x height` grid. Everything starts
    /// dirty and changed so the first tick and first frame see the whole grid.
    pub fn new(width: usize, height: usize, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        let cols = width.div_ceil(chunk_size);
        let rows = height.div_ceil(chunk_size);
        let count = cols * rows;
        Self {
            chunk_size,
            cols,
            rows,
            dirty: vec![true; count],
            changed: vec![true; count],
        }
    }

    #[inline]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Number of chunk columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of chunk rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    fn index(&self, cx: usize, cy: usize) -> usize {
        cy * self.cols + cx
    }

    /// Record a write at cell `(x, y)`
    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) {
        let cx = x / self.chunk_size;
        let cy = y / self.chunk_size;
        let i = self.index(cx, cy);
        self.changed[i] = true;
        self.schedule(x, y, cx, cy);
    }

    /// Schedule the chunk owning `(x, y)` without flagging it for rendering
    #[inline]
    pub fn trigger(&mut self, x: usize, y: usize) {
        let cx = x / self.chunk_size;
        let cy = y / self.chunk_size;
        self.schedule(x, y, cx, cy);
    }

    fn schedule(&mut self, x: usize, y: usize, cx: usize, cy: usize) {
        let i = self.index(cx, cy);
        self.dirty[i] = true;

        let last = self.chunk_size - 1;
        let local_x = x % self.chunk_size;
        let local_y = y % self.chunk_size;

        let left = local_x == 0 && cx > 0;
        let right = local_x == last && cx + 1 < self.cols;
        let up = local_y == 0 && cy > 0;
        let down = local_y == last && cy + 1 < self.rows;

        if left {
            let j = self.index(cx - 1, cy);
            self.dirty[j] = true;
        }
        if right {
            let j = self.index(cx + 1, cy);
            self.dirty[j] = true;
        }
        if up {
            let j = self.index(cx, cy - 1);
            self.dirty[j] = true;
            if left {
                let k = self.index(cx - 1, cy - 1);
                self.dirty[k] = true;
            }
            if right {
                let k = self.index(cx + 1, cy - 1);
                self.dirty[k] = true;
            }
        }
        if down {
            let j = self.index(cx, cy + 1);
            self.dirty[j] = true;
            if left {
                let k = self.index(cx - 1, cy + 1);
                self.dirty[k] = true;
            }
            if right {
                let k = self.index(cx + 1, cy + 1);
                self.dirty[k] = true;
            }
        }
    }

    /// Schedule and flag every chunk
    pub fn mark_all(&mut self) {
        self.dirty.fill(true);
        self.changed.fill(true);
    }

    /// Move the dirty set into `active` and start a fresh dirty set.
    /// `active` is reused between ticks to avoid allocation.
    pub fn take_dirty(&mut self, active: &mut Vec<bool>) {
        active.resize(self.dirty.len(), false);
        std::mem::swap(&mut self.dirty, active);
        self.dirty.fill(false);
    }

    #[cfg(test)]
    pub fn is_dirty(&self, cx: usize, cy: usize) -> bool {
        self.dirty[self.index(cx, cy)]
    }

    /// Changed-chunk bitmap, row-major by chunk
    pub fn changed(&self) -> &[bool] {
        &self.changed
    }

    /// Renderer acknowledges the changed bitmap
    pub fn clean_changed(&mut self) {
        self.changed.fill(false);
    }
}
