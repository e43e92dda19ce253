//! Element grid
//!
//! Two parallel row-major buffers of `width * height` words (`heads` and
//! `tails`). Every effective write is reported to the chunk tracker so the
//! processor and the renderer only look at regions that changed.
//!
//! Direct accessors require a valid position and panic otherwise. Use the
//! `*_or_none` probes when scanning neighbourhoods near the border.

use thiserror::Error;

use crate::chunks::ChunkTracker;
use crate::consts::DEFAULT_CHUNK_SIZE;
use crate::element::Element;

/// Grid construction failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AreaError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    #[error("{name} buffer holds {actual} cells, expected {expected}")]
    BufferSizeMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone)]
pub struct ElementArea {
    width: usize,
    height: usize,
    heads: Vec<u32>,
    tails: Vec<u32>,
    chunks: ChunkTracker,
}

impl ElementArea {
    /// Grid filled with `element`, default chunk size
    pub fn new(width: usize, height: usize, element: Element) -> Self {
        Self::with_chunk_size(width, height, DEFAULT_CHUNK_SIZE, element)
    }

    pub fn with_chunk_size(width: usize, height: usize, chunk_size: usize, element: Element) -> Self {
        let len = width * height;
        Self {
            width,
            height,
            heads: vec![element.head; len],
            tails: vec![element.tail; len],
            chunks: ChunkTracker::new(width, height, chunk_size),
        }
    }

    /// Adopt existing buffers, e.g. from a snapshot
    pub fn from_buffers(
        width: usize,
        height: usize,
        chunk_size: usize,
        heads: Vec<u32>,
        tails: Vec<u32>,
    ) -> Result<Self, AreaError> {
        if width == 0 || height == 0 {
            return Err(AreaError::InvalidDimensions { width, height });
        }
        let expected = width * height;
        if heads.len() != expected {
            return Err(AreaError::BufferSizeMismatch {
                name: "heads",
                expected,
                actual: heads.len(),
            });
        }
        if tails.len() != expected {
            return Err(AreaError::BufferSizeMismatch {
                name: "tails",
                expected,
                actual: tails.len(),
            });
        }
        Ok(Self {
            width,
            height,
            heads,
            tails,
            chunks: ChunkTracker::new(width, height, chunk_size),
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width as i32
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height as i32
    }

    #[inline]
    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> usize {
        assert!(
            self.is_valid_position(x, y),
            "position ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        y as usize * self.width + x as usize
    }

    #[inline]
    fn mark(&mut self, x: i32, y: i32) {
        self.chunks.mark(x as usize, y as usize);
    }

    // reads

    #[inline]
    pub fn head(&self, x: i32, y: i32) -> u32 {
        self.heads[self.index(x, y)]
    }

    #[inline]
    pub fn tail(&self, x: i32, y: i32) -> u32 {
        self.tails[self.index(x, y)]
    }

    #[inline]
    pub fn element(&self, x: i32, y: i32) -> Element {
        let i = self.index(x, y);
        Element::new(self.heads[i], self.tails[i])
    }

    #[inline]
    pub fn head_or_none(&self, x: i32, y: i32) -> Option<u32> {
        self.is_valid_position(x, y)
            .then(|| self.heads[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn tail_or_none(&self, x: i32, y: i32) -> Option<u32> {
        self.is_valid_position(x, y)
            .then(|| self.tails[y as usize * self.width + x as usize])
    }

    #[inline]
    pub fn element_or_none(&self, x: i32, y: i32) -> Option<Element> {
        self.is_valid_position(x, y).then(|| {
            let i = y as usize * self.width + x as usize;
            Element::new(self.heads[i], self.tails[i])
        })
    }

    // writes

    #[inline]
    pub fn set_head(&mut self, x: i32, y: i32, head: u32) {
        let i = self.index(x, y);
        if self.heads[i] != head {
            self.heads[i] = head;
            self.mark(x, y);
        }
    }

    #[inline]
    pub fn set_tail(&mut self, x: i32, y: i32, tail: u32) {
        let i = self.index(x, y);
        if self.tails[i] != tail {
            self.tails[i] = tail;
            self.mark(x, y);
        }
    }

    #[inline]
    pub fn set_element(&mut self, x: i32, y: i32, element: Element) {
        self.set_head_and_tail(x, y, element.head, element.tail);
    }

    #[inline]
    pub fn set_head_and_tail(&mut self, x: i32, y: i32, head: u32, tail: u32) {
        let i = self.index(x, y);
        if self.heads[i] != head || self.tails[i] != tail {
            self.heads[i] = head;
            self.tails[i] = tail;
            self.mark(x, y);
        }
    }

    /// Exchange two cells, both words at once
    #[inline]
    pub fn swap(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let i = self.index(x1, y1);
        let j = self.index(x2, y2);
        if self.heads[i] == self.heads[j] && self.tails[i] == self.tails[j] {
            return;
        }
        self.heads.swap(i, j);
        self.tails.swap(i, j);
        self.mark(x1, y1);
        self.mark(x2, y2);
    }

    // buffers & chunks

    pub fn heads(&self) -> &[u32] {
        &self.heads
    }

    pub fn tails(&self) -> &[u32] {
        &self.tails
    }

    pub fn chunk_size(&self) -> usize {
        self.chunks.chunk_size()
    }

    pub fn chunks(&self) -> &ChunkTracker {
        &self.chunks
    }

    pub(crate) fn chunks_mut(&mut self) -> &mut ChunkTracker {
        &mut self.chunks
    }

    /// Schedule the chunk owning `(x, y)` for the next tick. Ignored out of bounds.
    pub fn trigger(&mut self, x: i32, y: i32) {
        if self.is_valid_position(x, y) {
            self.chunks.trigger(x as usize, y as usize);
        }
    }

    /// Schedule every chunk and flag all of them for rendering
    pub fn trigger_all(&mut self) {
        self.chunks.mark_all();
    }

    pub fn changed_chunks(&self) -> &[bool] {
        self.chunks.changed()
    }

    pub fn clean_changed_chunks(&mut self) {
        self.chunks.clean_changed();
    }

    /// Copy into a new grid of another size. Rows stay aligned to the bottom
    /// edge; `offset_x` shifts columns right. Uncovered cells get `fill`.
    pub fn resized(&self, width: usize, height: usize, offset_x: i32, fill: Element) -> ElementArea {
        let mut target = ElementArea::with_chunk_size(width, height, self.chunk_size(), fill);
        let offset_y = height as i32 - self.height as i32;
        for y in 0..self.height as i32 {
            let ty = y + offset_y;
            for x in 0..self.width as i32 {
                let tx = x + offset_x;
                if target.is_valid_position(tx, ty) {
                    let element = self.element(x, y);
                    let i = target.index(tx, ty);
                    target.heads[i] = element.head;
                    target.tails[i] = element.tail;
                }
            }
        }
        target
    }

    /// Number of cells whose type class is not air
    pub fn count_non_air(&self) -> usize {
        self.heads
            .iter()
            .filter(|&&head| !Element::new(head, 0).is_air())
            .count()
    }
}
