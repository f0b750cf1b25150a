//! Renderer: double-buffered, row-differential presentation.
//!
//! The renderer owns two frames. `back` is painted each tick; `front` mirrors
//! what the display surface last accepted. A flush emits only the rows that
//! differ and then copies them forward.
//!
//! Rows touched since the last flush are tracked, so a flush inspects only
//! those rows. A failed write leaves `front` and the dirty set untouched, so
//! the next flush retries exactly the same rows.

use crate::buffer::diff::{diff_rows, render_full, render_updates};
use crate::buffer::{FrameBuffer, RowUpdate};
use crate::terminal::OutputBuffer;
use std::io::{self, Write};
use std::time::Instant;

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Flushes that emitted at least one row.
    pub frames: u64,
    /// Total rows emitted.
    pub rows_emitted: u64,
    /// Total bytes written to the display.
    pub bytes_written: u64,
    /// Last flush time in microseconds.
    pub last_flush_us: u64,
}

/// Front/back frame pair with dirty-row tracking.
#[derive(Debug)]
pub struct Renderer {
    /// What the display currently shows.
    front: FrameBuffer,
    /// What the next flush should show.
    back: FrameBuffer,
    /// Per-row dirty marks, indexed by row.
    dirty: Vec<bool>,
    /// Dirty rows in the order they were first touched.
    dirty_rows: Vec<u16>,
    /// Whether the next `flush_to` must repaint the whole screen.
    needs_full_redraw: bool,
    /// Pre-allocated escape sequence buffer.
    output: OutputBuffer,
    stats: RenderStats,
}

impl Renderer {
    /// Create a renderer for a `width` x `height` display.
    ///
    /// Nothing is considered presented yet, so the first flush emits every row.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        let mut renderer = Self {
            front: FrameBuffer::unpresented(width, height),
            back: FrameBuffer::new(width, height),
            dirty: vec![false; height as usize],
            dirty_rows: Vec::with_capacity(height as usize),
            needs_full_redraw: true,
            output: OutputBuffer::with_capacity(16 * 1024),
            stats: RenderStats::default(),
        };
        renderer.mark_all_dirty();
        renderer
    }

    /// Display width in columns.
    pub const fn width(&self) -> u16 {
        self.back.width()
    }

    /// Display height in rows.
    pub const fn height(&self) -> u16 {
        self.back.height()
    }

    /// The frame being painted.
    pub const fn back(&self) -> &FrameBuffer {
        &self.back
    }

    /// The frame last presented.
    pub const fn front(&self) -> &FrameBuffer {
        &self.front
    }

    /// Render statistics.
    pub const fn stats(&self) -> &RenderStats {
        &self.stats
    }

    fn mark_dirty(&mut self, row: u16) {
        if let Some(flag) = self.dirty.get_mut(row as usize) {
            if !*flag {
                *flag = true;
                self.dirty_rows.push(row);
            }
        }
    }

    fn mark_all_dirty(&mut self) {
        for row in 0..self.height() {
            self.mark_dirty(row);
        }
    }

    /// Blank the back frame before a tick's paint calls.
    pub fn clear(&mut self) {
        for row in 0..self.height() {
            if self.back.clear_row(row) {
                self.mark_dirty(row);
            }
        }
    }

    /// Write `text` into row `row` of the back frame, padded or truncated to
    /// the display width. The last write to a row within a tick wins.
    ///
    /// Returns `false` if the row is out of bounds.
    pub fn paint(&mut self, row: u16, text: &str) -> bool {
        if row >= self.height() {
            return false;
        }
        if self.back.set_row(row, text) {
            self.mark_dirty(row);
        }
        true
    }

    /// Rows that a flush would emit, without committing them.
    pub fn pending(&self) -> Vec<RowUpdate> {
        diff_rows(&self.front, &self.back, self.dirty_rows.iter().copied())
    }

    /// Copy `updates` into the front frame and reset dirty tracking.
    fn commit(&mut self, updates: &[RowUpdate]) {
        for update in updates {
            self.front.copy_row_from(&self.back, update.row);
        }
        for row in self.dirty_rows.drain(..) {
            self.dirty[row as usize] = false;
        }
        if !updates.is_empty() {
            self.stats.frames += 1;
            self.stats.rows_emitted += updates.len() as u64;
        }
    }

    /// Emit every changed row and mark it presented.
    ///
    /// Calling this twice with no paint in between returns nothing the
    /// second time.
    pub fn flush(&mut self) -> Vec<RowUpdate> {
        let updates = self.pending();
        self.commit(&updates);
        self.needs_full_redraw = false;
        updates
    }

    /// Emit changed rows to `writer` as ANSI sequences in a single write.
    ///
    /// The first call, and the first after [`Renderer::invalidate`], clears
    /// and repaints the whole screen. Returns the number of rows written.
    ///
    /// # Errors
    ///
    /// Returns the writer's error. The front frame is left as it was, so the
    /// next call emits the same rows again.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<usize> {
        let start = Instant::now();
        self.output.clear();

        let updates = if self.needs_full_redraw {
            render_full(&self.back, &mut self.output);
            crate::buffer::diff::diff_full(&self.front, &self.back)
        } else {
            let updates = self.pending();
            render_updates(&updates, &mut self.output);
            updates
        };

        if !self.output.is_empty() {
            self.output.flush_to(writer)?;
        }

        if self.needs_full_redraw {
            // A full repaint presents every row, changed or not.
            for row in 0..self.height() {
                self.front.copy_row_from(&self.back, row);
            }
            self.needs_full_redraw = false;
        }
        self.commit(&updates);

        self.stats.bytes_written += self.output.len() as u64;
        self.stats.last_flush_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        Ok(updates.len())
    }

    /// Forget what the display shows, e.g. after it was resized or written
    /// to by someone else. The next flush repaints everything.
    pub fn invalidate(&mut self) {
        self.front = FrameBuffer::unpresented(self.width(), self.height());
        self.needs_full_redraw = true;
        self.mark_all_dirty();
    }

    /// Resize both frames. Content is discarded and fully repainted.
    pub fn resize(&mut self, width: u16, height: u16) {
        if width == self.width() && height == self.height() {
            return;
        }
        self.back = FrameBuffer::new(width, height);
        self.dirty = vec![false; height as usize];
        self.dirty_rows.clear();
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A writer that always fails.
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "display gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_first_flush_emits_every_row() {
        let mut renderer = Renderer::new(8, 3);
        let updates = renderer.flush();
        assert_eq!(updates.len(), 3);
        assert!(updates.iter().all(|u| u.text == "        "));
    }

    #[test]
    fn test_second_flush_is_empty() {
        let mut renderer = Renderer::new(8, 3);
        renderer.paint(1, "hello");
        assert!(!renderer.flush().is_empty());
        assert!(renderer.flush().is_empty());
    }

    #[test]
    fn test_only_changed_rows_emitted() {
        let mut renderer = Renderer::new(8, 4);
        renderer.paint(0, "header");
        renderer.paint(2, "lane");
        renderer.flush();

        renderer.clear();
        renderer.paint(0, "header");
        renderer.paint(2, "lane 2");
        let updates = renderer.flush();
        assert_eq!(updates, vec![RowUpdate { row: 2, text: "lane 2  ".to_string() }]);
    }

    #[test]
    fn test_last_paint_wins() {
        let mut renderer = Renderer::new(6, 2);
        renderer.flush();
        renderer.paint(0, "first");
        renderer.paint(0, "second");
        let updates = renderer.flush();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].text, "second");
    }

    #[test]
    fn test_paint_out_of_bounds() {
        let mut renderer = Renderer::new(6, 2);
        assert!(!renderer.paint(2, "nope"));
    }

    #[test]
    fn test_repaint_back_to_presented_is_silent() {
        let mut renderer = Renderer::new(6, 2);
        renderer.paint(0, "same");
        renderer.flush();
        renderer.paint(0, "other");
        renderer.paint(0, "same");
        assert!(renderer.flush().is_empty());
    }

    #[test]
    fn test_flush_to_writes_full_then_diff() {
        let mut renderer = Renderer::new(6, 2);
        renderer.paint(0, "abc");
        let mut sink = Vec::new();
        assert_eq!(renderer.flush_to(&mut sink).unwrap(), 2);
        assert!(String::from_utf8_lossy(&sink).contains("\x1b[2J"));

        sink.clear();
        renderer.paint(1, "xyz");
        assert_eq!(renderer.flush_to(&mut sink).unwrap(), 1);
        assert_eq!(sink, b"\x1b[2Hxyz   \x1b[K");

        sink.clear();
        assert_eq!(renderer.flush_to(&mut sink).unwrap(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_failed_flush_keeps_front() {
        let mut renderer = Renderer::new(6, 2);
        let mut sink = Vec::new();
        renderer.flush_to(&mut sink).unwrap();

        renderer.paint(0, "new");
        let front_before = renderer.front().clone();
        assert!(renderer.flush_to(&mut Broken).is_err());
        assert_eq!(renderer.front(), &front_before);

        sink.clear();
        assert_eq!(renderer.flush_to(&mut sink).unwrap(), 1);
        assert_eq!(renderer.front().row(0), Some("new   "));
    }

    #[test]
    fn test_resize_repaints() {
        let mut renderer = Renderer::new(6, 2);
        renderer.flush();
        renderer.resize(4, 3);
        assert_eq!(renderer.height(), 3);
        assert_eq!(renderer.flush().len(), 3);
    }

    #[test]
    fn test_stats_track_rows() {
        let mut renderer = Renderer::new(6, 2);
        renderer.flush();
        renderer.paint(0, "x");
        renderer.flush();
        assert_eq!(renderer.stats().frames, 2);
        assert_eq!(renderer.stats().rows_emitted, 3);
    }
}
