//! Diffing Engine: turn frame changes into the fewest row writes.
//!
//! The unit of change is a whole row. A row is emitted when the back frame
//! holds different text than the front frame; unchanged rows cost nothing.
//! Callers pass the rows that may have changed, so the work is proportional
//! to what was touched, not to the screen size.
//!
//! Emission is a cursor move to column 0, the row text, and an erase to end
//! of line, accumulated into one [`OutputBuffer`].

use super::FrameBuffer;
use crate::terminal::OutputBuffer;

/// One row that must be repainted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowUpdate {
    /// Row index (0 = top).
    pub row: u16,
    /// Full row text, already fitted to the frame width.
    pub text: String,
}

/// Compare `candidates` rows of `back` against `front`.
///
/// Returns an update for every candidate row whose content differs, in the
/// order given. Rows out of bounds are ignored.
pub fn diff_rows<I>(front: &FrameBuffer, back: &FrameBuffer, candidates: I) -> Vec<RowUpdate>
where
    I: IntoIterator<Item = u16>,
{
    debug_assert_eq!(front.width(), back.width());
    debug_assert_eq!(front.height(), back.height());

    candidates
        .into_iter()
        .filter_map(|row| match (front.row(row), back.row(row)) {
            (Some(old), Some(new)) if old != new => Some(RowUpdate {
                row,
                text: new.to_string(),
            }),
            _ => None,
        })
        .collect()
}

/// Compare every row of two frames.
pub fn diff_full(front: &FrameBuffer, back: &FrameBuffer) -> Vec<RowUpdate> {
    diff_rows(front, back, 0..back.height())
}

/// Append the escape sequences for `updates` to `output`.
pub fn render_updates(updates: &[RowUpdate], output: &mut OutputBuffer) {
    for update in updates {
        output.cursor_move(0, update.row);
        output.write_str(&update.text);
        output.clear_line_end();
    }
}

/// Append a full repaint of `frame` to `output`.
pub fn render_full(frame: &FrameBuffer, output: &mut OutputBuffer) {
    output.cursor_hide();
    output.reset_attrs();
    output.clear_screen();
    for (y, text) in (0u16..).zip(frame.rows()) {
        output.cursor_move(0, y);
        output.write_str(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_identical_frames() {
        let a = FrameBuffer::new(10, 5);
        let b = a.clone();
        assert!(diff_full(&a, &b).is_empty());
    }

    #[test]
    fn test_diff_single_row_change() {
        let a = FrameBuffer::new(10, 5);
        let mut b = a.clone();
        b.set_row(3, "changed");

        let updates = diff_full(&a, &b);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].row, 3);
        assert_eq!(updates[0].text, "changed   ");
    }

    #[test]
    fn test_diff_only_candidates() {
        let a = FrameBuffer::new(10, 5);
        let mut b = a.clone();
        b.set_row(0, "x");
        b.set_row(4, "y");

        let updates = diff_rows(&a, &b, [4, 9]);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].row, 4);
    }

    #[test]
    fn test_render_updates_sequence() {
        let mut output = OutputBuffer::new();
        render_updates(
            &[RowUpdate { row: 2, text: "ab".to_string() }],
            &mut output,
        );
        assert_eq!(output.as_bytes(), b"\x1b[3Hab\x1b[K");
    }

    #[test]
    fn test_render_full() {
        let mut frame = FrameBuffer::new(3, 2);
        frame.set_row(0, "ABC");
        frame.set_row(1, "D");

        let mut output = OutputBuffer::new();
        render_full(&frame, &mut output);

        let text = String::from_utf8_lossy(output.as_bytes());
        assert!(text.starts_with("\x1b[?25l\x1b[0m\x1b[2J"));
        assert!(text.contains("\x1b[HABC"));
        assert!(text.ends_with("\x1b[2HD  "));
    }
}
