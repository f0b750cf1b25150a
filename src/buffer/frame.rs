//! Frame: a fixed-size grid of character rows.
//!
//! Each row is stored as a `String` that occupies exactly `width` display
//! columns. Wide graphemes (CJK, emoji) count as two columns; a wide
//! grapheme that would straddle the right edge is replaced by a space.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width of `text` in terminal columns.
#[inline]
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate or right-pad `text` so it occupies exactly `width` columns.
///
/// Control characters are dropped.
pub fn fit_width(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(width);
    let mut used = 0;

    for grapheme in text.graphemes(true) {
        if grapheme.chars().any(char::is_control) {
            continue;
        }
        let w = display_width(grapheme);
        if used + w > width {
            break;
        }
        out.push_str(grapheme);
        used += w;
    }

    out.extend(std::iter::repeat(' ').take(width - used));
    out
}

/// A grid of rows, each exactly `width` columns wide.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    rows: Vec<String>,
    width: u16,
    height: u16,
}

impl FrameBuffer {
    /// Create a blank frame.
    ///
    /// # Panics
    /// Panics if width or height is 0.
    pub fn new(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Frame dimensions must be non-zero");
        Self {
            rows: vec![Self::blank_row(width); height as usize],
            width,
            height,
        }
    }

    /// Create a frame whose rows are all empty strings.
    ///
    /// Empty rows differ from every fitted row, so this stands for "nothing
    /// has been presented yet".
    pub fn unpresented(width: u16, height: u16) -> Self {
        assert!(width > 0 && height > 0, "Frame dimensions must be non-zero");
        Self {
            rows: vec![String::new(); height as usize],
            width,
            height,
        }
    }

    fn blank_row(width: u16) -> String {
        " ".repeat(width as usize)
    }

    /// Width in columns.
    #[inline]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in rows.
    #[inline]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The content of row `y`.
    #[inline]
    pub fn row(&self, y: u16) -> Option<&str> {
        self.rows.get(y as usize).map(String::as_str)
    }

    /// Write `text` into row `y`, fitted to the frame width.
    ///
    /// Returns `true` if the stored row changed; `false` if it was already
    /// identical or `y` is out of bounds.
    pub fn set_row(&mut self, y: u16, text: &str) -> bool {
        let width = self.width as usize;
        let Some(slot) = self.rows.get_mut(y as usize) else {
            return false;
        };
        let fitted = fit_width(text, width);
        if *slot == fitted {
            return false;
        }
        *slot = fitted;
        true
    }

    /// Blank row `y`. Returns `true` if it changed.
    pub fn clear_row(&mut self, y: u16) -> bool {
        let width = self.width as usize;
        match self.rows.get_mut(y as usize) {
            Some(slot) if slot.len() != width || slot.bytes().any(|b| b != b' ') => {
                slot.clear();
                slot.extend(std::iter::repeat(' ').take(width));
                true
            }
            _ => false,
        }
    }

    /// Copy row `y` from another frame of the same size.
    pub fn copy_row_from(&mut self, other: &Self, y: u16) {
        debug_assert_eq!(self.width, other.width);
        if let (Some(dst), Some(src)) = (self.rows.get_mut(y as usize), other.rows.get(y as usize)) {
            dst.clone_from(src);
        }
    }

    /// Iterate over rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
