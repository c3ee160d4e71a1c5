//! Byte-offset helpers and dimensional constants for text fields.
//!
//! These are stateless helpers with no dependency on `TextField` or the editor.

/// Left + right borders consumed horizontally by the input box
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Textareas always show at least this many lines
pub(super) const TEXTAREA_MIN_LINES: u16 = 3;
/// Textareas grow up to this many lines, then scroll inside the box
pub(super) const TEXTAREA_MAX_LINES: u16 = 10;
/// Single-line inputs wrap onto at most this many lines
pub(super) const SINGLE_LINE_MAX_LINES: u16 = 3;

/// Calculate the inner content width after subtracting border overhead.
pub(super) fn inner_width(content_width: u16) -> u16 {
    content_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

/// Clamp a byte offset into `text`, snapping back to a char boundary.
pub(super) fn clamp_to_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}
