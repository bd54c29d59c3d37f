// src/vga_buffer/writer.rs

//! Console state machine: cursor column, wrap policy, scrolling and
//! character/string/hex rendering.
//!
//! The cursor lives on the bottom row permanently. A newline, or a character
//! landing on the last column, pushes the whole grid up one row and the
//! cursor starts over at column 0.

use super::backend::VgaBufferAccess;
use super::color::ColorCode;
use super::constants::{BLANK_CHAR, HEX_BUFFER_LEN, VGA_HEIGHT};
use super::position::{CellIndex, Column, Row};
use core::fmt;

/// Widest rendering `emit_hex` can produce: "0x" plus one digit per nibble
const MAX_HEX_LEN: usize = 2 + (u64::BITS as usize) / 4;

const _: () = assert!(MAX_HEX_LEN <= HEX_BUFFER_LEN);

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Text console writing to a [`VgaBufferAccess`] backend.
pub struct Console<B> {
    column: Column,
    color_code: ColorCode,
    scrolls: u64,
    buffer: B,
}

impl<B: VgaBufferAccess> Console<B> {
    /// Wrap `buffer`. The grid is left as-is until [`Console::clear`].
    pub const fn new(buffer: B) -> Self {
        Self {
            column: Column::FIRST,
            color_code: ColorCode::standard(),
            scrolls: 0,
            buffer,
        }
    }

    /// Current write column on the bottom row
    pub fn column(&self) -> usize {
        self.column.get()
    }

    /// Number of scrolls performed so far
    pub fn scroll_count(&self) -> u64 {
        self.scrolls
    }

    /// The underlying buffer
    pub fn buffer(&self) -> &B {
        &self.buffer
    }

    /// Mutable access to the underlying buffer
    pub fn buffer_mut(&mut self) -> &mut B {
        &mut self.buffer
    }

    fn blank(&self) -> u16 {
        self.color_code.cell(BLANK_CHAR)
    }

    /// Set every cell to a blank with the standard attribute.
    ///
    /// The cursor column is left unchanged.
    pub fn clear(&mut self) {
        let blank = self.blank();
        self.buffer.fill(blank);
    }

    /// Write one byte.
    ///
    /// `\0` is ignored, `\n` scrolls, anything else is stored verbatim on the
    /// bottom row. Filling the last column wraps and scrolls immediately.
    pub fn emit_char(&mut self, byte: u8) {
        match byte {
            0 => {}
            b'\n' => self.scroll(),
            byte => {
                let value = self.color_code.cell(byte);
                self.buffer
                    .write_cell(CellIndex::at(Row::ACTIVE, self.column), value);

                match self.column.advance() {
                    Some(next) => self.column = next,
                    None => self.scroll(),
                }
            }
        }
    }

    /// Write bytes up to the first `\0` or the end of `text`.
    pub fn emit(&mut self, text: &[u8]) {
        for &byte in text.iter().take_while(|&&byte| byte != 0) {
            self.emit_char(byte);
        }
    }

    /// Write a string slice.
    pub fn emit_str(&mut self, s: &str) {
        self.emit(s.as_bytes());
    }

    /// Write `value` as `0x` followed by lowercase hex digits.
    pub fn emit_hex(&mut self, value: u64) {
        self.emit(HexDigits::new(value).as_bytes());
    }

    /// Shift every row up by one, blank the bottom row and return to
    /// column 0.
    pub fn scroll(&mut self) {
        for dst in 0..VGA_HEIGHT - 1 {
            if let (Some(dst), Some(src)) = (Row::new(dst), Row::new(dst + 1)) {
                self.buffer.copy_row(src, dst);
            }
        }
        let blank = self.blank();
        self.buffer.fill_row(Row::ACTIVE, blank);
        self.column = Column::FIRST;
        self.scrolls = self.scrolls.wrapping_add(1);
    }
}

impl<B: VgaBufferAccess> fmt::Write for Console<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.emit_str(s);
        Ok(())
    }
}

impl<B> fmt::Debug for Console<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("column", &self.column)
            .field("color_code", &self.color_code)
            .field("scrolls", &self.scrolls)
            .finish_non_exhaustive()
    }
}

/// Fixed-size hex rendering of an unsigned value, `0x` prefixed
#[derive(Clone, Copy)]
pub struct HexDigits {
    buf: [u8; HEX_BUFFER_LEN],
    len: usize,
}

impl HexDigits {
    /// Render `value`; zero renders as `0x0`.
    pub fn new(mut value: u64) -> Self {
        let mut buf = [0u8; HEX_BUFFER_LEN];
        let mut len = 0;

        // Least significant nibble first, reversed below.
        loop {
            buf[len] = HEX_DIGITS[(value & 0xf) as usize];
            len += 1;
            value >>= 4;
            if value == 0 {
                break;
            }
        }
        buf[len] = b'x';
        buf[len + 1] = b'0';
        len += 2;

        buf[..len].reverse();
        Self { buf, len }
    }

    /// Rendered bytes, no terminator
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Rendered text
    pub fn as_str(&self) -> &str {
        // Only ASCII hex digits and "0x" are ever written.
        core::str::from_utf8(self.as_bytes()).unwrap_or("0x?")
    }
}

impl fmt::Display for HexDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for HexDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HexDigits").field(&self.as_str()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vga_buffer::backend::StubBuffer;
    use crate::vga_buffer::constants::{CELL_COUNT, VGA_WIDTH};

    const BLANK: u16 = 0x0F20;

    fn console() -> Console<StubBuffer> {
        let mut console = Console::new(StubBuffer::new());
        console.clear();
        console
    }

    fn row(index: usize) -> Row {
        Row::new(index).unwrap()
    }

    #[test]
    fn test_emit_char_writes_bottom_row() {
        let mut console = console();
        console.emit_char(b'A');

        assert_eq!(console.column(), 1);
        assert_eq!(console.buffer().row(Row::ACTIVE)[0], 0x0F41);
        assert_eq!(console.scroll_count(), 0);
    }

    #[test]
    fn test_nul_is_ignored() {
        let mut console = console();
        console.emit_char(0);

        assert_eq!(console.column(), 0);
        assert!(console.buffer().cells().iter().all(|&cell| cell == BLANK));
    }

    #[test]
    fn test_newline_scrolls_and_resets_column() {
        let mut console = console();
        console.emit(b"ab\n");

        assert_eq!(console.column(), 0);
        assert_eq!(console.scroll_count(), 1);
        assert_eq!(&console.buffer().row_text(row(VGA_HEIGHT - 2))[..2], b"ab");
        assert!(console.buffer().row(Row::ACTIVE).iter().all(|&cell| cell == BLANK));
    }

    #[test]
    fn test_full_line_wraps_with_single_scroll() {
        let mut console = console();
        for _ in 0..VGA_WIDTH {
            console.emit_char(b'x');
        }

        assert_eq!(console.column(), 0);
        assert_eq!(console.scroll_count(), 1);
        assert_eq!(console.buffer().row_text(row(VGA_HEIGHT - 2)), [b'x'; VGA_WIDTH]);
    }

    #[test]
    fn test_wrap_then_newline_scrolls_twice() {
        let mut console = console();
        console.emit(&[b'y'; VGA_WIDTH]);
        console.emit_char(b'\n');

        assert_eq!(console.scroll_count(), 2);
        assert_eq!(console.buffer().row_text(row(VGA_HEIGHT - 3)), [b'y'; VGA_WIDTH]);
        assert!(console.buffer().row(row(VGA_HEIGHT - 2)).iter().all(|&cell| cell == BLANK));
        assert!(console.buffer().row(Row::ACTIVE).iter().all(|&cell| cell == BLANK));
    }

    #[test]
    fn test_emit_stops_at_terminator() {
        let mut console = console();
        console.emit(b"ok\0hidden");

        assert_eq!(console.column(), 2);
        assert_eq!(&console.buffer().row_text(Row::ACTIVE)[..3], b"ok ");
    }

    #[test]
    fn test_scroll_shifts_rows() {
        let mut console = console();
        for index in 0..VGA_HEIGHT {
            console.buffer_mut().fill_row(row(index), 0x0F00 | (b'a' + index as u8) as u16);
        }

        console.scroll();

        for index in 0..VGA_HEIGHT - 1 {
            let expected = 0x0F00 | (b'a' + index as u8 + 1) as u16;
            assert!(console.buffer().row(row(index)).iter().all(|&cell| cell == expected));
        }
        assert!(console.buffer().row(Row::ACTIVE).iter().all(|&cell| cell == BLANK));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut console = Console::new(StubBuffer::new());
        console.clear();
        let once = *console.buffer().cells();
        console.clear();

        assert_eq!(&once, console.buffer().cells());
        assert_eq!(once.len(), CELL_COUNT);
        assert!(once.iter().all(|&cell| cell == BLANK));
    }

    #[test]
    fn test_hex_digits() {
        assert_eq!(HexDigits::new(0).as_str(), "0x0");
        assert_eq!(HexDigits::new(255).as_str(), "0xff");
        assert_eq!(HexDigits::new(4096).as_str(), "0x1000");
        assert_eq!(HexDigits::new(u64::MAX).as_str(), "0xffffffffffffffff");
    }

    #[test]
    fn test_hex_digits_parse_back() {
        let mut samples = vec![0, 1, 0xabc, 0x0123_4567_89ab_cdef, 1 << 63, u64::MAX];
        samples.extend((0..16).map(|shift| 1u64 << (4 * shift)));
        samples.extend((0..16).map(|shift| (1u64 << (4 * shift)) - 1));

        for value in samples {
            let hex = HexDigits::new(value);
            let text = hex.as_str();
            assert!(text.starts_with("0x"), "{text}");
            assert!(text.len() <= 18, "{text}");
            assert_eq!(u64::from_str_radix(&text[2..], 16), Ok(value), "{text}");
            if value != 0 {
                assert!(!text[2..].starts_with('0'), "leading zero in {text}");
            }
        }
    }

    #[test]
    fn test_emit_hex_renders_on_screen() {
        let mut console = console();
        console.emit_hex(0xdead_beef);

        assert_eq!(console.column(), 10);
        assert_eq!(&console.buffer().row_text(Row::ACTIVE)[..10], b"0xdeadbeef");
    }

    #[test]
    fn test_fmt_write() {
        use core::fmt::Write;

        let mut console = console();
        write!(console, "n={}", 42).unwrap();

        assert_eq!(&console.buffer().row_text(Row::ACTIVE)[..4], b"n=42");
    }
}
