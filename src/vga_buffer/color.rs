// src/vga_buffer/color.rs

//! VGA attribute byte

/// VGA color codes (4-bit color palette)
#[allow(dead_code)]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VgaColor {
    Black = 0,
    Blue = 1,
    Green = 2,
    Cyan = 3,
    Red = 4,
    Magenta = 5,
    Brown = 6,
    LightGray = 7,
    DarkGray = 8,
    LightBlue = 9,
    LightGreen = 10,
    LightCyan = 11,
    LightRed = 12,
    Pink = 13,
    Yellow = 14,
    White = 15,
}

/// Attribute byte combining foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCode(u8);

impl ColorCode {
    /// Create a new color code from foreground and background colors
    pub const fn new(fg: VgaColor, bg: VgaColor) -> Self {
        Self((bg as u8) << 4 | (fg as u8))
    }

    /// Get the raw byte value
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// The console's only attribute: white on black (`0x0F`)
    pub const fn standard() -> Self {
        Self::new(VgaColor::White, VgaColor::Black)
    }

    /// Combine a character code with this attribute into a cell value
    #[inline]
    pub const fn cell(self, byte: u8) -> u16 {
        (self.0 as u16) << 8 | byte as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_code_encoding() {
        let color = ColorCode::new(VgaColor::White, VgaColor::Red);
        assert_eq!(color.as_u8(), 0x4F);
    }

    #[test]
    fn test_standard_attribute() {
        assert_eq!(ColorCode::standard().as_u8(), 0x0F);
        assert_eq!(ColorCode::standard().cell(b' '), 0x0F20);
        assert_eq!(ColorCode::standard().cell(b'A'), 0x0F41);
    }
}
