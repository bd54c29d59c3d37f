// src/vga_buffer/constants.rs

//! Constants for VGA text buffer operations

/// VGA text buffer address (identity-mapped loader)
#[cfg(not(feature = "higher-half"))]
pub const VGA_BUFFER_ADDR: usize = 0xb8000;

/// VGA text buffer address (loader maps low memory at 0xc000_0000)
#[cfg(feature = "higher-half")]
pub const VGA_BUFFER_ADDR: usize = 0xc00b_8000;

/// Screen dimensions
pub const VGA_WIDTH: usize = 80;
pub const VGA_HEIGHT: usize = 25;

/// Total number of cells in the VGA buffer
pub const CELL_COUNT: usize = VGA_WIDTH * VGA_HEIGHT;

/// The row the cursor writes to. Scrolling keeps it pinned here.
pub const ACTIVE_ROW: usize = VGA_HEIGHT - 1;

/// Blank character written by clear and scroll
pub const BLANK_CHAR: u8 = b' ';

/// Scratch space for hex rendering: "0x" + 16 digits fits with room to spare
pub const HEX_BUFFER_LEN: usize = 32;
