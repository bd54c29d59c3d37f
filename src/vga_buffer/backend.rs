// src/vga_buffer/backend.rs

//! Low-level VGA buffer access abstractions.
//!
//! The [`VgaBufferAccess`] trait lets the console target either the classic
//! text-mode buffer or an in-memory stub for testing. Indices arrive as
//! [`CellIndex`]/[`Row`] values, so backends never see an out-of-range
//! position.

use super::constants::{CELL_COUNT, VGA_BUFFER_ADDR, VGA_WIDTH};
use super::error::VgaError;
use super::position::{CellIndex, Column, Row};
use core::ptr::NonNull;

/// Value written during the accessibility probe (space, light gray on black)
const PROBE_PATTERN: u16 = 0x0720;

/// Abstraction over the VGA character buffer memory.
pub trait VgaBufferAccess {
    /// Read the encoded value at `index`.
    fn read_cell(&self, index: CellIndex) -> u16;

    /// Write `value` to the cell at `index`.
    fn write_cell(&mut self, index: CellIndex, value: u16);

    /// Copy every cell of `src` into `dst`.
    fn copy_row(&mut self, src: Row, dst: Row) {
        for col in Column::all() {
            let value = self.read_cell(CellIndex::at(src, col));
            self.write_cell(CellIndex::at(dst, col), value);
        }
    }

    /// Fill an entire row with `value`.
    fn fill_row(&mut self, row: Row, value: u16) {
        for col in Column::all() {
            self.write_cell(CellIndex::at(row, col), value);
        }
    }

    /// Fill the whole grid with `value`.
    fn fill(&mut self, value: u16) {
        for row in Row::all() {
            self.fill_row(row, value);
        }
    }

    /// Write a test pattern to the first cell, read it back and restore it.
    ///
    /// # Errors
    ///
    /// Returns [`VgaError::BufferNotAccessible`] when the read-back differs.
    fn verify_accessible(&mut self) -> Result<(), VgaError> {
        let index = CellIndex::at(Row::ACTIVE, Column::FIRST);
        let original = self.read_cell(index);
        self.write_cell(index, PROBE_PATTERN);
        let readback = self.read_cell(index);
        self.write_cell(index, original);

        if readback == PROBE_PATTERN {
            Ok(())
        } else {
            Err(VgaError::BufferNotAccessible)
        }
    }
}

/// Backend that talks to the memory-mapped text-mode buffer.
///
/// Every access is a single volatile 16-bit load or store, including the
/// row copies done while scrolling.
#[derive(Debug)]
pub struct TextModeBuffer {
    ptr: NonNull<u16>,
}

// SAFETY: the buffer is a fixed hardware region; access is serialized by the
// mutex around the global console.
unsafe impl Send for TextModeBuffer {}

impl TextModeBuffer {
    /// Construct a backend for the configured base address.
    ///
    /// # Safety
    ///
    /// `VGA_BUFFER_ADDR` must be mapped and writable for `CELL_COUNT` cells,
    /// and nothing else may alias it.
    #[must_use]
    pub const unsafe fn new() -> Self {
        Self {
            // SAFETY: the address is a non-zero constant.
            ptr: unsafe { NonNull::new_unchecked(VGA_BUFFER_ADDR as *mut u16) },
        }
    }

    /// Construct a backend for an arbitrary base address.
    ///
    /// # Errors
    ///
    /// Returns [`VgaError::InvalidBase`] for a null or misaligned address.
    ///
    /// # Safety
    ///
    /// `addr` must be mapped and writable for `CELL_COUNT` cells, and
    /// nothing else may alias it.
    pub unsafe fn at(addr: usize) -> Result<Self, VgaError> {
        if addr % core::mem::align_of::<u16>() != 0 {
            return Err(VgaError::InvalidBase);
        }
        if addr.checked_add(CELL_COUNT * 2).is_none() {
            return Err(VgaError::InvalidBase);
        }
        NonNull::new(addr as *mut u16)
            .map(|ptr| Self { ptr })
            .ok_or(VgaError::InvalidBase)
    }

    /// Base address of the mapped region
    pub fn base(&self) -> usize {
        self.ptr.as_ptr() as usize
    }
}

impl VgaBufferAccess for TextModeBuffer {
    #[inline]
    fn read_cell(&self, index: CellIndex) -> u16 {
        // SAFETY: `index` is below CELL_COUNT and the region is mapped.
        unsafe { core::ptr::read_volatile(self.ptr.as_ptr().add(index.get())) }
    }

    #[inline]
    fn write_cell(&mut self, index: CellIndex, value: u16) {
        // SAFETY: `index` is below CELL_COUNT and the region is mapped.
        unsafe {
            core::ptr::write_volatile(self.ptr.as_ptr().add(index.get()), value);
        }
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}

/// In-memory backend for tests and the hosted preview.
#[derive(Clone)]
pub struct StubBuffer {
    cells: [u16; CELL_COUNT],
    accessible: bool,
}

impl StubBuffer {
    /// Create a stub with every cell zeroed.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [0; CELL_COUNT],
            accessible: true,
        }
    }

    /// Create a stub that drops writes and reads back an open bus (`0xFFFF`),
    /// the way an unmapped region behaves.
    #[must_use]
    pub const fn unmapped() -> Self {
        Self {
            cells: [0xFFFF; CELL_COUNT],
            accessible: false,
        }
    }

    /// Raw view of all cells
    pub fn cells(&self) -> &[u16; CELL_COUNT] {
        &self.cells
    }

    /// Raw view of one row
    pub fn row(&self, row: Row) -> &[u16] {
        let start = CellIndex::at(row, Column::FIRST).get();
        &self.cells[start..start + VGA_WIDTH]
    }

    /// Character bytes of one row, attributes stripped
    pub fn row_text(&self, row: Row) -> [u8; VGA_WIDTH] {
        let mut text = [0u8; VGA_WIDTH];
        for (byte, cell) in text.iter_mut().zip(self.row(row)) {
            *byte = (cell & 0xff) as u8;
        }
        text
    }
}

impl Default for StubBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for StubBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StubBuffer")
            .field("cells", &CELL_COUNT)
            .field("accessible", &self.accessible)
            .finish()
    }
}

impl VgaBufferAccess for StubBuffer {
    fn read_cell(&self, index: CellIndex) -> u16 {
        self.cells[index.get()]
    }

    fn write_cell(&mut self, index: CellIndex, value: u16) {
        if self.accessible {
            self.cells[index.get()] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vga_buffer::constants::VGA_HEIGHT;

    #[test]
    fn test_stub_copy_and_fill_rows() {
        let mut buffer = StubBuffer::new();
        let top = Row::new(0).unwrap();
        let next = Row::new(1).unwrap();

        buffer.fill_row(next, 0x0F41);
        buffer.copy_row(next, top);

        assert!(buffer.row(top).iter().all(|&cell| cell == 0x0F41));
        assert!(buffer.row(Row::ACTIVE).iter().all(|&cell| cell == 0));
    }

    #[test]
    fn test_stub_fill_covers_grid() {
        let mut buffer = StubBuffer::new();
        buffer.fill(0x0F20);
        assert!(buffer.cells().iter().all(|&cell| cell == 0x0F20));
        assert_eq!(buffer.cells().len(), VGA_WIDTH * VGA_HEIGHT);
    }

    #[test]
    fn test_verify_accessible() {
        let mut mapped = StubBuffer::new();
        assert_eq!(mapped.verify_accessible(), Ok(()));
        assert!(mapped.cells().iter().all(|&cell| cell == 0));

        let mut unmapped = StubBuffer::unmapped();
        assert_eq!(
            unmapped.verify_accessible(),
            Err(VgaError::BufferNotAccessible)
        );
    }

    #[test]
    fn test_text_mode_rejects_bad_base() {
        assert_eq!(
            unsafe { TextModeBuffer::at(0) }.map(|b| b.base()),
            Err(VgaError::InvalidBase)
        );
        assert_eq!(
            unsafe { TextModeBuffer::at(0xb8001) }.map(|b| b.base()),
            Err(VgaError::InvalidBase)
        );
        assert_eq!(
            unsafe { TextModeBuffer::at(0xb8000) }.map(|b| b.base()),
            Ok(0xb8000)
        );
    }

    #[test]
    fn test_text_mode_over_plain_memory() {
        let mut backing = [0u16; CELL_COUNT];
        let mut buffer = unsafe { TextModeBuffer::at(backing.as_mut_ptr() as usize) }.unwrap();

        buffer.fill_row(Row::ACTIVE, 0x0F58);
        buffer.copy_row(Row::ACTIVE, Row::new(0).unwrap());
        assert_eq!(buffer.verify_accessible(), Ok(()));

        assert!(backing[..VGA_WIDTH].iter().all(|&cell| cell == 0x0F58));
        assert!(backing[VGA_WIDTH..2 * VGA_WIDTH].iter().all(|&cell| cell == 0));
    }

    #[test]
    fn test_text_mode_scroll_moves_rows_cell_by_cell() {
        use crate::vga_buffer::Console;

        let mut backing = [0u16; CELL_COUNT];
        let buffer = unsafe { TextModeBuffer::at(backing.as_mut_ptr() as usize) }.unwrap();
        let mut console = Console::new(buffer);
        console.clear();
        console.emit(b"up\n");
        drop(console);

        let above = (VGA_HEIGHT - 2) * VGA_WIDTH;
        assert_eq!(&backing[above..above + 2], &[0x0F75, 0x0F70]);
        assert!(backing[above + 2..].iter().all(|&cell| cell == 0x0F20));
    }
}
