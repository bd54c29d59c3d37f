// src/loader.rs

//! Read-only access to the loader control block
//!
//! The loader leaves a pointer to a small packed structure in a fixed slot of
//! low physical memory. The structure describes the descriptor table the
//! loader installed (bound + base, as stored by `sgdt`). The kernel only
//! prints these values, so the whole interface is one validated read that
//! either yields a copy of the block or says why it could not.

use crate::constants::{CONTROL_BLOCK_SLOT, MAX_CONTROL_BLOCK_ADDR, MIN_CONTROL_BLOCK_ADDR};
use crate::vga_buffer::{Console, VgaBufferAccess};
use core::fmt;
use core::mem::size_of;

/// Size of one segment descriptor
pub const DESCRIPTOR_SIZE: usize = 8;

/// Descriptors listed on screen at most; a full table would scroll the
/// report away.
pub const MAX_LISTED_DESCRIPTORS: usize = 8;

/// Layout written by the loader
#[repr(C, packed)]
#[derive(Clone, Copy)]
struct RawControlBlock {
    gdt_bound: u16,
    gdt_base: u64,
}

/// Why the control block could not be read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderError {
    /// The slot (or the descriptor table base) holds zero
    NullPointer,
    /// The pointer does not fall in the readable window
    OutOfRange {
        /// Offending physical address
        addr: u64,
    },
}

impl fmt::Display for LoaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoaderError::NullPointer => f.write_str("control block pointer is null"),
            LoaderError::OutOfRange { addr } => {
                write!(f, "control block pointer out of range ({:#x})", addr)
            }
        }
    }
}

/// Copy of the loader control block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlBlock {
    gdt_bound: u16,
    gdt_base: u64,
    phys_offset: u64,
}

impl ControlBlock {
    /// Descriptor table limit (size in bytes minus one)
    pub const fn gdt_bound(&self) -> u16 {
        self.gdt_bound
    }

    /// Physical base address of the descriptor table
    pub const fn gdt_base(&self) -> u64 {
        self.gdt_base
    }

    /// Number of 8-byte descriptors covered by the bound
    pub const fn descriptor_count(&self) -> usize {
        (self.gdt_bound as usize + 1) / DESCRIPTOR_SIZE
    }

    /// Iterate over the raw descriptors.
    ///
    /// # Errors
    ///
    /// [`LoaderError::NullPointer`] for a zero base,
    /// [`LoaderError::OutOfRange`] when the table end overflows.
    ///
    /// # Safety
    ///
    /// The descriptor table must be mapped at `gdt_base + phys_offset` for
    /// `descriptor_count()` entries while the iterator is used.
    pub unsafe fn descriptors(&self) -> Result<Descriptors, LoaderError> {
        if self.gdt_base == 0 {
            return Err(LoaderError::NullPointer);
        }
        let out_of_range = LoaderError::OutOfRange { addr: self.gdt_base };
        let addr = self
            .gdt_base
            .checked_add(self.phys_offset)
            .ok_or(out_of_range)?;
        addr.checked_add((self.descriptor_count() * DESCRIPTOR_SIZE) as u64)
            .ok_or(out_of_range)?;

        Ok(Descriptors {
            addr,
            index: 0,
            count: self.descriptor_count(),
        })
    }
}

/// Iterator over raw 64-bit segment descriptors
#[derive(Debug)]
pub struct Descriptors {
    addr: u64,
    index: usize,
    count: usize,
}

impl Iterator for Descriptors {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.index >= self.count {
            return None;
        }
        let entry = self.addr + (self.index * DESCRIPTOR_SIZE) as u64;
        self.index += 1;
        // SAFETY: the range was validated in `ControlBlock::descriptors` and
        // the caller promised it is mapped.
        Some(unsafe { core::ptr::read_unaligned(entry as usize as *const u64) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.count - self.index;
        (left, Some(left))
    }
}

/// Validated reader for the control block slot
#[derive(Debug, Clone, Copy)]
pub struct ControlBlockReader {
    slot: u64,
    phys_offset: u64,
    min: u64,
    limit: u64,
}

impl ControlBlockReader {
    /// Reader for the standard slot, with physical memory mapped at
    /// `phys_offset`.
    pub const fn new(phys_offset: u64) -> Self {
        Self {
            slot: CONTROL_BLOCK_SLOT,
            phys_offset,
            min: MIN_CONTROL_BLOCK_ADDR,
            limit: MAX_CONTROL_BLOCK_ADDR,
        }
    }

    /// Use a different slot address
    pub const fn with_slot(mut self, slot: u64) -> Self {
        self.slot = slot;
        self
    }

    /// Accept pointers in `[min, limit)`
    pub const fn with_window(mut self, min: u64, limit: u64) -> Self {
        self.min = min;
        self.limit = limit;
        self
    }

    fn translate(&self, addr: u64) -> Result<usize, LoaderError> {
        addr.checked_add(self.phys_offset)
            .and_then(|virt| usize::try_from(virt).ok())
            .ok_or(LoaderError::OutOfRange { addr })
    }

    /// Load the pointer from the slot and copy the block it points to.
    ///
    /// # Errors
    ///
    /// [`LoaderError::NullPointer`] when the slot holds zero,
    /// [`LoaderError::OutOfRange`] when the pointer (or the slot itself) is
    /// outside the readable window.
    ///
    /// # Safety
    ///
    /// The slot must be mapped at `slot + phys_offset`, and every address in
    /// the window must be mapped at `addr + phys_offset`.
    pub unsafe fn read(&self) -> Result<ControlBlock, LoaderError> {
        if self.slot == 0 {
            return Err(LoaderError::OutOfRange { addr: 0 });
        }
        let slot = self.translate(self.slot)?;
        // SAFETY: caller guarantees the slot is mapped.
        let pointer = unsafe { core::ptr::read_unaligned(slot as *const u64) };

        if pointer == 0 {
            return Err(LoaderError::NullPointer);
        }

        let end = pointer
            .checked_add(size_of::<RawControlBlock>() as u64)
            .ok_or(LoaderError::OutOfRange { addr: pointer })?;
        if pointer < self.min || end > self.limit {
            return Err(LoaderError::OutOfRange { addr: pointer });
        }

        let block = self.translate(pointer)?;
        // SAFETY: the pointer lies inside the window the caller vouched for.
        let raw = unsafe { core::ptr::read_unaligned(block as *const RawControlBlock) };

        Ok(ControlBlock {
            gdt_bound: raw.gdt_bound,
            gdt_base: raw.gdt_base,
            phys_offset: self.phys_offset,
        })
    }
}

/// Print the control block fields, or a marker line explaining why they are
/// missing.
pub fn report_control_block<B: VgaBufferAccess>(
    console: &mut Console<B>,
    block: &Result<ControlBlock, LoaderError>,
) {
    match block {
        Ok(block) => {
            console.emit_str("gdt bound: ");
            console.emit_hex(u64::from(block.gdt_bound()));
            console.emit_str("\ngdt base: ");
            console.emit_hex(block.gdt_base());
            console.emit_str("\ngdt entries: ");
            console.emit_hex(block.descriptor_count() as u64);
            console.emit_char(b'\n');
        }
        Err(LoaderError::NullPointer) => console.emit_str("control block: <null>\n"),
        Err(LoaderError::OutOfRange { addr }) => {
            console.emit_str("control block: <out of range ");
            console.emit_hex(*addr);
            console.emit_str(">\n");
        }
    }
}

/// List the first [`MAX_LISTED_DESCRIPTORS`] raw descriptors, one per line.
pub fn report_descriptors<B, I>(console: &mut Console<B>, descriptors: I)
where
    B: VgaBufferAccess,
    I: IntoIterator<Item = u64>,
{
    for (index, descriptor) in descriptors
        .into_iter()
        .take(MAX_LISTED_DESCRIPTORS)
        .enumerate()
    {
        console.emit_str("  gdt[");
        console.emit_hex(index as u64);
        console.emit_str("]: ");
        console.emit_hex(descriptor);
        console.emit_char(b'\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vga_buffer::constants::VGA_HEIGHT;
    use crate::vga_buffer::{Row, StubBuffer};

    fn reader_for(slot: &u64) -> ControlBlockReader {
        ControlBlockReader::new(0)
            .with_slot(slot as *const u64 as u64)
            .with_window(MIN_CONTROL_BLOCK_ADDR, u64::MAX)
    }

    fn block_at(raw: &RawControlBlock) -> u64 {
        raw as *const RawControlBlock as u64
    }

    #[test]
    fn test_null_pointer_is_reported() {
        let slot = 0u64;
        let result = unsafe { reader_for(&slot).read() };
        assert_eq!(result, Err(LoaderError::NullPointer));
    }

    #[test]
    fn test_pointer_outside_window() {
        let slot = 0x10u64;
        let result = unsafe { reader_for(&slot).read() };
        assert_eq!(result, Err(LoaderError::OutOfRange { addr: 0x10 }));

        let slot = u64::MAX - 2;
        let result = unsafe { reader_for(&slot).read() };
        assert_eq!(result, Err(LoaderError::OutOfRange { addr: u64::MAX - 2 }));
    }

    #[test]
    fn test_zero_slot_address() {
        let result = unsafe { ControlBlockReader::new(0).with_slot(0).read() };
        assert_eq!(result, Err(LoaderError::OutOfRange { addr: 0 }));
    }

    #[test]
    fn test_reads_block_fields() {
        let table: [u64; 3] = [0, 0x00af_9a00_0000_ffff, 0x00cf_9200_0000_ffff];
        let raw = RawControlBlock {
            gdt_bound: (table.len() * DESCRIPTOR_SIZE - 1) as u16,
            gdt_base: table.as_ptr() as u64,
        };
        let slot = block_at(&raw);

        let block = unsafe { reader_for(&slot).read() }.unwrap();
        assert_eq!(block.gdt_bound(), 23);
        assert_eq!(block.gdt_base(), table.as_ptr() as u64);
        assert_eq!(block.descriptor_count(), 3);

        let mut descriptors = unsafe { block.descriptors() }.unwrap();
        assert_eq!(descriptors.size_hint(), (3, Some(3)));
        assert_eq!(descriptors.next(), Some(0));
        assert_eq!(descriptors.next(), Some(0x00af_9a00_0000_ffff));
        assert_eq!(descriptors.next(), Some(0x00cf_9200_0000_ffff));
        assert_eq!(descriptors.next(), None);
    }

    #[test]
    fn test_descriptor_count_at_max_bound() {
        let raw = RawControlBlock {
            gdt_bound: u16::MAX,
            gdt_base: 0,
        };
        let slot = block_at(&raw);
        let block = unsafe { reader_for(&slot).read() }.unwrap();

        assert_eq!(block.descriptor_count(), 8192);
        assert!(matches!(
            unsafe { block.descriptors() },
            Err(LoaderError::NullPointer)
        ));
    }

    #[test]
    fn test_report_lines() {
        let mut console = Console::new(StubBuffer::new());
        console.clear();

        report_control_block(&mut console, &Err(LoaderError::NullPointer));
        let text = console.buffer().row_text(Row::new(VGA_HEIGHT - 2).unwrap());
        assert_eq!(&text[..21], b"control block: <null>");

        report_control_block(&mut console, &Err(LoaderError::OutOfRange { addr: 0x10 }));
        let text = console.buffer().row_text(Row::new(VGA_HEIGHT - 2).unwrap());
        assert_eq!(&text[..34], b"control block: <out of range 0x10>");
    }

    #[test]
    fn test_report_fields() {
        let raw = RawControlBlock {
            gdt_bound: 0x17,
            gdt_base: 0x0000_0000_0009_0000,
        };
        let slot = block_at(&raw);
        let block = unsafe { reader_for(&slot).read() };

        let mut console = Console::new(StubBuffer::new());
        console.clear();
        report_control_block(&mut console, &block);

        let line = |row: usize| console.buffer().row_text(Row::new(row).unwrap());
        assert_eq!(&line(VGA_HEIGHT - 4)[..15], b"gdt bound: 0x17");
        assert_eq!(&line(VGA_HEIGHT - 3)[..17], b"gdt base: 0x90000");
        assert_eq!(&line(VGA_HEIGHT - 2)[..16], b"gdt entries: 0x3");
    }

    #[test]
    fn test_report_descriptors_from_table() {
        let table: [u64; 3] = [0, 0x00af_9a00_0000_ffff, 0x00cf_9200_0000_ffff];
        let raw = RawControlBlock {
            gdt_bound: (table.len() * DESCRIPTOR_SIZE - 1) as u16,
            gdt_base: table.as_ptr() as u64,
        };
        let slot = block_at(&raw);
        let block = unsafe { reader_for(&slot).read() }.unwrap();

        let mut console = Console::new(StubBuffer::new());
        console.clear();
        report_descriptors(&mut console, unsafe { block.descriptors() }.unwrap());

        let line = |row: usize| console.buffer().row_text(Row::new(row).unwrap());
        assert_eq!(&line(VGA_HEIGHT - 4)[..15], b"  gdt[0x0]: 0x0");
        assert_eq!(&line(VGA_HEIGHT - 3)[..28], b"  gdt[0x1]: 0xaf9a000000ffff");
        assert_eq!(&line(VGA_HEIGHT - 2)[..28], b"  gdt[0x2]: 0xcf92000000ffff");
    }

    #[test]
    fn test_report_descriptors_is_capped() {
        let mut console = Console::new(StubBuffer::new());
        console.clear();
        report_descriptors(&mut console, 0..100u64);

        assert_eq!(console.scroll_count(), MAX_LISTED_DESCRIPTORS as u64);
        let last = console.buffer().row_text(Row::new(VGA_HEIGHT - 2).unwrap());
        assert_eq!(&last[..15], b"  gdt[0x7]: 0x7");
    }
}
