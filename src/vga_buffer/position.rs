// src/vga_buffer/position.rs

//! Validated coordinates for the VGA cell grid
//!
//! Every cell access goes through a [`CellIndex`], and the only ways to build
//! one are the checked constructors here or the combination of an already
//! valid [`Row`] and [`Column`]. That keeps out-of-bounds writes out of the
//! type system instead of checking them on every store.

use super::constants::{ACTIVE_ROW, VGA_HEIGHT, VGA_WIDTH};

/// A row number in `[0, VGA_HEIGHT)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Row(usize);

impl Row {
    /// The row the cursor writes to
    pub const ACTIVE: Self = Self(ACTIVE_ROW);

    /// Returns None if `row` is outside the screen
    pub const fn new(row: usize) -> Option<Self> {
        if row < VGA_HEIGHT {
            Some(Self(row))
        } else {
            None
        }
    }

    /// Get the raw row number
    pub const fn get(self) -> usize {
        self.0
    }

    /// Every row from top to bottom
    pub fn all() -> impl Iterator<Item = Self> {
        (0..VGA_HEIGHT).map(Self)
    }
}

/// A column number in `[0, VGA_WIDTH)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Column(usize);

impl Column {
    /// Leftmost column
    pub const FIRST: Self = Self(0);

    /// Rightmost column
    pub const LAST: Self = Self(VGA_WIDTH - 1);

    /// Returns None if `col` is outside the screen
    pub const fn new(col: usize) -> Option<Self> {
        if col < VGA_WIDTH {
            Some(Self(col))
        } else {
            None
        }
    }

    /// Get the raw column number
    pub const fn get(self) -> usize {
        self.0
    }

    /// Move one column right.
    ///
    /// Returns the new column, or None when `self` is already the last
    /// column (the caller wraps).
    pub const fn advance(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    /// Every column from left to right
    pub fn all() -> impl Iterator<Item = Self> {
        (0..VGA_WIDTH).map(Self)
    }
}

/// A linear index into the cell buffer, always `< CELL_COUNT`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CellIndex(usize);

impl CellIndex {
    /// `row * VGA_WIDTH + col`; cannot leave the buffer
    pub const fn at(row: Row, col: Column) -> Self {
        Self(row.0 * VGA_WIDTH + col.0)
    }

    /// Get the raw index value
    pub const fn get(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vga_buffer::constants::CELL_COUNT;

    #[test]
    fn test_cell_index_from_row_col() {
        let idx = CellIndex::at(Row::new(0).unwrap(), Column::FIRST);
        assert_eq!(idx.get(), 0);

        let idx = CellIndex::at(Row::new(1).unwrap(), Column::new(2).unwrap());
        assert_eq!(idx.get(), VGA_WIDTH + 2);

        let last = CellIndex::at(Row::ACTIVE, Column::LAST);
        assert_eq!(last.get(), CELL_COUNT - 1);
    }

    #[test]
    fn test_row_and_column_bounds() {
        assert!(Row::new(VGA_HEIGHT).is_none());
        assert!(Column::new(VGA_WIDTH).is_none());
        assert_eq!(Row::ACTIVE.get(), VGA_HEIGHT - 1);
        assert_eq!(Row::all().count(), VGA_HEIGHT);
        assert_eq!(Column::all().count(), VGA_WIDTH);
    }

    #[test]
    fn test_column_advance() {
        assert_eq!(Column::FIRST.advance(), Column::new(1));
        assert_eq!(Column::LAST.advance(), None);
    }
}
