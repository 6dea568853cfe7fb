//! Cell tape and data pointer
//!
//! The tape has a fixed capacity chosen at construction. Pointer moves are
//! bounds checked and leave the pointer untouched on failure.

use std::num::NonZeroUsize;

use crate::cell::Cell;
use crate::error::{Direction, VmError, VmResult};

/// Default number of cells
pub const DEFAULT_MEMORY_SIZE: usize = 4096;

/// Fixed-size cell tape with a data pointer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory<C: Cell> {
    cells: Vec<C>,
    pointer: usize,
}

impl<C: Cell> Memory<C> {
    /// Create a zeroed tape with `capacity` cells
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            cells: vec![C::zero(); capacity.get()],
            pointer: 0,
        }
    }

    /// Number of cells
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Current data pointer
    #[inline]
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Set the data pointer, rejecting positions outside the tape
    pub fn set_pointer(&mut self, position: usize) -> VmResult<()> {
        if position >= self.capacity() {
            let direction = if position > self.pointer {
                Direction::Right
            } else {
                Direction::Left
            };
            return Err(VmError::boundary(direction, self.pointer, self.capacity()));
        }
        self.pointer = position;
        Ok(())
    }

    /// Move one cell right
    pub fn move_right(&mut self) -> VmResult<()> {
        if self.pointer + 1 >= self.capacity() {
            return Err(VmError::boundary(
                Direction::Right,
                self.pointer,
                self.capacity(),
            ));
        }
        self.pointer += 1;
        Ok(())
    }

    /// Move one cell left
    pub fn move_left(&mut self) -> VmResult<()> {
        if self.pointer == 0 {
            return Err(VmError::boundary(
                Direction::Left,
                self.pointer,
                self.capacity(),
            ));
        }
        self.pointer -= 1;
        Ok(())
    }

    /// Add one to the current cell, wrapping
    #[inline]
    pub fn increment(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_add(&C::one());
    }

    /// Subtract one from the current cell, wrapping
    #[inline]
    pub fn decrement(&mut self) {
        let cell = &mut self.cells[self.pointer];
        *cell = cell.wrapping_sub(&C::one());
    }

    /// Value of the current cell
    #[inline]
    pub fn get(&self) -> C {
        self.cells[self.pointer]
    }

    /// Overwrite the current cell
    #[inline]
    pub fn set(&mut self, value: C) {
        self.cells[self.pointer] = value;
    }

    /// All cells
    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    /// All cells, mutably
    pub fn cells_mut(&mut self) -> &mut [C] {
        &mut self.cells
    }

    /// Move the pointer back to the first cell
    pub(crate) fn reset_pointer(&mut self) {
        self.pointer = 0;
    }
}
