//! The memory tape: a fixed run of byte cells and a single data pointer.

use std::ops::RangeInclusive;

/// Default number of cells on the tape.
pub const DEFAULT_MEMORY_SIZE: usize = 30_000;

/// Pointer movement that would leave the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TapeError {
    #[error("pointer overflow: cannot move right of cell {ptr}")]
    Overflow { ptr: usize },

    #[error("pointer underflow: cannot move left of cell 0")]
    Underflow,
}

/// How much of the tape a program has touched so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Non-zero cells in `[0, max_reached]`.
    pub non_zero: usize,
    /// `max_reached + 1`, the number of distinct addresses the pointer has visited.
    pub highest_address_used: usize,
}

/// A zero-initialized byte tape with a bounded pointer.
///
/// The tape never grows. Every cell past [`MemoryTape::max_reached`] is
/// guaranteed to be zero, so usage is derived by scanning the visited prefix
/// instead of being tracked on every write.
#[derive(Debug, Clone)]
pub struct MemoryTape {
    cells: Vec<u8>,
    pointer: usize,
    max_reached: usize,
}

impl MemoryTape {
    /// Create a tape of `size` zeroed cells. A size of 0 is raised to 1; the
    /// configuration layer rejects it before it gets here.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size.max(1)],
            pointer: 0,
            max_reached: 0,
        }
    }

    pub fn move_right(&mut self) -> Result<(), TapeError> {
        if self.pointer >= self.cells.len() - 1 {
            return Err(TapeError::Overflow { ptr: self.pointer });
        }
        self.pointer += 1;
        if self.pointer > self.max_reached {
            self.max_reached = self.pointer;
        }
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<(), TapeError> {
        if self.pointer == 0 {
            return Err(TapeError::Underflow);
        }
        self.pointer -= 1;
        Ok(())
    }

    pub fn increment(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    pub fn decrement(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }

    #[inline]
    pub fn read(&self) -> u8 {
        self.cells[self.pointer]
    }

    #[inline]
    pub fn write(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn max_reached(&self) -> usize {
        self.max_reached
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Count non-zero cells up to the furthest visited address.
    pub fn usage(&self) -> MemoryUsage {
        let non_zero = self.cells[..=self.max_reached]
            .iter()
            .filter(|&&c| c != 0)
            .count();
        MemoryUsage {
            non_zero,
            highest_address_used: self.max_reached + 1,
        }
    }

    /// Share of the tape that has been visited, as a percentage.
    pub fn utilization_percent(&self) -> f64 {
        self.usage().highest_address_used as f64 / self.cells.len() as f64 * 100.0
    }

    /// Indices from `start_offset` cells before the pointer to `end_offset`
    /// cells after it, clamped to the tape.
    pub fn window(&self, start_offset: usize, end_offset: usize) -> RangeInclusive<usize> {
        let start = self.pointer.saturating_sub(start_offset);
        let end = self
            .pointer
            .saturating_add(end_offset)
            .min(self.cells.len() - 1);
        start..=end
    }
}

impl Default for MemoryTape {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_SIZE)
    }
}
