//! Streaming vertex buffer with orphaning.
//!
//! Each frame (a *generation*) starts with [`DynamicBuffer::begin`].  The
//! first write of a generation, and any write that would not fit in what
//! is left, requests a brand-new full-size allocation from the backend
//! and restarts at offset 0.  The GPU keeps reading the old allocation
//! for draws already issued; the CPU never waits on it.

use crate::backend::GpuBackend;
use log::debug;
use thiserror::Error;

/// Default capacity in `f32`s (4 MiB).
pub const DEFAULT_CAPACITY_FLOATS: usize = 0x10_0000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BufferError {
    #[error("Write of {size} bytes exceeds buffer capacity of {capacity} bytes")]
    TooLarge { size: usize, capacity: usize },
}

/// Fixed-capacity GPU buffer written sequentially and orphaned on wrap.
#[derive(Debug)]
pub struct DynamicBuffer {
    capacity: usize,
    offset: usize,
    allocated: bool,
    allocations: u64,
}

impl DynamicBuffer {
    /// Create a buffer of `capacity` bytes.  Nothing is allocated on the
    /// GPU until the first write.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            offset: 0,
            allocated: false,
            allocations: 0,
        }
    }

    /// Start a new generation.  The next write orphans.
    pub fn begin(&mut self) {
        self.allocated = false;
        self.offset = 0;
    }

    /// Write `data` and return the byte offset it landed at.
    pub fn write(&mut self, backend: &mut dyn GpuBackend, data: &[u8]) -> Result<usize, BufferError> {
        if data.len() > self.capacity {
            return Err(BufferError::TooLarge {
                size: data.len(),
                capacity: self.capacity,
            });
        }
        if !self.allocated || self.offset + data.len() > self.capacity {
            backend.allocate_vertex_buffer(self.capacity);
            self.allocated = true;
            self.offset = 0;
            self.allocations += 1;
            debug!("Vertex buffer orphaned ({} allocations)", self.allocations);
        }
        let offset = self.offset;
        backend.write_vertex_buffer(offset, data);
        self.offset += data.len();
        Ok(offset)
    }

    /// Capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Current write cursor in bytes.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total number of GPU allocations made.
    pub fn allocations(&self) -> u64 {
        self.allocations
    }
}

impl Default for DynamicBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_FLOATS * std::mem::size_of::<f32>())
    }
}

// ===================================================================
// Tests
// ===================================================================
