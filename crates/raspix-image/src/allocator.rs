use std::alloc;
use std::alloc::Layout;

use thiserror::Error;

/// An error type for pixel allocator operations.
#[derive(Debug, Error, PartialEq)]
pub enum PixelAllocatorError {
    /// An error occurred while computing the buffer layout.
    #[error("Invalid buffer layout {0}")]
    LayoutError(core::alloc::LayoutError),

    /// An error occurred during memory allocation.
    #[error("Null pointer")]
    NullPointer,
}

/// A trait for allocating and deallocating aligned pixel buffers.
///
/// All allocations are zero-initialized so that the padded tail of each row
/// is always initialized memory.
///
/// # Safety
///
/// The allocator must be thread-safe.
pub trait PixelAllocator: Clone {
    /// Allocates zeroed memory for a buffer with the given layout.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, PixelAllocatorError>;

    /// Deallocates memory for a buffer with the given layout.
    fn dealloc(&self, ptr: *mut u8, layout: Layout);
}

/// A pixel allocator that uses the system allocator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CpuAllocator;

impl PixelAllocator for CpuAllocator {
    /// Allocates zeroed memory for a buffer with the given layout.
    ///
    /// # Arguments
    ///
    /// * `layout` - The layout of the buffer.
    ///
    /// # Returns
    ///
    /// A non-null pointer to the allocated memory if successful, otherwise an error.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, PixelAllocatorError> {
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        if ptr.is_null() {
            Err(PixelAllocatorError::NullPointer)?
        }
        Ok(ptr)
    }

    /// Deallocates memory for a buffer with the given layout.
    ///
    /// # Arguments
    ///
    /// * `ptr` - A non-null pointer to the allocated memory.
    /// * `layout` - The layout of the buffer.
    ///
    /// # Safety
    ///
    /// The pointer must come from `alloc` with the same layout.
    #[allow(clippy::not_unsafe_ptr_arg_deref)]
    fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if !ptr.is_null() {
            unsafe { alloc::dealloc(ptr, layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_allocator() -> Result<(), PixelAllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::from_size_align(1024, 64).unwrap();
        let ptr = allocator.alloc(layout)?;
        allocator.dealloc(ptr, layout);
        Ok(())
    }

    #[test]
    fn test_cpu_allocator_zeroed() -> Result<(), PixelAllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::from_size_align(256, 64).unwrap();
        let ptr = allocator.alloc(layout)?;
        let all_zero = unsafe { std::slice::from_raw_parts(ptr, 256) }
            .iter()
            .all(|&b| b == 0);
        allocator.dealloc(ptr, layout);
        assert!(all_zero);
        Ok(())
    }
}
