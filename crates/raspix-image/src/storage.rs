use std::{alloc::Layout, ptr::NonNull};

use crate::allocator::{PixelAllocator, PixelAllocatorError};
use crate::CACHE_LINE_SIZE;

/// A trait to define the types that can be stored in a pixel buffer.
///
/// Implementors are plain numeric types whose all-zeroes bit pattern is a
/// valid value, which lets freshly allocated buffers be exposed as slices.
pub trait PixelType: Copy + Default + Send + Sync + 'static {}

/// Implement the `PixelType` trait for the supported types.
impl PixelType for u8 {}
impl PixelType for u16 {}
impl PixelType for u32 {}
impl PixelType for u64 {}
impl PixelType for i8 {}
impl PixelType for i16 {}
impl PixelType for i32 {}
impl PixelType for i64 {}
impl PixelType for f32 {}
impl PixelType for f64 {}

/// An owned memory region holding pixel data, aligned to the cache line.
///
/// The base pointer is aligned to [`CACHE_LINE_SIZE`] bytes and the
/// allocation is zero-initialized. Empty regions still hold one aligned
/// cache line so the base pointer is always real.
///
/// # Thread Safety
///
/// `PixelStorage` is `Send + Sync` when the allocator is; element types are
/// `Send + Sync` by the `PixelType` bound.
pub struct PixelStorage<T: PixelType, A: PixelAllocator> {
    /// The pointer to the buffer memory which must be non-null.
    ptr: NonNull<T>,
    /// The number of elements accessible through the slice accessors.
    len: usize,
    /// The memory layout used for allocation.
    layout: Layout,
    /// The allocator that owns the memory.
    alloc: A,
}

impl<T: PixelType, A: PixelAllocator> PixelStorage<T, A> {
    /// Creates a new zeroed storage with the given length and allocator.
    ///
    /// # Arguments
    ///
    /// * `len` - The number of elements in the storage.
    /// * `alloc` - The allocator used to allocate the storage.
    ///
    /// # Returns
    ///
    /// A new storage if successful, otherwise an error.
    pub fn new(len: usize, alloc: A) -> Result<Self, PixelAllocatorError> {
        let layout = Layout::array::<T>(len)
            .and_then(|layout| layout.align_to(CACHE_LINE_SIZE))
            .map_err(PixelAllocatorError::LayoutError)?
            .pad_to_align();

        // zero-extent buffers still own one aligned line
        let layout = if layout.size() == 0 {
            Layout::from_size_align(CACHE_LINE_SIZE, CACHE_LINE_SIZE)
                .map_err(PixelAllocatorError::LayoutError)?
        } else {
            layout
        };

        let ptr = alloc.alloc(layout)?;

        Ok(Self {
            ptr: NonNull::new(ptr as *mut T).ok_or(PixelAllocatorError::NullPointer)?,
            len,
            layout,
            alloc,
        })
    }

    /// Returns the allocator used to allocate the storage.
    #[inline]
    pub fn alloc(&self) -> &A {
        &self.alloc
    }

    /// Returns the number of elements in the storage.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns whether the storage is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the memory layout of the allocation.
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Returns the pointer to the buffer memory.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Returns the mutable pointer to the buffer memory.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Returns the storage data as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: ptr is valid for len elements, aligned, and zero-initialized
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Returns the storage data as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: ptr is valid for len elements and we hold exclusive access
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: PixelType, A: PixelAllocator> std::fmt::Debug for PixelStorage<T, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelStorage")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .field("layout", &self.layout)
            .finish()
    }
}

impl<T: PixelType, A: PixelAllocator> Drop for PixelStorage<T, A> {
    fn drop(&mut self) {
        // SAFETY: ptr and layout were created together during allocation
        self.alloc.dealloc(self.ptr.as_ptr() as *mut u8, self.layout);
    }
}

impl<T: PixelType, A: PixelAllocator> Clone for PixelStorage<T, A> {
    /// Creates a deep copy of the storage in a fresh aligned allocation.
    ///
    /// `Clone` is infallible; an allocation failure aborts through
    /// [`std::alloc::handle_alloc_error`], as `Vec` does.
    fn clone(&self) -> Self {
        let ptr = match self.alloc.alloc(self.layout) {
            Ok(ptr) => ptr,
            Err(_) => std::alloc::handle_alloc_error(self.layout),
        };
        // SAFETY: both regions were allocated with the same layout
        unsafe {
            std::ptr::copy_nonoverlapping(self.ptr.as_ptr() as *const u8, ptr, self.layout.size());
        }
        Self {
            // SAFETY: alloc returned a non-null pointer
            ptr: unsafe { NonNull::new_unchecked(ptr as *mut T) },
            len: self.len,
            layout: self.layout,
            alloc: self.alloc.clone(),
        }
    }
}

// SAFETY: the storage owns its allocation and PixelType requires Send + Sync
unsafe impl<T: PixelType, A: PixelAllocator + Send> Send for PixelStorage<T, A> {}

// SAFETY: shared access goes through &self and mutation requires &mut self
unsafe impl<T: PixelType, A: PixelAllocator + Sync> Sync for PixelStorage<T, A> {}
