#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// allocator for cache-line aligned pixel buffers.
pub mod allocator;

/// error types for the image module.
pub mod error;

/// image representation with aligned rows.
pub mod image;

/// aligned storage for pixel data.
pub mod storage;

/// The alignment unit of pixel buffers, in bytes.
///
/// Both the base pointer and the row stride of every [`Image`] are
/// multiples of this value.
pub const CACHE_LINE_SIZE: usize = 64;

pub use crate::allocator::{CpuAllocator, PixelAllocator, PixelAllocatorError};
pub use crate::error::ImageError;
pub use crate::image::{Image, ImageShape, PatchStatus};
pub use crate::storage::{PixelStorage, PixelType};
