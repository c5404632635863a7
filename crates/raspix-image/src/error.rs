/// An error type for the image module.
#[derive(thiserror::Error, Debug)]
pub enum ImageError {
    /// Error when the data length does not match the image shape.
    #[error("Data length ({0}) does not match the image shape ({1})")]
    InvalidDataLength(usize, usize),

    /// Error when the channel count is not the one the operation requires.
    #[error("Invalid number of channels: got {0}, expected {1}")]
    InvalidChannels(usize, usize),

    /// Error when an element cannot be represented in the target type.
    #[error("Failed to cast image data")]
    CastError,

    /// Error when the underlying buffer cannot be allocated.
    #[error("Failed to allocate image storage. {0}")]
    AllocatorError(#[from] crate::allocator::PixelAllocatorError),
}
