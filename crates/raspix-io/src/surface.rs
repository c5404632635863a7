use raspix_image::{Image, PixelAllocator};

use crate::error::IoError;

/// Borrowed description of an image buffer for handoff to a blit target.
///
/// The descriptor exposes the raw padded byte region together with the
/// geometry and channel masks a display surface needs to consume it
/// without copying. Rows start every `pitch` bytes; the bytes between
/// `width * 3` and `pitch` in each row are alignment padding.
#[derive(Debug, Clone, Copy)]
pub struct SurfaceDescriptor<'a> {
    /// The full byte region backing the image, row padding included.
    pub data: &'a [u8],
    /// The number of pixels in one row.
    pub width: usize,
    /// The number of rows.
    pub height: usize,
    /// The number of bits per pixel.
    pub depth_bits: usize,
    /// The distance in bytes between the starts of consecutive rows.
    pub pitch: usize,
    /// The bit mask selecting the red sample within a pixel.
    pub red_mask: u32,
    /// The bit mask selecting the green sample within a pixel.
    pub green_mask: u32,
    /// The bit mask selecting the blue sample within a pixel.
    pub blue_mask: u32,
    /// The bit mask selecting the alpha sample, zero when absent.
    pub alpha_mask: u32,
}

impl<'a> SurfaceDescriptor<'a> {
    /// Create a descriptor borrowing the buffer of a three channel image.
    ///
    /// # Arguments
    ///
    /// * `image` - The RGB image to describe.
    ///
    /// # Errors
    ///
    /// Returns an error if the image does not have three channels.
    pub fn from_image<A: PixelAllocator>(image: &'a Image<u8, A>) -> Result<Self, IoError> {
        if image.channels() != 3 {
            return Err(IoError::UnsupportedChannelCount(image.channels()));
        }

        Ok(Self {
            data: image.as_slice(),
            width: image.cols(),
            height: image.rows(),
            depth_bits: 8 * image.channels(),
            pitch: image.row_stride(),
            red_mask: 0x0000FF,
            green_mask: 0x00FF00,
            blue_mask: 0xFF0000,
            alpha_mask: 0,
        })
    }
}
