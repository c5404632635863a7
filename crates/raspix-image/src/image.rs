use num_traits::NumCast;
use rayon::prelude::*;

use crate::allocator::{CpuAllocator, PixelAllocator};
use crate::error::ImageError;
use crate::storage::{PixelStorage, PixelType};
use crate::CACHE_LINE_SIZE;

/// Image shape in pixels.
///
/// A struct to represent the logical extents of an image: the number of
/// rows, the number of columns and the number of channels per pixel.
/// A shape with any extent equal to zero is legal and describes an empty
/// image.
///
/// # Examples
///
/// ```
/// use raspix_image::ImageShape;
///
/// let shape = ImageShape {
///     rows: 20,
///     cols: 10,
///     channels: 3,
/// };
///
/// assert_eq!(shape.rows, 20);
/// assert_eq!(shape.numel(), 20 * 10 * 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageShape {
    /// Number of rows in the image.
    pub rows: usize,
    /// Number of columns in the image.
    pub cols: usize,
    /// Number of channels per pixel.
    pub channels: usize,
}

impl ImageShape {
    /// Returns the number of content elements, padding excluded.
    #[inline]
    pub fn numel(&self) -> usize {
        self.rows * self.cols * self.channels
    }
}

impl std::fmt::Display for ImageShape {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageShape {{ rows: {}, cols: {}, channels: {} }}",
            self.rows, self.cols, self.channels
        )
    }
}

impl From<[usize; 3]> for ImageShape {
    fn from(shape: [usize; 3]) -> Self {
        ImageShape {
            rows: shape[0],
            cols: shape[1],
            channels: shape[2],
        }
    }
}

/// Result of a window extraction with [`Image::patch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use = "the status reports whether the window was in bounds"]
pub enum PatchStatus {
    /// The window was fully inside the source image and has been copied.
    Extracted,
    /// The window fell outside the source image; the output was emptied.
    OutOfBounds,
}

/// Returns the row stride in elements for a cache-line aligned row.
fn aligned_stride_elems<T: PixelType>(shape: &ImageShape) -> usize {
    let row_bytes = shape.cols * shape.channels * std::mem::size_of::<T>();
    row_bytes.div_ceil(CACHE_LINE_SIZE) * CACHE_LINE_SIZE / std::mem::size_of::<T>()
}

/// Represents an image whose rows are aligned to the cache line.
///
/// Pixel data is stored in row-major (rows, cols, channels) order. Each row
/// is padded so that consecutive rows start [`Image::row_stride`] bytes
/// apart, with both the base pointer and the stride aligned to
/// [`CACHE_LINE_SIZE`]. The padding is zero-initialized and carries no
/// pixel data.
#[derive(Clone, Debug)]
pub struct Image<T: PixelType, A: PixelAllocator = CpuAllocator> {
    storage: PixelStorage<T, A>,
    shape: ImageShape,
    stride_elems: usize,
}

impl<T: PixelType, A: PixelAllocator> Image<T, A> {
    /// Create a new image with the given shape and zeroed pixel data.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the image in pixels.
    /// * `alloc` - The allocator used for the pixel buffer.
    ///
    /// # Returns
    ///
    /// A new image with all pixels set to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use raspix_image::{CpuAllocator, Image, ImageShape};
    ///
    /// let image = Image::<u8>::new(
    ///     ImageShape {
    ///         rows: 20,
    ///         cols: 10,
    ///         channels: 3,
    ///     },
    ///     CpuAllocator,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.rows(), 20);
    /// assert_eq!(image.cols(), 10);
    /// assert_eq!(image.channels(), 3);
    /// assert_eq!(image.row_stride() % 64, 0);
    /// ```
    pub fn new(shape: ImageShape, alloc: A) -> Result<Self, ImageError> {
        let stride_elems = aligned_stride_elems::<T>(&shape);
        let storage = PixelStorage::new(shape.rows * stride_elems, alloc)?;

        Ok(Self {
            storage,
            shape,
            stride_elems,
        })
    }

    /// Create a new image with the given shape and a constant pixel value.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the image in pixels.
    /// * `val` - The value every content element is set to.
    /// * `alloc` - The allocator used for the pixel buffer.
    pub fn from_shape_val(shape: ImageShape, val: T, alloc: A) -> Result<Self, ImageError> {
        let mut image = Self::new(shape, alloc)?;
        let row_len = image.row_len();
        let stride = image.stride_elems;

        if row_len > 0 {
            for row in image.storage.as_mut_slice().chunks_exact_mut(stride) {
                row[..row_len].fill(val);
            }
        }

        Ok(image)
    }

    /// Create a new image from packed pixel data.
    ///
    /// The data is expected in row-major order without any row padding and
    /// is copied row by row into the aligned layout.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the image in pixels.
    /// * `data` - The packed pixel data, of length `shape.numel()`.
    /// * `alloc` - The allocator used for the pixel buffer.
    ///
    /// # Errors
    ///
    /// If the length of the pixel data does not match the shape, an error is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use raspix_image::{CpuAllocator, Image, ImageShape};
    ///
    /// let image = Image::from_shape_vec(
    ///     ImageShape {
    ///         rows: 2,
    ///         cols: 2,
    ///         channels: 1,
    ///     },
    ///     vec![1u8, 2, 3, 4],
    ///     CpuAllocator,
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(image.get([1, 0, 0]), Some(&3));
    /// ```
    pub fn from_shape_vec(shape: ImageShape, data: Vec<T>, alloc: A) -> Result<Self, ImageError> {
        if data.len() != shape.numel() {
            return Err(ImageError::InvalidDataLength(data.len(), shape.numel()));
        }

        let mut image = Self::new(shape, alloc)?;
        let row_len = image.row_len();
        let stride = image.stride_elems;

        if row_len > 0 {
            for (dst, src) in image
                .storage
                .as_mut_slice()
                .chunks_exact_mut(stride)
                .zip(data.chunks_exact(row_len))
            {
                dst[..row_len].copy_from_slice(src);
            }
        }

        Ok(image)
    }

    /// Returns the shape of the image.
    #[inline]
    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    /// Returns the number of rows in the image.
    #[inline]
    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    /// Returns the number of columns in the image.
    #[inline]
    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Returns the number of channels per pixel.
    #[inline]
    pub fn channels(&self) -> usize {
        self.shape.channels
    }

    /// Returns the distance in bytes between consecutive rows.
    ///
    /// The stride is the smallest multiple of [`CACHE_LINE_SIZE`] that fits
    /// one packed row, so it is always aligned and never smaller than
    /// `cols * channels * size_of::<T>()`.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.stride_elems * std::mem::size_of::<T>()
    }

    /// Returns the number of content elements in one row, padding excluded.
    #[inline]
    pub fn row_len(&self) -> usize {
        self.shape.cols * self.shape.channels
    }

    /// Returns whether the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shape.numel() == 0
    }

    /// Get a reference to the element at the given index, if it is in bounds.
    ///
    /// # Arguments
    ///
    /// * `index` - The `[row, col, channel]` index of the element.
    pub fn get(&self, index: [usize; 3]) -> Option<&T> {
        let [r, c, ch] = index;
        if r >= self.shape.rows || c >= self.shape.cols || ch >= self.shape.channels {
            return None;
        }
        self.storage
            .as_slice()
            .get(r * self.stride_elems + c * self.shape.channels + ch)
    }

    /// Get the content slice of a row, if the index is in bounds.
    ///
    /// The slice holds `row_len()` elements; the alignment padding at the
    /// end of the row is excluded.
    pub fn row(&self, r: usize) -> Option<&[T]> {
        if r >= self.shape.rows {
            return None;
        }
        let start = r * self.stride_elems;
        Some(&self.storage.as_slice()[start..start + self.row_len()])
    }

    /// Get the mutable content slice of a row, if the index is in bounds.
    pub fn row_mut(&mut self, r: usize) -> Option<&mut [T]> {
        if r >= self.shape.rows {
            return None;
        }
        let start = r * self.stride_elems;
        let row_len = self.row_len();
        Some(&mut self.storage.as_mut_slice()[start..start + row_len])
    }

    /// Get the content slice of a row without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure `r < self.rows()`.
    pub unsafe fn row_unchecked(&self, r: usize) -> &[T] {
        let start = r * self.stride_elems;
        self.storage
            .as_slice()
            .get_unchecked(start..start + self.row_len())
    }

    /// Get the mutable content slice of a row without bounds checking.
    ///
    /// # Safety
    ///
    /// The caller must ensure `r < self.rows()`.
    pub unsafe fn row_unchecked_mut(&mut self, r: usize) -> &mut [T] {
        let start = r * self.stride_elems;
        let row_len = self.row_len();
        self.storage
            .as_mut_slice()
            .get_unchecked_mut(start..start + row_len)
    }

    /// Returns the full buffer as a slice, row padding included.
    ///
    /// The slice covers `rows * row_stride` bytes of storage; padding
    /// elements are zero-initialized.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.storage.as_slice()
    }

    /// Returns the full buffer as a mutable slice, row padding included.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        self.storage.as_mut_slice()
    }

    /// Returns the pointer to the first element of the buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Returns the mutable pointer to the first element of the buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.storage.as_mut_ptr()
    }

    /// Resize the image to a new shape, discarding the contents.
    ///
    /// The old buffer is released and a fresh zeroed aligned buffer is
    /// allocated; pixel data is NOT preserved. Resizing to the current
    /// shape keeps the existing buffer untouched.
    ///
    /// # Arguments
    ///
    /// * `shape` - The new shape of the image.
    pub fn resize(&mut self, shape: ImageShape) -> Result<(), ImageError> {
        if shape == self.shape {
            return Ok(());
        }

        let stride_elems = aligned_stride_elems::<T>(&shape);
        self.storage = PixelStorage::new(shape.rows * stride_elems, self.storage.alloc().clone())?;
        self.shape = shape;
        self.stride_elems = stride_elems;

        Ok(())
    }

    /// Cast the pixel data of the image to a different type.
    ///
    /// The conversion runs row-parallel and writes into a fresh aligned
    /// image of the same shape.
    ///
    /// # Errors
    ///
    /// If an element cannot be represented in the target type, an error is
    /// returned.
    pub fn cast<U>(&self) -> Result<Image<U, A>, ImageError>
    where
        U: PixelType + NumCast,
        T: NumCast,
    {
        let mut dst = Image::<U, A>::new(self.shape, self.storage.alloc().clone())?;
        if self.is_empty() {
            return Ok(dst);
        }

        let row_len = self.row_len();
        let src_stride = self.stride_elems;
        let dst_stride = dst.stride_elems;

        dst.storage
            .as_mut_slice()
            .par_chunks_exact_mut(dst_stride)
            .zip(self.storage.as_slice().par_chunks_exact(src_stride))
            .try_for_each(|(dst_row, src_row)| {
                for (d, s) in dst_row[..row_len].iter_mut().zip(src_row[..row_len].iter()) {
                    *d = U::from(*s).ok_or(ImageError::CastError)?;
                }
                Ok::<(), ImageError>(())
            })?;

        Ok(dst)
    }

    /// Convert the pixel data with a caller-supplied function.
    ///
    /// Like [`Image::cast`] but with an arbitrary per-element conversion,
    /// run row-parallel.
    ///
    /// # Arguments
    ///
    /// * `f` - The conversion applied to every content element.
    ///
    /// # Examples
    ///
    /// ```
    /// use raspix_image::{CpuAllocator, Image, ImageShape};
    ///
    /// let image = Image::from_shape_val(
    ///     ImageShape {
    ///         rows: 2,
    ///         cols: 3,
    ///         channels: 1,
    ///     },
    ///     51u8,
    ///     CpuAllocator,
    /// )
    /// .unwrap();
    ///
    /// let scaled = image.cast_with(|x| x as f32 / 255.0).unwrap();
    /// assert_eq!(scaled.get([0, 0, 0]), Some(&0.2));
    /// ```
    pub fn cast_with<U, F>(&self, f: F) -> Result<Image<U, A>, ImageError>
    where
        U: PixelType,
        F: Fn(T) -> U + Send + Sync,
    {
        let mut dst = Image::<U, A>::new(self.shape, self.storage.alloc().clone())?;
        if self.is_empty() {
            return Ok(dst);
        }

        let row_len = self.row_len();
        let src_stride = self.stride_elems;
        let dst_stride = dst.stride_elems;

        dst.storage
            .as_mut_slice()
            .par_chunks_exact_mut(dst_stride)
            .zip(self.storage.as_slice().par_chunks_exact(src_stride))
            .for_each(|(dst_row, src_row)| {
                dst_row[..row_len]
                    .iter_mut()
                    .zip(src_row[..row_len].iter())
                    .for_each(|(d, s)| *d = f(*s));
            });

        Ok(dst)
    }

    /// Copy a rectangular window of the image into `dst`.
    ///
    /// The window bounds are INCLUSIVE on all four sides: the result covers
    /// `(bottom - top + 1)` rows and `(right - left + 1)` columns with the
    /// channel count of the source. `dst` is resized to the window shape.
    ///
    /// When the window is empty or falls outside the source, `dst` is
    /// resized to the zero-extent shape `0 x 0 x 0` and the call reports
    /// [`PatchStatus::OutOfBounds`]; an `Err` is only returned when the
    /// output buffer cannot be allocated.
    ///
    /// # Arguments
    ///
    /// * `dst` - The image receiving the window.
    /// * `left` - The first column of the window.
    /// * `right` - The last column of the window.
    /// * `top` - The first row of the window.
    /// * `bottom` - The last row of the window.
    ///
    /// # Examples
    ///
    /// ```
    /// use raspix_image::{CpuAllocator, Image, ImageShape, PatchStatus};
    ///
    /// let src = Image::from_shape_vec(
    ///     ImageShape {
    ///         rows: 2,
    ///         cols: 2,
    ///         channels: 1,
    ///     },
    ///     vec![1u8, 2, 3, 4],
    ///     CpuAllocator,
    /// )
    /// .unwrap();
    ///
    /// let mut dst = Image::new(ImageShape { rows: 0, cols: 0, channels: 0 }, CpuAllocator).unwrap();
    /// let status = src.patch(&mut dst, 1, 1, 0, 1).unwrap();
    ///
    /// assert_eq!(status, PatchStatus::Extracted);
    /// assert_eq!(dst.get([0, 0, 0]), Some(&2));
    /// assert_eq!(dst.get([1, 0, 0]), Some(&4));
    /// ```
    pub fn patch(
        &self,
        dst: &mut Image<T, A>,
        left: i64,
        right: i64,
        top: i64,
        bottom: i64,
    ) -> Result<PatchStatus, ImageError> {
        let out_of_bounds = left > right
            || top > bottom
            || left < 0
            || top < 0
            || right >= self.shape.cols as i64
            || bottom >= self.shape.rows as i64;

        if out_of_bounds {
            dst.resize(ImageShape {
                rows: 0,
                cols: 0,
                channels: 0,
            })?;
            return Ok(PatchStatus::OutOfBounds);
        }

        let (left, top) = (left as usize, top as usize);
        let (right, bottom) = (right as usize, bottom as usize);

        dst.resize(ImageShape {
            rows: bottom - top + 1,
            cols: right - left + 1,
            channels: self.shape.channels,
        })?;

        let row_len = dst.row_len();
        if row_len == 0 {
            // zero channels, nothing to copy
            return Ok(PatchStatus::Extracted);
        }

        let dst_stride = dst.stride_elems;
        let src_stride = self.stride_elems;
        let col_offset = left * self.shape.channels;
        let src_slice = self.storage.as_slice();

        dst.storage
            .as_mut_slice()
            .par_chunks_exact_mut(dst_stride)
            .enumerate()
            .for_each(|(r, dst_row)| {
                let src_start = (top + r) * src_stride + col_offset;
                dst_row[..row_len].copy_from_slice(&src_slice[src_start..src_start + row_len]);
            });

        Ok(PatchStatus::Extracted)
    }
}
