use rayon::prelude::*;

use raspix_image::{Image, PixelAllocator, PixelType};

/// Apply a function to each pixel of the image in place, in parallel over rows.
///
/// The function receives the channel slice of one pixel. Rows are processed
/// through their content slices, so the alignment padding at the end of each
/// row is never touched.
pub fn par_iter_rows_mut<T, A>(img: &mut Image<T, A>, f: impl Fn(&mut [T]) + Send + Sync)
where
    T: PixelType,
    A: PixelAllocator,
{
    if img.is_empty() {
        return;
    }

    let stride = img.row_stride() / std::mem::size_of::<T>();
    let row_len = img.row_len();
    let channels = img.channels();

    img.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .for_each(|row| {
            row[..row_len]
                .chunks_exact_mut(channels)
                .for_each(|pixel| f(pixel));
        });
}

/// Apply a function to each element of the image in place, in parallel over rows.
///
/// Like [`par_iter_rows_mut`] but the function receives one element at a
/// time, for conversions that treat every channel independently.
pub fn par_iter_rows_val_mut<T, A>(img: &mut Image<T, A>, f: impl Fn(&mut T) + Send + Sync)
where
    T: PixelType,
    A: PixelAllocator,
{
    if img.is_empty() {
        return;
    }

    let stride = img.row_stride() / std::mem::size_of::<T>();
    let row_len = img.row_len();

    img.as_slice_mut()
        .par_chunks_exact_mut(stride)
        .for_each(|row| {
            row[..row_len].iter_mut().for_each(|x| f(x));
        });
}
