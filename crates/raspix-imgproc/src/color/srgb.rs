use raspix_image::{Image, ImageError, PixelAllocator};

use crate::parallel;

/// Decode one sRGB-encoded channel to linear light.
#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Encode one linear-light channel to sRGB.
#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Convert an sRGB-encoded image to linear RGB in place.
///
/// Applies the sRGB decoding transfer function to every channel
/// independently. Values are expected in the range [0, 1]; out-of-range
/// values pass through the same curve without clamping.
///
/// Precondition: the image must have 3 channels.
///
/// # Example
///
/// ```
/// use raspix_image::{CpuAllocator, Image, ImageShape};
/// use raspix_imgproc::color::linear_from_srgb;
///
/// let mut image = Image::from_shape_val(
///     ImageShape {
///         rows: 4,
///         cols: 5,
///         channels: 3,
///     },
///     0.5f32,
///     CpuAllocator,
/// )
/// .unwrap();
///
/// linear_from_srgb(&mut image).unwrap();
/// ```
pub fn linear_from_srgb<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    parallel::par_iter_rows_val_mut(img, |c| *c = srgb_to_linear(*c));

    Ok(())
}

/// Convert a linear RGB image to sRGB encoding in place.
///
/// The inverse of [`linear_from_srgb`].
///
/// Precondition: the image must have 3 channels.
pub fn srgb_from_linear<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    parallel::par_iter_rows_val_mut(img, |c| *c = linear_to_srgb(*c));

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use raspix_image::{CpuAllocator, Image, ImageError, ImageShape};

    #[test]
    fn srgb_known_values() -> Result<(), ImageError> {
        let mut image = Image::from_shape_vec(
            ImageShape {
                rows: 1,
                cols: 2,
                channels: 3,
            },
            vec![0.0f32, 0.5, 1.0, 0.04045, 0.2, 0.8],
            CpuAllocator,
        )?;

        super::linear_from_srgb(&mut image)?;

        assert_relative_eq!(*image.get([0, 0, 0]).unwrap(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(*image.get([0, 0, 1]).unwrap(), 0.214041, epsilon = 1e-5);
        assert_relative_eq!(*image.get([0, 0, 2]).unwrap(), 1.0, epsilon = 1e-6);
        // the linear segment ends at 0.04045
        assert_relative_eq!(
            *image.get([0, 1, 0]).unwrap(),
            0.04045 / 12.92,
            epsilon = 1e-7
        );

        Ok(())
    }

    #[test]
    fn srgb_curve_is_continuous() {
        let below = super::srgb_to_linear(0.04045);
        let above = super::srgb_to_linear(0.040451);
        assert!((below - above).abs() < 1e-5);

        let below = super::linear_to_srgb(0.003_130_8);
        let above = super::linear_to_srgb(0.003_130_9);
        assert!((below - above).abs() < 1e-5);
    }

    #[test]
    fn srgb_roundtrip() -> Result<(), ImageError> {
        let data = vec![0.0f32, 0.01, 0.2, 0.5, 0.7, 0.99, 1.0, 0.03, 0.4];
        let mut image = Image::from_shape_vec(
            ImageShape {
                rows: 1,
                cols: 3,
                channels: 3,
            },
            data.clone(),
            CpuAllocator,
        )?;

        super::linear_from_srgb(&mut image)?;
        super::srgb_from_linear(&mut image)?;

        for (a, b) in image.row(0).unwrap().iter().zip(data.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-5);
        }

        Ok(())
    }

    #[test]
    fn srgb_invalid_channels() -> Result<(), ImageError> {
        let mut image = Image::<f32>::new(
            ImageShape {
                rows: 2,
                cols: 2,
                channels: 1,
            },
            CpuAllocator,
        )?;
        let result = super::linear_from_srgb(&mut image);
        assert!(matches!(result, Err(ImageError::InvalidChannels(1, 3))));

        Ok(())
    }
}
