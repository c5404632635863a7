use raspix_image::{Image, ImageError, PixelAllocator};

use crate::parallel;

/// Convert an RGB image to HSL in place.
///
/// The input is assumed to have 3 channels in the order R, G, B with values
/// in the range [0, 1]. The output channels are:
///
/// * H: hue in degrees, in the range [0, 360).
/// * S: saturation in the range [0, 1].
/// * L: lightness in the range [0, 1].
///
/// Achromatic pixels (equal channels) report a hue and saturation of zero.
///
/// Precondition: the image must have 3 channels.
///
/// # Example
///
/// ```
/// use raspix_image::{CpuAllocator, Image, ImageShape};
/// use raspix_imgproc::color::hsl_from_rgb;
///
/// let mut image = Image::from_shape_vec(
///     ImageShape {
///         rows: 1,
///         cols: 1,
///         channels: 3,
///     },
///     vec![1.0f32, 0.0, 0.0],
///     CpuAllocator,
/// )
/// .unwrap();
///
/// hsl_from_rgb(&mut image).unwrap();
///
/// assert_eq!(image.row(0), Some([0.0f32, 1.0, 0.5].as_slice()));
/// ```
pub fn hsl_from_rgb<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    parallel::par_iter_rows_mut(img, |pixel| {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;
        let l = 0.5 * (max + min);

        let (h, s) = if chroma == 0.0 {
            (0.0, 0.0)
        } else {
            let s = if l < 0.5 {
                chroma / (max + min)
            } else {
                chroma / (2.0 - (max + min))
            };
            (super::hue_from_rgb(r, g, b, max, chroma), s)
        };

        pixel[0] = h;
        pixel[1] = s;
        pixel[2] = l;
    });

    Ok(())
}

/// Convert an HSL image to RGB in place.
///
/// The inverse of [`hsl_from_rgb`]; hue is taken in degrees.
///
/// Precondition: the image must have 3 channels in the order H, S, L.
pub fn rgb_from_hsl<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    parallel::par_iter_rows_mut(img, |pixel| {
        let (h, s, l) = (pixel[0], pixel[1], pixel[2]);

        let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = super::hue_secondary(h, chroma);
        let m = l - 0.5 * chroma;

        let (r, g, b) = super::rgb_from_hue_sector(h, chroma, x);
        pixel[0] = r + m;
        pixel[1] = g + m;
        pixel[2] = b + m;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::Rng;
    use raspix_image::{CpuAllocator, Image, ImageError, ImageShape};

    #[test]
    fn hsl_from_rgb_known_values() -> Result<(), ImageError> {
        let image = Image::from_shape_vec(
            ImageShape {
                rows: 2,
                cols: 2,
                channels: 3,
            },
            vec![
                1.0f32, 0.0, 0.0, // red
                0.5, 0.5, 0.5, // gray
                0.2, 0.4, 0.6, // steel blue
                0.6, 0.5, 0.2, // olive
            ],
            CpuAllocator,
        )?;

        let expected = [
            0.0f32, 1.0, 0.5, //
            0.0, 0.0, 0.5, //
            210.0, 0.5, 0.4, //
            45.0, 0.5, 0.4, //
        ];

        let mut hsl = image.clone();
        super::hsl_from_rgb(&mut hsl)?;

        for r in 0..hsl.rows() {
            for (a, b) in hsl.row(r).unwrap().iter().zip(expected[r * 6..].iter()) {
                assert!((a - b).powi(2) < 1e-6);
            }
        }

        Ok(())
    }

    #[test]
    fn rgb_from_hsl_red() -> Result<(), ImageError> {
        let mut image = Image::from_shape_vec(
            ImageShape {
                rows: 1,
                cols: 1,
                channels: 3,
            },
            vec![0.0f32, 1.0, 0.5],
            CpuAllocator,
        )?;

        super::rgb_from_hsl(&mut image)?;

        assert_relative_eq!(*image.get([0, 0, 0]).unwrap(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(*image.get([0, 0, 1]).unwrap(), 0.0, epsilon = 1e-6);
        assert_relative_eq!(*image.get([0, 0, 2]).unwrap(), 0.0, epsilon = 1e-6);

        Ok(())
    }

    #[test]
    fn hsl_roundtrip() -> Result<(), ImageError> {
        let shape = ImageShape {
            rows: 4,
            cols: 8,
            channels: 3,
        };
        let mut rng = rand::rng();
        let data: Vec<f32> = (0..shape.numel()).map(|_| rng.random()).collect();
        let mut image = Image::from_shape_vec(shape, data.clone(), CpuAllocator)?;

        super::hsl_from_rgb(&mut image)?;
        super::rgb_from_hsl(&mut image)?;

        for r in 0..shape.rows {
            for (a, b) in image
                .row(r)
                .unwrap()
                .iter()
                .zip(data[r * shape.cols * 3..].iter())
            {
                assert_relative_eq!(a, b, epsilon = 1e-5);
            }
        }

        Ok(())
    }

    #[test]
    fn hsl_invalid_channels() -> Result<(), ImageError> {
        let mut image = Image::<f32>::new(
            ImageShape {
                rows: 2,
                cols: 2,
                channels: 1,
            },
            CpuAllocator,
        )?;
        let result = super::rgb_from_hsl(&mut image);
        assert!(matches!(result, Err(ImageError::InvalidChannels(1, 3))));

        Ok(())
    }
}
