use raspix_image::{Image, ImageError, PixelAllocator};

use crate::parallel;

/// Threshold under which a pixel counts as black and saturation is zeroed.
const BLACK_EPS: f32 = 1e-5;

/// Convert an RGB image to HSV in place.
///
/// The input is assumed to have 3 channels in the order R, G, B with values
/// in the range [0, 1]. The output channels are:
///
/// * H: hue in degrees, in the range [0, 360).
/// * S: saturation in the range [0, 1].
/// * V: value in the range [0, 1].
///
/// Achromatic pixels report a hue of zero, and near-black pixels
/// (value below 1e-5) a saturation of zero.
///
/// Precondition: the image must have 3 channels.
///
/// # Example
///
/// ```
/// use raspix_image::{CpuAllocator, Image, ImageShape};
/// use raspix_imgproc::color::hsv_from_rgb;
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
/// hsv_from_rgb(&mut image).unwrap();
///
/// assert_eq!(image.row(0), Some([0.0f32, 1.0, 1.0].as_slice()));
/// ```
pub fn hsv_from_rgb<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    parallel::par_iter_rows_mut(img, |pixel| {
        let (r, g, b) = (pixel[0], pixel[1], pixel[2]);

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let chroma = max - min;

        let v = max;
        let s = if v < BLACK_EPS { 0.0 } else { chroma / v };
        let h = if chroma == 0.0 {
            0.0
        } else {
            super::hue_from_rgb(r, g, b, max, chroma)
        };

        pixel[0] = h;
        pixel[1] = s;
        pixel[2] = v;
    });

    Ok(())
}

/// Convert an HSV image to RGB in place.
///
/// The inverse of [`hsv_from_rgb`]; hue is taken in degrees.
///
/// Precondition: the image must have 3 channels in the order H, S, V.
pub fn rgb_from_hsv<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    parallel::par_iter_rows_mut(img, |pixel| {
        let (h, s, v) = (pixel[0], pixel[1], pixel[2]);

        let chroma = v * s;
        let x = super::hue_secondary(h, chroma);
        let m = v - chroma;

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
    fn hsv_from_rgb_known_values() -> Result<(), ImageError> {
        let image = Image::from_shape_vec(
            ImageShape {
                rows: 2,
                cols: 2,
                channels: 3,
            },
            vec![
                1.0f32, 0.0, 0.0, // red
                0.0, 0.0, 0.0, // black
                0.2, 0.4, 0.6, // steel blue
                0.5, 0.5, 0.5, // gray
            ],
            CpuAllocator,
        )?;

        let expected = [
            0.0f32, 1.0, 1.0, //
            0.0, 0.0, 0.0, //
            210.0, 0.6666667, 0.6, //
            0.0, 0.0, 0.5, //
        ];

        let mut hsv = image.clone();
        super::hsv_from_rgb(&mut hsv)?;

        for r in 0..hsv.rows() {
            for (a, b) in hsv.row(r).unwrap().iter().zip(expected[r * 6..].iter()) {
                assert!((a - b).powi(2) < 1e-6);
            }
        }

        Ok(())
    }

    #[test]
    fn hsv_near_black_has_zero_saturation() -> Result<(), ImageError> {
        let mut image = Image::from_shape_vec(
            ImageShape {
                rows: 1,
                cols: 1,
                channels: 3,
            },
            vec![1e-6f32, 5e-7, 0.0],
            CpuAllocator,
        )?;

        super::hsv_from_rgb(&mut image)?;

        assert_eq!(image.get([0, 0, 1]), Some(&0.0));

        Ok(())
    }

    #[test]
    fn rgb_from_hsv_primaries() -> Result<(), ImageError> {
        let mut image = Image::from_shape_vec(
            ImageShape {
                rows: 1,
                cols: 3,
                channels: 3,
            },
            vec![
                0.0f32, 1.0, 1.0, // red
                120.0, 1.0, 1.0, // green
                240.0, 1.0, 1.0, // blue
            ],
            CpuAllocator,
        )?;

        super::rgb_from_hsv(&mut image)?;

        let expected = [1.0f32, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
        for (a, b) in image.row(0).unwrap().iter().zip(expected.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }

        Ok(())
    }

    #[test]
    fn hsv_roundtrip() -> Result<(), ImageError> {
        let shape = ImageShape {
            rows: 4,
            cols: 8,
            channels: 3,
        };
        let mut rng = rand::rng();
        let data: Vec<f32> = (0..shape.numel()).map(|_| rng.random()).collect();
        let mut image = Image::from_shape_vec(shape, data.clone(), CpuAllocator)?;

        super::hsv_from_rgb(&mut image)?;
        super::rgb_from_hsv(&mut image)?;

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
    fn hsv_invalid_channels() -> Result<(), ImageError> {
        let mut image = Image::<f32>::new(
            ImageShape {
                rows: 2,
                cols: 2,
                channels: 1,
            },
            CpuAllocator,
        )?;
        let result = super::hsv_from_rgb(&mut image);
        assert!(matches!(result, Err(ImageError::InvalidChannels(1, 3))));

        Ok(())
    }
}
