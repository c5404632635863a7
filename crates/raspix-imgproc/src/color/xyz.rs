use std::sync::OnceLock;

use glam::{DMat3, DVec3, Mat3, Vec3};
use raspix_image::{Image, ImageError, PixelAllocator};

use crate::parallel;

/// Normalization coefficient of the CIE 1931 matrix, the (1, 0) entry.
const CIE_NORM: f64 = 0.17697;

/// The row-normalized CIE 1931 RGB-to-XYZ matrix and its inverse.
///
/// Both are derived once in f64, the inverse by matrix inversion, and kept
/// as f32 for the per-pixel work.
fn conversion_matrices() -> &'static (Mat3, Mat3) {
    static MATRICES: OnceLock<(Mat3, Mat3)> = OnceLock::new();
    MATRICES.get_or_init(|| {
        let fwd = DMat3::from_cols(
            DVec3::new(0.49, 0.17697, 0.0),
            DVec3::new(0.31, 0.81240, 0.01),
            DVec3::new(0.20, 0.01063, 0.99),
        )
        .mul_scalar(1.0 / CIE_NORM);
        (fwd.as_mat3(), fwd.inverse().as_mat3())
    })
}

/// Convert an RGB image to CIE XYZ in place.
///
/// Each pixel is multiplied by the CIE 1931 color matching matrix,
/// normalized so that equal-energy white keeps Y equal to the channel sum.
///
/// Precondition: the image must have 3 channels in the order R, G, B.
pub fn xyz_from_rgb<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    let (fwd, _) = *conversion_matrices();
    parallel::par_iter_rows_mut(img, move |pixel| {
        let xyz = fwd * Vec3::new(pixel[0], pixel[1], pixel[2]);
        pixel[0] = xyz.x;
        pixel[1] = xyz.y;
        pixel[2] = xyz.z;
    });

    Ok(())
}

/// Convert a CIE XYZ image to RGB in place.
///
/// The inverse of [`xyz_from_rgb`].
///
/// Precondition: the image must have 3 channels in the order X, Y, Z.
pub fn rgb_from_xyz<A: PixelAllocator>(img: &mut Image<f32, A>) -> Result<(), ImageError> {
    if img.channels() != 3 {
        return Err(ImageError::InvalidChannels(img.channels(), 3));
    }

    let (_, inv) = *conversion_matrices();
    parallel::par_iter_rows_mut(img, move |pixel| {
        let rgb = inv * Vec3::new(pixel[0], pixel[1], pixel[2]);
        pixel[0] = rgb.x;
        pixel[1] = rgb.y;
        pixel[2] = rgb.z;
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Mat3;
    use raspix_image::{CpuAllocator, Image, ImageError, ImageShape};

    #[test]
    fn xyz_matrices_are_inverse() {
        let (fwd, inv) = *super::conversion_matrices();
        let product = fwd * inv;
        for (a, b) in product
            .to_cols_array()
            .iter()
            .zip(Mat3::IDENTITY.to_cols_array().iter())
        {
            assert_relative_eq!(a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn xyz_white_point() -> Result<(), ImageError> {
        let mut image = Image::from_shape_val(
            ImageShape {
                rows: 1,
                cols: 1,
                channels: 3,
            },
            1.0f32,
            CpuAllocator,
        )?;

        super::xyz_from_rgb(&mut image)?;

        // every row of the normalized matrix sums to 1 / 0.17697
        let k = (1.0 / super::CIE_NORM) as f32;
        assert_relative_eq!(*image.get([0, 0, 0]).unwrap(), k, epsilon = 1e-4);
        assert_relative_eq!(*image.get([0, 0, 1]).unwrap(), k, epsilon = 1e-4);
        assert_relative_eq!(*image.get([0, 0, 2]).unwrap(), k, epsilon = 1e-4);

        Ok(())
    }

    #[test]
    fn xyz_roundtrip() -> Result<(), ImageError> {
        let data = vec![0.2f32, 0.4, 0.6, 1.0, 0.0, 0.0, 0.3, 0.3, 0.3];
        let mut image = Image::from_shape_vec(
            ImageShape {
                rows: 3,
                cols: 1,
                channels: 3,
            },
            data.clone(),
            CpuAllocator,
        )?;

        super::xyz_from_rgb(&mut image)?;
        super::rgb_from_xyz(&mut image)?;

        for r in 0..image.rows() {
            for (a, b) in image.row(r).unwrap().iter().zip(data[r * 3..].iter()) {
                assert_relative_eq!(a, b, epsilon = 1e-5);
            }
        }

        Ok(())
    }

    #[test]
    fn xyz_invalid_channels() -> Result<(), ImageError> {
        let mut image = Image::<f32>::new(
            ImageShape {
                rows: 1,
                cols: 1,
                channels: 4,
            },
            CpuAllocator,
        )?;
        let result = super::xyz_from_rgb(&mut image);
        assert!(matches!(result, Err(ImageError::InvalidChannels(4, 3))));

        Ok(())
    }
}
