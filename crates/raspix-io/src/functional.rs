use std::path::Path;

use raspix_image::{Image, PixelAllocator};

use crate::error::IoError;
use crate::pnm::{read_image_pgm, read_image_ppm, write_image_pgm, write_image_ppm};

/// Read an image from the given file path, dispatching on the file extension.
///
/// The supported formats are PGM (single channel) and PPM (three channels).
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image with the channel count implied by the format.
///
/// # Example
///
/// ```no_run
/// use raspix_io::functional::read_image_auto;
///
/// let image = read_image_auto("tests/data/pattern.ppm").unwrap();
/// assert_eq!(image.channels(), 3);
/// ```
pub fn read_image_auto(file_path: impl AsRef<Path>) -> Result<Image<u8>, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("pgm") => read_image_pgm(file_path),
        Some("ppm") => read_image_ppm(file_path),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}

/// Write an image to the given file path, dispatching on the file extension.
///
/// Single channel images go to PGM files and three channel images to PPM
/// files; any other pairing is rejected.
///
/// # Arguments
///
/// * `file_path` - The path where the image will be written.
/// * `image` - The image to write.
pub fn write_image_auto<A: PixelAllocator>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, A>,
) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());

    match extension.as_deref() {
        Some("pgm") if image.channels() == 1 => write_image_pgm(file_path, image),
        Some("ppm") if image.channels() == 3 => write_image_ppm(file_path, image),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}
