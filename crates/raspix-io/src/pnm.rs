use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use raspix_image::{CpuAllocator, Image, ImageShape, PixelAllocator};

use crate::error::IoError;

/// Read a PGM image (`P2` ascii or `P5` binary) with a single channel.
///
/// Sample values are stored as-is; the declared maxval must not exceed 255.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
///
/// # Returns
///
/// A grayscale image with a single channel.
pub fn read_image_pgm(file_path: impl AsRef<Path>) -> Result<Image<u8>, IoError> {
    read_pnm_impl(file_path.as_ref(), "pgm", 1)
}

/// Read a PPM image (`P3` ascii or `P6` binary) with three channels.
///
/// Sample values are stored as-is; the declared maxval must not exceed 255.
///
/// # Arguments
///
/// * `file_path` - The path to the PPM file.
///
/// # Returns
///
/// An RGB image with three channels.
pub fn read_image_ppm(file_path: impl AsRef<Path>) -> Result<Image<u8>, IoError> {
    read_pnm_impl(file_path.as_ref(), "ppm", 3)
}

/// Write a single channel image as a binary PGM (`P5`) file.
///
/// Rows are written through their content slices, so the alignment padding
/// never reaches the file.
///
/// # Arguments
///
/// * `file_path` - The path to the PGM file.
/// * `image` - The grayscale image to write.
pub fn write_image_pgm<A: PixelAllocator>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, A>,
) -> Result<(), IoError> {
    if image.channels() != 1 {
        return Err(IoError::UnsupportedChannelCount(image.channels()));
    }
    write_pnm_impl(file_path.as_ref(), image, b"P5")
}

/// Write a three channel image as a binary PPM (`P6`) file.
///
/// # Arguments
///
/// * `file_path` - The path to the PPM file.
/// * `image` - The RGB image to write.
pub fn write_image_ppm<A: PixelAllocator>(
    file_path: impl AsRef<Path>,
    image: &Image<u8, A>,
) -> Result<(), IoError> {
    if image.channels() != 3 {
        return Err(IoError::UnsupportedChannelCount(image.channels()));
    }
    write_pnm_impl(file_path.as_ref(), image, b"P6")
}

/// Advance past whitespace and `#` comments, then return the next token.
fn next_token<'a>(data: &'a [u8], pos: &mut usize) -> Result<&'a [u8], IoError> {
    loop {
        while *pos < data.len() && data[*pos].is_ascii_whitespace() {
            *pos += 1;
        }
        if *pos < data.len() && data[*pos] == b'#' {
            while *pos < data.len() && data[*pos] != b'\n' {
                *pos += 1;
            }
        } else {
            break;
        }
    }

    let start = *pos;
    while *pos < data.len() && !data[*pos].is_ascii_whitespace() {
        *pos += 1;
    }
    if start == *pos {
        return Err(IoError::PnmDecodeError(
            "unexpected end of header".to_string(),
        ));
    }

    Ok(&data[start..*pos])
}

fn parse_field(token: &[u8]) -> Result<usize, IoError> {
    std::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            IoError::PnmDecodeError(format!(
                "invalid header field `{}`",
                String::from_utf8_lossy(token)
            ))
        })
}

fn read_pnm_impl(file_path: &Path, extension: &str, channels: usize) -> Result<Image<u8>, IoError> {
    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    if let Some(ext) = file_path.extension() {
        if ext.to_ascii_lowercase() != extension {
            return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
        }
    } else {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let data = std::fs::read(file_path)?;
    let mut pos = 0;

    let magic = next_token(&data, &mut pos)?;
    let binary = match (magic, channels) {
        (b"P2", 1) | (b"P3", 3) => false,
        (b"P5", 1) | (b"P6", 3) => true,
        _ => {
            return Err(IoError::PnmDecodeError(format!(
                "unexpected magic number `{}`",
                String::from_utf8_lossy(magic)
            )))
        }
    };

    let cols = parse_field(next_token(&data, &mut pos)?)?;
    let rows = parse_field(next_token(&data, &mut pos)?)?;
    let maxval = parse_field(next_token(&data, &mut pos)?)?;
    if maxval == 0 {
        return Err(IoError::PnmDecodeError("maxval must not be zero".to_string()));
    }
    if maxval > 255 {
        return Err(IoError::UnsupportedMaxval(maxval));
    }

    let shape = ImageShape {
        rows,
        cols,
        channels,
    };
    let num = shape.numel();
    let mut pixels = vec![0u8; num];

    if binary {
        // a single whitespace byte separates the header from the samples
        if pos >= data.len() || !data[pos].is_ascii_whitespace() {
            return Err(IoError::PnmDecodeError(
                "missing header terminator".to_string(),
            ));
        }
        pos += 1;
        if data.len() < pos + num {
            return Err(IoError::PnmDecodeError(format!(
                "truncated pixel data: expected {} bytes, found {}",
                num,
                data.len() - pos
            )));
        }
        pixels.copy_from_slice(&data[pos..pos + num]);
    } else {
        for px in pixels.iter_mut() {
            let v = parse_field(next_token(&data, &mut pos)?)?;
            if v > maxval {
                return Err(IoError::PnmDecodeError(format!(
                    "sample value {v} exceeds maxval {maxval}"
                )));
            }
            *px = v as u8;
        }
    }

    log::debug!(
        "read {} ({} x {} x {})",
        file_path.display(),
        rows,
        cols,
        channels
    );

    Ok(Image::from_shape_vec(shape, pixels, CpuAllocator)?)
}

fn write_pnm_impl<A: PixelAllocator>(
    file_path: &Path,
    image: &Image<u8, A>,
    magic: &[u8],
) -> Result<(), IoError> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(magic)?;
    writer.write_all(format!("\n{} {}\n255\n", image.cols(), image.rows()).as_bytes())?;

    for r in 0..image.rows() {
        // SAFETY: the loop bound keeps r below image.rows()
        let row = unsafe { image.row_unchecked(r) };
        writer.write_all(row)?;
    }
    writer.flush()?;

    log::debug!(
        "wrote {} ({} x {} x {})",
        file_path.display(),
        image.rows(),
        image.cols(),
        image.channels()
    );

    Ok(())
}
