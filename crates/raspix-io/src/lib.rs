#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access, decoding failures,
/// and format-specific errors.
pub mod error;

/// High-level image reading and writing functions.
///
/// Dispatches on the file extension to the right codec.
/// See [`functional::read_image_auto`] for automatic format detection.
pub mod functional;

/// PNM image encoding and decoding.
///
/// Read PGM and PPM images in their ascii and binary encodings and write
/// them back in the binary encoding.
pub mod pnm;

/// Zero-copy surface handoff for display targets.
///
/// Describes the padded image buffer with the geometry and channel masks
/// a blit consumer expects. See [`surface::SurfaceDescriptor`].
pub mod surface;
