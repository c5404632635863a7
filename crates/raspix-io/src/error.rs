/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open or manipulate the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the PNM image.
    #[error("Failed to decode the pnm image. {0}")]
    PnmDecodeError(String),

    /// The maxval declared in the header is out of the supported range.
    #[error("Unsupported maxval: {0}")]
    UnsupportedMaxval(usize),

    /// The image channel count is not supported by the operation.
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannelCount(usize),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] raspix_image::ImageError),
}
