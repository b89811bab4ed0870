//! Result and Error types for chgtools-plot

/// Type alias for `Result<T, plot::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `chgtools-plot`
pub enum Error {
    /// Underlying file I/O error
    #[error("failure in file I/O")]
    IOError(#[from] std::io::Error),

    /// Failure to encode the image
    #[error("failed to encode png")]
    PngError(#[from] png::EncodingError),

    /// Failure while reading or sampling the field
    #[error(transparent)]
    FieldError(#[from] chgtools_field::Error),

    /// Failure while slicing, colouring, or finding isolines
    #[error(transparent)]
    SliceError(#[from] chgtools_slice::Error),

    /// Arguments that can not be turned into an image
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
