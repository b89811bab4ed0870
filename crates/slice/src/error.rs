//! Result and Error types for chgtools-slice

/// Type alias for `Result<T, slice::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
/// The error type for `chgtools-slice`
pub enum Error {
    /// Failure while sampling the underlying field
    #[error("failed to sample field")]
    FieldError(#[from] chgtools_field::Error),

    /// Plane geometry that can not produce an image
    #[error("invalid slice request: {0}")]
    InvalidRequest(String),

    /// Palette that can not map values to colours
    #[error("invalid palette: {0}")]
    InvalidPalette(String),
}
