//! Error types for Stash

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Reason an upload was rejected by constraint validation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintViolation {
    #[error("Image width is below the minimum")]
    WidthTooSmall,

    #[error("Image width is above the maximum")]
    WidthTooLarge,

    #[error("Image height is below the minimum")]
    HeightTooSmall,

    #[error("Image height is above the maximum")]
    HeightTooLarge,

    #[error("Image file is larger than allowed")]
    FileSizeTooLarge,

    #[error("File is larger than allowed")]
    FileSizeTooBig,
}

impl ConstraintViolation {
    pub fn code(&self) -> &'static str {
        match self {
            ConstraintViolation::WidthTooSmall => "WIDTH_TOO_SMALL",
            ConstraintViolation::WidthTooLarge => "WIDTH_TOO_LARGE",
            ConstraintViolation::HeightTooSmall => "HEIGHT_TOO_SMALL",
            ConstraintViolation::HeightTooLarge => "HEIGHT_TOO_LARGE",
            ConstraintViolation::FileSizeTooLarge => "FILE_SIZE_TOO_LARGE",
            ConstraintViolation::FileSizeTooBig => "FILE_SIZE_TOO_BIG",
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    // Validation Errors
    #[error("Upload rejected: {0}")]
    Constraint(#[from] ConstraintViolation),

    #[error("Missing or unparsable extra arguments")]
    NoExtraArgs,

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid object URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Could not read image dimensions: {0}")]
    ImageDecode(String),

    // Object Errors
    #[error("The specified key does not exist: {0}")]
    NoSuchKey(String),

    // Configuration Errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Storage client errors pass through untouched
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Wrap a storage client error without altering its message or source chain.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transport(Box::new(err))
    }

    pub fn code(&self) -> &'static str {
        match self {
            Error::Constraint(violation) => violation.code(),
            Error::NoExtraArgs => "NO_EXTRA_ARGS",
            Error::InvalidRange(_) => "INVALID_RANGE",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::InvalidArgument(_) => "INVALID_ARGUMENT",
            Error::ImageDecode(_) => "IMAGE_DECODE_FAILED",
            Error::NoSuchKey(_) => "NO_SUCH_KEY",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Transport(_) => "TRANSPORT_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            Error::Constraint(_)
            | Error::NoExtraArgs
            | Error::InvalidUrl(_)
            | Error::InvalidArgument(_)
            | Error::ImageDecode(_) => 400,

            Error::NoSuchKey(_) => 404,

            Error::InvalidRange(_) => 416,

            Error::Transport(_) => 502,

            _ => 500,
        }
    }

    /// The constraint that rejected an upload, if that is what this error is.
    pub fn violation(&self) -> Option<ConstraintViolation> {
        match self {
            Error::Constraint(violation) => Some(*violation),
            _ => None,
        }
    }
}
