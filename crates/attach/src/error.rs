use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported target type: {0}")]
    UnsupportedTargetType(String),

    #[error("Empty crop region")]
    EmptyCropRegion,

    #[error("No file is open in the crop dialog")]
    NoPendingCrop,

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type AttachResult<T> = Result<T, AttachError>;
