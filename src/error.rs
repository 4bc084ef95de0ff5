//error kinds for a failed extraction, every variant names the blob it was looking for

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Firmware entry '{name}' not found in container")]
    NotFound { name: String },

    #[error("Size mismatch for '{name}': expected {expected}, got {actual}")]
    SizeMismatch { name: String, expected: usize, actual: usize },

    //the offset/size pair itself runs past the end of the container
    #[error("Metadata for '{name}' at {position:#x} is out of bounds (container is {len:#x} bytes)")]
    Bounds { name: String, position: usize, len: usize },

    #[error("Unable to decode metadata: {0}")]
    Decode(#[from] binrw::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn not_found(name: &[u8]) -> Self {
        Self::NotFound { name: String::from_utf8_lossy(name).into_owned() }
    }
}
