use crate::rendering::image::ImageId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("{relative_path} is not available locally and needs to be downloaded")]
    DownloadNeeded { relative_path: String },
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to decode {path}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Image {0} is not known to the cache (anymore)")]
    UnknownImage(ImageId),
}
