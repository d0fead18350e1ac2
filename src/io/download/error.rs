use crate::io::common::error::AssetError;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal outcomes of processing a completed download. These are meant to reach the top level
/// error handler, the queue has already dropped the offending request when returning them.
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error("Download error: {status_text} ('{relative_path}' > '{}')", .full_path.display())]
    DownloadFailed {
        status_text: String,
        relative_path: String,
        full_path: PathBuf,
    },
    #[error("Failed to reload '{relative_path}' after downloading it")]
    Reconstruct {
        relative_path: String,
        #[source]
        source: AssetError,
    },
}
