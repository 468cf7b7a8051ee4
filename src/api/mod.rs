//! Per-resource operations.
//!
//! Each facade borrows the [`QalpuchClient`](crate::QalpuchClient) and maps
//! one endpoint onto one dispatcher call. Errors are passed through unchanged.

mod auth;
mod files;
mod predefined_tasks;
mod tasks;
mod users;
mod workers;

pub use auth::Auth;
pub use files::Files;
pub use predefined_tasks::PredefinedTasks;
pub use tasks::Tasks;
pub use users::Users;
pub use workers::Workers;

use crate::error::{QalpuchError, Result};
use reqwest::multipart;
use std::path::Path;
use tokio::fs::File;
use tokio_util::codec::{BytesCodec, FramedRead};

/// Builds a multipart `file` part holding in-memory bytes.
pub(crate) fn bytes_part(file_name: &str, contents: Vec<u8>) -> Result<multipart::Part> {
    let mime_type = mime_guess::from_path(file_name).first_or_octet_stream();
    let part = multipart::Part::bytes(contents).file_name(file_name.to_string());
    with_content_type(part, mime_type.as_ref())
}

/// Builds a multipart `file` part that streams a local file from disk.
pub(crate) async fn path_part(path: &Path) -> Result<multipart::Part> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Could not determine file name of {}", path.display()),
            )
        })?
        .to_string();
    let mime_type = mime_guess::from_path(path).first_or_octet_stream();

    let file = File::open(path).await?;
    let length = file.metadata().await?.len();
    let stream = FramedRead::new(file, BytesCodec::new());
    let body = reqwest::Body::wrap_stream(stream);

    let part = multipart::Part::stream_with_length(body, length).file_name(file_name);
    with_content_type(part, mime_type.as_ref())
}

fn with_content_type(part: multipart::Part, mime_type: &str) -> Result<multipart::Part> {
    part.mime_str(mime_type).map_err(QalpuchError::InvalidContentType)
}
