use std::path::{Component, Path, PathBuf};

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use percent_encoding::percent_decode_str;
use tokio::{
    fs::{self, File, OpenOptions},
    io::AsyncWriteExt,
};
use tokio_util::io::ReaderStream;
use tracing::error;

use crate::error::ApiError;

/// Percent-decode a raw URI path. Paths that do not decode to UTF-8 are rejected.
pub fn decode_request_path(raw: &str) -> Result<String, ApiError> {
    percent_decode_str(raw)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .map_err(|_| ApiError::BadPath)
}

/// Map a decoded request path onto the uploads tree.
///
/// Only normal components are kept, so `..`, `.` and absolute prefixes can
/// never point outside `root`.
pub fn upload_path(root: &Path, request_path: &str) -> PathBuf {
    Path::new(request_path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}

pub async fn init_dirs(root: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(root).await?;

    Ok(())
}

/// Create (or truncate) the target of an upload, along with missing parents.
pub async fn open_for_upload(path: &Path) -> Result<File, ApiError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .await?;

    Ok(file)
}

pub async fn stream_to_file<S, E>(mut stream: S, file: &mut File) -> Result<u64, ApiError>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::error::Error + Send + Sync + 'static,
{
    let mut total: u64 = 0;

    while let Some(next) = stream.next().await {
        let chunk: Bytes = next.map_err(|e| {
            error!("body error: {e}");
            ApiError::Any(anyhow::anyhow!("bad request body"))
        })?;

        total += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }

    file.flush().await?;

    Ok(total)
}

/// Stream a file with a fixed read buffer; each item holds at most `chunk_size` bytes.
pub fn chunked_reader(file: File, chunk_size: usize) -> ReaderStream<File> {
    ReaderStream::with_capacity(file, chunk_size)
}
