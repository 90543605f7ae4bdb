//! Streams finished media to disk.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use reqwest::{Response, StatusCode};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::azure::client::DOWNLOAD_TIMEOUT;
use crate::azure::{AzureClient, Route};
use crate::error::MediaError;

const CHUNK_SIZE: usize = 8192;

/// Where finished media lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A URL handed out by the provider; fetched without credentials.
    Direct(String),
    /// A content-retrieval endpoint on the resource; fetched with the API key.
    Content { url: String, route: Route },
}

impl MediaSource {
    pub fn url(&self) -> &str {
        match self {
            MediaSource::Direct(url) => url,
            MediaSource::Content { url, .. } => url,
        }
    }
}

/// Download `source` into `dest`, returning the absolute path written.
pub async fn download(
    client: &AzureClient,
    source: &MediaSource,
    dest: &Path,
) -> Result<PathBuf, MediaError> {
    let resp = match source {
        MediaSource::Direct(url) => client.get_anonymous(url, DOWNLOAD_TIMEOUT).await?,
        MediaSource::Content { url, route } => {
            client.get(url, Some(*route), DOWNLOAD_TIMEOUT).await?
        }
    };

    if resp.status() != StatusCode::OK {
        return Err(MediaError::Download {
            url: source.url().to_string(),
            status: resp.status().as_u16(),
        });
    }

    let written = stream_to_file(resp, dest).await?;
    debug!(url = source.url(), path = %dest.display(), bytes = written, "download complete");
    Ok(tokio::fs::canonicalize(dest).await?)
}

/// Create `dest`'s parent directories if needed.
pub async fn prepare_parent(dest: &Path) -> Result<(), MediaError> {
    if let Some(parent) = dest.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Sibling file the body is streamed into before it is renamed to `dest`.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().map(OsString::from).unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

async fn stream_to_file(resp: Response, dest: &Path) -> Result<u64, MediaError> {
    prepare_parent(dest).await?;
    let part = partial_path(dest);
    let result = write_body(resp, &part).await;
    finish_partial(result, &part, dest).await
}

async fn write_body(mut resp: Response, part: &Path) -> Result<u64, MediaError> {
    let mut out = BufWriter::with_capacity(CHUNK_SIZE, File::create(part).await?);
    let mut written = 0u64;
    while let Some(chunk) = resp.chunk().await? {
        out.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    out.flush().await?;
    Ok(written)
}

/// Move a complete download into place, or discard a truncated one.
async fn finish_partial(
    result: Result<u64, MediaError>,
    part: &Path,
    dest: &Path,
) -> Result<u64, MediaError> {
    match result {
        Ok(written) => {
            tokio::fs::rename(part, dest).await?;
            Ok(written)
        }
        Err(err) => {
            if let Err(e) = tokio::fs::remove_file(part).await {
                debug!(path = %part.display(), error = %e, "could not remove partial download");
            }
            Err(err)
        }
    }
}
