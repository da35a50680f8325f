// components/media_downloader/src/cover.rs
use crate::types::DownloadError;
use crate::utils::is_url;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A cover image ready to embed. Downloaded covers live in a temp file that
/// is deleted when this value is dropped.
#[derive(Debug)]
pub enum CoverArt {
    Local(PathBuf),
    Downloaded(NamedTempFile),
}

impl CoverArt {
    pub fn path(&self) -> &Path {
        match self {
            CoverArt::Local(path) => path,
            CoverArt::Downloaded(file) => file.path(),
        }
    }
}

/// Turn a cover source into a file on disk.
///
/// Blank sources yield `None`. Local paths must exist and are used in place;
/// URLs are fetched into a temp file.
pub async fn resolve_cover(
    client: &reqwest::Client,
    source: Option<&str>,
) -> Result<Option<CoverArt>, DownloadError> {
    let Some(source) = source.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    if !is_url(source) {
        let path = PathBuf::from(source);
        tokio::fs::metadata(&path)
            .await
            .map_err(|e| DownloadError::CoverNotFound {
                path: path.clone(),
                source: e,
            })?;
        return Ok(Some(CoverArt::Local(path)));
    }

    download_cover(client, source).await.map(Some)
}

async fn download_cover(client: &reqwest::Client, url: &str) -> Result<CoverArt, DownloadError> {
    let download_error = |source| DownloadError::CoverDownload {
        url: url.to_string(),
        source,
    };

    tracing::info!(url, "downloading cover art");
    let response = client.get(url).send().await.map_err(download_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::CoverStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = response.bytes().await.map_err(download_error)?;

    let file = tempfile::Builder::new()
        .prefix("cover-")
        .suffix(".jpg")
        .tempfile()
        .map_err(|e| DownloadError::io("create temp cover", e))?;
    tokio::fs::write(file.path(), &bytes)
        .await
        .map_err(|e| DownloadError::io("write temp cover", e))?;

    Ok(CoverArt::Downloaded(file))
}

#[cfg(test)]
pub mod test_server {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve `body` with `status` to every request; returns the base URL
    pub async fn serve(status: u16, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = Vec::new();
                let mut buffer = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buffer).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buffer[..n]),
                    }
                }
                let head = format!(
                    "HTTP/1.1 {} Status\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status,
                    body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(body).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", address)
    }

    /// Loopback requests must not go through an environment proxy
    pub fn client() -> reqwest::Client {
        reqwest::Client::builder().no_proxy().build().unwrap()
    }
}
