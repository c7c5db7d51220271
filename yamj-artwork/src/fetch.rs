//! Reading artwork bytes and image headers from URLs or local files.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::time::Duration;

use crate::error::FetchError;

/// Most bytes read from the start of a remote image to find its size.
pub const HEADER_READ_LIMIT: usize = 256 * 1024;

/// Where a candidate image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtworkLocation {
    Remote(String),
    Local(PathBuf),
}

impl ArtworkLocation {
    /// `http://` and `https://` are remote, anything else is a local path.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let lower = value.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ArtworkLocation::Remote(value.to_string())
        } else {
            let path = value.strip_prefix("file://").unwrap_or(value);
            ArtworkLocation::Local(PathBuf::from(path))
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, ArtworkLocation::Local(_))
    }
}

impl fmt::Display for ArtworkLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtworkLocation::Remote(url) => f.write_str(url),
            ArtworkLocation::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Materializes artwork. Implementations carry their own timeout.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    async fn fetch(&self, location: &ArtworkLocation) -> Result<Vec<u8>, FetchError>;

    /// Read only as much of the image as needed to learn its dimensions.
    async fn read_dimensions(&self, location: &ArtworkLocation) -> Result<(u32, u32), FetchError>;
}

/// Width and height from the leading bytes of an image, if they suffice.
pub fn dimensions_from_prefix(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// HTTP and filesystem fetcher. One instance is shared by a whole batch.
pub struct HttpFetcher {
    http: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("yamj/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, timeout })
    }

    async fn bounded<T>(
        &self,
        location: &ArtworkLocation,
        fut: impl Future<Output = Result<T, FetchError>>,
    ) -> Result<T, FetchError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| FetchError::Timeout {
                location: location.to_string(),
                seconds: self.timeout.as_secs(),
            })?
    }

    async fn get(&self, url: &str, range: Option<usize>) -> Result<reqwest::Response, FetchError> {
        let mut req = self.http.get(url);
        if let Some(limit) = range {
            req = req.header(reqwest::header::RANGE, format!("bytes=0-{}", limit - 1));
        }
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    async fn remote_dimensions(&self, url: &str) -> Result<(u32, u32), FetchError> {
        let mut resp = self.get(url, Some(HEADER_READ_LIMIT)).await?;
        let mut buf = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            buf.extend_from_slice(&chunk);
            if let Some(dims) = dimensions_from_prefix(&buf) {
                log::debug!("Read size of {} after {} bytes: {}x{}", url, buf.len(), dims.0, dims.1);
                return Ok(dims);
            }
            if buf.len() >= HEADER_READ_LIMIT {
                break;
            }
        }
        Err(FetchError::Unreadable(url.to_string()))
    }
}

async fn read_local(path: &Path) -> Result<Vec<u8>, FetchError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || std::fs::read(&owned))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
        .map_err(|source| FetchError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn local_dimensions(path: &Path) -> Result<(u32, u32), FetchError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || image::image_dimensions(&owned))
        .await
        .map_err(|e| FetchError::Task(e.to_string()))?
        .map_err(|_| FetchError::Unreadable(path.display().to_string()))
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, location: &ArtworkLocation) -> Result<Vec<u8>, FetchError> {
        self.bounded(location, async {
            match location {
                ArtworkLocation::Remote(url) => {
                    let resp = self.get(url, None).await?;
                    Ok(resp.bytes().await?.to_vec())
                }
                ArtworkLocation::Local(path) => read_local(path).await,
            }
        })
        .await
    }

    async fn read_dimensions(&self, location: &ArtworkLocation) -> Result<(u32, u32), FetchError> {
        self.bounded(location, async {
            match location {
                ArtworkLocation::Remote(url) => self.remote_dimensions(url).await,
                ArtworkLocation::Local(path) => local_dimensions(path).await,
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(w, h));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_parse_location() {
        assert_eq!(
            ArtworkLocation::parse("https://img.example/p.jpg"),
            ArtworkLocation::Remote("https://img.example/p.jpg".to_string())
        );
        assert_eq!(
            ArtworkLocation::parse("HTTP://img.example/p.jpg"),
            ArtworkLocation::Remote("HTTP://img.example/p.jpg".to_string())
        );
        assert_eq!(
            ArtworkLocation::parse("/movies/Heat.jpg"),
            ArtworkLocation::Local(PathBuf::from("/movies/Heat.jpg"))
        );
        assert_eq!(
            ArtworkLocation::parse("file:///movies/Heat.jpg"),
            ArtworkLocation::Local(PathBuf::from("/movies/Heat.jpg"))
        );
    }

    #[test]
    fn test_dimensions_from_header_prefix() {
        let bytes = png_bytes(300, 200);
        assert_eq!(dimensions_from_prefix(&bytes), Some((300, 200)));
        assert_eq!(dimensions_from_prefix(&bytes[..8]), None);
        assert_eq!(dimensions_from_prefix(b"plain text"), None);
    }

    #[tokio::test]
    async fn test_local_fetch_and_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.png");
        std::fs::write(&path, png_bytes(40, 60)).unwrap();

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let loc = ArtworkLocation::Local(path);
        assert_eq!(fetcher.read_dimensions(&loc).await.unwrap(), (40, 60));
        assert!(!fetcher.fetch(&loc).await.unwrap().is_empty());
    }

    /// Answer one HTTP request with `status` and the first `sent` bytes of
    /// `body`, then hold the connection open. Yields the request head.
    async fn serve_once(status: &'static str, body: Vec<u8>, sent: usize) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/poster.png", listener.local_addr().unwrap());
        let (head_tx, head_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut byte = [0u8; 1];
            while !head.ends_with(b"\r\n\r\n") {
                if sock.read(&mut byte).await.unwrap() == 0 {
                    break;
                }
                head.push(byte[0]);
            }
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: image/png\r\nContent-Length: {}\r\n\r\n",
                status,
                body.len()
            );
            sock.write_all(reply.as_bytes()).await.unwrap();
            sock.write_all(&body[..sent]).await.unwrap();
            sock.flush().await.unwrap();
            let _ = head_tx.send(String::from_utf8_lossy(&head).into_owned());
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        (url, head_rx)
    }

    #[tokio::test]
    async fn test_remote_dimensions_stop_at_header() {
        let body = png_bytes(500, 750);
        // The tail of the file never arrives; waiting for it would time out.
        let sent = body.len() - 4;
        let (url, head) = serve_once("206 Partial Content", body, sent).await;

        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let dims = fetcher
            .read_dimensions(&ArtworkLocation::Remote(url))
            .await
            .unwrap();
        assert_eq!(dims, (500, 750));

        let head = head.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /poster.png"));
        assert!(head.contains(&format!("range: bytes=0-{}", HEADER_READ_LIMIT - 1)));
    }

    #[tokio::test]
    async fn test_remote_dimensions_error_status() {
        let (url, _head) = serve_once("404 Not Found", Vec::new(), 0).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let err = fetcher
            .read_dimensions(&ArtworkLocation::Remote(url))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_remote_dimensions_reject_non_image() {
        let (url, _head) = serve_once("200 OK", b"<html>not an image</html>".to_vec(), 25).await;
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher
            .read_dimensions(&ArtworkLocation::Remote(url))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Unreadable(_) | FetchError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_local_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();
        let loc = ArtworkLocation::Local(dir.path().join("nope.jpg"));
        assert!(matches!(
            fetcher.fetch(&loc).await,
            Err(FetchError::Io { .. })
        ));
        assert!(fetcher.read_dimensions(&loc).await.is_err());
    }
}
