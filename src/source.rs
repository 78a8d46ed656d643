//! Where the consumer gets container bytes from.
//!
//! Containers are addressed by name only. A [`Source`] turns a name into
//! bytes or a `Fetch` error; it never retries.

use std::future::Future;
use std::path::PathBuf;

use reqwest::{Client, Url};
use tracing::debug;

use crate::error::{Error, Result};

pub trait Source {
    /// Retrieves the container called `name`.
    fn fetch(&self, name: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Fetches containers with HTTP GET relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    /// # Errors
    ///
    /// `Fetch` if `base` is not an absolute URL.
    pub fn new(base: &str) -> Result<Self> {
        let base = if base.ends_with('/') { base.to_owned() } else { format!("{base}/") };
        let base = Url::parse(&base).map_err(|e| Error::fetch(&base, e))?;

        Ok(Self { client: Client::new(), base })
    }

    pub fn url(&self, name: &str) -> Result<Url> {
        self.base.join(name).map_err(|e| Error::fetch(name, e))
    }
}

impl Source for HttpSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let url = self.url(name)?;
        debug!(%url, "GET");

        let response = self.client.get(url.clone()).send().await.map_err(|e| Error::fetch(url.as_str(), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::fetch(url.as_str(), status));
        }

        let body = response.bytes().await.map_err(|e| Error::fetch(url.as_str(), e))?;
        Ok(body.to_vec())
    }
}

/// Reads containers from a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Source for DirSource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        debug!(path = %path.display(), "read");

        tokio::fs::read(&path).await.map_err(|e| Error::fetch(path.display().to_string(), e))
    }
}

/// A source chosen at runtime from a `--source` argument.
#[derive(Debug, Clone)]
pub enum AnySource {
    Http(HttpSource),
    Dir(DirSource),
}

impl AnySource {
    /// `http://` and `https://` locations are fetched over the network;
    /// anything else is a local directory.
    pub fn parse(location: &str) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            Ok(Self::Http(HttpSource::new(location)?))
        } else {
            Ok(Self::Dir(DirSource::new(location)))
        }
    }
}

impl Source for AnySource {
    async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            Self::Http(source) => source.fetch(name).await,
            Self::Dir(source) => source.fetch(name).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serves a single canned HTTP response and returns the base URL.
    async fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).await.unwrap();
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{addr}/")
    }

    #[test]
    fn test_http_url_join() {
        let source = HttpSource::new("https://example.org/docs").unwrap();
        assert_eq!(source.url("check.txt.enc").unwrap().as_str(), "https://example.org/docs/check.txt.enc");

        let source = HttpSource::new("https://example.org/docs/").unwrap();
        assert_eq!(source.url("a.pdf.enc").unwrap().as_str(), "https://example.org/docs/a.pdf.enc");
    }

    #[test]
    fn test_parse() {
        assert!(matches!(AnySource::parse("http://localhost:8080").unwrap(), AnySource::Http(_)));
        assert!(matches!(AnySource::parse("./public").unwrap(), AnySource::Dir(_)));
    }

    #[tokio::test]
    async fn test_dir_fetch() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.enc"), b"bytes").unwrap();

        let source = DirSource::new(dir.path());
        assert_eq!(source.fetch("a.enc").await.unwrap(), b"bytes");
        assert!(matches!(source.fetch("missing.enc").await, Err(Error::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_http_unreachable_is_fetch_error() {
        let source = HttpSource::new("http://127.0.0.1:9").unwrap();
        assert!(matches!(source.fetch("check.txt.enc").await, Err(Error::Fetch { .. })));
    }

    #[tokio::test]
    async fn test_http_not_found_is_fetch_error() {
        let base = serve_once("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let source = HttpSource::new(&base).unwrap();

        let Err(Error::Fetch { location, reason }) = source.fetch("check.txt.enc").await else {
            panic!("expected a fetch error");
        };
        assert!(location.ends_with("/check.txt.enc"));
        assert!(reason.contains("404"));
    }

    #[tokio::test]
    async fn test_http_ok_returns_body() {
        let base = serve_once("HTTP/1.1 200 OK\r\nContent-Length: 5\r\nConnection: close\r\n\r\nbytes").await;
        let source = HttpSource::new(&base).unwrap();

        assert_eq!(source.fetch("a.pdf.enc").await.unwrap(), b"bytes");
    }
}
