use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::session::SessionContext;

/// Network access used by the crawlers.
///
/// Implementations carry the session headers; callers only name the URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// GET a rendered page and return its body as text
    async fn get_text(&self, url: &str) -> Result<String, CrawlError>;

    /// POST a JSON body and decode the JSON answer
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, CrawlError>;
}

/// [`Fetcher`] backed by a `reqwest` client
pub struct HttpFetcher {
    client: Client,
    session: SessionContext,
}

impl HttpFetcher {
    /// Builds the client with the configured connect and read timeouts.
    ///
    /// The read timeout bounds each wait for data, not the whole transfer.
    pub fn new(config: &CrawlerConfig, session: SessionContext) -> Result<Self, CrawlError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| CrawlError::Config(format!("HTTP client build failed: {e}")))?;

        Ok(Self { client, session })
    }
}

fn request_error(url: &str, source: reqwest::Error) -> CrawlError {
    CrawlError::Request {
        url: url.to_string(),
        source,
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, CrawlError> {
        ::log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .headers(self.session.page_headers())
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| request_error(url, e))?;
        // The site always serves UTF-8 but does not always say so
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, CrawlError> {
        ::log::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .headers(self.session.api_headers())
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CrawlError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| request_error(url, e))?;
        serde_json::from_slice(&bytes).map_err(|source| CrawlError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    use super::*;

    fn fetcher(connect_secs: u64, read_secs: u64) -> HttpFetcher {
        let config = CrawlerConfig {
            connect_timeout_secs: connect_secs,
            read_timeout_secs: read_secs,
            ..CrawlerConfig::default()
        };
        let session = SessionContext::new(&config, None);
        HttpFetcher::new(&config, session).unwrap()
    }

    /// Reads one request head and returns it lowercased
    async fn read_head(socket: &mut TcpStream) -> String {
        let mut head = Vec::new();
        let mut buf = [0_u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        String::from_utf8_lossy(&head).to_ascii_lowercase()
    }

    #[tokio::test]
    async fn test_slow_body_within_read_timeout_completes() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_head(&mut socket).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 6\r\n\r\n")
                .await
                .unwrap();
            // 6 x 400 ms outlasts connect + read, but no single wait reaches 1 s
            for byte in b"steady" {
                tokio::time::sleep(Duration::from_millis(400)).await;
                socket.write_all(&[*byte]).await.unwrap();
                socket.flush().await.unwrap();
            }
        });

        let body = fetcher(1, 1).get_text(&url).await.unwrap();
        assert_eq!(body, "steady");
    }

    #[tokio::test]
    async fn test_stalled_body_hits_read_timeout() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let (done_tx, done_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_head(&mut socket).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nhalf")
                .await
                .unwrap();
            let _ = done_rx.await;
        });

        let err = fetcher(1, 1).get_text(&url).await.unwrap_err();
        assert!(matches!(err, CrawlError::Request { .. }), "{err}");
        let _ = done_tx.send(());
    }

    #[tokio::test]
    async fn test_deflate_body_is_decoded() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let (head_tx, head_rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            head_tx.send(read_head(&mut socket).await).unwrap();
            // zlib stream with one stored block holding "hello"
            let body: &[u8] = &[
                0x78, 0x01, 0x01, 0x05, 0x00, 0xfa, 0xff, b'h', b'e', b'l', b'l', b'o', 0x06,
                0x2c, 0x02, 0x15,
            ];
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Encoding: deflate\r\nContent-Length: {}\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(body).await.unwrap();
        });

        let body = fetcher(5, 5).get_text(&url).await.unwrap();
        assert_eq!(body, "hello");

        let head = head_rx.await.unwrap();
        let accept_encoding = head
            .lines()
            .find(|line| line.starts_with("accept-encoding:"))
            .unwrap_or_default();
        assert!(accept_encoding.contains("gzip"), "{head}");
        assert!(accept_encoding.contains("deflate"), "{head}");
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_head(&mut socket).await;
            socket
                .write_all(b"HTTP/1.1 403 Forbidden\r\nContent-Length: 0\r\n\r\n")
                .await
                .unwrap();
        });

        let err = fetcher(5, 5).get_text(&url).await.unwrap_err();
        assert!(matches!(err, CrawlError::Status { status: 403, .. }), "{err}");
    }
}
