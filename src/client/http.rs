//! reqwest-backed transport for the n-gram service.

use super::{RawResponse, Transport};
use crate::error::ClientError;
use crate::protocol::QueryRequest;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Posts JSON requests to a single fixed endpoint.
pub struct HttpTransport {
    endpoint: String,
    client: Client,
}

impl HttpTransport {
    /// Create a transport for `endpoint` with a whole-request timeout.
    ///
    /// Proxies are ignored: the service normally lives on localhost.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.clone(),
                source,
            })?;

        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: &QueryRequest) -> Result<RawResponse, ClientError> {
        let transport_err = |source: reqwest::Error| ClientError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport_err)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_err)?;

        Ok(RawResponse {
            status,
            body: body.to_vec(),
        })
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept one connection, answer it with `status` and `body`, and return
    /// the raw request text that was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/api/v1/grams", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];

            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if request_complete(&received) {
                    break;
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(reply.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();

            String::from_utf8_lossy(&received).into_owned()
        });

        (url, handle)
    }

    fn request_complete(received: &[u8]) -> bool {
        let text = String::from_utf8_lossy(received);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        received.len() >= header_end + 4 + content_length
    }

    fn request() -> QueryRequest {
        QueryRequest {
            corpus: "monkeyracer".to_string(),
            ngram: 1,
            count: 50,
            noshift: false,
            nospace: true,
            regex: None,
        }
    }

    #[tokio::test]
    async fn test_post_json_sends_json_body() {
        let (url, server) = serve_once("200 OK", r#"[["e", 0.12]]"#).await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let raw = transport.post_json(&request()).await.unwrap();
        assert_eq!(raw.status, 200);
        assert_eq!(raw.body, br#"[["e", 0.12]]"#);

        let received = server.await.unwrap();
        assert!(received.starts_with("POST /api/v1/grams HTTP/1.1\r\n"));
        assert!(received
            .to_ascii_lowercase()
            .contains("content-type: application/json"));
        let (_, body) = received.split_once("\r\n\r\n").unwrap();
        let sent: QueryRequest = serde_json::from_str(body).unwrap();
        assert_eq!(sent, request());
    }

    #[tokio::test]
    async fn test_post_json_returns_error_status_body() {
        let (url, server) =
            serve_once("400 Bad Request", r#"{"message":"Undefined corpus nope"}"#).await;
        let transport = HttpTransport::new(url, Duration::from_secs(5)).unwrap();

        let raw = transport.post_json(&request()).await.unwrap();
        assert_eq!(raw.status, 400);
        assert_eq!(raw.body, br#"{"message":"Undefined corpus nope"}"#);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_post_json_connection_refused_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport =
            HttpTransport::new(format!("http://{}/api/v1/grams", addr), Duration::from_secs(5))
                .unwrap();
        let err = transport.post_json(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
    }

    #[test]
    fn test_endpoint_is_kept() {
        let transport =
            HttpTransport::new("http://localhost:3500/api/v1/grams", Duration::from_secs(1))
                .unwrap();
        assert_eq!(transport.endpoint(), "http://localhost:3500/api/v1/grams");
    }
}
