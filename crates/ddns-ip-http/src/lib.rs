// # HTTP IP Resolver
//
// This crate provides the public IP resolver for the DDNS updater.
//
// ## Architecture
//
// Issues one GET to an IP echo service (e.g. checkip.amazonaws.com,
// icanhazip.com) per `resolve()` call and parses the plain-text body as an
// IPv4 address. No caching, no polling, no retries: a failed lookup fails
// the run, and the scheduler tries again next cycle.

use async_trait::async_trait;
use ddns_core::{Error, IpAddress, IpEchoConfig, PublicIpResolver, Result};
use std::time::Duration;

/// Default timeout for echo requests (10 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Public IP resolver backed by an HTTP echo service
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a new resolver with the default timeout
    ///
    /// # Parameters
    ///
    /// - `url`: URL to fetch the IP from (e.g., "http://checkip.amazonaws.com/")
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a new resolver with a custom request timeout
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &IpEchoConfig) -> Self {
        Self::with_timeout(
            config.url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// The echo URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PublicIpResolver for HttpIpResolver {
    async fn resolve(&self) -> Result<IpAddress> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::resolution(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::resolution(format!(
                "IP echo service returned HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::resolution(format!("Failed to read response: {}", e)))?;

        parse_echo_body(&body)
    }

    fn resolver_name(&self) -> &str {
        &self.url
    }
}

/// Parse an echo service body into an address
fn parse_echo_body(body: &str) -> Result<IpAddress> {
    body.parse::<IpAddress>().map_err(|_| {
        Error::resolution(format!(
            "Invalid IPv4 address from echo service: {:?}",
            body.trim()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve every connection with a fixed status line and body
    async fn echo_server(status: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/", addr), hits)
    }

    #[test]
    fn test_parse_echo_body() {
        assert_eq!(
            parse_echo_body("203.0.113.5\n").unwrap().to_string(),
            "203.0.113.5"
        );
        assert!(matches!(
            parse_echo_body("not-an-ip"),
            Err(Error::Resolution(_))
        ));
        assert!(matches!(
            parse_echo_body("2001:db8::1"),
            Err(Error::Resolution(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let resolver = HttpIpResolver::from_config(&IpEchoConfig::default());
        assert_eq!(resolver.url(), "http://checkip.amazonaws.com/");
        assert_eq!(resolver.resolver_name(), "http://checkip.amazonaws.com/");
    }

    #[tokio::test]
    async fn test_resolve_trims_body() {
        let (url, hits) = echo_server("200 OK", "203.0.113.9\n").await;
        let resolver = HttpIpResolver::new(url);

        let ip = resolver.resolve().await.unwrap();

        assert_eq!(ip.to_string(), "203.0.113.9");
        assert_eq!(hits.load(Ordering::SeqCst), 1, "Exactly one request per resolve");
    }

    #[tokio::test]
    async fn test_resolve_rejects_garbage() {
        let (url, _) = echo_server("200 OK", "not-an-ip").await;
        let resolver = HttpIpResolver::new(url);

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
        assert!(err.to_string().contains("not-an-ip"));
    }

    #[tokio::test]
    async fn test_resolve_rejects_error_status() {
        let (url, hits) = echo_server("503 Service Unavailable", "203.0.113.9").await;
        let resolver = HttpIpResolver::new(url);

        let err = resolver.resolve().await.unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
        assert_eq!(hits.load(Ordering::SeqCst), 1, "No retries on failure");
    }

    #[tokio::test]
    async fn test_resolve_connection_refused() {
        // Bind then drop to get a port nothing listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let resolver =
            HttpIpResolver::with_timeout(format!("http://{}/", addr), Duration::from_secs(2));
        assert!(matches!(
            resolver.resolve().await,
            Err(Error::Resolution(_))
        ));
    }
}
