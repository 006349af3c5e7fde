//! HTTP(S) virtual-host prober.
//!
//! Connects to the target IP and names the candidate hostname only in the
//! `Host` header, so the answer reflects how the server at that address
//! treats the name regardless of what DNS says. Redirects are never
//! followed and certificates are never checked.

use super::protocol::{schemes_for, Scheme};
use super::title::{extract_title, is_html};
use super::traits::{CollisionResult, Prober};
use crate::error::{ProbeError, ProbeResult};
use crate::types::ProbeTarget;
use async_trait::async_trait;
use reqwest::header::HOST;
use reqwest::{redirect, Client, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Desktop browser user agent sent with every probe.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP prober.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Timeout for one request, connect through body.
    pub request_timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProbeConfig {
    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Prober issuing real HTTP(S) requests.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Build a prober with its shared HTTP client.
    pub fn new(config: &ProbeConfig) -> ProbeResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .timeout(config.request_timeout)
            .danger_accept_invalid_certs(true)
            .no_proxy()
            .build()
            .map_err(|e| ProbeError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    /// Issue one request for a target over a given scheme.
    async fn attempt(&self, target: &ProbeTarget, scheme: Scheme) -> ProbeResult<CollisionResult> {
        let url = format!("{}://{}", scheme, target.socket_addr());

        let response = self
            .client
            .get(&url)
            .header(HOST, target.hostname.as_str())
            .send()
            .await?;

        let status = response.status();
        let html = is_html(response.headers());
        let body = response.bytes().await?;

        let title = if status == StatusCode::OK && html {
            extract_title(&body)
        } else {
            String::new()
        };

        Ok(CollisionResult {
            url,
            domain: target.hostname.clone(),
            ip: target.ip,
            port: target.port,
            title,
            status_code: status.as_u16(),
            content_length: body.len() as u64,
        })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &ProbeTarget) -> Option<CollisionResult> {
        for &scheme in schemes_for(target.port) {
            match self.attempt(target, scheme).await {
                Ok(result) => {
                    debug!(
                        probe = %target,
                        %scheme,
                        status = result.status_code,
                        "received response"
                    );
                    return Some(result);
                }
                Err(e) => {
                    debug!(probe = %target, %scheme, error = %e, "attempt failed");
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Connections accepted and request heads received by a canned server.
    #[derive(Default)]
    struct Seen {
        connections: AtomicUsize,
        requests: Mutex<Vec<String>>,
    }

    /// Serve `response` (or nothing, if `None`) to every connection.
    async fn canned_server(response: Option<String>) -> (SocketAddr, Arc<Seen>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Seen::default());
        let seen_server = Arc::clone(&seen);

        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                seen_server.connections.fetch_add(1, Ordering::SeqCst);

                let Some(response) = response.clone() else {
                    drop(stream);
                    continue;
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                seen_server
                    .requests
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&head).to_string());

                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (addr, seen)
    }

    fn http_response(status: &str, content_type: &str, extra: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
            status,
            content_type,
            body.len(),
            extra,
            body
        )
    }

    fn prober() -> HttpProber {
        HttpProber::new(&ProbeConfig::default().with_timeout(Duration::from_secs(3))).unwrap()
    }

    fn target_for(hostname: &str, addr: SocketAddr) -> ProbeTarget {
        ProbeTarget::new(hostname, addr.ip(), Port::new(addr.port()).unwrap())
    }

    #[tokio::test]
    async fn test_probe_extracts_title_over_http() {
        let body = "<html><head><title>Admin</title></head></html>";
        let (addr, seen) = canned_server(Some(http_response("200 OK", "text/html", "", body))).await;
        let target = target_for("admin.example.com", addr);

        let result = prober().probe(&target).await.expect("expected a result");

        assert_eq!(result.title, "Admin");
        assert_eq!(result.status_code, 200);
        assert_eq!(result.content_length, body.len() as u64);
        assert_eq!(result.url, format!("http://{}", addr));
        assert!(result.matches(&target));

        // http answered, so https was never tried
        assert_eq!(seen.connections.load(Ordering::SeqCst), 1);

        let requests = seen.requests.lock().unwrap();
        let head = requests[0].to_lowercase();
        assert!(head.starts_with("get / http/1.1"));
        assert!(head.contains("host: admin.example.com\r\n"));
        assert!(head.contains("user-agent: mozilla/5.0"));
    }

    #[tokio::test]
    async fn test_probe_does_not_follow_redirects() {
        let (addr, seen) = canned_server(Some(http_response(
            "302 Found",
            "text/html",
            "Location: http://127.0.0.1:1/elsewhere\r\n",
            "<title>Moved</title>",
        )))
        .await;

        let result = prober().probe(&target_for("old.example.com", addr)).await.unwrap();

        assert_eq!(result.status_code, 302);
        // Titles are only taken from 200 responses
        assert_eq!(result.title, "");
        assert_eq!(result.content_length, 20);
        assert_eq!(seen.connections.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_probe_non_html_has_no_title() {
        let body = "{\"title\":\"not html\"}";
        let (addr, _seen) = canned_server(Some(http_response("200 OK", "application/json", "", body))).await;

        let result = prober().probe(&target_for("api.example.com", addr)).await.unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(result.title, "");
        assert_eq!(result.content_length, body.len() as u64);
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_https_then_gives_up() {
        // Accepts and hangs up: both schemes fail at the transport level
        let (addr, seen) = canned_server(None).await;

        let result = prober().probe(&target_for("dead.example.com", addr)).await;

        assert!(result.is_none());
        assert!(seen.connections.load(Ordering::SeqCst) >= 2);
    }

    /// TLS-only server answering every completed handshake with `response`.
    ///
    /// Plaintext requests fail the handshake and are dropped.
    async fn tls_server(response: String) -> (SocketAddr, Arc<Seen>) {
        use tokio_rustls::rustls::crypto::ring;
        use tokio_rustls::rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
        use tokio_rustls::rustls::ServerConfig;
        use tokio_rustls::TlsAcceptor;

        let certified = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        let cert = certified.cert.der().clone();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));

        let config = ServerConfig::builder_with_provider(Arc::new(ring::default_provider()))
            .with_safe_default_protocol_versions()
            .unwrap()
            .with_no_client_auth()
            .with_single_cert(vec![cert], key)
            .unwrap();
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Arc::new(Seen::default());
        let seen_server = Arc::clone(&seen);

        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    return;
                };
                seen_server.connections.fetch_add(1, Ordering::SeqCst);

                let Ok(mut stream) = acceptor.accept(stream).await else {
                    continue;
                };

                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                seen_server
                    .requests
                    .lock()
                    .unwrap()
                    .push(String::from_utf8_lossy(&head).to_string());

                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (addr, seen)
    }

    #[tokio::test]
    async fn test_probe_falls_back_to_https_and_succeeds() {
        let body = "<html><title>Secure Portal</title></html>";
        let (addr, seen) = tls_server(http_response("200 OK", "text/html", "", body)).await;
        let target = target_for("secure.example.com", addr);

        let result = prober().probe(&target).await.expect("https should answer");

        assert_eq!(result.url, format!("https://{}", addr));
        assert!(result.url.starts_with("https://"));
        assert_eq!(result.status_code, 200);
        assert_eq!(result.title, "Secure Portal");
        assert_eq!(result.content_length, body.len() as u64);
        assert!(result.matches(&target));

        // http was tried first and rejected, https answered once
        assert!(seen.connections.load(Ordering::SeqCst) >= 2);
        let requests = seen.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .to_lowercase()
            .contains("host: secure.example.com\r\n"));
    }

    #[tokio::test]
    async fn test_probe_https_status_comes_from_tls_response() {
        let (addr, _seen) =
            tls_server(http_response("401 Unauthorized", "text/html", "", "<title>Login</title>")).await;

        let result = prober()
            .probe(&target_for("vpn.example.com", addr))
            .await
            .unwrap();

        assert!(result.url.starts_with("https://"));
        assert_eq!(result.status_code, 401);
        assert_eq!(result.title, "");
    }

    #[tokio::test]
    async fn test_probe_refused_returns_none() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = prober().probe(&target_for("nobody.example.com", addr)).await;
        assert!(result.is_none());
    }
}
