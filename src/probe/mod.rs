//! Site probing.
//!
//! A probe is exactly one HEAD request against the target with a hard
//! deadline. The request future is raced against `tokio::time::timeout`; when
//! the deadline wins the future is dropped, which aborts the request and
//! returns its connection. There are no retries.

mod headers;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use url::Url;

use crate::error_handling::{network_error_from_reqwest, ProbeError};

pub use headers::normalize_headers;

/// Raw facts gathered by a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Whether the requested URL used HTTPS
    pub https: bool,
    /// Status code of the final response (any code counts as a successful probe)
    pub status: u16,
    /// URL of the final response after redirects
    pub final_url: String,
    /// Response headers, lower-case names
    pub headers: BTreeMap<String, String>,
}

/// Something that can probe a site.
///
/// The scanner holds a `dyn SiteProber` so tests can substitute a prober that
/// never touches the network.
#[async_trait]
pub trait SiteProber: Send + Sync {
    /// Probes `url`, giving up after `timeout`.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl` if the scheme is not http or https (nothing is sent)
    /// - `Timeout` if no response arrived in time
    /// - `NetworkError` for DNS, connection, TLS and other transport failures
    async fn probe(&self, url: &Url, timeout: Duration) -> Result<ProbeOutcome, ProbeError>;
}

/// `SiteProber` backed by a shared `reqwest::Client`.
pub struct HttpProber {
    client: Arc<reqwest::Client>,
}

impl HttpProber {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        HttpProber { client }
    }
}

#[async_trait]
impl SiteProber for HttpProber {
    async fn probe(&self, url: &Url, timeout: Duration) -> Result<ProbeOutcome, ProbeError> {
        let https = match url.scheme() {
            "https" => true,
            "http" => false,
            _ => return Err(ProbeError::InvalidUrl(url.to_string())),
        };

        debug!("Probing {} (deadline {}s)", url, timeout.as_secs_f64());
        let request = self.client.head(url.clone()).send();

        let response = match tokio::time::timeout(timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                let err = network_error_from_reqwest(&e);
                debug!("Probe of {} failed: {}", url, err);
                return Err(err);
            }
            Err(_) => {
                debug!("Probe of {} cancelled after {:?}", url, timeout);
                return Err(ProbeError::Timeout(timeout));
            }
        };

        Ok(ProbeOutcome {
            https,
            status: response.status().as_u16(),
            final_url: response.url().to_string(),
            headers: normalize_headers(response.headers()),
        })
    }
}
