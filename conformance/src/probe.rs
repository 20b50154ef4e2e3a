//! Reachability probes.
//!
//! A probe is a single GET with a bounded timeout. HTTP 200 is reachable;
//! any other status, transport error or timeout is unreachable. Probes are
//! never retried and share no connection pool.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::ProbeError;

/// Result of one probe: the HTTP status code, or why there was none.
pub type ProbeOutcome = std::result::Result<u16, ProbeError>;

/// Classifies URLs as live or broken.
pub trait Reachability {
    /// Issues one request and reports what came back.
    fn probe(&self, url: &str) -> ProbeOutcome;

    /// True only for HTTP 200.
    fn is_reachable(&self, url: &str) -> bool {
        matches!(self.probe(url), Ok(200))
    }
}

/// Renders a probe outcome for report messages: `HTTP 404`, `timed out`.
pub fn describe(outcome: &ProbeOutcome) -> String {
    match outcome {
        Ok(code) => format!("HTTP {}", code),
        Err(e) => e.to_string(),
    }
}

/// Blocking HTTP probe backed by `reqwest`.
pub struct HttpProbe {
    client: reqwest::blocking::Client,
}

impl HttpProbe {
    /// Builds a probe with the given timeout and identifying user agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent is not a valid header value or the
    /// TLS backend cannot be initialised.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(user_agent)
                .with_context(|| format!("Invalid user agent: {}", user_agent))?,
        );
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .pool_max_idle_per_host(0)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl Reachability for HttpProbe {
    fn probe(&self, url: &str) -> ProbeOutcome {
        let parsed = reqwest::Url::parse(url).map_err(|e| ProbeError::InvalidUrl(format!("{url}: {e}")))?;
        match self.client.get(parsed).send() {
            Ok(resp) => {
                let code = resp.status().as_u16();
                tracing::debug!(url, code, "probe");
                Ok(code)
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!(url, "probe timed out");
                Err(ProbeError::Timeout)
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe failed");
                Err(ProbeError::Transport(e.to_string()))
            }
        }
    }
}
