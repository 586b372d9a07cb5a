use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;

use crate::config::ProbeConfig;
use crate::error::EngineError;
use crate::outcome::Outcome;

/// Issues one GET and classifies whatever happens.
///
/// The seam keeps the probe loop independent of reqwest so tests can script
/// arbitrary outcome sequences.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `url` once. Never fails: every failure mode is folded into
    /// the returned [`Outcome`].
    async fn fetch(&self, url: &str) -> Outcome;
}

/// [`Transport`] backed by the shared reqwest client.
pub struct HttpTransport {
    client: Client,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(client: Client, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &str) -> Outcome {
        let response = match self
            .client
            .get(url)
            .timeout(self.request_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(error) => return Outcome::transport(describe(&error), 0),
        };

        let status = response.status();
        let mut body = response.bytes_stream();
        let mut received = 0u64;
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(chunk) => received += chunk.len() as u64,
                // body died mid-drain: keep the partial byte count
                Err(error) => return Outcome::transport(describe(&error), received),
            }
        }

        Outcome::classify(status, received)
    }
}

/// Short description of a request failure for the last-message field.
fn describe(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        return "timed out".to_owned();
    }
    let mut cause: &dyn std::error::Error = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    if error.is_connect() {
        format!("connect error: {cause}")
    } else {
        cause.to_string()
    }
}

/// Builds the shared client every prober hands its requests to.
pub(crate) fn build_client(config: &ProbeConfig) -> Result<Client, EngineError> {
    let redirects = if config.follow_redirects {
        reqwest::redirect::Policy::limited(10)
    } else {
        reqwest::redirect::Policy::none()
    };

    Client::builder()
        .user_agent(config.user_agent.clone())
        .redirect(redirects)
        .pool_max_idle_per_host(config.pool_max_idle_per_host)
        .pool_idle_timeout(config.pool_idle_timeout)
        .build()
        .map_err(|source| EngineError::ClientBuild { source })
}
