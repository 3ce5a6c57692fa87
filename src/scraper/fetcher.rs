//! Page fetching over HTTP.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::rate_limiter::RateLimiter;
use crate::config::FetchConfig;
use crate::error::Result;

/// Fetches the raw bytes of a page.
pub trait PageFetcher: Send + Sync {
    /// GET `url` with `params` appended as query string.
    fn fetch(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

impl<F: PageFetcher> PageFetcher for Arc<F> {
    fn fetch(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>>> + Send {
        (**self).fetch(url, params)
    }
}

/// HTTP fetcher using reqwest, one request per second by default.
///
/// Clones share the client and the rate-limit clock. Independent
/// instances keep independent clocks.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(Duration::from_millis(config.min_interval_ms)),
        })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, params: &[(&str, &str)]) -> Result<Vec<u8>> {
        let body = self
            .limiter
            .run(|| async {
                let response = self
                    .client
                    .get(url)
                    .query(params)
                    .send()
                    .await?
                    .error_for_status()?;
                response.bytes().await
            })
            .await?;

        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }
}
