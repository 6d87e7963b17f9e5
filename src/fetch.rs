//! Transport and pacing collaborators.
//!
//! The core never talks to the network directly; it goes through the
//! narrow [`Fetch`] trait, paced by the [`Delay`] trait. The production
//! implementations here wrap a blocking reqwest client and
//! `std::thread::sleep`; tests substitute counting mocks.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::{Error, Result};
use crate::options::Options;

/// HTTP fetch collaborator.
///
/// Implementations fail with a transport error on network failure or on
/// any HTTP status >= 400. They never retry; pacing and retry policy
/// belong to the caller.
pub trait Fetch {
    /// Fetch a URL and return the raw response body.
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>>;
}

/// Sleep collaborator used for request throttling.
pub trait Delay {
    /// Block for the given duration.
    fn sleep(&self, duration: Duration);
}

/// `Delay` implementation backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Blocking HTTP fetcher.
///
/// Carries the configured user agent and bounded timeouts; the connect
/// timeout is shorter than the overall timeout so a dead mirror fails
/// fast instead of stalling for the full request duration.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher from the configured timeouts and user agent.
    pub fn new(options: &Options) -> Result<Self> {
        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .timeout(options.request_timeout)
            .connect_timeout(options.connect_timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;

        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        debug!(url, "requesting");

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request.send().map_err(|e| Error::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(|e| Error::Transport {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(body.to_vec())
    }
}
