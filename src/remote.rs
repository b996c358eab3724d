use std::time::Duration;

use anyhow::{Context, Result};

use crate::model::ApiConfig;
use crate::snapshot::RawSnapshot;

mod http_client;
use self::http_client::with_retries;

const TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Blocking client for the Code Manager deploy status endpoint.
pub struct ApiClient {
    config: ApiConfig,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent("code-manager-dashboard")
            .timeout(TIMEOUT);
        if let Some(path) = &config.ca_cert {
            let pem = std::fs::read(path)
                .with_context(|| format!("read CA certificate {}", path.display()))?;
            let cert = reqwest::Certificate::from_pem(&pem)
                .with_context(|| format!("parse CA certificate {}", path.display()))?;
            builder = builder.add_root_certificate(cert);
        }
        let client = builder.build().context("build reqwest client")?;
        Ok(Self { config, client })
    }

    pub(crate) fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetches the raw body of the deploy status endpoint.
    pub fn fetch_status_json(&self) -> Result<Vec<u8>> {
        let url = self.config.status_url();
        tracing::debug!(%url, "fetching deploy status");
        with_retries("fetch deploy status", || {
            let resp = self
                .request(&url)
                .send()
                .with_context(|| format!("GET {}", url))?;
            let resp = self.ensure_ok(resp, "deploy status")?;
            let bytes = resp.bytes().context("read deploy status body")?;
            Ok(bytes.to_vec())
        })
    }

    pub fn fetch_snapshot(&self) -> Result<RawSnapshot> {
        let bytes = self.fetch_status_json()?;
        RawSnapshot::from_slice(&bytes).context("decode deploy status")
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;
