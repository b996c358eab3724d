use super::*;

pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                tracing::debug!(attempt = i + 1, error = %format!("{:#}", err), "{} failed", label);
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

impl ApiClient {
    pub(super) fn request(&self, url: &str) -> reqwest::blocking::RequestBuilder {
        let req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        match self.config.token.as_deref() {
            Some(token) if !token.is_empty() => req.header("X-Authentication", token),
            _ => req,
        }
    }

    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            anyhow::bail!("unauthorized (token invalid/expired; pass --token or set PE_TOKEN)");
        }
        if resp.status() == reqwest::StatusCode::FORBIDDEN {
            anyhow::bail!("forbidden (token lacks permission to view deploy status)");
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }
}
