use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 8170;

/// Where and how to reach the Code Manager status API.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,

    /// RBAC token; sent as `X-Authentication` when present and non-empty.
    pub token: Option<String>,

    /// PEM bundle of the CA that signed the server certificate.
    pub ca_cert: Option<PathBuf>,
}

impl ApiConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            token: None,
            ca_cert: None,
        }
    }

    pub fn status_url(&self) -> String {
        format!("https://{}:{}/code-manager/v1/deploys/status", self.host, self.port)
    }
}
