//! Service configuration: TOML file with environment overrides.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default upload cap, 10 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default access-token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Refresh-token lifetime in seconds (seven days).
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 3600;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Bind address for the HTTP listener.
    pub bind: SocketAddr,
    /// Directory uploaded media is written to.
    pub upload_dir: PathBuf,
    /// Upload size cap in bytes.
    pub max_upload_bytes: usize,
    /// HS256 secret for access tokens.
    pub jwt_secret: String,
    /// HS256 secret for refresh tokens.
    pub jwt_refresh_secret: String,
    /// Access-token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Attach error detail to 500 bodies. Leave off outside development.
    pub expose_errors: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: ([127, 0, 0, 1], 4000).into(),
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            jwt_secret: "change-me".to_string(),
            jwt_refresh_secret: "change-me-too".to_string(),
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
            expose_errors: false,
        }
    }
}

impl ApiConfig {
    /// Load from a TOML file, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                toml::from_str(&raw)?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Secrets come from the environment in deployments; the file only
    /// carries the dev defaults.
    fn apply_env(&mut self) {
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt_secret = secret;
        }
        if let Ok(secret) = std::env::var("JWT_REFRESH_SECRET") {
            self.jwt_refresh_secret = secret;
        }
        if let Ok(dir) = std::env::var("UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Ok(size) = std::env::var("MAX_FILE_SIZE") {
            if let Ok(bytes) = size.parse() {
                self.max_upload_bytes = bytes;
            }
        }
    }
}
