use aws_config::BehaviorVersion;
use aws_sdk_s3 as s3;
use lambda_http::Error;
use std::env;
use std::time::Duration;

/// Content type every presigned upload URL is bound to.
pub const UPLOAD_CONTENT_TYPE: &str = "image/jpeg";

pub const DEFAULT_RAW_BUCKET: &str = "src-bucket99";
pub const DEFAULT_RESIZED_BUCKET: &str = "dest-bucket99";
pub const DEFAULT_UPLOAD_TTL: u64 = 300;

/// Largest width or height the resize endpoint accepts, in pixels.
pub const MAX_DIMENSION: u32 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bucket clients upload originals into.
    pub raw_bucket: String,

    /// Bucket resized copies are written to.
    pub resized_bucket: String,

    /// Time-to-live in seconds for the s3 pre-signed put url.
    pub upload_ttl: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            raw_bucket: DEFAULT_RAW_BUCKET.to_string(),
            resized_bucket: DEFAULT_RESIZED_BUCKET.to_string(),
            upload_ttl: DEFAULT_UPLOAD_TTL,
        }
    }
}

impl Config {
    pub fn upload_expiry(&self) -> Duration {
        Duration::from_secs(self.upload_ttl)
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let upload_ttl = match lookup("UPLOAD_TTL") {
            Some(ttl) => ttl
                .parse::<u64>()
                .map_err(|e| format!("failed to parse UPLOAD_TTL={ttl}: {e}"))?,
            None => defaults.upload_ttl,
        };

        Ok(Config {
            raw_bucket: lookup("RAW_BUCKET").unwrap_or(defaults.raw_bucket),
            resized_bucket: lookup("RESIZED_BUCKET").unwrap_or(defaults.resized_bucket),
            upload_ttl,
        })
    }
}

pub async fn get_s3_client() -> s3::Client {
    let cfg = aws_config::load_defaults(BehaviorVersion::latest()).await;

    s3::Client::new(&cfg)
}

/// Reads the service config from the deployment environment, falling back to
/// the built-in buckets and ttl.
pub fn get_service_cfg() -> Result<Config, Error> {
    let config = Config::from_lookup(|name| env::var(name).ok())?;

    tracing::event!(tracing::Level::DEBUG, "{:?}", config);

    Ok(config)
}
