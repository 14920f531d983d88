// src/fetch/mod.rs

pub mod cache;
pub mod urls;

use anyhow::{Context, Result};
use futures::{stream::FuturesUnordered, StreamExt};
use reqwest::{Client, StatusCode};
use std::{
    collections::BTreeMap,
    env,
    fs::File,
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::time::{sleep, timeout, Instant};
use tracing::{error, info, instrument, warn};
use url::Url;

pub const USER_AGENT: &str = concat!("cslscraper/", env!("CARGO_PKG_VERSION"));

pub const ENV_FETCH_DEADLINE_SECS: &str = "CSL_FETCH_DEADLINE_SECS";
pub const ENV_FETCH_MAX_RETRIES: &str = "CSL_FETCH_MAX_RETRIES";
pub const ENV_CACHE_MAX_AGE_SECS: &str = "CSL_CACHE_MAX_AGE_SECS";

/// Retrieves remote files into a directory and hands back open handles.
///
/// `files` maps logical name → source URL. Either every name resolves to a
/// readable file or the call fails, naming the file that broke.
pub trait Fetcher {
    fn get_files(
        &self,
        dir: &Path,
        files: &BTreeMap<String, Url>,
    ) -> impl Future<Output = Result<BTreeMap<String, File>>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Upper bound for a whole `get_files` call, retries included.
    pub deadline: Duration,
    pub max_retries: u32,
    pub initial_backoff: Duration,
    /// Cached copies older than this are downloaded again. `None` keeps them forever.
    pub max_age: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(60),
            deadline: Duration::from_secs(600),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_age: Some(Duration::from_secs(24 * 3600)),
        }
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a whole number, got {:?}", key, v)),
        _ => Ok(None),
    }
}

impl FetchConfig {
    /// Defaults with environment overrides applied. `CSL_CACHE_MAX_AGE_SECS=0`
    /// disables expiry.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(secs) = env_u64(ENV_FETCH_DEADLINE_SECS)? {
            cfg.deadline = Duration::from_secs(secs);
        }
        if let Some(n) = env_u64(ENV_FETCH_MAX_RETRIES)? {
            cfg.max_retries = u32::try_from(n).context("retry count out of range")?;
        }
        if let Some(secs) = env_u64(ENV_CACHE_MAX_AGE_SECS)? {
            cfg.max_age = (secs > 0).then(|| Duration::from_secs(secs));
        }
        Ok(cfg)
    }
}

/// [`Fetcher`] over HTTP(S), backed by the on-disk cache in [`cache`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("building http client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn get_bytes_core(&self, url: &Url) -> Result<Vec<u8>> {
        let bytes = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .bytes()
            .await
            .with_context(|| format!("Reading body from {}", url))?;
        Ok(bytes.to_vec())
    }

    async fn get_bytes_with_retry(&self, url: &Url) -> Result<Vec<u8>> {
        let mut attempts = 0;
        loop {
            match self.get_bytes_core(url).await {
                Ok(b) => return Ok(b),
                Err(e) if attempts < self.config.max_retries && !is_client_error(&e) => {
                    attempts += 1;
                    let backoff = backoff_for(self.config.initial_backoff, attempts);
                    warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "Retrying");
                    sleep(backoff).await;
                }
                Err(e) => {
                    error!(%url, error = %e, "Giving up");
                    return Err(e);
                }
            }
        }
    }

    /// Cached path for `name`, downloading it first if the cache can't be used.
    async fn fetch_one(&self, dir: &Path, name: &str, url: &Url) -> Result<PathBuf> {
        if let Some(path) = cache::lookup(dir, name, url, self.config.max_age).await {
            info!(name, %url, "reusing cached copy");
            return Ok(path);
        }

        info!(name, %url, "downloading");
        let start = Instant::now();
        let bytes = self.get_bytes_with_retry(url).await?;
        let path = cache::store(dir, name, url, &bytes).await?;
        info!(name, size_bytes = bytes.len(), elapsed = ?start.elapsed(), "downloaded");
        Ok(path)
    }
}

/// Delay before retry number `attempt` (1-based), doubling each time.
fn backoff_for(initial: Duration, attempt: u32) -> Duration {
    let factor = 2u32.checked_pow(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
    initial.saturating_mul(factor)
}

/// 4xx responses won't get better by asking again, except 429.
fn is_client_error(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|e| e.downcast_ref::<reqwest::Error>())
        .filter_map(reqwest::Error::status)
        .any(|s| s.is_client_error() && s != StatusCode::TOO_MANY_REQUESTS)
}

impl Fetcher for HttpFetcher {
    #[instrument(level = "info", skip(self, files), fields(dir = %dir.display(), count = files.len()))]
    async fn get_files(
        &self,
        dir: &Path,
        files: &BTreeMap<String, Url>,
    ) -> Result<BTreeMap<String, File>> {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("creating {}", dir.display()))?;

        let all = async {
            let mut tasks: FuturesUnordered<_> = files
                .iter()
                .map(|(name, url)| async move {
                    let path = self
                        .fetch_one(dir, name, url)
                        .await
                        .with_context(|| format!("{}: GET {}", name, url))?;
                    Ok::<_, anyhow::Error>((name.clone(), path))
                })
                .collect();

            let mut paths = BTreeMap::new();
            while let Some(res) = tasks.next().await {
                let (name, path) = res?;
                paths.insert(name, path);
            }
            Ok::<_, anyhow::Error>(paths)
        };

        let paths = timeout(self.config.deadline, all)
            .await
            .with_context(|| format!("fetch exceeded deadline of {:?}", self.config.deadline))??;

        let mut out = BTreeMap::new();
        for (name, path) in paths {
            let file =
                File::open(&path).with_context(|| format!("{}: opening {}", name, path.display()))?;
            out.insert(name, file);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_bounded() {
        let cfg = FetchConfig::default();
        assert!(cfg.deadline >= cfg.request_timeout);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.max_age, Some(Duration::from_secs(86_400)));
    }

    #[test]
    fn client_errors_are_not_retried() {
        let plain = anyhow::anyhow!("connection reset");
        assert!(!is_client_error(&plain));
    }

    #[test]
    fn backoff_doubles_and_saturates() {
        let base = Duration::from_millis(500);
        assert_eq!(backoff_for(base, 1), base);
        assert_eq!(backoff_for(base, 3), Duration::from_secs(2));
        assert_eq!(backoff_for(base, 40), base.saturating_mul(u32::MAX));
        assert_eq!(backoff_for(Duration::MAX, 2), Duration::MAX);
    }
}
