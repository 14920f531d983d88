// src/fetch/cache.rs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::fs;
use tracing::{debug, trace};
use url::Url;

/// Sidecar written next to every downloaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub size_bytes: u64,
    pub downloaded_at: DateTime<Utc>,
}

/// `.<name>.json` in the same directory.
pub fn manifest_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!(".{}.json", name))
}

fn partial_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.part", name))
}

/// Return the cached copy of `name` if it came from `url`, is intact and is
/// younger than `max_age`.
pub async fn lookup(
    dir: &Path,
    name: &str,
    url: &Url,
    max_age: Option<Duration>,
) -> Option<PathBuf> {
    let raw = fs::read(manifest_path(dir, name)).await.ok()?;
    let entry: CacheEntry = match serde_json::from_slice(&raw) {
        Ok(e) => e,
        Err(e) => {
            debug!(name, error = %e, "ignoring corrupt cache manifest");
            return None;
        }
    };

    if entry.url != url.as_str() {
        trace!(name, cached = %entry.url, wanted = %url, "cache url mismatch");
        return None;
    }

    let path = dir.join(name);
    let meta = fs::metadata(&path).await.ok()?;
    if meta.len() == 0 || meta.len() != entry.size_bytes {
        trace!(name, on_disk = meta.len(), expected = entry.size_bytes, "cache size mismatch");
        return None;
    }

    if let Some(max_age) = max_age {
        let age = Utc::now()
            .signed_duration_since(entry.downloaded_at)
            .to_std()
            .unwrap_or_default();
        if age > max_age {
            trace!(name, age_secs = age.as_secs(), "cache expired");
            return None;
        }
    }

    Some(path)
}

/// Write `bytes` as `name` via a `.part` file and rename, then record the manifest.
pub async fn store(dir: &Path, name: &str, url: &Url, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    let part = partial_path(dir, name);

    fs::write(&part, bytes)
        .await
        .with_context(|| format!("writing {}", part.display()))?;
    fs::rename(&part, &path)
        .await
        .with_context(|| format!("moving {} into place", part.display()))?;

    let entry = CacheEntry {
        url: url.to_string(),
        size_bytes: bytes.len() as u64,
        downloaded_at: Utc::now(),
    };
    let manifest = manifest_path(dir, name);
    fs::write(&manifest, serde_json::to_vec_pretty(&entry)?)
        .await
        .with_context(|| format!("writing {}", manifest.display()))?;

    Ok(path)
}
