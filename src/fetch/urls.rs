// src/fetch/urls.rs

use anyhow::{Context, Result};
use std::env;
use url::Url;

/// Published location of the consolidated screening list; `%s` takes the file name.
pub const PUBLIC_US_DOWNLOAD_TEMPLATE: &str =
    "https://api.trade.gov/static/consolidated_screening_list/%s";

/// File substituted into the US template.
pub const US_SOURCE_FILE: &str = "consolidated.csv";

/// From https://www.gov.uk/government/publications/financial-sanctions-consolidated-list-of-targets
pub const PUBLIC_UK_DOWNLOAD_URL: &str =
    "https://ofsistorage.blob.core.windows.net/publishlive/2022format/ConList.csv";

pub const ENV_CSL_DOWNLOAD_TEMPLATE: &str = "CSL_DOWNLOAD_TEMPLATE";
pub const ENV_US_CSL_DOWNLOAD_URL: &str = "US_CSL_DOWNLOAD_URL";
pub const ENV_UK_CSL_DOWNLOAD_URL: &str = "UK_CSL_DOWNLOAD_URL";

/// Download location overrides, so deployments can point at a mirror.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlConfig {
    /// Checked first for the US list.
    pub csl_download_template: Option<String>,
    /// Checked second for the US list.
    pub us_csl_download_url: Option<String>,
    pub uk_csl_download_url: Option<String>,
}

impl UrlConfig {
    pub fn from_env() -> Self {
        Self {
            csl_download_template: env::var(ENV_CSL_DOWNLOAD_TEMPLATE).ok(),
            us_csl_download_url: env::var(ENV_US_CSL_DOWNLOAD_URL).ok(),
            uk_csl_download_url: env::var(ENV_UK_CSL_DOWNLOAD_URL).ok(),
        }
    }
}

/// First candidate that is set and not blank.
pub fn first_non_empty<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .flatten()
        .copied()
        .find(|s| !s.trim().is_empty())
}

/// Builds concrete download URLs from a [`UrlConfig`].
#[derive(Debug, Clone, Default)]
pub struct UrlResolver {
    config: UrlConfig,
}

impl UrlResolver {
    pub fn new(config: UrlConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(UrlConfig::from_env())
    }

    /// Template used for the US list, after applying overrides.
    pub fn us_template(&self) -> &str {
        first_non_empty(&[
            self.config.csl_download_template.as_deref(),
            self.config.us_csl_download_url.as_deref(),
        ])
        .unwrap_or(PUBLIC_US_DOWNLOAD_TEMPLATE)
    }

    /// US list URL. A template without `%s` is taken as the full URL.
    pub fn us_csl_url(&self) -> Result<Url> {
        let raw = self.us_template().trim().replace("%s", US_SOURCE_FILE);
        Url::parse(&raw).with_context(|| format!("parsing US CSL url {:?}", raw))
    }

    pub fn uk_csl_url(&self) -> Result<Url> {
        let raw = first_non_empty(&[self.config.uk_csl_download_url.as_deref()])
            .unwrap_or(PUBLIC_UK_DOWNLOAD_URL)
            .trim();
        Url::parse(raw).with_context(|| format!("parsing UK CSL url {:?}", raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn first_non_empty_skips_unset_and_blank() {
        assert_eq!(first_non_empty(&[None, Some(""), Some("  "), Some("b"), Some("c")]), Some("b"));
        assert_eq!(first_non_empty(&[None, None]), None);
        assert_eq!(first_non_empty(&[]), None);
    }

    #[test]
    fn defaults_point_at_public_sources() -> Result<()> {
        let resolver = UrlResolver::default();
        assert_eq!(
            resolver.us_csl_url()?.as_str(),
            "https://api.trade.gov/static/consolidated_screening_list/consolidated.csv"
        );
        assert_eq!(resolver.uk_csl_url()?.as_str(), PUBLIC_UK_DOWNLOAD_URL);
        Ok(())
    }

    #[test]
    fn template_override_wins_over_alternate() -> Result<()> {
        let resolver = UrlResolver::new(UrlConfig {
            csl_download_template: Some("https://mirror.internal/csl/%s".into()),
            us_csl_download_url: Some("https://other.internal/%s".into()),
            uk_csl_download_url: None,
        });
        assert_eq!(
            resolver.us_csl_url()?.as_str(),
            "https://mirror.internal/csl/consolidated.csv"
        );
        Ok(())
    }

    #[test]
    fn alternate_used_when_template_blank() -> Result<()> {
        let resolver = UrlResolver::new(UrlConfig {
            csl_download_template: Some(String::new()),
            us_csl_download_url: Some("https://other.internal/files/%s".into()),
            uk_csl_download_url: None,
        });
        assert_eq!(
            resolver.us_csl_url()?.as_str(),
            "https://other.internal/files/consolidated.csv"
        );
        Ok(())
    }

    #[test]
    fn template_without_placeholder_is_literal() -> Result<()> {
        let resolver = UrlResolver::new(UrlConfig {
            us_csl_download_url: Some("https://mirror.internal/latest.csv".into()),
            ..Default::default()
        });
        assert_eq!(resolver.us_csl_url()?.as_str(), "https://mirror.internal/latest.csv");
        Ok(())
    }

    #[test]
    fn uk_override_and_bad_url() {
        let resolver = UrlResolver::new(UrlConfig {
            uk_csl_download_url: Some("https://mirror.internal/ConList.csv".into()),
            ..Default::default()
        });
        assert_eq!(
            resolver.uk_csl_url().map(|u| u.to_string()).ok().as_deref(),
            Some("https://mirror.internal/ConList.csv")
        );

        let broken = UrlResolver::new(UrlConfig {
            csl_download_template: Some("not a url %s".into()),
            ..Default::default()
        });
        assert!(broken.us_csl_url().is_err());
    }
}
