use std::time::Duration;

use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use url::Url;

const API_BASE_URL: &str = "https://api.guildwars2.com";
// https://wiki.guildwars2.com/wiki/API:Changelog
const LATEST_SCHEMA: &str = "2021-04-06T21:00:00.000Z";
/// the v2 api refuses more ids than this in a single `?ids=` request
pub const MAX_IDS_PER_REQUEST: usize = 200;

/// Languages the api can localize names and descriptions into.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::EnumString,
    strum_macros::Display,
    strum_macros::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    En,
    De,
    Es,
    Fr,
    Zh,
}

/// Settings for talking to the api.
///
/// Missing keys in a json config fall back to [ApiConfig::default].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// checked when loaded or overridden, parsed again by [ApiConfig::root_url]
    pub base_url: String,
    pub locale: Locale,
    pub schema_version: String,
    /// number of ids sent per request when fetching in batches. clamped to [MAX_IDS_PER_REQUEST]
    pub batch_size: usize,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: API_BASE_URL.to_string(),
            locale: Locale::default(),
            schema_version: LATEST_SCHEMA.to_string(),
            batch_size: MAX_IDS_PER_REQUEST,
            timeout_secs: 30,
            user_agent: concat!("gw2api/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ApiConfig {
    pub const ENV_BASE_URL: &'static str = "GW2API_BASE_URL";
    pub const ENV_LANG: &'static str = "GW2API_LANG";
    pub const ENV_SCHEMA: &'static str = "GW2API_SCHEMA";

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .into_diagnostic()
            .wrap_err("failed to parse api config json")?;
        config.root_url()?;
        Ok(config)
    }

    /// Defaults overlaid with `GW2API_BASE_URL`, `GW2API_LANG` and `GW2API_SCHEMA`.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// applies overrides looked up by env var name. a value that doesn't parse is an error.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(base_url) = lookup(Self::ENV_BASE_URL) {
            Url::parse(&base_url)
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid {}: {base_url}", Self::ENV_BASE_URL))?;
            self.base_url = base_url;
        }
        if let Some(lang) = lookup(Self::ENV_LANG) {
            self.locale = lang
                .parse()
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid {}: {lang}", Self::ENV_LANG))?;
        }
        if let Some(schema) = lookup(Self::ENV_SCHEMA) {
            self.schema_version = schema;
        }
        Ok(self)
    }

    pub fn v1_url(&self) -> Result<Url> {
        self.versioned_url("v1")
    }

    pub fn v2_url(&self) -> Result<Url> {
        self.versioned_url("v2")
    }

    /// `base_url` with a trailing slash, so relative paths like `v2/items` join below it
    pub fn root_url(&self) -> Result<Url> {
        let mut base = Url::parse(&self.base_url)
            .into_diagnostic()
            .wrap_err_with(|| format!("invalid base url: {}", self.base_url))?;
        // a base without trailing slash would make `join` replace its last segment
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(base)
    }

    fn versioned_url(&self, version: &str) -> Result<Url> {
        self.root_url()?
            .join(&format!("{version}/"))
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to join {version} onto {}", self.base_url))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size.clamp(1, MAX_IDS_PER_REQUEST)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
