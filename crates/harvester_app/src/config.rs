//! Optional RON configuration for the `harvest` command.
//!
//! Every field may be omitted; omitted fields keep the engine defaults.
//! Plain values are accepted for optional fields (`page_length: 50`).

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use harvest_logging::harvest_info;
use harvester_engine::FetchSettings;
use ron::extensions::Extensions;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    pub endpoint: Option<String>,
    pub page_length: Option<NonZeroUsize>,
    pub echo: Option<String>,
    pub column_count: Option<usize>,
    /// Replaces the default header set entirely.
    pub headers: Option<Vec<(String, String)>>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub max_bytes: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub output_filename: Option<String>,
}

impl HarvestConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        harvest_info!("Loaded harvest config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::Options::default()
            .with_default_extension(Extensions::IMPLICIT_SOME)
            .from_str(text)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        let defaults = FetchSettings::default();
        FetchSettings {
            endpoint: self.endpoint.clone().unwrap_or(defaults.endpoint),
            page_length: self.page_length.unwrap_or(defaults.page_length),
            echo: self.echo.clone().unwrap_or(defaults.echo),
            column_count: self.column_count.unwrap_or(defaults.column_count),
            headers: self.headers.clone().unwrap_or(defaults.headers),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .or(defaults.connect_timeout),
            request_timeout: self
                .request_timeout_secs
                .map(Duration::from_secs)
                .or(defaults.request_timeout),
            max_bytes: self.max_bytes.unwrap_or(defaults.max_bytes),
            accept_invalid_certs: self
                .accept_invalid_certs
                .unwrap_or(defaults.accept_invalid_certs),
        }
    }
}
