use anyhow::{anyhow, Context, Result};
use reqwest::Url;
use std::path::PathBuf;

pub const DEFAULT_ENDPOINT_BASE_URL: &str = "http://localhost:8000";
pub const JOBS_PATH: &str = "/api/jobs";

/// Runtime settings for the radar client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Origin of the job listing service, without a trailing slash
    pub endpoint_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_base_url: DEFAULT_ENDPOINT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn new(endpoint_base_url: &str) -> Result<Self> {
        let trimmed = endpoint_base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .with_context(|| format!("Invalid endpoint base URL: {}", endpoint_base_url))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(anyhow!(
                "Endpoint base URL must use http or https, got '{}'",
                url.scheme()
            ));
        }

        Ok(Self {
            endpoint_base_url: trimmed.to_string(),
        })
    }

    pub fn jobs_url(&self) -> String {
        format!("{}{}", self.endpoint_base_url, JOBS_PATH)
    }

    pub fn log_path() -> PathBuf {
        // XDG data directory, or the working directory as a fallback
        if let Some(proj_dirs) = directories::ProjectDirs::from("", "", "radar") {
            proj_dirs.data_dir().join("radar.log")
        } else {
            PathBuf::from("radar.log")
        }
    }
}
