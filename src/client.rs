use reqwest::Client;

use crate::config::Config;
use crate::error::FeedError;
use crate::models::JobPosting;

/// Read-only client for the job listing service.
#[derive(Debug, Clone)]
pub struct JobsClient {
    jobs_url: String,
    client: Client,
}

impl JobsClient {
    pub fn new(config: &Config) -> Self {
        Self {
            jobs_url: config.jobs_url(),
            client: Client::new(),
        }
    }

    pub fn jobs_url(&self) -> &str {
        &self.jobs_url
    }

    /// Fetch the whole collection in the order the service returns it.
    pub async fn list_jobs(&self) -> Result<Vec<JobPosting>, FeedError> {
        tracing::debug!(url = %self.jobs_url, "requesting job feed");

        let response = self.client.get(&self.jobs_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Request {
                status: status.as_u16(),
            });
        }

        let jobs: Vec<JobPosting> = response.json().await?;
        tracing::debug!(count = jobs.len(), "job feed received");
        Ok(jobs)
    }
}
