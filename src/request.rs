use anyhow::Result;
use reqwest::Url;

use crate::error::PipelineError;

/// Name of the query parameter the access endpoint looks datasets up by.
pub const PERSISTENT_ID_PARAM: &str = "persistentId";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRequest {
    pub base_url: String,
    pub persistent_id: String,
}

impl DatasetRequest {
    pub fn new(base_url: impl Into<String>, persistent_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            persistent_id: persistent_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(PipelineError::InvalidRequest("base url is empty".to_string()).into());
        }

        if self.persistent_id.trim().is_empty() {
            return Err(
                PipelineError::InvalidRequest("persistent identifier is empty".to_string()).into(),
            );
        }

        Ok(())
    }

    /// Full access URL with the identifier form-encoded into the query string.
    pub fn access_url(&self) -> Result<Url> {
        self.validate()?;

        let url = Url::parse_with_params(
            &self.base_url,
            &[(PERSISTENT_ID_PARAM, self.persistent_id.as_str())],
        )
        .map_err(|e| PipelineError::InvalidRequest(format!("{}: {}", self.base_url, e)))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(PipelineError::InvalidRequest(format!(
                "unsupported url scheme: {}",
                other
            ))
            .into()),
        }
    }
}
