use serde::de::DeserializeOwned;
use std::time::Duration;
use ureq::Agent;

use crate::config::ApiSettings;
use crate::error::{CommissionsError, Result};

/// Thin JSON-over-HTTP wrapper around a base URL
pub struct ApiClient {
    agent: Agent,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(timeout)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &ApiSettings) -> Self {
        Self::new(
            &settings.base_url,
            settings.timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with query parameters and decode the JSON body
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url} {query:?}");

        let mut request = self.agent.get(&url);
        for (key, value) in query {
            request = request.query(*key, value);
        }

        let body = request
            .call()
            .and_then(|mut response| response.body_mut().read_to_string())
            .map_err(|source| CommissionsError::Http {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&body).map_err(|source| CommissionsError::Decode { url, source })
    }
}
