//! PrairieLearn REST collaborator.
//!
//! Implements [`exporter::traits::SubmissionApi`] over the two read-only
//! endpoints the exporter consumes. Authentication is a personal access
//! token sent as `Private-Token`. Every transport-level failure — network,
//! non-2xx status, undecodable body — collapses into a single
//! [`ExportError::Transport`] message, per the exporter's error model.

use async_trait::async_trait;
use exporter::error::ExportError;
use exporter::traits::SubmissionApi;
use exporter::types::{AssessmentInstance, Submission};
use reqwest::Url;
use serde::de::DeserializeOwned;

pub struct PlApiClient {
    base_url: String,
    token: String,
    http: reqwest::Client,
}

impl PlApiClient {
    /// Build a client for a PrairieLearn server root. Trailing slashes on
    /// the base URL are tolerated.
    pub fn new(base_url: &str, token: &str) -> Self {
        PlApiClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Join `/pl/api/v1/` + `segments` onto the base URL, percent-encoding
    /// each segment.
    fn api_url(&self, segments: &[&str]) -> Result<Url, ExportError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ExportError::Transport(format!("invalid base URL: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ExportError::Transport("base URL cannot carry a path".to_string()))?;
            path.extend(["pl", "api", "v1"]);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ExportError> {
        let url = self.api_url(segments)?;
        log::debug!("GET {url}");

        let response = self
            .http
            .get(url.clone())
            .header("Private-Token", &self.token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ExportError::Transport(format!("GET {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExportError::Transport(format!("GET {url} -> HTTP {status}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ExportError::Transport(format!("GET {url}: malformed response: {e}")))
    }
}

#[async_trait]
impl SubmissionApi for PlApiClient {
    async fn list_assessment_instances(
        &self,
        course_instance_id: &str,
        assessment_id: &str,
    ) -> Result<Vec<AssessmentInstance>, ExportError> {
        self.get_json(&[
            "course_instances",
            course_instance_id,
            "assessments",
            assessment_id,
            "assessment_instances",
        ])
        .await
    }

    async fn list_submissions(
        &self,
        course_instance_id: &str,
        assessment_instance_id: &str,
    ) -> Result<Vec<Submission>, ExportError> {
        self.get_json(&[
            "course_instances",
            course_instance_id,
            "assessment_instances",
            assessment_instance_id,
            "submissions",
        ])
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_encodes_segments_and_trims_slashes() {
        let client = PlApiClient::new("https://pl.example.edu///", "t");
        let url = client
            .api_url(&["course_instances", "course/1", "assessments", "a 1"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://pl.example.edu/pl/api/v1/course_instances/course%2F1/assessments/a%201"
        );
    }

    #[test]
    fn test_invalid_base_url_is_a_transport_error() {
        let client = PlApiClient::new("not a url", "t");
        let err = client.api_url(&["x"]).unwrap_err();
        assert!(matches!(err, ExportError::Transport(_)));
    }
}
