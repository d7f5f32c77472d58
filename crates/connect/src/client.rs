//! HTTP client for the goals REST resource.
//!
//! Maps the resource's status codes back onto core errors:
//! 404 is `NotFound`, 409/412 is `Conflict`, 400/422 is a validation
//! failure and everything else, including network failures, is `Transport`.

use async_trait::async_trait;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, IF_MATCH};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use goal_planner_core::errors::{Error, Result, ValidationError};
use goal_planner_core::goals::{Goal, GoalPatch, GoalStoreTrait, NewGoal};

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of a locally running goal store.
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, serde::Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the goal record store.
///
/// # Example
///
/// ```ignore
/// let client = GoalApiClient::new("http://localhost:3000")?;
/// let goals = client.list_goals().await?;
/// ```
#[derive(Debug, Clone)]
pub struct GoalApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GoalApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to initialize HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn goals_url(&self) -> String {
        format!("{}/goals", self.base_url)
    }

    fn goal_url(&self, goal_id: &str) -> String {
        format!("{}/goals/{}", self.base_url, urlencoding::encode(goal_id))
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("[GoalApi] {} {}", method, url);
        self.client.request(method, url).headers(self.headers())
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {}", e)))?;

        serde_json::from_str(&body)
            .map_err(|e| Error::Transport(format!("Failed to parse response: {} - {}", e, body)))
    }
}

/// Converts a non-success response into the matching core error.
fn status_error(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<ApiErrorResponse>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.chars().take(200).collect::<String>());

    match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => Error::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            Error::Validation(ValidationError::InvalidInput(message))
        }
        _ => Error::Transport(format!("HTTP {}: {}", status, message)),
    }
}

#[async_trait]
impl GoalStoreTrait for GoalApiClient {
    async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.send_json(self.request(Method::GET, &self.goals_url()))
            .await
    }

    async fn get_goal(&self, goal_id: &str) -> Result<Goal> {
        self.send_json(self.request(Method::GET, &self.goal_url(goal_id)))
            .await
    }

    async fn create_goal(&self, new_goal: NewGoal) -> Result<Goal> {
        self.send_json(self.request(Method::POST, &self.goals_url()).json(&new_goal))
            .await
    }

    async fn update_goal(
        &self,
        goal_id: &str,
        patch: GoalPatch,
        expected_version: Option<i64>,
    ) -> Result<Goal> {
        let mut request = self
            .request(Method::PATCH, &self.goal_url(goal_id))
            .json(&patch);
        if let Some(version) = expected_version {
            request = request.header(IF_MATCH, version.to_string());
        }
        self.send_json(request).await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, &self.goal_url(goal_id)))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = GoalApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.goals_url(), "http://localhost:3000/goals");
        assert_eq!(
            client.goal_url("a b/c"),
            "http://localhost:3000/goals/a%20b%2Fc"
        );
    }

    #[test]
    fn test_status_codes_map_to_core_errors() {
        let body = r#"{"code":404,"message":"Goal not found: 42"}"#;
        assert!(
            matches!(status_error(StatusCode::NOT_FOUND, body), Error::NotFound(m) if m == "Goal not found: 42")
        );
        assert!(matches!(
            status_error(StatusCode::CONFLICT, "{}"),
            Error::Conflict(_)
        ));
        assert!(matches!(
            status_error(StatusCode::PRECONDITION_FAILED, ""),
            Error::Conflict(_)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_REQUEST, "bad"),
            Error::Validation(_)
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            Error::Transport(m) if m.contains("boom")
        ));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        let client =
            GoalApiClient::with_timeout("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            client.list_goals().await,
            Err(Error::Transport(_))
        ));
    }
}
