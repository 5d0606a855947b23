//! ActivityWatch query API client.
//!
//! Sends the categorize-and-merge query for one report window and decodes
//! the single result group into [`ClassifiedEvent`]s.

mod query;

use std::fmt;
use std::time::Duration;

use awr_core::{CategoryPath, CategoryRuleSet, ClassifiedEvent, ReportWindow, RuleError};
use serde::Deserialize;
use thiserror::Error;

pub use query::{QueryRequest, build_query};

/// Default request timeout for query calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Address of a locally running ActivityWatch server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5600";
const QUERY_PATH: &str = "/api/0/query/";

/// Query client errors.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The configured server URL was unusable.
    #[error("invalid server URL: {reason}")]
    InvalidBaseUrl { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// The rule table could not be embedded into the query.
    #[error("failed to build query: {0}")]
    Rules(#[from] RuleError),
    /// HTTP request failed or timed out.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Server answered with a non-success status.
    #[error("server error (status {status}): {message}")]
    Status { status: u16, message: String },
    /// Response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),
    /// Response did not contain exactly one result group.
    #[error("expected exactly 1 result group, got {groups}")]
    ContractViolation { groups: usize },
}

/// Coarse failure categories. Every kind is fatal to a report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    ContractViolation,
}

impl QueryError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBaseUrl { .. }
            | Self::ClientBuild(_)
            | Self::Rules(_)
            | Self::Transport(_)
            | Self::Status { .. } => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            Self::ContractViolation { .. } => ErrorKind::ContractViolation,
        }
    }
}

/// ActivityWatch query client.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the server at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is empty or not http(s), or if the HTTP
    /// client fails to build.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, QueryError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();

        if base_url.is_empty() {
            return Err(QueryError::InvalidBaseUrl {
                reason: "server URL cannot be empty",
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(QueryError::InvalidBaseUrl {
                reason: "server URL must start with http:// or https://",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(QueryError::ClientBuild)?;

        Ok(Self { http, base_url })
    }

    /// Full URL of the query endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{QUERY_PATH}", self.base_url)
    }

    /// Runs the category query for `window` and returns the classified events.
    pub async fn query_events(
        &self,
        rules: &CategoryRuleSet,
        window: &ReportWindow,
    ) -> Result<Vec<ClassifiedEvent>, QueryError> {
        let request = QueryRequest::new(rules, window)?;
        let endpoint = self.endpoint();
        tracing::debug!(
            %endpoint,
            timeperiod = %request.timeperiods.join(","),
            rules = rules.len(),
            "sending query"
        );

        let response = self.http.post(&endpoint).json(&request).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(QueryError::Status {
                status: status.as_u16(),
                message: parse_server_message(&body).unwrap_or(body),
            });
        }

        let events = decode_response(&body)?;
        tracing::debug!(events = events.len(), "decoded query response");
        Ok(events)
    }
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: serde_json::Value,
    timestamp: String,
    duration: f64,
    #[serde(default)]
    data: RawEventData,
}

#[derive(Debug, Default, Deserialize)]
struct RawEventData {
    #[serde(rename = "$category", default)]
    category: Vec<String>,
}

impl From<RawEvent> for ClassifiedEvent {
    fn from(raw: RawEvent) -> Self {
        let id = match raw.id {
            serde_json::Value::Null => None,
            serde_json::Value::String(id) => Some(id),
            other => Some(other.to_string()),
        };
        let duration_seconds = if raw.duration < 0.0 {
            tracing::warn!(
                timestamp = %raw.timestamp,
                duration = raw.duration,
                "negative event duration, treating as zero"
            );
            0.0
        } else {
            raw.duration
        };
        Self {
            id,
            timestamp: raw.timestamp,
            duration_seconds,
            category: CategoryPath::new(raw.data.category),
        }
    }
}

/// Decodes a query response body.
///
/// The body must be an array holding exactly one array of events.
pub fn decode_response(body: &str) -> Result<Vec<ClassifiedEvent>, QueryError> {
    let groups: Vec<Vec<RawEvent>> =
        serde_json::from_str(body).map_err(|err| QueryError::Decode(err.to_string()))?;

    let [events] = <[Vec<RawEvent>; 1]>::try_from(groups).map_err(|groups| {
        QueryError::ContractViolation {
            groups: groups.len(),
        }
    })?;

    Ok(events.into_iter().map(ClassifiedEvent::from).collect())
}

fn parse_server_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| payload.message)
}
