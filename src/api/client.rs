//! Blocking HTTP client for the ChillRate API.
//!
//! Calls block the current thread, so the UI only ever invokes them from
//! background workers. Every authenticated request carries
//! `Authorization: Client <token>`.

use std::fmt;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use ureq::Agent;

use super::error::ApiError;
use super::types::{AuthResponse, Credentials, PendingUser, Team};
use crate::poller::MeasurementFeed;
use crate::viewport::{normalize, MeasurementPoint};

/// Base URL used when neither settings nor the environment provide one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8099/api/v1";

/// Environment variable overriding the configured base URL
pub const BASE_URL_ENV: &str = "CHILLRATE_API_URL";

/// User agent for API requests
const USER_AGENT: &str = concat!("ChillRate/", env!("CARGO_PKG_VERSION"));

/// Bytes escaped inside a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'+')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Clone, Copy, Debug)]
enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    agent: Agent,
    base_url: String,
    token: Option<String>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.token.is_some())
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let base_url: String = base_url.into();

        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        let request = request.header("User-Agent", USER_AGENT);
        match &self.token {
            Some(token) => request.header("Authorization", format!("Client {}", token)),
            None => request,
        }
    }

    fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let url = self.url(path);
        debug!("{} {}", method, url);

        let result = match method {
            Method::Get => self.authorize(self.agent.get(&url)).call(),
            Method::Delete => self.authorize(self.agent.delete(&url)).call(),
            Method::Post => {
                let request = self.authorize(self.agent.post(&url));
                match body {
                    Some(body) => request.send_json(body),
                    None => request.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| match e {
            ureq::Error::StatusCode(status) => ApiError::ApiResponseError {
                status,
                message: format!("HTTP {}", status),
            },
            _ => ApiError::Network(e.to_string()),
        })?;

        let status = response.status().as_u16();
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        interpret_response(status, &text)
    }

    fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::Get, path, None)
    }

    fn post(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        self.send(Method::Post, path, body)
    }

    fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(Method::Delete, path, None)
    }

    // ------------------------------------------------------------------------
    // Auth
    // ------------------------------------------------------------------------

    pub fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        decode(self.post("auth/authenticate", Some(&body))?)
    }

    pub fn register_admin(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        decode(self.post("auth/regAdmin", Some(&body))?)
    }

    /// Liveness probe for the stored token. Any failure counts as "not live".
    pub fn probe(&self) -> bool {
        match self.get("test") {
            Ok(value) => is_truthy(&value),
            Err(e) => {
                debug!("Session probe failed: {}", e);
                false
            }
        }
    }

    // ------------------------------------------------------------------------
    // Teams
    // ------------------------------------------------------------------------

    pub fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        decode_list(self.get("team")?)
    }

    pub fn team(&self, team_id: &str) -> Result<Team, ApiError> {
        decode(self.get(&format!("team/{}", path_segment(team_id)))?)
    }

    pub fn create_team(&self, name: &str) -> Result<Value, ApiError> {
        self.post("team", Some(&json!({ "name": name })))
    }

    pub fn accept_user(&self, team_id: &str, user_email: &str) -> Result<(), ApiError> {
        let path = format!("team/{}/{}", path_segment(team_id), path_segment(user_email));
        self.post(&path, Some(&json!({}))).map(|_| ())
    }

    pub fn remove_user(&self, team_id: &str, user_id: &str) -> Result<(), ApiError> {
        let path = format!("team/{}/{}", path_segment(team_id), path_segment(user_id));
        self.delete(&path).map(|_| ())
    }

    pub fn delete_team(&self, team_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("team/{}", path_segment(team_id)))
            .map(|_| ())
    }

    // ------------------------------------------------------------------------
    // Admin
    // ------------------------------------------------------------------------

    /// Invite URL members open to request joining
    pub fn admin_url(&self) -> Result<String, ApiError> {
        match self.get("admin/url")? {
            Value::String(url) => Ok(url.trim().to_string()),
            Value::Object(map) => map
                .get("url")
                .and_then(Value::as_str)
                .map(|s| s.trim().to_string())
                .ok_or_else(|| ApiError::Malformed("invite URL object without `url`".into())),
            other => Err(ApiError::Malformed(format!(
                "unexpected invite URL payload: {}",
                other
            ))),
        }
    }

    pub fn wait_users(&self) -> Result<Vec<PendingUser>, ApiError> {
        decode_list(self.get("admin/waitUsers")?)
    }

    /// Raw measurement records of `user_id` in `team_id`, percentage mode.
    /// Anything but a JSON list is `Malformed`.
    pub fn user_measurements(&self, team_id: &str, user_id: &str) -> Result<Value, ApiError> {
        let path = format!(
            "admin/{}/{}?mode=per",
            path_segment(team_id),
            path_segment(user_id)
        );
        measurement_records(self.get(&path)?)
    }

    /// Most recent point of `user_id`, if the member has any data
    pub fn latest_measurement(
        &self,
        team_id: &str,
        user_id: &str,
    ) -> Result<Option<MeasurementPoint>, ApiError> {
        let payload = self.user_measurements(team_id, user_id)?;
        Ok(normalize(&payload).pop())
    }
}

/// Measurement source for one subject, used by the refresh poller
#[derive(Debug, Clone)]
pub struct SubjectFeed {
    pub client: ApiClient,
    pub team_id: String,
    pub user_id: String,
}

impl MeasurementFeed for SubjectFeed {
    fn fetch(&self) -> Result<Value, ApiError> {
        self.client.user_measurements(&self.team_id, &self.user_id)
    }
}

// ============================================================================
// Response interpretation
// ============================================================================

/// Turn a status and body into a JSON value or the matching error.
///
/// Bodies carrying a non-null `error` field are business errors whatever the
/// status. Bodies that are not JSON are returned as a JSON string.
pub fn interpret_response(status: u16, text: &str) -> Result<Value, ApiError> {
    let parsed: Option<Value> = if text.trim().is_empty() {
        Some(Value::Null)
    } else {
        serde_json::from_str(text).ok()
    };

    if let Some(error) = parsed.as_ref().and_then(|v| v.get("error")) {
        if !error.is_null() {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(ApiError::Rejected(message));
        }
    }

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));
        return Err(ApiError::ApiResponseError { status, message });
    }

    Ok(parsed.unwrap_or_else(|| Value::String(text.to_string())))
}

/// Accept a measurement payload only when it is a list of records
pub fn measurement_records(payload: Value) -> Result<Value, ApiError> {
    if payload.is_array() {
        return Ok(payload);
    }
    let kind = match &payload {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Object(_) => "an object",
        Value::Array(_) => "a list",
    };
    Err(ApiError::Malformed(format!(
        "expected a list of measurements, got {}",
        kind
    )))
}

/// Percent-encode one path segment (ids, e-mail addresses)
pub fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, PATH_SEGMENT).to_string()
}

/// JavaScript-style truthiness of a probe response
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Lists may come back as `null` when empty
fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ApiError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(_) => decode(value),
        other => Err(ApiError::Malformed(format!("expected a list, got {}", other))),
    }
}
