//! Response envelope, CORS headers and response assembly.

use serde::{Deserialize, Serialize};

use super::{api_error_to_status_code, ApiError};

pub const HEADER_ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const HEADER_ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const HEADER_ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const HEADER_MAX_AGE: &str = "Access-Control-Max-Age";
pub const HEADER_LOCATION: &str = "Location";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";

/// Methods advertised to preflight requests.
pub const ALLOWED_METHODS: &str = "OPTIONS, POST, GET, PUT, DELETE";
/// Preflight cache lifetime, in seconds.
pub const PREFLIGHT_MAX_AGE: &str = "3600";

/// JSON body of every successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope<T> {
    pub data: Option<T>,
    pub error_message: Option<String>,
}

impl<T> ResponseEnvelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            error_message: None,
        }
    }
}

/// CORS headers attached to every response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsPolicy {
    pub allow_origin: String,
    pub allow_headers: String,
}

impl CorsPolicy {
    pub fn new(allow_origin: impl Into<String>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
            allow_headers: "Content-Type".to_string(),
        }
    }

    /// Adds a header name to `Access-Control-Allow-Headers`.
    pub fn allow_header(mut self, name: &str) -> Self {
        self.allow_headers = format!("{}, {}", self.allow_headers, name);
        self
    }

    /// Headers for ordinary responses.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            (HEADER_ALLOW_ORIGIN, self.allow_origin.clone()),
            (HEADER_ALLOW_HEADERS, self.allow_headers.clone()),
        ]
    }

    /// Headers for `OPTIONS` responses.
    pub fn preflight_headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = self.headers();
        headers.push((HEADER_ALLOW_METHODS, ALLOWED_METHODS.to_string()));
        headers.push((HEADER_MAX_AGE, PREFLIGHT_MAX_AGE.to_string()));
        headers
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::new("*")
    }
}

/// Transport-independent response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Option<String>,
}

impl ApiResponse {
    /// A response carrying `payload` in the envelope.
    pub fn json<T: Serialize>(
        status: u16,
        payload: T,
        cors: &CorsPolicy,
    ) -> Result<Self, ApiError> {
        let body = serde_json::to_string(&ResponseEnvelope::data(payload))
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = cors.headers();
        headers.push((HEADER_CONTENT_TYPE, "application/json".to_string()));

        Ok(Self {
            status,
            headers,
            body: Some(body),
        })
    }

    /// `200` with CORS preflight headers and no body.
    pub fn preflight(cors: &CorsPolicy) -> Self {
        Self {
            status: 200,
            headers: cors.preflight_headers(),
            body: None,
        }
    }

    /// Status-only response for `error`.
    pub fn error(error: &ApiError, cors: &CorsPolicy) -> Self {
        Self::status_only(api_error_to_status_code(error), cors)
    }

    /// Response with CORS headers and no body.
    pub fn status_only(status: u16, cors: &CorsPolicy) -> Self {
        Self {
            status,
            headers: cors.headers(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Returns the value of the first header called `name`, ignoring case.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Resource path of a task, used for the `Location` header.
pub fn location_path(api_path: &str, id: &str) -> String {
    format!("/{}/{}", api_path.trim_matches('/'), id)
}
