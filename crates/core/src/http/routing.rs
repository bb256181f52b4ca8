//! Request descriptor and route resolution.
//!
//! The transport (axum, an API gateway event, a test) reduces each request to
//! a [`RequestDescriptor`]; [`resolve_route`] decides which task operation it
//! names without touching storage.

use std::fmt;

use super::ApiError;

/// HTTP method of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Other(String),
}

impl RequestMethod {
    pub fn parse(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => RequestMethod::Get,
            "POST" => RequestMethod::Post,
            "PUT" => RequestMethod::Put,
            "DELETE" => RequestMethod::Delete,
            "OPTIONS" => RequestMethod::Options,
            _ => RequestMethod::Other(method.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Post => "POST",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Options => "OPTIONS",
            RequestMethod::Other(method) => method,
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-independent view of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: RequestMethod,
    /// Task id from the path, if the path has one.
    pub id: Option<String>,
    /// Raw request body. Only create and update routes decode it.
    pub body: Option<Vec<u8>>,
}

impl RequestDescriptor {
    pub fn new(method: RequestMethod) -> Self {
        Self {
            method,
            id: None,
            body: None,
        }
    }

    /// Sets the path id exactly as extracted from the path.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// The operation a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Get { id: String },
    Create { body: Vec<u8> },
    Update { id: String, body: Vec<u8> },
    Delete { id: String },
    Preflight,
}

impl Route {
    /// Short operation name for logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Route::List => "list_tasks",
            Route::Get { .. } => "get_task",
            Route::Create { .. } => "create_task",
            Route::Update { .. } => "update_task",
            Route::Delete { .. } => "delete_task",
            Route::Preflight => "preflight",
        }
    }
}

/// Maps method and id presence to a route.
///
/// `PUT`/`DELETE` without an id fail with [`ApiError::MissingId`]; `POST` with
/// an id and any unsupported method fail with [`ApiError::MethodNotAllowed`].
pub fn resolve_route(request: RequestDescriptor) -> Result<Route, ApiError> {
    let RequestDescriptor { method, id, body } = request;
    let body = body.unwrap_or_default();

    match (method, id) {
        (RequestMethod::Get, None) => Ok(Route::List),
        (RequestMethod::Get, Some(id)) => Ok(Route::Get { id }),
        (RequestMethod::Post, None) => Ok(Route::Create { body }),
        (RequestMethod::Put, Some(id)) => Ok(Route::Update { id, body }),
        (RequestMethod::Delete, Some(id)) => Ok(Route::Delete { id }),
        (RequestMethod::Options, _) => Ok(Route::Preflight),
        (RequestMethod::Put | RequestMethod::Delete, None) => Err(ApiError::MissingId),
        (method, _) => Err(ApiError::MethodNotAllowed(method.to_string())),
    }
}
