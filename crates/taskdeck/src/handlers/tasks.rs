//! Task request handlers.
//!
//! Every method on the collection and item paths lands in [`dispatch`], which
//! resolves the route, runs the matching repository operation and assembles
//! the [`ApiResponse`]. The axum handlers only translate to and from HTTP.

use axum::{
    body::{Body, Bytes},
    extract::{Path, State},
    http::{header::ACCESS_CONTROL_ALLOW_ORIGIN, Method, StatusCode},
    response::{IntoResponse, Response},
};

use taskdeck_core::http::{
    decode_draft, decode_patch, location_path, resolve_route, ApiError, ApiResponse,
    RequestDescriptor, RequestMethod, Route, HEADER_LOCATION,
};

use crate::state::AppState;

/// Axum response wrapper for [`ApiResponse`].
pub struct TaskResponse(pub ApiResponse);

impl IntoResponse for TaskResponse {
    fn into_response(self) -> Response {
        let ApiResponse {
            status,
            headers,
            body,
        } = self.0;

        let mut builder = Response::builder()
            .status(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
        for (name, value) in headers {
            builder = builder.header(name, value);
        }

        builder
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Failed to build response");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            })
    }
}

/// Any method on `/{api_path}`.
pub async fn collection(
    State(state): State<AppState>,
    method: Method,
    body: Bytes,
) -> TaskResponse {
    handle(&state, method, None, body).await
}

/// Any method on `/{api_path}/{id}`.
pub async fn item(
    State(state): State<AppState>,
    method: Method,
    Path(id): Path<String>,
    body: Bytes,
) -> TaskResponse {
    handle(&state, method, Some(id), body).await
}

/// Requests outside the API paths.
pub async fn fallback(State(state): State<AppState>) -> TaskResponse {
    TaskResponse(ApiResponse::status_only(404, &state.cors))
}

/// Gives the bare 408 produced by the timeout layer the usual CORS headers.
pub async fn timeout_response(State(state): State<AppState>, response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(ACCESS_CONTROL_ALLOW_ORIGIN)
    {
        tracing::warn!(timeout = ?state.request_timeout, "Request timed out");
        return TaskResponse(ApiResponse::status_only(408, &state.cors)).into_response();
    }
    response
}

async fn handle(state: &AppState, method: Method, id: Option<String>, body: Bytes) -> TaskResponse {
    let mut request = RequestDescriptor::new(RequestMethod::parse(method.as_str()));
    if let Some(id) = id {
        request = request.with_id(id);
    }
    if !body.is_empty() {
        request = request.with_body(body.to_vec());
    }

    TaskResponse(dispatch(state, request).await)
}

/// Resolves `request` to a task operation and runs it.
pub async fn dispatch(state: &AppState, request: RequestDescriptor) -> ApiResponse {
    let method = request.method.clone();

    let route = match resolve_route(request) {
        Ok(route) => route,
        Err(err) => {
            tracing::debug!(method = %method, error = %err, "Rejected request");
            return ApiResponse::error(&err, &state.cors);
        }
    };

    let operation = route.operation();
    let id = route_id(&route).map(str::to_string);

    match execute(state, route).await {
        Ok(response) => response,
        Err(err) => {
            if err.is_server_error() {
                tracing::error!(operation, id = ?id, error = %err, "Task operation failed");
            } else {
                tracing::debug!(operation, id = ?id, error = %err, "Task request rejected");
            }
            ApiResponse::error(&err, &state.cors)
        }
    }
}

async fn execute(state: &AppState, route: Route) -> Result<ApiResponse, ApiError> {
    let cors = &state.cors;

    match route {
        Route::List => {
            let tasks = state.tasks.list_tasks().await?;
            ApiResponse::json(200, tasks, cors)
        }
        Route::Get { id } => {
            let task = state
                .tasks
                .get_task(&id)
                .await?
                .ok_or_else(|| ApiError::NotFound(id.clone()))?;
            ApiResponse::json(200, task, cors)
        }
        Route::Create { body } => {
            let draft = decode_draft(&body)?;
            let task = state.tasks.create_task(draft).await?;
            let location = location_path(&state.api_path, &task.id);
            Ok(ApiResponse::json(201, task, cors)?.with_header(HEADER_LOCATION, location))
        }
        Route::Update { id, body } => {
            let patch = decode_patch(&body)?;
            let task = state
                .tasks
                .update_task(&id, patch)
                .await?
                .ok_or_else(|| ApiError::NotFound(id.clone()))?;
            let location = location_path(&state.api_path, &task.id);
            Ok(ApiResponse::json(200, task, cors)?.with_header(HEADER_LOCATION, location))
        }
        Route::Delete { id } => {
            let task = state
                .tasks
                .delete_task(&id)
                .await?
                .ok_or_else(|| ApiError::NotFound(id.clone()))?;
            ApiResponse::json(200, task, cors)
        }
        Route::Preflight => Ok(ApiResponse::preflight(cors)),
    }
}

fn route_id(route: &Route) -> Option<&str> {
    match route {
        Route::Get { id } | Route::Update { id, .. } | Route::Delete { id } => Some(id),
        Route::List | Route::Create { .. } | Route::Preflight => None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use taskdeck_core::http::{ResponseEnvelope, HEADER_ALLOW_ORIGIN};
    use taskdeck_core::storage::{RepositoryError, Result, TaskRepository};
    use taskdeck_core::task::{Task, TaskDraft, TaskPatch};

    use super::*;
    use crate::config::Config;
    use crate::secrets::EnvSecretLookup;

    fn get(id: &str) -> RequestDescriptor {
        RequestDescriptor::new(RequestMethod::Get).with_id(id)
    }

    fn post(body: &str) -> RequestDescriptor {
        RequestDescriptor::new(RequestMethod::Post).with_body(body)
    }

    fn task_from(response: &ApiResponse) -> Task {
        let envelope: ResponseEnvelope<Task> =
            serde_json::from_str(response.body.as_deref().unwrap()).unwrap();
        envelope.data.unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let state = AppState::default();

        let created = dispatch(&state, post(r#"{"content":"buy milk"}"#)).await;
        assert_eq!(created.status, 201);
        let task = task_from(&created);
        assert_eq!(
            created.header(HEADER_LOCATION),
            Some(format!("/tasks/{}", task.id).as_str())
        );

        let fetched = dispatch(&state, get(&task.id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(task_from(&fetched), task);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let response = dispatch(&AppState::default(), get("missing")).await;

        assert_eq!(response.status, 404);
        assert_eq!(response.body, None);
        assert_eq!(response.header(HEADER_ALLOW_ORIGIN), Some("*"));
    }

    #[tokio::test]
    async fn test_invalid_status_never_reaches_store() {
        let state = AppState::default();
        let created = task_from(&dispatch(&state, post(r#"{"content":"buy milk"}"#)).await);

        let request = RequestDescriptor::new(RequestMethod::Put)
            .with_id(created.id.clone())
            .with_body(r#"{"content":"buy milk","status":"ARCHIVED","completedOn":0}"#);
        let response = dispatch(&state, request).await;

        assert_eq!(response.status, 400);
        assert_eq!(task_from(&dispatch(&state, get(&created.id)).await), created);
    }

    /// Repository whose every call fails, for server-error mapping.
    struct BrokenRepository;

    fn broken() -> RepositoryError {
        RepositoryError::Store("connection reset".to_string())
    }

    #[async_trait]
    impl TaskRepository for BrokenRepository {
        async fn get_task(&self, _id: &str) -> Result<Option<Task>> {
            Err(broken())
        }

        async fn list_tasks(&self) -> Result<Vec<Task>> {
            Err(broken())
        }

        async fn create_task(&self, _draft: TaskDraft) -> Result<Task> {
            Err(broken())
        }

        async fn update_task(&self, _id: &str, _patch: TaskPatch) -> Result<Option<Task>> {
            Err(broken())
        }

        async fn delete_task(&self, _id: &str) -> Result<Option<Task>> {
            Err(broken())
        }
    }

    #[tokio::test]
    async fn test_store_fault_is_internal_error_without_body() {
        let state = AppState::new(
            Arc::new(BrokenRepository),
            Arc::new(EnvSecretLookup),
            &Config::default(),
        );

        for request in [
            RequestDescriptor::new(RequestMethod::Get),
            get("abc"),
            post(r#"{"content":"x"}"#),
            RequestDescriptor::new(RequestMethod::Delete).with_id("abc"),
        ] {
            let response = dispatch(&state, request).await;
            assert_eq!(response.status, 500);
            assert_eq!(response.body, None);
        }
    }

    #[tokio::test]
    async fn test_body_is_only_decoded_for_writes() {
        let state = AppState::default();
        let junk = [0xff_u8, 0xfe, 0x00];

        let preflight = RequestDescriptor::new(RequestMethod::Options).with_body(junk);
        assert_eq!(dispatch(&state, preflight).await.status, 200);

        let list = RequestDescriptor::new(RequestMethod::Get).with_body(junk);
        assert_eq!(dispatch(&state, list).await.status, 200);

        let create = RequestDescriptor::new(RequestMethod::Post).with_body(junk);
        assert_eq!(dispatch(&state, create).await.status, 422);
    }

    #[tokio::test]
    async fn test_rejected_routes_skip_store() {
        let state = AppState::new(
            Arc::new(BrokenRepository),
            Arc::new(EnvSecretLookup),
            &Config::default(),
        );

        let missing_id = dispatch(&state, RequestDescriptor::new(RequestMethod::Delete)).await;
        assert_eq!(missing_id.status, 400);

        let not_allowed = dispatch(
            &state,
            RequestDescriptor::new(RequestMethod::Other("PATCH".to_string())).with_id("abc"),
        )
        .await;
        assert_eq!(not_allowed.status, 405);

        let malformed = dispatch(&state, post("{not json")).await;
        assert_eq!(malformed.status, 422);
    }

    #[test]
    fn test_route_id() {
        assert_eq!(
            route_id(&Route::Delete {
                id: "abc".to_string()
            }),
            Some("abc")
        );
        assert_eq!(route_id(&Route::List), None);
    }
}
