use axum::{http::StatusCode, middleware, routing::any, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        api_key::require_api_key,
        tasks::{collection, fallback, item, timeout_response},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let collection_path = format!("/{}", state.api_path);
    let item_path = format!("/{}/{{id}}", state.api_path);

    Router::new()
        .route(&collection_path, any(collection))
        .route(&item_path, any(item))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_api_key,
        ))
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.request_timeout,
        ))
        .layer(middleware::map_response_with_state(
            state.clone(),
            timeout_response,
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use std::time::Duration;

    use async_trait::async_trait;
    use taskdeck_core::storage::{RepositoryError, Result, TaskRepository};
    use taskdeck_core::task::{Task, TaskDraft, TaskPatch};

    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::secrets::EnvSecretLookup;
    use crate::storage::{InMemoryTable, TableTaskRepository};

    fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn body_is_empty(response: Response) -> bool {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .is_empty()
    }

    fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    async fn create(app: &Router, content: &str) -> serde_json::Value {
        let response = app
            .clone()
            .oneshot(request(
                "POST",
                "/tasks",
                Some(&serde_json::json!({ "content": content }).to_string()),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await["data"].clone()
    }

    #[tokio::test]
    async fn test_list_tasks_empty() {
        let app = create_app(AppState::default());

        let response = app.oneshot(request("GET", "/tasks", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "content-type"), Some("application/json"));
        assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "data": [], "errorMessage": null })
        );
    }

    #[tokio::test]
    async fn test_create_and_get_task() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(request("POST", "/tasks", Some(r#"{"content":"buy milk"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = header(&response, "location").unwrap().to_string();
        let task = body_json(response).await["data"].clone();
        let id = task["id"].as_str().unwrap();

        assert_eq!(location, format!("/tasks/{id}"));
        assert_eq!(task["content"], "buy milk");
        assert_eq!(task["status"], "PENDING");
        assert_eq!(task["completedOn"], 0);

        let response = app
            .oneshot(request("GET", &location, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], task);
    }

    #[tokio::test]
    async fn test_task_lifecycle() {
        let app = create_app(AppState::default());
        let task = create(&app, "buy milk").await;
        let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                &uri,
                Some(r#"{"content":"buy milk","status":"COMPLETED","completedOn":1700000000}"#),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header(&response, "location"), Some(uri.as_str()));
        let updated = body_json(response).await["data"].clone();
        assert_eq!(updated["id"], task["id"]);
        assert_eq!(updated["status"], "COMPLETED");
        assert_eq!(updated["completedOn"], 1_700_000_000u64);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"], updated);

        let response = app
            .clone()
            .oneshot(request("DELETE", &uri, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(request("GET", &uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
        assert!(body_is_empty(response).await);
    }

    #[tokio::test]
    async fn test_list_returns_every_task_across_pages() {
        let table = InMemoryTable::default().with_page_size(2);
        let state = AppState::new(
            Arc::new(TableTaskRepository::new(table)),
            Arc::new(EnvSecretLookup),
            &Config::default(),
        );
        let app = create_app(state);
        for i in 0..5 {
            create(&app, &format!("task {i}")).await;
        }

        let response = app.oneshot(request("GET", "/tasks", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let data = body_json(response).await["data"].clone();
        assert_eq!(data.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_update_nonexistent_task() {
        let app = create_app(AppState::default());

        let response = app
            .clone()
            .oneshot(request(
                "PUT",
                "/tasks/00000000-0000-0000-0000-000000000000",
                Some(r#"{"content":"x","status":"PENDING","completedOn":0}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.oneshot(request("GET", "/tasks", None)).await.unwrap();
        assert_eq!(body_json(response).await["data"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_malformed_and_invalid_bodies() {
        let app = create_app(AppState::default());

        let cases = [
            ("POST", "/tasks", "not json", StatusCode::UNPROCESSABLE_ENTITY),
            ("POST", "/tasks", r#"{"content":""}"#, StatusCode::BAD_REQUEST),
            ("POST", "/tasks", "{}", StatusCode::BAD_REQUEST),
            (
                "POST",
                "/tasks",
                r#"{"content":"x","id":"chosen"}"#,
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                "PUT",
                "/tasks/abc",
                r#"{"content":"x","status":"DONE","completedOn":0}"#,
                StatusCode::BAD_REQUEST,
            ),
            (
                "PUT",
                "/tasks/abc",
                r#"{"content":"x"}"#,
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (method, uri, body, expected) in cases {
            let response = app
                .clone()
                .oneshot(request(method, uri, Some(body)))
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{method} {uri} {body}");
            assert!(body_is_empty(response).await);
        }
    }

    #[tokio::test]
    async fn test_method_and_id_rules() {
        let app = create_app(AppState::default());

        let cases = [
            ("PATCH", "/tasks/abc", StatusCode::METHOD_NOT_ALLOWED),
            ("HEAD", "/tasks", StatusCode::METHOD_NOT_ALLOWED),
            ("POST", "/tasks/abc", StatusCode::METHOD_NOT_ALLOWED),
            ("PUT", "/tasks", StatusCode::BAD_REQUEST),
            ("DELETE", "/tasks", StatusCode::BAD_REQUEST),
        ];

        for (method, uri, expected) in cases {
            let response = app
                .clone()
                .oneshot(request(method, uri, None))
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{method} {uri}");
            assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
        }
    }

    #[tokio::test]
    async fn test_preflight() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(request("OPTIONS", "/tasks/abc", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header(&response, "access-control-allow-methods"),
            Some("OPTIONS, POST, GET, PUT, DELETE")
        );
        assert_eq!(header(&response, "access-control-max-age"), Some("3600"));
        assert_eq!(
            header(&response, "access-control-allow-headers"),
            Some("Content-Type")
        );
        assert!(body_is_empty(response).await);
    }

    #[tokio::test]
    async fn test_content_is_stored_as_sent() {
        let app = create_app(AppState::default());

        let blank = create(&app, "   ").await;
        assert_eq!(blank["content"], "   ");

        let long = "a".repeat(10_001);
        let task = create(&app, &long).await;
        assert_eq!(task["content"], long.as_str());
    }

    #[tokio::test]
    async fn test_blank_id_is_not_found() {
        let app = create_app(AppState::default());
        create(&app, "buy milk").await;

        let cases = [
            ("GET", None),
            (
                "PUT",
                Some(r#"{"content":"x","status":"PENDING","completedOn":0}"#),
            ),
            ("DELETE", None),
        ];

        for (method, body) in cases {
            let response = app
                .clone()
                .oneshot(request(method, "/tasks/%20", body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method}");
            assert!(body_is_empty(response).await);
        }

        let response = app.oneshot(request("GET", "/tasks", None)).await.unwrap();
        let data = body_json(response).await["data"].clone();
        assert_eq!(data.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_body_ignored_outside_writes() {
        let app = create_app(AppState::default());
        let junk = || Body::from(vec![0xff_u8, 0xfe, 0x00]);

        let preflight = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/tasks")
                    .body(junk())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(preflight.status(), StatusCode::OK);

        let create = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/tasks")
                    .body(junk())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(create.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    /// Repository whose listing outlives any reasonable request timeout.
    #[derive(Default)]
    struct StalledRepository {
        finished: Arc<AtomicBool>,
        abandoned: Arc<AtomicBool>,
    }

    /// Records that the listing future was dropped.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    fn unsupported() -> RepositoryError {
        RepositoryError::Store("not supported".to_string())
    }

    #[async_trait]
    impl TaskRepository for StalledRepository {
        async fn get_task(&self, _id: &str) -> Result<Option<Task>> {
            Err(unsupported())
        }

        async fn list_tasks(&self) -> Result<Vec<Task>> {
            let _dropped = DropFlag(self.abandoned.clone());
            tokio::time::sleep(Duration::from_secs(30)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn create_task(&self, _draft: TaskDraft) -> Result<Task> {
            Err(unsupported())
        }

        async fn update_task(&self, _id: &str, _patch: TaskPatch) -> Result<Option<Task>> {
            Err(unsupported())
        }

        async fn delete_task(&self, _id: &str) -> Result<Option<Task>> {
            Err(unsupported())
        }
    }

    #[tokio::test]
    async fn test_request_timeout_abandons_listing() {
        let repository = StalledRepository::default();
        let finished = repository.finished.clone();
        let abandoned = repository.abandoned.clone();
        let config = Config {
            request_timeout_secs: 1,
            origin_url: "https://app.example.com".to_string(),
            ..Config::default()
        };
        let app = create_app(AppState::new(
            Arc::new(repository),
            Arc::new(EnvSecretLookup),
            &config,
        ));

        let response = app.oneshot(request("GET", "/tasks", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            header(&response, "access-control-allow-origin"),
            Some("https://app.example.com")
        );
        assert_eq!(
            header(&response, "access-control-allow-headers"),
            Some("Content-Type")
        );
        assert!(body_is_empty(response).await);
        assert!(abandoned.load(Ordering::SeqCst));
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let app = create_app(AppState::default());

        let response = app
            .oneshot(request("GET", "/health", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(header(&response, "access-control-allow-origin"), Some("*"));
    }

    #[tokio::test]
    async fn test_custom_api_path_and_origin() {
        let config = Config {
            api_path: "todo".to_string(),
            origin_url: "https://app.example.com".to_string(),
            ..Config::default()
        };
        let state = AppState::new(
            Arc::new(TableTaskRepository::new(InMemoryTable::default())),
            Arc::new(EnvSecretLookup),
            &config,
        );
        let app = create_app(state);

        let response = app
            .oneshot(request("POST", "/todo", Some(r#"{"content":"x"}"#)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(header(&response, "location").unwrap().starts_with("/todo/"));
        assert_eq!(
            header(&response, "access-control-allow-origin"),
            Some("https://app.example.com")
        );
    }

    fn api_key_state(secret_name: &str) -> AppState {
        let config = Config {
            api_key_secret_name: Some(secret_name.to_string()),
            ..Config::default()
        };
        AppState::new(
            Arc::new(TableTaskRepository::new(InMemoryTable::default())),
            Arc::new(EnvSecretLookup),
            &config,
        )
    }

    #[tokio::test]
    async fn test_api_key_required_when_configured() {
        std::env::set_var("APP_TEST_TASKS_API_KEY", "s3cret");
        let app = create_app(api_key_state("app-test/tasks-api-key"));

        let missing = app
            .clone()
            .oneshot(request("GET", "/tasks", None))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(header(&missing, "access-control-allow-origin"), Some("*"));

        let wrong = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/tasks")
                    .header("x-api-key", "guess")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

        let valid = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/tasks")
                    .header("x-api-key", "s3cret")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(valid.status(), StatusCode::OK);

        let preflight = app
            .oneshot(request("OPTIONS", "/tasks", None))
            .await
            .unwrap();
        assert_eq!(preflight.status(), StatusCode::OK);
        assert_eq!(
            header(&preflight, "access-control-allow-headers"),
            Some("Content-Type, X-Api-Key")
        );
    }

    #[tokio::test]
    async fn test_api_key_lookup_failure() {
        let app = create_app(api_key_state("app-test/never-configured"));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/tasks")
                    .header("x-api-key", "anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_is_empty(response).await);
    }
}
