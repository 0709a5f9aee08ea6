//! Bazaar server library.
//!
//! Cart, order and product HTTP API. The binary in `main.rs` only loads
//! configuration, sets up tracing and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::any::Any;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Build the full application router with its middleware stack.
///
/// The session layer is passed in so the binary can use the `PostgreSQL`
/// store while tests use an in-memory one.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Turn a handler panic into a plain-text 500 carrying the panic message.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("handler panicked")
        .to_string();

    tracing::error!(panic = %message, "handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::{
        Json,
        body::{Body, to_bytes},
        http::{Request, header},
        routing::post,
    };
    use serde_json::{Value, json};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, Session};

    use super::*;
    use crate::error::ACCESS_DENIED_SUFFIX;
    use crate::middleware::{request_id::REQUEST_ID_HEADER, session, set_current_user};
    use crate::models::CurrentUser;

    const DATABASE_URL: &str = "postgres://bazaar@localhost/bazaar_test";

    fn state() -> AppState {
        // Never connects: every request below is rejected before it
        // reaches the database.
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(DATABASE_URL)
            .expect("lazy pool");
        AppState::new(pool)
    }

    /// The app plus a side router that logs users in against the same store.
    struct Harness {
        app: Router,
        store: MemoryStore,
    }

    impl Harness {
        fn new() -> Self {
            let store = MemoryStore::default();
            let app = app(state(), session::configure(store.clone(), false));
            Self { app, store }
        }

        async fn cookie_for(&self, role: &str) -> String {
            async fn seed(session: Session, Json(user): Json<CurrentUser>) -> StatusCode {
                set_current_user(&session, &user).await.unwrap();
                StatusCode::OK
            }

            let seeder = Router::new()
                .route("/seed", post(seed))
                .layer(session::configure(self.store.clone(), false));

            let body = json!({"id": 1, "email": "pat@shop.example", "role": role});
            let response = seeder
                .oneshot(json_request("POST", "/seed", None, &body))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);

            let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
            set_cookie.split(';').next().unwrap().to_string()
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, String) {
            let response = self.app.clone().oneshot(request).await.unwrap();
            assert!(response.headers().contains_key(REQUEST_ID_HEADER));

            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, String::from_utf8(bytes.to_vec()).unwrap())
        }
    }

    fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: &Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let harness = Harness::new();
        let (status, body) = harness.send(empty_request("GET", "/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_cart_requires_login() {
        let harness = Harness::new();
        let (status, _) = harness.send(empty_request("GET", "/cart", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_admin_is_denied_customer_routes() {
        let harness = Harness::new();
        let cookie = harness.cookie_for("ADMIN").await;

        for request in [
            empty_request("GET", "/cart", Some(&cookie)),
            empty_request("DELETE", "/cart/1", Some(&cookie)),
            empty_request("POST", "/orders", Some(&cookie)),
            empty_request("DELETE", "/orders/1", Some(&cookie)),
        ] {
            let (status, body) = harness.send(request).await;
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert!(body.ends_with(ACCESS_DENIED_SUFFIX), "{body}");
        }
    }

    #[tokio::test]
    async fn test_add_to_cart_missing_product_id() {
        let harness = Harness::new();
        let cookie = harness.cookie_for("CUSTOMER").await;

        let (status, body) = harness
            .send(json_request(
                "POST",
                "/cart/add",
                Some(&cookie),
                &json!({"quantity": 1}),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(fields, json!({"product_id": "must not be null"}));
    }

    #[tokio::test]
    async fn test_reduce_rejects_zero_quantity() {
        let harness = Harness::new();
        let cookie = harness.cookie_for("CUSTOMER").await;

        let (status, body) = harness
            .send(json_request(
                "PUT",
                "/cart/reduce",
                Some(&cookie),
                &json!({"product_id": 4, "quantity": 0}),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(fields["quantity"], "must be greater than or equal to 1");
        assert!(fields.get("product_id").is_none());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let harness = Harness::new();
        let cookie = harness.cookie_for("CUSTOMER").await;

        let request = Request::builder()
            .method("POST")
            .uri("/cart/add")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, &cookie)
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = harness.send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Value = serde_json::from_str(&body).unwrap();
        assert!(fields["body"].is_string());
    }

    #[tokio::test]
    async fn test_login_validation() {
        let harness = Harness::new();

        let (status, body) = harness
            .send(json_request(
                "POST",
                "/auth/login",
                None,
                &json!({"email": "nope"}),
            ))
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(fields["email"], "must be a well-formed email address");
        assert_eq!(fields["password"], "must not be null");
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let harness = Harness::new();
        let (status, _) = harness
            .send(empty_request("POST", "/auth/logout", None))
            .await;

        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_panic_message_becomes_500_body() {
        let response = handle_panic(Box::new("stock counter overflow"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"stock counter overflow");
    }
}
