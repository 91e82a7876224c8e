// app.rs - Shared state and router assembly

use std::any::Any;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthService, TokenSigner};
use crate::config::{AppConfig, SecurityConfig};
use crate::error::ApiError;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_role, AllowedRoles};
use crate::services::ProductService;
use crate::store::{CredentialStore, ProductRepository};

/// Everything a handler can reach. Cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub products: ProductService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        users: Arc<CredentialStore>,
        repository: Arc<ProductRepository>,
    ) -> Self {
        let signer = TokenSigner::new(
            config.security.jwt_secret.clone(),
            config.security.token_ttl_secs,
        );

        Self {
            auth: AuthService::new(users, signer),
            products: ProductService::new(repository),
            config: Arc::new(config),
        }
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let signer = state.auth.signer().clone();

    let api = Router::new()
        .merge(public_routes())
        .merge(protected_routes(signer.clone()))
        .merge(elevated_routes(signer));

    let mut app = Router::new()
        .route("/", get(public::health::root))
        .nest("/api", api)
        .fallback(route_not_found);

    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.layer(cors_layer(&state.config.security))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(public::health::health))
        .route("/auth/login", post(public::auth::login_post))
        .route("/products", get(public::products::list))
        .route("/products/:id", get(public::products::show))
}

fn protected_routes(signer: TokenSigner) -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(protected::auth::me_get))
        .route("/auth/logout", post(protected::auth::logout_post))
        .route_layer(from_fn_with_state(signer, jwt_auth_middleware))
}

/// Layers added later run first: the token verifier wraps the role guard.
fn elevated_routes(signer: TokenSigner) -> Router<AppState> {
    Router::new()
        .route("/products", post(elevated::products::create))
        .route(
            "/products/:id",
            put(elevated::products::update).delete(elevated::products::delete),
        )
        .route_layer(from_fn_with_state(AllowedRoles::admin_only(), require_role))
        .route_layer(from_fn_with_state(signer, jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::{Product, Rating};
    use crate::types::Role;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const SECRET: &str = "router-secret";

    fn state() -> AppState {
        let users = CredentialStore::from_plaintext(&[
            (1, "admin", "pw-admin", Role::Admin),
            (2, "user", "pw-user", Role::User),
        ])
        .unwrap();
        let repository = ProductRepository::with_products(vec![Product {
            id: 1,
            title: "Backpack".to_string(),
            price: 109.95,
            description: "Fits laptops".to_string(),
            category: "bags".to_string(),
            image: "backpack.jpg".to_string(),
            rating: Rating { rate: 3.9, count: 120 },
        }])
        .unwrap();

        AppState::new(
            AppConfig::with_secret(SECRET),
            Arc::new(users),
            Arc::new(repository),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn bearer(state: &AppState, user_id: u64, role: Role) -> String {
        format!("Bearer {}", state.auth.signer().issue(user_id, role).unwrap())
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = router(state());
        let request = Request::get("/nope").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Route not found" }));
    }

    #[tokio::test]
    async fn public_and_elevated_routes_share_paths() {
        let state = state();
        let app = router(state.clone());

        let (status, body) = send(
            app.clone(),
            Request::get("/api/products/1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Backpack");

        let (status, body) = send(
            app.clone(),
            Request::delete("/api/products/1").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "message": "No token provided" }));

        let (status, body) = send(
            app.clone(),
            Request::delete("/api/products/1")
                .header(header::AUTHORIZATION, bearer(&state, 2, Role::User))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({ "message": "Insufficient permissions." }));

        let (status, _) = send(
            app,
            Request::delete("/api/products/1")
                .header(header::AUTHORIZATION, bearer(&state, 1, Role::Admin))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.products.count().await, 0);
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_400() {
        let state = state();
        let app = router(state.clone());

        let request = Request::post("/api/products")
            .header(header::AUTHORIZATION, bearer(&state, 1, Role::Admin))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn health_reports_product_count() {
        let app = router(state());
        let request = Request::get("/api/health").body(Body::empty()).unwrap();

        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "API is running");
        assert_eq!(body["products"], 1);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let app = router(state());
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/products")
            .header(header::ORIGIN, "http://localhost:5173")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[test]
    fn panics_render_generic_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
