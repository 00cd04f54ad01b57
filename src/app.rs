use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{elevated, protected, public};
use crate::middleware::{jwt_auth_middleware, require_admin_middleware, validate_user_middleware};
use crate::state::AppState;

/// Full router: public, protected and elevated tiers plus global layers.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security.cors_origins);
    let max_upload_bytes = state.config.api.max_upload_bytes;

    Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .merge(elevated_routes(max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(Extension(state)),
        )
}

fn public_routes() -> Router {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/login", post(public::auth::login_post))
        .route("/auth/register", post(public::auth::register_post))
}

fn protected_routes() -> Router {
    Router::new()
        .route("/api/auth/whoami", get(protected::whoami))
        .route("/api/kpis", get(protected::kpis_get))
        .route("/api/channels", get(protected::channels_get))
        // Layers run bottom-up: jwt first, then user lookup
        .route_layer(middleware::from_fn(validate_user_middleware))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn elevated_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/config", get(elevated::config_get).post(elevated::config_post))
        .route(
            "/api/upload",
            post(elevated::upload_post).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/api/dataset", get(elevated::dataset_get))
        .route("/api/users", get(elevated::users_list))
        .route("/api/users/:id", delete(elevated::user_delete))
        .route("/api/users/:id/password", put(elevated::user_password_put))
        .route("/api/users/:id/role", put(elevated::user_role_put))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route_layer(middleware::from_fn(validate_user_middleware))
        .route_layer(middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
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
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
