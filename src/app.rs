use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use crate::auth::JwtKeys;
use crate::chat::ChatService;
use crate::config::{ApiConfig, SecurityConfig};
use crate::handlers;
use crate::middleware::principal_middleware;

/// State shared by every request. Read-only after start.
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    pub jwt: JwtKeys,
}

impl AppState {
    pub fn new(chat: ChatService, jwt: JwtKeys) -> Self {
        Self { chat: Arc::new(chat), jwt }
    }
}

pub fn app(state: AppState, api: &ApiConfig, security: &SecurityConfig) -> Router {
    let chat_routes: Router<AppState> = Router::new()
        .route("/chat", get(handlers::chat_get).post(handlers::chat_post))
        .route_layer(middleware::from_fn_with_state(state.clone(), principal_middleware));

    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(chat_routes)
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .with_state(state);

    let router = match cors_layer(security) {
        Some(cors) => router.layer(cors),
        None => router,
    };

    if api.enable_request_logging {
        router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    } else {
        router
    }
}

fn cors_layer(security: &SecurityConfig) -> Option<CorsLayer> {
    if !security.enable_cors {
        return None;
    }
    if security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE]),
    )
}
