use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::Config;
use crate::db::CredentialsStorage;
use crate::error::panic_response;
use crate::handlers::{
    create_credential, delete_credential, get_credential, health_handler, list_credentials,
    update_credential,
};
use crate::ui::{serve_spa, serve_static_asset};
use crate::validate::CredentialPolicy;

/// Handler state: one store handle, shared by every request.
#[derive(Clone)]
pub struct VaultState {
    pub storage: CredentialsStorage,
    pub policy: CredentialPolicy,
}

impl VaultState {
    pub fn new(storage: CredentialsStorage, policy: CredentialPolicy) -> Self {
        Self { storage, policy }
    }
}

pub fn vault_router(state: VaultState, cfg: &Config) -> Router {
    let api = Router::new()
        .route(
            "/v1/credentials",
            get(list_credentials).post(create_credential),
        )
        .route(
            "/v1/credentials/{id}",
            get(get_credential)
                .put(update_credential)
                .delete(delete_credential),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .with_state(state);

    let router = Router::new()
        .nest("/api", api)
        .route("/health", get(health_handler))
        .route("/assets/{*path}", get(serve_static_asset))
        .fallback(serve_spa);

    service_layers(router, cfg)
}

/// Outer middleware shared by every route: timeout (408), CORS, panic → JSON
/// 500 and request tracing.
pub fn service_layers(router: Router, cfg: &Config) -> Router {
    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            cfg.request_timeout,
        ))
        .layer(cors_layer(&cfg.cors_allowed_origins))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(300));

    // credentials cannot be combined with a wildcard origin
    if origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| {
            o.parse::<HeaderValue>()
                .inspect_err(|_| warn!(origin = %o, "ignoring unparsable CORS origin"))
                .ok()
        })
        .collect();
    base.allow_origin(allowed).allow_credentials(true)
}
