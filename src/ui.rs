use axum::{
    Json,
    body::Body,
    extract::Path,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

use crate::error::ApiErrorResponse;

#[derive(RustEmbed)]
#[folder = "ui/dist"]
struct Asset;

const ASSET_CACHE: &str = "public, max-age=31536000";
const INDEX_CACHE: &str = "no-cache, no-store, must-revalidate";

/// GET /assets/{*path}: long-lived embedded build output.
pub async fn serve_static_asset(Path(path): Path<String>) -> Response {
    let path = format!("assets/{}", path.trim_start_matches('/'));
    match embedded(&path, ASSET_CACHE) {
        Some(resp) => resp,
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}

/// Fallback for everything the router did not match.
/// Unknown API paths get a JSON 404; other GET/HEAD requests resolve to an
/// embedded file or, failing that, to `index.html` so client-side routes load.
pub async fn serve_spa(method: Method, uri: Uri) -> Response {
    let raw = uri.path();
    if raw == "/api" || raw.starts_with("/api/") {
        return json_error(StatusCode::NOT_FOUND, "not found");
    }
    if method != Method::GET && method != Method::HEAD {
        let mut resp = json_error(StatusCode::METHOD_NOT_ALLOWED, "method not allowed");
        resp.headers_mut()
            .insert(header::ALLOW, header::HeaderValue::from_static("GET, HEAD"));
        return resp;
    }

    let path = raw.trim_start_matches('/');
    if !path.is_empty()
        && path != "index.html"
        && let Some(resp) = embedded(path, INDEX_CACHE)
    {
        return resp;
    }

    match embedded("index.html", INDEX_CACHE) {
        Some(resp) => resp,
        None => (StatusCode::NOT_FOUND, "UI not found").into_response(),
    }
}

fn embedded(path: &str, cache_control: &'static str) -> Option<Response> {
    let content = Asset::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            [
                (header::CONTENT_TYPE, mime.as_ref().to_string()),
                (header::CACHE_CONTROL, cache_control.to_string()),
            ],
            Body::from(content.data),
        )
            .into_response(),
    )
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ApiErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}
