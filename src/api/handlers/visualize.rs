// src/api/handlers/visualize.rs
use actix_web::http::{header, StatusCode};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use uuid::Uuid;
use crate::api::AppState;
use crate::models::ApiError;

/// Body of the relay's own failure when the rendering service is unreachable.
pub const RELAY_FAILURE_MESSAGE: &str = "An unexpected error occurred";

/// Forwards a submission to the rendering service. Upstream status codes and
/// bodies pass through unchanged; only a transport failure is answered by the
/// relay itself.
pub async fn relay_visualize(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let relay_id = Uuid::new_v4();
    let url = state.config.upstream_visualize_url();
    log::info!("[{}] Forwarding {} bytes to {}", relay_id, body.len(), url);

    let upstream = match state
        .client
        .post(&url)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(body.to_vec())
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) => {
            log::error!("[{}] Rendering service unreachable: {}", relay_id, e);
            return Ok(relay_failure());
        }
    };

    let upstream_status = upstream.status();
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let payload = match upstream.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            log::error!("[{}] Failed to read upstream body: {}", relay_id, e);
            return Ok(relay_failure());
        }
    };

    let status = if upstream_status.is_success() {
        StatusCode::OK
    } else {
        StatusCode::from_u16(upstream_status.as_u16()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    };
    log::info!("[{}] Upstream answered {} -> relaying {}", relay_id, upstream_status, status);

    let mut response = HttpResponse::build(status);
    if let Some(content_type) = content_type {
        response.insert_header((header::CONTENT_TYPE, content_type));
    }
    Ok(response.body(payload.to_vec()))
}

pub async fn method_not_allowed(req: HttpRequest) -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, "POST"))
        .body(format!("Method {} Not Allowed", req.method()))
}

fn relay_failure() -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiError {
        error: RELAY_FAILURE_MESSAGE.to_string(),
    })
}
