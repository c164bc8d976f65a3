use axum::http::StatusCode;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is up"))
)]
pub async fn get_health() -> StatusCode {
    StatusCode::OK
}
