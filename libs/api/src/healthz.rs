/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is up", body = String)
    )
)]
pub async fn get_health() -> &'static str {
    "ok"
}
