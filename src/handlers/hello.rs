use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HelloBody {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/hello",
    tag = "hello",
    responses((status = 200, description = "Greeting", body = HelloBody))
)]
pub async fn hello() -> Json<HelloBody> {
    Json(HelloBody {
        message: "Hello, World!".to_string(),
    })
}
