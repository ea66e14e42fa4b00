use crate::{
    api::AppState,
    domain::{Account, InvokeError},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(invoke_get, invoke_post), components(schemas(Account)))]
pub struct ApiDoc;

pub fn app() -> Router<AppState> {
    Router::new().route("/{function}", get(invoke_get).post(invoke_post))
}

/// Invoke a function without payload, e.g. `readAccount`.
#[utoipa::path(
    get,
    path = "/v0/{function}",
    params(("function" = String, Path, description = "Registered function name")),
    responses(
        (status = 200, description = "Function result", body = Account),
        (status = 404, description = "Unknown function name")
    )
)]
async fn invoke_get(
    State(state): State<AppState>,
    Path(function): Path<String>,
) -> Result<Json<Value>, InvokeRejection> {
    let value = state.registry.invoke(&function, None)?;
    Ok(Json(value))
}

/// Invoke a function with an optional JSON payload, e.g. `createAccount`.
#[utoipa::path(
    post,
    path = "/v0/{function}",
    params(("function" = String, Path, description = "Registered function name")),
    request_body = Account,
    responses(
        (status = 200, description = "Function result", body = Account),
        (status = 404, description = "Unknown function name"),
        (status = 422, description = "Payload does not match the function's input shape")
    )
)]
async fn invoke_post(
    State(state): State<AppState>,
    Path(function): Path<String>,
    payload: Option<Json<Value>>,
) -> Result<Json<Value>, InvokeRejection> {
    let payload = payload.map(|Json(value)| value);
    let value = state.registry.invoke(&function, payload)?;
    Ok(Json(value))
}

struct InvokeRejection(InvokeError);

impl From<InvokeError> for InvokeRejection {
    fn from(error: InvokeError) -> Self {
        Self(error)
    }
}

impl IntoResponse for InvokeRejection {
    fn into_response(self) -> Response {
        let status = match self.0 {
            InvokeError::UnknownFunction(_) => StatusCode::NOT_FOUND,
            InvokeError::InvalidPayload(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (status, self.0.to_string()).into_response()
    }
}
