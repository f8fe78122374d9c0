use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::DriverController;
use crate::dto::driver_dto::{DriverRequest, DriverResponse};
use crate::dto::SuccessResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;
use crate::utils::validation::parse_id;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/:id", get(get_driver).put(update_driver).delete(delete_driver))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<DriverResponse>>, AppError> {
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DriverResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.get(id).await?;
    Ok(Json(response))
}

async fn create_driver(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<DriverRequest>,
) -> Result<(StatusCode, Json<DriverResponse>), AppError> {
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<DriverRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let controller = DriverController::new(state.drivers.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let controller = DriverController::new(state.drivers.clone());
    controller.delete(id).await?;
    Ok(Json(SuccessResponse::new()))
}
