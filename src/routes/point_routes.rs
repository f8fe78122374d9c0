use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::controllers::PointController;
use crate::dto::point_dto::{PointRequest, PointResponse, PointWriteResponse};
use crate::dto::SuccessResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiJson;
use crate::utils::validation::parse_id;

pub fn create_point_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_points).post(create_point))
        .route("/:id", put(update_point).delete(delete_point))
}

async fn list_points(State(state): State<AppState>) -> Result<Json<Vec<PointResponse>>, AppError> {
    let controller = PointController::new(state.points.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn create_point(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PointRequest>,
) -> Result<(StatusCode, Json<PointWriteResponse>), AppError> {
    let controller = PointController::new(state.points.clone());
    let response = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn update_point(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<PointRequest>,
) -> Result<Json<PointWriteResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let controller = PointController::new(state.points.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_point(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let controller = PointController::new(state.points.clone());
    controller.delete(id).await?;
    Ok(Json(SuccessResponse::new()))
}
