use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::RouteController;
use crate::dto::route_dto::{RouteSelector, RoutesQuery, StatusQuery};
use crate::dto::SuccessResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::ApiQuery;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_routes))
        .route("/status", post(update_route_status).patch(update_route_status))
}

// A driver listing returns `{driver, routes}`, a point listing a bare array
async fn list_routes(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RoutesQuery>,
) -> Result<Response, AppError> {
    let controller = RouteController::new(state.drivers.clone(), state.routes.clone());

    let response = match query.selector()? {
        RouteSelector::Driver(driver_id) => Json(controller.for_driver(driver_id).await?).into_response(),
        RouteSelector::Point(point_id) => Json(controller.for_point(point_id).await?).into_response(),
    };
    Ok(response)
}

async fn update_route_status(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StatusQuery>,
) -> Result<Json<SuccessResponse>, AppError> {
    let (route_id, status) = query.parse()?;
    let controller = RouteController::new(state.drivers.clone(), state.routes.clone());
    controller.update_status(route_id, status).await?;
    Ok(Json(SuccessResponse::new()))
}
