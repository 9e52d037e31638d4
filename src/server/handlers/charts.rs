use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::chart::{ChartSeries, ChartSpec};
use crate::database::entities::charts;
use crate::server::app::AppState;
use crate::server::auth::CurrentUser;
use crate::server::error::ApiError;

/// A stored chart together with its shaped series.
#[derive(Serialize)]
pub struct SeriesResponse {
    pub chart: charts::Model,
    pub series: ChartSeries,
}

#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/charts",
    params(("id" = i32, Path, description = "Project ID")),
    request_body = ChartSpec,
    responses(
        (status = 201, description = "Chart added to the project"),
        (status = 400, description = "Spec is incomplete or references unknown columns"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn add_chart(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
    Json(spec): Json<ChartSpec>,
) -> Result<(StatusCode, Json<charts::Model>), ApiError> {
    let chart = state.projects.add_chart(user.id, id, spec).await?;
    Ok((StatusCode::CREATED, Json(chart)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}/charts/{chart_id}",
    params(
        ("id" = i32, Path, description = "Project ID"),
        ("chart_id" = String, Path, description = "Chart ID")
    ),
    responses(
        (status = 204, description = "Chart deleted"),
        (status = 404, description = "Project or chart not found")
    )
)]
pub async fn delete_chart(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, chart_id)): Path<(i32, String)>,
) -> Result<StatusCode, ApiError> {
    state.projects.delete_chart(user.id, id, &chart_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/charts/{chart_id}/series",
    params(
        ("id" = i32, Path, description = "Project ID"),
        ("chart_id" = String, Path, description = "Chart ID")
    ),
    responses(
        (status = 200, description = "Shaped series data for the chart"),
        (status = 400, description = "The selected column has no values to chart"),
        (status = 404, description = "Project or chart not found")
    )
)]
pub async fn chart_series(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, chart_id)): Path<(i32, String)>,
) -> Result<Json<SeriesResponse>, ApiError> {
    let (chart, series) = state.projects.chart_series(user.id, id, &chart_id).await?;
    Ok(Json(SeriesResponse { chart, series }))
}
