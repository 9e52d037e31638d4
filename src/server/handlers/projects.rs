use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::database::entities::{charts, projects};
use crate::ingest::TabularData;
use crate::server::app::AppState;
use crate::server::auth::CurrentUser;
use crate::server::error::ApiError;

/// A project plus its charts, without the stored file bytes.
#[derive(Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: projects::Model,
    pub columns: Vec<String>,
    pub charts: Vec<charts::Model>,
}

#[utoipa::path(
    post,
    path = "/api/v1/projects",
    responses(
        (status = 201, description = "Project created from the uploaded file"),
        (status = 400, description = "Missing file, unsupported format or malformed content"),
        (status = 413, description = "Upload exceeds the size limit")
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<projects::Model>), ApiError> {
    let mut name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(err.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| ApiError::bad_request(err.to_string()))?;
                name = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(err.to_string()))?;
                file = Some((file_name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let Some((file_name, bytes)) = file else {
        return Err(ApiError::bad_request("no file uploaded"));
    };

    let project = state
        .projects
        .create_project(user.id, name, &file_name, &bytes)
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    responses(
        (status = 200, description = "The caller's projects, most recently accessed first")
    )
)]
pub async fn list_projects(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<projects::Model>>, ApiError> {
    let projects = state.projects.list_projects(user.id).await?;
    Ok(Json(projects))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project with its charts"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let project = state.projects.get_project(user.id, id).await?;
    let charts = state.projects.list_charts(user.id, id).await?;
    let columns = project.columns();
    Ok(Json(ProjectDetail {
        project,
        columns,
        charts,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}/file",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Parsed rows and columns of the stored upload"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn get_file_data(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<TabularData>, ApiError> {
    let data = state.projects.get_file_data(user.id, id).await?;
    Ok(Json(data))
}

#[utoipa::path(
    delete,
    path = "/api/v1/projects/{id}",
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 204, description = "Project deleted"),
        (status = 404, description = "Project not found")
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    state.projects.delete_project(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
