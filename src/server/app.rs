use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{charts, chat, health, projects};
use crate::config::AppConfig;
use crate::services::{ChatService, ProjectService};

#[derive(Clone)]
pub struct AppState {
    pub projects: ProjectService,
    pub chat: ChatService,
}

pub async fn create_app(
    db: DatabaseConnection,
    config: AppConfig,
    cors_origin: Option<&str>,
) -> Result<Router> {
    // Multipart bodies carry the upload plus field overhead.
    let body_limit = config.upload.max_bytes + 64 * 1024;

    let state = AppState {
        projects: ProjectService::new(db, config.upload.clone()),
        chat: ChatService::new(config.chat.clone()),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/projects",
            post(projects::create_project).get(projects::list_projects),
        )
        .route(
            "/projects/:id",
            get(projects::get_project).delete(projects::delete_project),
        )
        .route("/projects/:id/file", get(projects::get_file_data))
        .route("/projects/:id/charts", post(charts::add_chart))
        .route(
            "/projects/:id/charts/:chart_id",
            axum::routing::delete(charts::delete_chart),
        )
        .route(
            "/projects/:id/charts/:chart_id/series",
            get(charts::chart_series),
        )
        .route(
            "/projects/:id/chat",
            post(chat::ask).get(chat::history),
        )
}
