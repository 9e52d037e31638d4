pub mod app;
pub mod auth;
pub mod error;
pub mod handlers;

use anyhow::Result;
use clap::Subcommand;
use sea_orm_migration::prelude::*;
use tracing::info;

use crate::config::AppConfig;
use crate::database::{connection::*, migrations::Migrator};

#[derive(Subcommand, Debug)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

pub async fn start_server(
    port: u16,
    database_path: &str,
    cors_origin: Option<&str>,
    config: AppConfig,
) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    Migrator::up(&db, None).await?;
    info!("Database migrations completed");

    let app = app::create_app(db, config, cors_origin).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                                      - Health check");
    info!("  /api/v1/projects                             - Upload & list projects");
    info!("  /api/v1/projects/:id                         - Project detail & delete");
    info!("  /api/v1/projects/:id/file                    - Parsed rows and columns");
    info!("  /api/v1/projects/:id/charts                  - Add chart");
    info!("  /api/v1/projects/:id/charts/:chart_id        - Delete chart");
    info!("  /api/v1/projects/:id/charts/:chart_id/series - Shaped series data");
    info!("  /api/v1/projects/:id/chat                    - AI assistant & history");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
