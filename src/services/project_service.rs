use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::chart::{shape_chart_data, validate_chart_spec, ChartKind, ChartSeries, ChartSpec};
use crate::chart::spec::NormalizedChartSpec;
use crate::config::UploadConfig;
use crate::database::entities::{charts, chat_turns, projects};
use crate::errors::{ProjectError, ProjectResult};
use crate::ingest::{parse_tabular_file, TabularData};

const MAX_NAME_LEN: usize = 50;

/// Owner-scoped operations on the project aggregate: uploads, charts, shaped
/// series and the chat log. Every query filters by `owner_id`, so a foreign
/// project is indistinguishable from a missing one.
#[derive(Clone)]
pub struct ProjectService {
    db: DatabaseConnection,
    upload: UploadConfig,
}

impl ProjectService {
    pub fn new(db: DatabaseConnection, upload: UploadConfig) -> Self {
        Self { db, upload }
    }

    /// Parse an uploaded file and persist a new project around it.
    ///
    /// The derived columns become the authoritative schema for every later
    /// chart operation against this project.
    pub async fn create_project(
        &self,
        owner_id: i32,
        name: Option<String>,
        file_name: &str,
        bytes: &[u8],
    ) -> ProjectResult<projects::Model> {
        let parsed = parse_tabular_file(bytes, file_name, &self.upload)?;
        let name = validate_name(name)?;
        let now = Utc::now();

        let project = projects::ActiveModel {
            name: Set(name),
            owner_id: Set(owner_id),
            file_name: Set(file_name.to_string()),
            file_data: Set(bytes.to_vec()),
            file_size: Set(bytes.len() as i64),
            columns_json: Set(serde_json::to_string(&parsed.columns).unwrap_or_default()),
            created_at: Set(now),
            updated_at: Set(now),
            last_accessed_at: Set(now),
            ..Default::default()
        };

        let project = project.insert(&self.db).await?;
        debug!(
            project_id = project.id,
            columns = parsed.columns.len(),
            rows = parsed.rows.len(),
            "created project from upload"
        );
        Ok(project)
    }

    /// Fetch a project; like every read, this refreshes `last_accessed_at`.
    pub async fn get_project(&self, owner_id: i32, id: i32) -> ProjectResult<projects::Model> {
        self.find_owned(owner_id, id).await
    }

    /// All of the owner's projects, most recently accessed first. Listing is
    /// itself an access, so every returned project gets its stamp refreshed.
    pub async fn list_projects(&self, owner_id: i32) -> ProjectResult<Vec<projects::Model>> {
        projects::Entity::update_many()
            .col_expr(projects::Column::LastAccessedAt, Expr::value(Utc::now()))
            .filter(projects::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await?;

        let projects = projects::Entity::find()
            .filter(projects::Column::OwnerId.eq(owner_id))
            .order_by_desc(projects::Column::LastAccessedAt)
            .all(&self.db)
            .await?;
        Ok(projects)
    }

    /// Re-parse the stored upload into rows and columns.
    pub async fn get_file_data(&self, owner_id: i32, id: i32) -> ProjectResult<TabularData> {
        let project = self.find_owned(owner_id, id).await?;
        let parsed = parse_tabular_file(&project.file_data, &project.file_name, &self.upload)?;
        Ok(parsed)
    }

    /// Delete a project; charts and chat turns cascade with it.
    pub async fn delete_project(&self, owner_id: i32, id: i32) -> ProjectResult<()> {
        let project = self.find_owned(owner_id, id).await?;
        projects::Entity::delete_by_id(project.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Charts in insertion order. Timestamps can collide within a clock tick,
    /// so ordering leans on sqlite's rowid instead of `created_at`.
    pub async fn list_charts(&self, owner_id: i32, id: i32) -> ProjectResult<Vec<charts::Model>> {
        let project = self.find_owned(owner_id, id).await?;
        let charts = charts::Entity::find()
            .filter(charts::Column::ProjectId.eq(project.id))
            .order_by(Expr::cust("rowid"), Order::Asc)
            .all(&self.db)
            .await?;
        Ok(charts)
    }

    /// Validate a chart spec against the stored schema and append it.
    pub async fn add_chart(
        &self,
        owner_id: i32,
        id: i32,
        spec: ChartSpec,
    ) -> ProjectResult<charts::Model> {
        let project = self.find_owned(owner_id, id).await?;
        let columns = project.columns();
        if columns.is_empty() {
            return Err(ProjectError::Validation(
                "this project's dataset has no columns; charts cannot be added".to_string(),
            ));
        }

        let normalized = validate_chart_spec(spec, &columns)?;

        let chart = charts::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            project_id: Set(project.id),
            kind: Set(normalized.kind.as_str().to_string()),
            title: Set(normalized.title),
            x_axis: Set(normalized.x_axis),
            y_axis: Set(normalized.y_axis),
            z_axis: Set(normalized.z_axis),
            data_column: Set(normalized.data_column),
            color: Set(normalized.color),
            created_at: Set(Utc::now()),
        };

        Ok(chart.insert(&self.db).await?)
    }

    /// Remove one chart by id; absent charts surface as `ChartNotFound`.
    pub async fn delete_chart(
        &self,
        owner_id: i32,
        id: i32,
        chart_id: &str,
    ) -> ProjectResult<()> {
        let project = self.find_owned(owner_id, id).await?;
        let result = charts::Entity::delete_many()
            .filter(charts::Column::ProjectId.eq(project.id))
            .filter(charts::Column::Id.eq(chart_id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ProjectError::ChartNotFound);
        }
        Ok(())
    }

    /// Shape the series for one stored chart from the project's rows.
    pub async fn chart_series(
        &self,
        owner_id: i32,
        id: i32,
        chart_id: &str,
    ) -> ProjectResult<(charts::Model, ChartSeries)> {
        let project = self.find_owned(owner_id, id).await?;

        let chart = charts::Entity::find()
            .filter(charts::Column::ProjectId.eq(project.id))
            .filter(charts::Column::Id.eq(chart_id))
            .one(&self.db)
            .await?
            .ok_or(ProjectError::ChartNotFound)?;

        let parsed = parse_tabular_file(&project.file_data, &project.file_name, &self.upload)?;
        let spec = stored_spec(&chart)?;
        let series = shape_chart_data(&parsed.rows, &spec)?;
        Ok((chart, series))
    }

    /// Exact-string cache lookup: paraphrased questions always miss.
    pub async fn cached_answer(
        &self,
        owner_id: i32,
        id: i32,
        question: &str,
    ) -> ProjectResult<Option<String>> {
        let project = self.find_owned(owner_id, id).await?;
        let turn = chat_turns::Entity::find()
            .filter(chat_turns::Column::ProjectId.eq(project.id))
            .filter(chat_turns::Column::Question.eq(question))
            .order_by_asc(chat_turns::Column::AskedAt)
            .one(&self.db)
            .await?;
        Ok(turn.map(|t| t.answer))
    }

    /// Append a question/answer pair to the project's chat log.
    pub async fn record_chat_turn(
        &self,
        owner_id: i32,
        id: i32,
        question: &str,
        answer: &str,
    ) -> ProjectResult<chat_turns::Model> {
        let project = self.find_owned(owner_id, id).await?;
        let turn = chat_turns::ActiveModel {
            project_id: Set(project.id),
            question: Set(question.to_string()),
            answer: Set(answer.to_string()),
            asked_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(turn.insert(&self.db).await?)
    }

    /// The chat log in asked order.
    pub async fn chat_history(
        &self,
        owner_id: i32,
        id: i32,
    ) -> ProjectResult<Vec<chat_turns::Model>> {
        let project = self.find_owned(owner_id, id).await?;
        let turns = chat_turns::Entity::find()
            .filter(chat_turns::Column::ProjectId.eq(project.id))
            .order_by_asc(chat_turns::Column::AskedAt)
            .all(&self.db)
            .await?;
        Ok(turns)
    }

    /// Look up one of the owner's projects and refresh `last_accessed_at`.
    /// Every single-project operation goes through here, so any read or write
    /// against a project counts as an access.
    async fn find_owned(&self, owner_id: i32, id: i32) -> ProjectResult<projects::Model> {
        let project = projects::Entity::find_by_id(id)
            .filter(projects::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await?
            .ok_or(ProjectError::NotFound)?;

        let mut active: projects::ActiveModel = project.into();
        active.last_accessed_at = Set(Utc::now());
        Ok(active.update(&self.db).await?)
    }
}

/// Rebuild a validated spec from a stored chart row. Stored kinds were
/// validated at creation time, so an unparseable kind is a data error.
fn stored_spec(chart: &charts::Model) -> ProjectResult<NormalizedChartSpec> {
    let kind = ChartKind::parse(&chart.kind)?;
    Ok(NormalizedChartSpec {
        kind,
        title: chart.title.clone(),
        x_axis: chart.x_axis.clone(),
        y_axis: chart.y_axis.clone(),
        z_axis: chart.z_axis.clone(),
        data_column: chart.data_column.clone(),
        color: chart.color.clone(),
    })
}

fn validate_name(name: Option<String>) -> ProjectResult<String> {
    let name = match name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => format!("Project-{}", Utc::now().timestamp_millis()),
    };

    if name.len() > MAX_NAME_LEN {
        return Err(ProjectError::Validation(format!(
            "project name cannot exceed {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(name)
}
