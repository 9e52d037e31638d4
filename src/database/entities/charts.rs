use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One saved chart specification. Charts are created through the project's
/// add-chart operation and deleted individually; there is no in-place update.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "charts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub project_id: i32,
    pub kind: String,
    pub title: String,
    pub x_axis: Option<String>,
    pub y_axis: Option<String>,
    pub z_axis: Option<String>,
    pub data_column: Option<String>,
    pub color: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
