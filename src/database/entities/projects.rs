use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A user-owned container for one uploaded dataset and its derived charts.
///
/// `columns_json` holds the schema derived at upload time; it is the
/// authoritative column list for every later chart operation. The raw file
/// bytes are never serialized into API responses.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub file_data: Vec<u8>,
    pub file_size: i64,
    pub columns_json: String,
    pub created_at: ChronoDateTimeUtc,
    pub updated_at: ChronoDateTimeUtc,
    pub last_accessed_at: ChronoDateTimeUtc,
}

impl Model {
    /// The column schema derived at upload time.
    pub fn columns(&self) -> Vec<String> {
        serde_json::from_str(&self.columns_json).unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::charts::Entity")]
    Charts,
    #[sea_orm(has_many = "super::chat_turns::Entity")]
    ChatTurns,
}

impl Related<super::charts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Charts.def()
    }
}

impl Related<super::chat_turns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ChatTurns.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
