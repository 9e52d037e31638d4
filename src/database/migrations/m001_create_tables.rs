use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Projects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Projects::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Projects::Name).string_len(50).not_null())
                    .col(ColumnDef::new(Projects::OwnerId).integer().not_null())
                    .col(ColumnDef::new(Projects::FileName).text().not_null())
                    .col(ColumnDef::new(Projects::FileData).binary().not_null())
                    .col(ColumnDef::new(Projects::FileSize).big_integer().not_null())
                    .col(
                        ColumnDef::new(Projects::ColumnsJson)
                            .text()
                            .not_null()
                            .default("[]"),
                    )
                    .col(ColumnDef::new(Projects::CreatedAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Projects::UpdatedAt).timestamp_with_time_zone().not_null())
                    .col(
                        ColumnDef::new(Projects::LastAccessedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Charts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Charts::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Charts::ProjectId).integer().not_null())
                    .col(ColumnDef::new(Charts::Kind).text().not_null())
                    .col(ColumnDef::new(Charts::Title).text().not_null())
                    .col(ColumnDef::new(Charts::XAxis).text())
                    .col(ColumnDef::new(Charts::YAxis).text())
                    .col(ColumnDef::new(Charts::ZAxis).text())
                    .col(ColumnDef::new(Charts::DataColumn).text())
                    .col(
                        ColumnDef::new(Charts::Color)
                            .text()
                            .not_null()
                            .default("#4F46E5"),
                    )
                    .col(ColumnDef::new(Charts::CreatedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_charts_project_id")
                            .from(Charts::Table, Charts::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatTurns::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ChatTurns::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ChatTurns::ProjectId).integer().not_null())
                    .col(ColumnDef::new(ChatTurns::Question).text().not_null())
                    .col(ColumnDef::new(ChatTurns::Answer).text().not_null())
                    .col(ColumnDef::new(ChatTurns::AskedAt).timestamp_with_time_zone().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_turns_project_id")
                            .from(ChatTurns::Table, ChatTurns::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatTurns::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Charts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Projects::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Projects {
    Table,
    Id,
    Name,
    OwnerId,
    FileName,
    FileData,
    FileSize,
    ColumnsJson,
    CreatedAt,
    UpdatedAt,
    LastAccessedAt,
}

#[derive(Iden)]
enum Charts {
    Table,
    Id,
    ProjectId,
    Kind,
    Title,
    XAxis,
    YAxis,
    ZAxis,
    DataColumn,
    Color,
    CreatedAt,
}

#[derive(Iden)]
enum ChatTurns {
    Table,
    Id,
    ProjectId,
    Question,
    Answer,
    AskedAt,
}
