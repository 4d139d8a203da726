use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Recurrences {
    Table,
    Id,
    UserId,
    ServiceId,
    ClientId,
    Frequency,
    StartDate,
    EndDate,
    Title,
    StartTime,
    EndTime,
    PricePerHour,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Meetings {
    Table,
    Id,
    UserId,
    ServiceId,
    ClientId,
    RecurrenceId,
    Title,
    StartTime,
    EndTime,
    PricePerHour,
    PriceTotal,
    Status,
    Paid,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Services {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Clients {
    Table,
    Id,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("recurrence_frequency"))
                    .values(vec![
                        Alias::new("weekly"),
                        Alias::new("biweekly"),
                        Alias::new("monthly"),
                    ])
                    .to_owned(),
            )
            .await?;
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("meeting_status"))
                    .values(vec![
                        Alias::new("upcoming"),
                        Alias::new("done"),
                        Alias::new("canceled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Recurrences::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Recurrences::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Recurrences::UserId).uuid().not_null())
                    .col(ColumnDef::new(Recurrences::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Recurrences::ClientId).uuid().not_null())
                    .col(
                        ColumnDef::new(Recurrences::Frequency)
                            .custom(Alias::new("recurrence_frequency"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recurrences::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recurrences::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Recurrences::Title).string_len(255).not_null())
                    // times of day as "HH:MM" / "HH:MM:SS"
                    .col(
                        ColumnDef::new(Recurrences::StartTime)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recurrences::EndTime)
                            .string_len(8)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recurrences::PricePerHour)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Recurrences::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Recurrences::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurrences_service")
                            .from(Recurrences::Table, Recurrences::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_recurrences_client")
                            .from(Recurrences::Table, Recurrences::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_recurrences_user")
                    .table(Recurrences::Table)
                    .col(Recurrences::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Meetings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Meetings::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Meetings::UserId).uuid().not_null())
                    .col(ColumnDef::new(Meetings::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Meetings::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Meetings::RecurrenceId).uuid().null())
                    .col(ColumnDef::new(Meetings::Title).string_len(255).null())
                    .col(
                        ColumnDef::new(Meetings::StartTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Meetings::EndTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Meetings::PricePerHour).double().not_null())
                    .col(ColumnDef::new(Meetings::PriceTotal).double().not_null())
                    .col(
                        ColumnDef::new(Meetings::Status)
                            .custom(Alias::new("meeting_status"))
                            .not_null()
                            .default(Expr::cust("'upcoming'::meeting_status")),
                    )
                    .col(
                        ColumnDef::new(Meetings::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Meetings::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Meetings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_service")
                            .from(Meetings::Table, Meetings::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_client")
                            .from(Meetings::Table, Meetings::ClientId)
                            .to(Clients::Table, Clients::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // instances survive the pattern row
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meetings_recurrence")
                            .from(Meetings::Table, Meetings::RecurrenceId)
                            .to(Recurrences::Table, Recurrences::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_user")
                    .table(Meetings::Table)
                    .col(Meetings::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_client")
                    .table(Meetings::Table)
                    .col(Meetings::ClientId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_recurrence")
                    .table(Meetings::Table)
                    .col(Meetings::RecurrenceId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_start_time")
                    .table(Meetings::Table)
                    .col(Meetings::StartTime)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Meetings::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Recurrences::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("meeting_status")).to_owned())
            .await?;
        manager
            .drop_type(
                Type::drop()
                    .name(Alias::new("recurrence_frequency"))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
