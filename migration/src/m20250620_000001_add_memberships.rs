use sea_orm_migration::prelude::extension::postgres::Type;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Memberships {
    Table,
    Id,
    UserId,
    ServiceId,
    ClientId,
    Name,
    TotalMeetings,
    PricePerMembership,
    AvailabilityDays,
    Status,
    Paid,
    StartDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Meetings {
    Table,
    MembershipId,
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
                    .as_enum(Alias::new("membership_status"))
                    .values(vec![
                        Alias::new("active"),
                        Alias::new("expired"),
                        Alias::new("canceled"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Memberships::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Memberships::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Memberships::UserId).uuid().not_null())
                    .col(ColumnDef::new(Memberships::ServiceId).uuid().not_null())
                    .col(ColumnDef::new(Memberships::ClientId).uuid().not_null())
                    .col(ColumnDef::new(Memberships::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Memberships::TotalMeetings)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::PricePerMembership)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::AvailabilityDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::Status)
                            .custom(Alias::new("membership_status"))
                            .not_null()
                            .default(Expr::cust("'active'::membership_status")),
                    )
                    .col(
                        ColumnDef::new(Memberships::Paid)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    // stamped on first consumption, anchors the validity window
                    .col(
                        ColumnDef::new(Memberships::StartDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Memberships::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::cust("NOW()"))
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_service")
                            .from(Memberships::Table, Memberships::ServiceId)
                            .to(Services::Table, Services::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memberships_client")
                            .from(Memberships::Table, Memberships::ClientId)
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
                    .name("idx_memberships_user")
                    .table(Memberships::Table)
                    .col(Memberships::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_memberships_client")
                    .table(Memberships::Table)
                    .col(Memberships::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .alter_table(
                Table::alter()
                    .table(Meetings::Table)
                    .add_column(ColumnDef::new(Meetings::MembershipId).uuid().null())
                    .to_owned(),
            )
            .await?;

        // funded meetings keep their history when a membership row goes away
        manager
            .alter_table(
                Table::alter()
                    .table(Meetings::Table)
                    .add_foreign_key(
                        TableForeignKey::new()
                            .name("fk_meetings_membership")
                            .from_tbl(Meetings::Table)
                            .from_col(Meetings::MembershipId)
                            .to_tbl(Memberships::Table)
                            .to_col(Memberships::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_meetings_membership")
                    .table(Meetings::Table)
                    .col(Meetings::MembershipId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Meetings::Table)
                    .drop_column(Meetings::MembershipId)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Memberships::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_type(
                Type::drop()
                    .name(Alias::new("membership_status"))
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
