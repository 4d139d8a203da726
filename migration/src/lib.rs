pub use sea_orm_migration::prelude::*;

mod m20250601_000001_initial;
mod m20250615_000001_add_meetings;
mod m20250620_000001_add_memberships;
mod m20250705_000001_add_notifications;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_initial::Migration),
            Box::new(m20250615_000001_add_meetings::Migration),
            Box::new(m20250620_000001_add_memberships::Migration),
            Box::new(m20250705_000001_add_notifications::Migration),
        ]
    }
}
