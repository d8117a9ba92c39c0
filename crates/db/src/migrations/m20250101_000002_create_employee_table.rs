//! Create employee table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employee::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Employee::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Employee::ShopId).string_len(32).not_null())
                    .col(ColumnDef::new(Employee::ManagerId).string_len(32))
                    .col(ColumnDef::new(Employee::Position).string_len(128))
                    .col(
                        ColumnDef::new(Employee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_user_id")
                            .from(Employee::Table, Employee::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_manager_id")
                            .from(Employee::Table, Employee::ManagerId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: shop_id (tenant scoping)
        manager
            .create_index(
                Index::create()
                    .name("idx_employee_shop_id")
                    .table(Employee::Table)
                    .col(Employee::ShopId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Employee {
    Table,
    Id,
    UserId,
    ShopId,
    ManagerId,
    Position,
    CreatedAt,
}
