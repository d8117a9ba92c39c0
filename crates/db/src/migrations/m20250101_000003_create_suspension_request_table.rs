//! Create suspension request table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_user_table::User;
use super::m20250101_000002_create_employee_table::Employee;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(table_statement()).await?;

        // Index: status (view filters)
        manager
            .create_index(
                Index::create()
                    .name("idx_suspension_request_status")
                    .table(SuspensionRequest::Table)
                    .col(SuspensionRequest::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (newest-first listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_suspension_request_created_at")
                    .table(SuspensionRequest::Table)
                    .col(SuspensionRequest::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SuspensionRequest::Table).to_owned())
            .await
    }
}

/// Referenced directory rows cannot be deleted while a request points at them.
fn table_statement() -> TableCreateStatement {
    Table::create()
        .table(SuspensionRequest::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(SuspensionRequest::Id)
                .string_len(32)
                .not_null()
                .primary_key(),
        )
        .col(
            ColumnDef::new(SuspensionRequest::EmployeeId)
                .string_len(32)
                .not_null(),
        )
        .col(
            ColumnDef::new(SuspensionRequest::RequesterId)
                .string_len(32)
                .not_null(),
        )
        .col(ColumnDef::new(SuspensionRequest::ManagerId).string_len(32))
        .col(ColumnDef::new(SuspensionRequest::Reason).text().not_null())
        .col(
            ColumnDef::new(SuspensionRequest::Status)
                .string_len(32)
                .not_null()
                .default("pending_manager"),
        )
        .col(ColumnDef::new(SuspensionRequest::ManagerStatus).string_len(16))
        .col(ColumnDef::new(SuspensionRequest::ManagerNote).text())
        .col(
            ColumnDef::new(SuspensionRequest::ManagerReviewedAt)
                .timestamp_with_time_zone(),
        )
        .col(
            ColumnDef::new(SuspensionRequest::CreatedAt)
                .timestamp_with_time_zone()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_suspension_request_employee_id")
                .from(SuspensionRequest::Table, SuspensionRequest::EmployeeId)
                .to(Employee::Table, Employee::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_suspension_request_requester_id")
                .from(SuspensionRequest::Table, SuspensionRequest::RequesterId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_suspension_request_manager_id")
                .from(SuspensionRequest::Table, SuspensionRequest::ManagerId)
                .to(User::Table, User::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

#[derive(Iden)]
enum SuspensionRequest {
    Table,
    Id,
    EmployeeId,
    RequesterId,
    ManagerId,
    Reason,
    Status,
    ManagerStatus,
    ManagerNote,
    ManagerReviewedAt,
    CreatedAt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_keys_never_cascade_or_null() {
        let sql = table_statement().to_string(PostgresQueryBuilder);

        assert_eq!(sql.matches("ON DELETE RESTRICT").count(), 3);
        assert!(!sql.contains("CASCADE"));
        assert!(!sql.contains("SET NULL"));
    }
}
