//! Test utilities for database operations.
//!
//! Provides helpers for connecting to a test database and seeding the
//! directory and workflow tables.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, DbErr, Set,
    Statement,
};
use shopdesk_common::IdGenerator;
use std::sync::Arc;
use tracing::info;

use crate::entities::{
    employee, suspension_request,
    suspension_request::SuspensionStatus,
    user::{self, UserRole},
};

/// Test database configuration.
#[derive(Debug, Clone)]
pub struct TestDbConfig {
    /// Database host.
    pub host: String,
    /// Database port.
    pub port: u16,
    /// Database username.
    pub username: String,
    /// Database password.
    pub password: String,
    /// Database name.
    pub database: String,
}

impl Default for TestDbConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("TEST_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEST_DB_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5433),
            username: std::env::var("TEST_DB_USER")
                .unwrap_or_else(|_| "shopdesk_test".to_string()),
            password: std::env::var("TEST_DB_PASSWORD")
                .unwrap_or_else(|_| "shopdesk_test".to_string()),
            database: std::env::var("TEST_DB_NAME")
                .unwrap_or_else(|_| "shopdesk_test".to_string()),
        }
    }
}

impl TestDbConfig {
    /// Get the database URL.
    #[must_use]
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        )
    }
}

/// A migrated test database connection.
pub struct TestDatabase {
    /// Database connection, shared with the repositories under test.
    pub conn: Arc<DatabaseConnection>,
    /// Database configuration.
    pub config: TestDbConfig,
}

impl TestDatabase {
    /// Connect to the configured test database and run migrations.
    pub async fn new() -> Result<Self, DbErr> {
        Self::with_config(TestDbConfig::default()).await
    }

    /// Connect with a custom configuration and run migrations.
    pub async fn with_config(config: TestDbConfig) -> Result<Self, DbErr> {
        use sea_orm_migration::MigratorTrait;

        let conn = Database::connect(&config.database_url()).await?;
        crate::migrations::Migrator::up(&conn, None).await?;

        info!(database = %config.database, "Connected to test database");

        Ok(Self {
            conn: Arc::new(conn),
            config,
        })
    }

    /// Remove all workflow and directory rows.
    pub async fn cleanup(&self) -> Result<(), DbErr> {
        self.conn
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                r#"TRUNCATE TABLE "suspension_request", "employee", "user" CASCADE"#.to_string(),
            ))
            .await?;

        info!("Cleaned up test database");
        Ok(())
    }

    /// Insert a user with the given role and a fresh API token.
    pub async fn seed_user(
        &self,
        first_name: &str,
        last_name: &str,
        role: UserRole,
    ) -> Result<user::Model, DbErr> {
        let id_gen = IdGenerator::new();
        let id = id_gen.generate();

        user::ActiveModel {
            email: Set(format!("{id}@example.com")),
            id: Set(id),
            first_name: Set(Some(first_name.to_string())),
            last_name: Set(Some(last_name.to_string())),
            name: Set(None),
            role: Set(role),
            token: Set(Some(id_gen.generate_token())),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert an employee record for `user_id` reporting to `manager_id`.
    pub async fn seed_employee(
        &self,
        user_id: &str,
        manager_id: Option<&str>,
    ) -> Result<employee::Model, DbErr> {
        employee::ActiveModel {
            id: Set(IdGenerator::new().generate()),
            user_id: Set(user_id.to_string()),
            shop_id: Set("shop1".to_string()),
            manager_id: Set(manager_id.map(String::from)),
            position: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(self.conn.as_ref())
        .await
    }

    /// Insert a suspension request in the given state.
    pub async fn seed_request(
        &self,
        employee_id: &str,
        requester_id: &str,
        reason: &str,
        status: SuspensionStatus,
    ) -> Result<suspension_request::Model, DbErr> {
        suspension_request::ActiveModel {
            id: Set(IdGenerator::new().generate()),
            employee_id: Set(employee_id.to_string()),
            requester_id: Set(requester_id.to_string()),
            manager_id: Set(None),
            reason: Set(reason.to_string()),
            status: Set(status),
            manager_status: Set(None),
            manager_note: Set(None),
            manager_reviewed_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(self.conn.as_ref())
        .await
    }
}
