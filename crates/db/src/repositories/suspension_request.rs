//! Suspension request repository.

use std::sync::Arc;

use crate::entities::{
    SuspensionRequest,
    suspension_request::{self, SuspensionStatus},
};
use shopdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};

/// Suspension request repository for database operations.
#[derive(Clone)]
pub struct SuspensionRequestRepository {
    db: Arc<DatabaseConnection>,
}

impl SuspensionRequestRepository {
    /// Create a new suspension request repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a suspension request by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<suspension_request::Model>> {
        SuspensionRequest::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a suspension request by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<suspension_request::Model> {
        self.find_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    /// List suspension requests newest-first.
    ///
    /// `None` returns every request; `Some(statuses)` restricts to those states.
    pub async fn find_by_statuses(
        &self,
        statuses: Option<&[SuspensionStatus]>,
    ) -> AppResult<Vec<suspension_request::Model>> {
        let mut query = SuspensionRequest::find()
            .order_by_desc(suspension_request::Column::CreatedAt)
            .order_by_desc(suspension_request::Column::Id);

        if let Some(statuses) = statuses {
            query = query.filter(suspension_request::Column::Status.is_in(statuses.to_vec()));
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count requests per status. States with no requests are omitted.
    pub async fn count_by_status(&self) -> AppResult<Vec<(SuspensionStatus, i64)>> {
        SuspensionRequest::find()
            .select_only()
            .column(suspension_request::Column::Status)
            .column_as(suspension_request::Column::Id.count(), "total")
            .group_by(suspension_request::Column::Status)
            .into_tuple::<(SuspensionStatus, i64)>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Read-modify-write a single request under a row lock.
    ///
    /// The row is selected `FOR UPDATE` inside a transaction and handed to
    /// `apply`. If `apply` returns an error the transaction is rolled back and
    /// nothing is written; otherwise the returned changes are saved and
    /// committed. Concurrent callers on the same row are serialized, so each
    /// one sees the state left by the previous commit.
    pub async fn update_locked<F>(
        &self,
        id: &str,
        apply: F,
    ) -> AppResult<suspension_request::Model>
    where
        F: FnOnce(suspension_request::Model) -> AppResult<suspension_request::ActiveModel> + Send,
    {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let current = SuspensionRequest::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let Some(current) = current else {
            txn.rollback()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Err(not_found(id));
        };

        let changes = match apply(current) {
            Ok(changes) => changes,
            Err(e) => {
                txn.rollback()
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                return Err(e);
            }
        };

        let updated = changes
            .update(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(updated)
    }
}

fn not_found(id: &str) -> AppError {
    tracing::debug!(request_id = id, "Suspension request not found");
    AppError::NotFound("Suspension request not found.".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::suspension_request::ManagerDecision;
    use chrono::Utc;
    use maplit::btreemap;
    use sea_orm::{DatabaseBackend, MockDatabase, Set, Value};

    fn create_test_request(id: &str, status: SuspensionStatus) -> suspension_request::Model {
        suspension_request::Model {
            id: id.to_string(),
            employee_id: "emp1".to_string(),
            requester_id: "user1".to_string(),
            manager_id: None,
            reason: "medical".to_string(),
            status,
            manager_status: None,
            manager_note: None,
            manager_reviewed_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<suspension_request::Model>::new()])
                .into_connection(),
        );

        let repo = SuspensionRequestRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_by_statuses() {
        let r1 = create_test_request("r1", SuspensionStatus::PendingOwner);
        let r2 = create_test_request("r2", SuspensionStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[r1, r2]])
                .into_connection(),
        );

        let repo = SuspensionRequestRepository::new(db);
        let result = repo
            .find_by_statuses(Some(&[
                SuspensionStatus::PendingOwner,
                SuspensionStatus::Approved,
            ]))
            .await
            .unwrap();

        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_find_by_statuses_filters_by_status_set() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<suspension_request::Model>::new()])
                .append_query_results([Vec::<suspension_request::Model>::new()])
                .into_connection(),
        );

        let repo = SuspensionRequestRepository::new(Arc::clone(&db));
        repo.find_by_statuses(Some(&[
            SuspensionStatus::PendingOwner,
            SuspensionStatus::Approved,
            SuspensionStatus::RejectedOwner,
        ]))
        .await
        .unwrap();
        repo.find_by_statuses(None).await.unwrap();

        drop(repo);
        let log = Arc::try_unwrap(db).unwrap().into_transaction_log();
        assert_eq!(log.len(), 2);

        // Debug output escapes the quoted identifiers.
        let filtered = format!("{:?}", log[0]).replace("\\\"", "\"");
        assert!(filtered.contains(r#""status" IN ($1, $2, $3)"#));
        assert!(filtered.contains("pending_owner"));
        assert!(filtered.contains("rejected_owner"));
        assert!(filtered.contains(r#"ORDER BY "suspension_request"."created_at" DESC"#));

        let unfiltered = format!("{:?}", log[1]);
        assert!(!unfiltered.contains("WHERE"));
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[
                    btreemap! {
                        "status" => Into::<Value>::into("pending_manager"),
                        "total" => Into::<Value>::into(2i64),
                    },
                    btreemap! {
                        "status" => Into::<Value>::into("rejected_owner"),
                        "total" => Into::<Value>::into(1i64),
                    },
                ]])
                .into_connection(),
        );

        let repo = SuspensionRequestRepository::new(db);
        let result = repo.count_by_status().await.unwrap();

        assert_eq!(
            result,
            vec![
                (SuspensionStatus::PendingManager, 2),
                (SuspensionStatus::RejectedOwner, 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_locked_commits_changes() {
        let current = create_test_request("r1", SuspensionStatus::PendingManager);
        let mut updated = current.clone();
        updated.status = SuspensionStatus::PendingOwner;
        updated.manager_status = Some(ManagerDecision::Approved);

        let mock = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[current]])
            .append_query_results([[updated.clone()]])
            .into_connection();
        let db = Arc::new(mock);

        let repo = SuspensionRequestRepository::new(Arc::clone(&db));
        let result = repo
            .update_locked("r1", |model| {
                let mut active: suspension_request::ActiveModel = model.into();
                active.status = Set(SuspensionStatus::PendingOwner);
                active.manager_status = Set(Some(ManagerDecision::Approved));
                Ok(active)
            })
            .await
            .unwrap();

        assert_eq!(result, updated);

        drop(repo);
        let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains(" SET "));
    }

    #[tokio::test]
    async fn test_update_locked_rolls_back_on_rejection() {
        let current = create_test_request("r1", SuspensionStatus::Approved);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[current]])
                .into_connection(),
        );

        let repo = SuspensionRequestRepository::new(Arc::clone(&db));
        let result = repo
            .update_locked("r1", |_| {
                Err(AppError::InvalidState("not pending".to_string()))
            })
            .await;

        assert!(matches!(result, Err(AppError::InvalidState(_))));

        drop(repo);
        let log = format!("{:?}", Arc::try_unwrap(db).unwrap().into_transaction_log());
        assert!(!log.contains(" SET "));
    }

    #[tokio::test]
    async fn test_update_locked_missing_row() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<suspension_request::Model>::new()])
                .into_connection(),
        );

        let repo = SuspensionRequestRepository::new(db);
        let result = repo
            .update_locked("missing", |model| Ok(model.into()))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
