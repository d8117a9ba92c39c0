//! User service.

use shopdesk_common::{AppError, AppResult};
use shopdesk_db::{
    entities::user::{self, UserRole},
    repositories::UserRepository,
};

/// User service for identity lookups.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Authenticate a user by API token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

/// Ensure the acting user may use the manager gate.
pub fn require_manager(actor: &user::Model) -> AppResult<()> {
    if actor.role == UserRole::Manager {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only managers can review suspension requests.".to_string(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            name: None,
            role,
            token: Some("secret".to_string()),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_authenticate_by_token_found() {
        let user = create_test_user("user1", UserRole::Manager);
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate_by_token("secret").await.unwrap();

        assert_eq!(result.id, "user1");
    }

    #[tokio::test]
    async fn test_authenticate_by_token_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service.authenticate_by_token("nope").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_require_manager() {
        assert!(require_manager(&create_test_user("m", UserRole::Manager)).is_ok());

        for role in [UserRole::Employee, UserRole::ShopOwner, UserRole::SuperAdmin] {
            let result = require_manager(&create_test_user("u", role));
            assert!(matches!(result, Err(AppError::Forbidden(_))));
        }
    }
}
