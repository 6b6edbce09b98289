use async_trait::async_trait;

use super::{is_unique_violation, PgStore};
use crate::database::models::{Manager, ManagerProfile};
use crate::database::store::{ManagerStore, StoreError};

#[async_trait]
impl ManagerStore for PgStore {
    async fn manager(&self, cognito_id: &str) -> Result<Option<Manager>, StoreError> {
        let manager = sqlx::query_as::<_, Manager>(
            "SELECT id, cognito_id, name, email, phone_number FROM managers WHERE cognito_id = $1",
        )
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(manager)
    }

    async fn create_manager(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, StoreError> {
        sqlx::query_as::<_, Manager>(
            "INSERT INTO managers (cognito_id, name, email, phone_number) VALUES ($1, $2, $3, $4) \
             RETURNING id, cognito_id, name, email, phone_number",
        )
        .bind(cognito_id)
        .bind(profile.name)
        .bind(profile.email)
        .bind(profile.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::conflict(format!("Manager {} already exists", cognito_id))
            } else {
                e.into()
            }
        })
    }

    async fn update_manager(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, StoreError> {
        sqlx::query_as::<_, Manager>(
            "UPDATE managers SET name = $2, email = $3, phone_number = $4 WHERE cognito_id = $1 \
             RETURNING id, cognito_id, name, email, phone_number",
        )
        .bind(cognito_id)
        .bind(profile.name)
        .bind(profile.email)
        .bind(profile.phone_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("Manager {}", cognito_id)))
    }
}
