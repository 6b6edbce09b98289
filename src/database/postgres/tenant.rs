use async_trait::async_trait;

use super::{from_json_rows, is_foreign_key_violation, is_unique_violation, property_select, PgStore};
use crate::database::models::{Property, Tenant, TenantProfile};
use crate::database::store::{StoreError, TenantStore};

#[async_trait]
impl TenantStore for PgStore {
    async fn tenant(&self, cognito_id: &str) -> Result<Option<Tenant>, StoreError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            "SELECT id, cognito_id, name, email, phone_number FROM tenants WHERE cognito_id = $1",
        )
        .bind(cognito_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(tenant)
    }

    async fn favorites(&self, cognito_id: &str) -> Result<Vec<Property>, StoreError> {
        let sql = format!(
            "{} JOIN tenant_favorites f ON f.property_id = p.id WHERE f.tenant_cognito_id = $1 ORDER BY p.id",
            property_select()
        );
        let rows = sqlx::query(&sql).bind(cognito_id).fetch_all(&self.pool).await?;
        from_json_rows(&rows)
    }

    async fn create_tenant(&self, cognito_id: &str, profile: TenantProfile) -> Result<Tenant, StoreError> {
        sqlx::query_as::<_, Tenant>(
            "INSERT INTO tenants (cognito_id, name, email, phone_number) VALUES ($1, $2, $3, $4) \
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
                StoreError::conflict(format!("Tenant {} already exists", cognito_id))
            } else {
                e.into()
            }
        })
    }

    async fn update_tenant(&self, cognito_id: &str, profile: TenantProfile) -> Result<Tenant, StoreError> {
        sqlx::query_as::<_, Tenant>(
            "UPDATE tenants SET name = $2, email = $3, phone_number = $4 WHERE cognito_id = $1 \
             RETURNING id, cognito_id, name, email, phone_number",
        )
        .bind(cognito_id)
        .bind(profile.name)
        .bind(profile.email)
        .bind(profile.phone_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found(format!("Tenant {}", cognito_id)))
    }

    async fn add_favorite(&self, cognito_id: &str, property_id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("INSERT INTO tenant_favorites (tenant_cognito_id, property_id) VALUES ($1, $2)")
            .bind(cognito_id)
            .bind(property_id)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(StoreError::conflict("Property already added as favorite")),
            Err(e) if is_foreign_key_violation(&e) => Err(StoreError::not_found(format!(
                "Tenant {} or property {}",
                cognito_id, property_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_favorite(&self, cognito_id: &str, property_id: i32) -> Result<(), StoreError> {
        if self.tenant(cognito_id).await?.is_none() {
            return Err(StoreError::not_found(format!("Tenant {}", cognito_id)));
        }
        sqlx::query("DELETE FROM tenant_favorites WHERE tenant_cognito_id = $1 AND property_id = $2")
            .bind(cognito_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
