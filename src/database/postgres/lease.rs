use async_trait::async_trait;
use serde_json::Value;
use sqlx::{FromRow, Row};

use super::{PgStore, PROPERTY_FIELDS};
use crate::database::models::{Lease, LeaseWithRelations, Payment, Property, Tenant};
use crate::database::store::{LeaseStore, StoreError};

const LEASE_COLUMNS: &str =
    "le.id, le.start_date, le.end_date, le.available_from, le.rent, le.deposit, le.property_id, le.tenant_cognito_id";

#[async_trait]
impl LeaseStore for PgStore {
    async fn leases(&self) -> Result<Vec<LeaseWithRelations>, StoreError> {
        let sql = format!(
            "SELECT {}, \
             json_build_object('id', t.id, 'cognitoId', t.cognito_id, 'name', t.name, \
             'email', t.email, 'phoneNumber', t.phone_number) AS tenant, \
             json_build_object({}) AS property \
             FROM leases le \
             JOIN tenants t ON t.cognito_id = le.tenant_cognito_id \
             JOIN properties p ON p.id = le.property_id \
             ORDER BY le.id",
            LEASE_COLUMNS, PROPERTY_FIELDS
        );

        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| -> Result<LeaseWithRelations, StoreError> {
                let lease = Lease::from_row(row)?;
                let tenant: Tenant = serde_json::from_value(row.try_get::<Value, _>("tenant")?)?;
                let property: Property = serde_json::from_value(row.try_get::<Value, _>("property")?)?;
                Ok(LeaseWithRelations { lease, tenant, property })
            })
            .collect()
    }

    async fn lease(&self, id: i32) -> Result<Option<Lease>, StoreError> {
        let sql = format!("SELECT {} FROM leases le WHERE le.id = $1", LEASE_COLUMNS);
        Ok(sqlx::query_as::<_, Lease>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn payments(&self, lease_id: i32) -> Result<Vec<Payment>, StoreError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT id, lease_id, amount_due, amount_paid, due_date, payment_date, payment_status \
             FROM payments WHERE lease_id = $1 ORDER BY due_date, id",
        )
        .bind(lease_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    async fn latest_lease(&self, tenant_cognito_id: &str, property_id: i32) -> Result<Option<Lease>, StoreError> {
        let sql = format!(
            "SELECT {} FROM leases le WHERE le.tenant_cognito_id = $1 AND le.property_id = $2 \
             ORDER BY le.start_date DESC, le.id DESC LIMIT 1",
            LEASE_COLUMNS
        );
        let lease = sqlx::query_as::<_, Lease>(&sql)
            .bind(tenant_cognito_id)
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lease)
    }
}
