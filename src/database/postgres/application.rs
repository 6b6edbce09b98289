use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder, Row, Transaction};

use super::{is_foreign_key_violation, PgStore, PROPERTY_FIELDS};
use crate::database::models::{
    Application, ApplicationProperty, ApplicationStatus, ApplicationSummary, Manager, NewApplication, NewLease,
    Property, Tenant,
};
use crate::database::store::{not_pending, ApplicationScope, ApplicationStore, StoreError};

const APPLICATION_COLUMNS: &str = "a.id, a.application_date, a.status, a.property_id, a.tenant_cognito_id, \
     a.name, a.email, a.phone_number, a.message, a.lease_id";

const RETURNING_APPLICATION: &str = " RETURNING id, application_date, status, property_id, tenant_cognito_id, \
     name, email, phone_number, message, lease_id";

fn optional_json<T: serde::de::DeserializeOwned>(row: &PgRow, column: &str) -> Result<Option<T>, StoreError> {
    match row.try_get::<Option<Value>, _>(column)? {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

fn summary_from_row(row: &PgRow) -> Result<ApplicationSummary, StoreError> {
    let property: Property = serde_json::from_value(row.try_get::<Value, _>("property")?)?;
    Ok(ApplicationSummary {
        application: Application::from_row(row)?,
        property: ApplicationProperty {
            property,
            address: row.try_get("address")?,
        },
        tenant: optional_json::<Tenant>(row, "tenant")?,
        manager: optional_json::<Manager>(row, "manager")?,
        lease: None,
    })
}

/// Locks the application row and checks it can still change status
async fn lock_pending(tx: &mut Transaction<'_, Postgres>, id: i32) -> Result<(), StoreError> {
    let status: Option<String> = sqlx::query_scalar("SELECT status FROM applications WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

    let status = status.ok_or_else(|| StoreError::not_found(format!("Application {}", id)))?;
    let status: ApplicationStatus = status.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    if status != ApplicationStatus::Pending {
        return Err(not_pending(id, status));
    }
    Ok(())
}

#[async_trait]
impl ApplicationStore for PgStore {
    async fn applications(&self, scope: &ApplicationScope) -> Result<Vec<ApplicationSummary>, StoreError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {}, json_build_object({}) AS property, l.address AS address, \
             CASE WHEN t.id IS NULL THEN NULL ELSE json_build_object('id', t.id, 'cognitoId', t.cognito_id, \
             'name', t.name, 'email', t.email, 'phoneNumber', t.phone_number) END AS tenant, \
             CASE WHEN m.id IS NULL THEN NULL ELSE json_build_object('id', m.id, 'cognitoId', m.cognito_id, \
             'name', m.name, 'email', m.email, 'phoneNumber', m.phone_number) END AS manager \
             FROM applications a \
             JOIN properties p ON p.id = a.property_id \
             JOIN locations l ON l.id = p.location_id \
             LEFT JOIN tenants t ON t.cognito_id = a.tenant_cognito_id \
             LEFT JOIN managers m ON m.cognito_id = p.manager_cognito_id",
            APPLICATION_COLUMNS, PROPERTY_FIELDS
        ));

        match scope {
            ApplicationScope::All => {}
            ApplicationScope::Tenant(cognito_id) => {
                qb.push(" WHERE a.tenant_cognito_id = ").push_bind(cognito_id.clone());
            }
            ApplicationScope::Manager(cognito_id) => {
                qb.push(" WHERE p.manager_cognito_id = ").push_bind(cognito_id.clone());
            }
        }
        qb.push(" ORDER BY a.id");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(summary_from_row).collect()
    }

    async fn application(&self, id: i32) -> Result<Option<Application>, StoreError> {
        let sql = format!("SELECT {} FROM applications a WHERE a.id = $1", APPLICATION_COLUMNS);
        Ok(sqlx::query_as::<_, Application>(&sql).bind(id).fetch_optional(&self.pool).await?)
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application, StoreError> {
        let property_id = application.property_id;
        let sql = format!(
            "INSERT INTO applications (application_date, status, property_id, tenant_cognito_id, name, email, \
             phone_number, message) VALUES ($1, $2, $3, $4, $5, $6, $7, $8){}",
            RETURNING_APPLICATION
        );
        sqlx::query_as::<_, Application>(&sql)
            .bind(application.application_date)
            .bind(ApplicationStatus::Pending.as_str())
            .bind(application.property_id)
            .bind(application.tenant_cognito_id)
            .bind(application.name)
            .bind(application.email)
            .bind(application.phone_number)
            .bind(application.message)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    StoreError::not_found(format!("Property {}", property_id))
                } else {
                    e.into()
                }
            })
    }

    async fn approve(&self, id: i32, lease: NewLease) -> Result<Application, StoreError> {
        let mut tx = self.pool.begin().await?;
        lock_pending(&mut tx, id).await?;

        let lease_id: i32 = sqlx::query_scalar(
            "INSERT INTO leases (start_date, end_date, available_from, rent, deposit, property_id, tenant_cognito_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(lease.start_date)
        .bind(lease.end_date)
        .bind(lease.available_from)
        .bind(lease.rent)
        .bind(lease.deposit)
        .bind(lease.property_id)
        .bind(&lease.tenant_cognito_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO tenant_residences (tenant_cognito_id, property_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(&lease.tenant_cognito_id)
        .bind(lease.property_id)
        .execute(&mut *tx)
        .await?;

        let sql = format!(
            "UPDATE applications SET status = $2, lease_id = $3 WHERE id = $1{}",
            RETURNING_APPLICATION
        );
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .bind(ApplicationStatus::Approved.as_str())
            .bind(lease_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(application)
    }

    async fn set_status(&self, id: i32, status: ApplicationStatus) -> Result<Application, StoreError> {
        let mut tx = self.pool.begin().await?;
        lock_pending(&mut tx, id).await?;

        let sql = format!("UPDATE applications SET status = $2 WHERE id = $1{}", RETURNING_APPLICATION);
        let application = sqlx::query_as::<_, Application>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(application)
    }
}
