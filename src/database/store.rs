use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{
    Application, ApplicationStatus, ApplicationSummary, Lease, LeaseWithRelations, Manager, ManagerProfile,
    NewApplication, NewLease, NewLocation, NewProperty, Payment, Property, StoredListing, Tenant, TenantProfile,
};
use crate::filter::SearchFilter;
use crate::geo::CodecError;

/// Errors raised by any store implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Malformed row: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(what: impl Into<String>) -> Self {
        StoreError::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        StoreError::Conflict(message.into())
    }
}

/// Listings with their locations in persisted form
#[async_trait]
pub trait PropertyStore: Send + Sync {
    /// One filtered read; results ordered by property id
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<StoredListing>, StoreError>;

    async fn find(&self, id: i32) -> Result<Option<StoredListing>, StoreError>;

    /// Inserts the location and the property together
    async fn create(&self, property: NewProperty, location: NewLocation) -> Result<StoredListing, StoreError>;

    async fn by_manager(&self, manager_cognito_id: &str) -> Result<Vec<StoredListing>, StoreError>;

    async fn residences(&self, tenant_cognito_id: &str) -> Result<Vec<StoredListing>, StoreError>;
}

#[async_trait]
pub trait TenantStore: Send + Sync {
    async fn tenant(&self, cognito_id: &str) -> Result<Option<Tenant>, StoreError>;

    async fn favorites(&self, cognito_id: &str) -> Result<Vec<Property>, StoreError>;

    /// Fails with `Conflict` when the cognito id is taken
    async fn create_tenant(&self, cognito_id: &str, profile: TenantProfile) -> Result<Tenant, StoreError>;

    async fn update_tenant(&self, cognito_id: &str, profile: TenantProfile) -> Result<Tenant, StoreError>;

    /// Fails with `Conflict` when already a favorite, `NotFound` for an unknown tenant or property
    async fn add_favorite(&self, cognito_id: &str, property_id: i32) -> Result<(), StoreError>;

    async fn remove_favorite(&self, cognito_id: &str, property_id: i32) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ManagerStore: Send + Sync {
    async fn manager(&self, cognito_id: &str) -> Result<Option<Manager>, StoreError>;

    async fn create_manager(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, StoreError>;

    async fn update_manager(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, StoreError>;
}

#[async_trait]
pub trait LeaseStore: Send + Sync {
    async fn leases(&self) -> Result<Vec<LeaseWithRelations>, StoreError>;

    async fn lease(&self, id: i32) -> Result<Option<Lease>, StoreError>;

    async fn payments(&self, lease_id: i32) -> Result<Vec<Payment>, StoreError>;

    /// Most recent lease (by start date) between a tenant and a property
    async fn latest_lease(&self, tenant_cognito_id: &str, property_id: i32) -> Result<Option<Lease>, StoreError>;
}

/// Which applications a listing request may see
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationScope {
    All,
    Tenant(String),
    /// Applications for properties the manager owns
    Manager(String),
}

#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Applications with property, tenant and manager joined in; `lease` is left empty
    async fn applications(&self, scope: &ApplicationScope) -> Result<Vec<ApplicationSummary>, StoreError>;

    async fn application(&self, id: i32) -> Result<Option<Application>, StoreError>;

    /// Fails with `NotFound` when the property does not exist
    async fn create_application(&self, application: NewApplication) -> Result<Application, StoreError>;

    /// Atomically creates the lease, records the tenant as a resident and
    /// marks the application approved. Only pending applications qualify.
    async fn approve(&self, id: i32, lease: NewLease) -> Result<Application, StoreError>;

    /// Moves a pending application to `status`
    async fn set_status(&self, id: i32, status: ApplicationStatus) -> Result<Application, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Conflict message shared by both stores for a non-pending application
pub(crate) fn not_pending(id: i32, status: ApplicationStatus) -> StoreError {
    StoreError::conflict(format!("Application {} is already {}", id, status))
}

