pub mod application_service;
pub mod lease_service;
pub mod manager_service;
pub mod property_service;
pub mod search_service;
pub mod tenant_service;

use thiserror::Error;

use crate::database::StoreError;
use crate::geo::{CodecError, GeocodeError};

pub use application_service::{ApplicationService, CreateApplicationRequest, StatusUpdate};
pub use lease_service::LeaseService;
pub use manager_service::{CreateManagerRequest, ManagerService};
pub use property_service::{CreatePropertyRequest, PropertyService};
pub use search_service::SearchQueryComposer;
pub use tenant_service::{CreateTenantRequest, TenantService};

/// Outcome of a failed service operation, independent of the transport
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    /// Well-formed input the service cannot act on, such as an address with no geocoding match
    #[error("{0}")]
    Unprocessable(String),

    #[error("Geocoding failed: {0}")]
    Geocoder(#[from] GeocodeError),

    #[error("Stored coordinates could not be decoded: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(StoreError),
}

impl ServiceError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::Invalid(message.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(format!("{} not found", what)),
            StoreError::Conflict(message) => ServiceError::Conflict(message),
            StoreError::Codec(e) => ServiceError::Codec(e),
            other => ServiceError::Store(other),
        }
    }
}
