use std::sync::Arc;

use super::ServiceError;
use crate::database::models::{LeaseWithRelations, Payment};
use crate::database::LeaseStore;

#[derive(Clone)]
pub struct LeaseService {
    leases: Arc<dyn LeaseStore>,
}

impl LeaseService {
    pub fn new(leases: Arc<dyn LeaseStore>) -> Self {
        Self { leases }
    }

    pub async fn list(&self) -> Result<Vec<LeaseWithRelations>, ServiceError> {
        Ok(self.leases.leases().await?)
    }

    pub async fn payments(&self, lease_id: i32) -> Result<Vec<Payment>, ServiceError> {
        if self.leases.lease(lease_id).await?.is_none() {
            return Err(ServiceError::not_found("Lease not found"));
        }
        Ok(self.leases.payments(lease_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Fixtures, MemoryStore};

    fn service() -> LeaseService {
        let fixtures = Fixtures::load(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/listings.yaml")).unwrap();
        LeaseService::new(Arc::new(MemoryStore::from_fixtures(fixtures)))
    }

    #[tokio::test]
    async fn leases_carry_tenant_and_property() {
        let leases = service().list().await.unwrap();
        assert_eq!(leases.len(), 2);
        assert_eq!(leases[0].tenant.cognito_id, "ten-carol");
        assert_eq!(leases[0].property.id, 2);
    }

    #[tokio::test]
    async fn payments_of_unknown_lease_are_not_found() {
        let service = service();
        assert_eq!(service.payments(1).await.unwrap().len(), 2);
        assert!(service.payments(2).await.unwrap().is_empty());
        assert!(matches!(service.payments(42).await, Err(ServiceError::NotFound(_))));
    }
}
