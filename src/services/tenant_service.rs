use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::search_service::decode_listings;
use super::ServiceError;
use crate::database::models::{Listing, TenantProfile, TenantWithFavorites};
use crate::database::{PropertyStore, TenantStore};
use crate::geo::CoordinateCodec;

/// Body of `POST /tenants`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    pub cognito_id: String,
    #[serde(flatten)]
    pub profile: TenantProfile,
}

#[derive(Clone)]
pub struct TenantService {
    tenants: Arc<dyn TenantStore>,
    properties: Arc<dyn PropertyStore>,
    codec: Arc<dyn CoordinateCodec>,
}

impl TenantService {
    pub fn new(
        tenants: Arc<dyn TenantStore>,
        properties: Arc<dyn PropertyStore>,
        codec: Arc<dyn CoordinateCodec>,
    ) -> Self {
        Self { tenants, properties, codec }
    }

    pub async fn get(&self, cognito_id: &str) -> Result<TenantWithFavorites, ServiceError> {
        let tenant = self
            .tenants
            .tenant(cognito_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Tenant not found"))?;
        let favorites = self.tenants.favorites(cognito_id).await?;
        Ok(TenantWithFavorites { tenant, favorites })
    }

    pub async fn create(&self, request: CreateTenantRequest) -> Result<TenantWithFavorites, ServiceError> {
        if request.cognito_id.trim().is_empty() {
            return Err(ServiceError::invalid("cognitoId is required"));
        }
        let tenant = self.tenants.create_tenant(&request.cognito_id, request.profile).await?;
        info!("created tenant {}", tenant.cognito_id);
        Ok(TenantWithFavorites { tenant, favorites: Vec::new() })
    }

    pub async fn update(&self, cognito_id: &str, profile: TenantProfile) -> Result<TenantWithFavorites, ServiceError> {
        self.tenants.update_tenant(cognito_id, profile).await?;
        self.get(cognito_id).await
    }

    /// Listings the tenant currently resides in
    pub async fn current_residences(&self, cognito_id: &str) -> Result<Vec<Listing>, ServiceError> {
        if self.tenants.tenant(cognito_id).await?.is_none() {
            return Err(ServiceError::not_found("Tenant not found"));
        }
        let stored = self.properties.residences(cognito_id).await?;
        decode_listings(self.codec.as_ref(), stored)
    }

    pub async fn add_favorite(&self, cognito_id: &str, property_id: i32) -> Result<TenantWithFavorites, ServiceError> {
        self.tenants.add_favorite(cognito_id, property_id).await?;
        self.get(cognito_id).await
    }

    /// Removing a property that is not a favorite is a no-op
    pub async fn remove_favorite(
        &self,
        cognito_id: &str,
        property_id: i32,
    ) -> Result<TenantWithFavorites, ServiceError> {
        self.tenants.remove_favorite(cognito_id, property_id).await?;
        self.get(cognito_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Fixtures, MemoryStore};
    use crate::geo::WktPointCodec;

    fn service() -> TenantService {
        let fixtures = Fixtures::load(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/listings.yaml")).unwrap();
        let store = Arc::new(MemoryStore::from_fixtures(fixtures));
        TenantService::new(store.clone(), store, Arc::new(WktPointCodec))
    }

    fn profile(name: &str) -> TenantProfile {
        TenantProfile {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone_number: "555-0100".to_string(),
        }
    }

    #[tokio::test]
    async fn get_includes_favorites() {
        let tenant = service().get("ten-carol").await.unwrap();
        let ids: Vec<i32> = tenant.favorites.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn duplicate_cognito_id_conflicts() {
        let service = service();
        let request = CreateTenantRequest { cognito_id: "ten-carol".to_string(), profile: profile("Carol") };
        assert!(matches!(service.create(request).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_unknown_tenant_is_not_found() {
        let result = service().update("ten-nobody", profile("Nobody")).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn favorites_round_trip() {
        let service = service();
        let added = service.add_favorite("ten-dave", 4).await.unwrap();
        assert!(added.favorites.iter().any(|p| p.id == 4));
        assert!(matches!(service.add_favorite("ten-dave", 4).await, Err(ServiceError::Conflict(_))));

        let removed = service.remove_favorite("ten-dave", 4).await.unwrap();
        assert!(removed.favorites.is_empty());
        service.remove_favorite("ten-dave", 4).await.unwrap();
    }

    #[tokio::test]
    async fn residences_are_decoded_listings() {
        let residences = service().current_residences("ten-dave").await.unwrap();
        assert_eq!(residences.len(), 1);
        assert_eq!(residences[0].location.city, "Brooklyn");
    }
}
