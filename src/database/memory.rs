use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::fixtures::Fixtures;
use super::store::{
    not_pending, ApplicationScope, ApplicationStore, LeaseStore, ManagerStore, PropertyStore, StoreError, StoreHealth,
    TenantStore,
};
use crate::database::models::{
    Application, ApplicationProperty, ApplicationStatus, ApplicationSummary, Lease, LeaseWithRelations, Manager,
    ManagerProfile, NewApplication, NewLease, NewLocation, NewProperty, Payment, Property, StoredListing, Tenant,
    TenantProfile,
};
use crate::filter::{Candidate, SearchFilter};
use crate::geo::{CoordinateCodec, WktPointCodec};

#[derive(Debug, Default)]
struct Tables {
    listings: BTreeMap<i32, StoredListing>,
    tenants: BTreeMap<String, Tenant>,
    managers: BTreeMap<String, Manager>,
    leases: BTreeMap<i32, Lease>,
    payments: Vec<Payment>,
    applications: BTreeMap<i32, Application>,
    favorites: BTreeSet<(String, i32)>,
    residences: BTreeSet<(String, i32)>,
}

impl Tables {
    fn next_id<V>(map: &BTreeMap<i32, V>) -> i32 {
        map.keys().next_back().map_or(1, |id| id + 1)
    }

    fn next_location_id(&self) -> i32 {
        self.listings.values().map(|l| l.location.id).max().map_or(1, |id| id + 1)
    }

    fn lease_availability(&self, property_id: i32) -> Vec<DateTime<Utc>> {
        self.leases
            .values()
            .filter(|l| l.property_id == property_id)
            .map(|l| l.available_from)
            .collect()
    }

    fn listings_where(&self, keep: impl Fn(&StoredListing) -> bool) -> Vec<StoredListing> {
        self.listings.values().filter(|l| keep(l)).cloned().collect()
    }

    fn summarize(&self, application: &Application) -> Option<ApplicationSummary> {
        let listing = self.listings.get(&application.property_id)?;
        Some(ApplicationSummary {
            application: application.clone(),
            property: ApplicationProperty {
                property: listing.property.clone(),
                address: listing.location.address.clone(),
            },
            tenant: self.tenants.get(&application.tenant_cognito_id).cloned(),
            manager: self.managers.get(&listing.property.manager_cognito_id).cloned(),
            lease: None,
        })
    }
}

/// Store backed by process memory, seeded from fixtures.
///
/// Serves local development and the test suite; evaluates search predicates
/// directly instead of translating them to SQL.
#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    codec: Arc<dyn CoordinateCodec>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::from_fixtures(Fixtures::default())
    }
}

impl MemoryStore {
    pub fn from_fixtures(fixtures: Fixtures) -> Self {
        let mut tables = Tables::default();
        tables.managers = fixtures.managers.into_iter().map(|m| (m.cognito_id.clone(), m)).collect();
        tables.tenants = fixtures.tenants.into_iter().map(|t| (t.cognito_id.clone(), t)).collect();
        tables.listings = fixtures.listings.into_iter().map(|l| (l.property.id, l)).collect();
        tables.leases = fixtures.leases.into_iter().map(|l| (l.id, l)).collect();
        tables.payments = fixtures.payments;
        tables.applications = fixtures.applications.into_iter().map(|a| (a.id, a)).collect();
        tables.favorites = fixtures
            .favorites
            .into_iter()
            .map(|f| (f.tenant_cognito_id, f.property_id))
            .collect();
        tables.residences = fixtures
            .residences
            .into_iter()
            .map(|r| (r.tenant_cognito_id, r.property_id))
            .collect();

        Self {
            tables: Arc::new(RwLock::new(tables)),
            codec: Arc::new(WktPointCodec),
        }
    }

    pub fn with_codec(mut self, codec: Arc<dyn CoordinateCodec>) -> Self {
        self.codec = codec;
        self
    }
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn search(&self, filter: &SearchFilter) -> Result<Vec<StoredListing>, StoreError> {
        let tables = self.tables.read().await;
        let mut found = Vec::new();
        for listing in tables.listings.values() {
            let availability = tables.lease_availability(listing.property.id);
            let candidate = Candidate {
                property: &listing.property,
                point: self.codec.decode(&listing.location.coordinates).ok(),
                lease_availability: &availability,
            };
            if filter.matches(&candidate) {
                found.push(listing.clone());
            }
        }
        Ok(found)
    }

    async fn find(&self, id: i32) -> Result<Option<StoredListing>, StoreError> {
        Ok(self.tables.read().await.listings.get(&id).cloned())
    }

    async fn create(&self, property: NewProperty, location: NewLocation) -> Result<StoredListing, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.managers.contains_key(&property.manager_cognito_id) {
            return Err(StoreError::not_found(format!("Manager {}", property.manager_cognito_id)));
        }
        let id = Tables::next_id(&tables.listings);
        let location = location.into_stored(tables.next_location_id());
        let listing = StoredListing {
            property: property.into_property(id, location.id, Utc::now()),
            location,
        };
        tables.listings.insert(id, listing.clone());
        Ok(listing)
    }

    async fn by_manager(&self, manager_cognito_id: &str) -> Result<Vec<StoredListing>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.listings_where(|l| l.property.manager_cognito_id == manager_cognito_id))
    }

    async fn residences(&self, tenant_cognito_id: &str) -> Result<Vec<StoredListing>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.listings_where(|l| {
            tables
                .residences
                .contains(&(tenant_cognito_id.to_string(), l.property.id))
        }))
    }
}

#[async_trait]
impl TenantStore for MemoryStore {
    async fn tenant(&self, cognito_id: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tables.read().await.tenants.get(cognito_id).cloned())
    }

    async fn favorites(&self, cognito_id: &str) -> Result<Vec<Property>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .favorites
            .iter()
            .filter(|(tenant, _)| tenant == cognito_id)
            .filter_map(|(_, property_id)| tables.listings.get(property_id))
            .map(|l| l.property.clone())
            .collect())
    }

    async fn create_tenant(&self, cognito_id: &str, profile: TenantProfile) -> Result<Tenant, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.tenants.contains_key(cognito_id) {
            return Err(StoreError::conflict(format!("Tenant {} already exists", cognito_id)));
        }
        let id = tables.tenants.values().map(|t| t.id).max().map_or(1, |id| id + 1);
        let tenant = Tenant {
            id,
            cognito_id: cognito_id.to_string(),
            name: profile.name,
            email: profile.email,
            phone_number: profile.phone_number,
        };
        tables.tenants.insert(tenant.cognito_id.clone(), tenant.clone());
        Ok(tenant)
    }

    async fn update_tenant(&self, cognito_id: &str, profile: TenantProfile) -> Result<Tenant, StoreError> {
        let mut tables = self.tables.write().await;
        let tenant = tables
            .tenants
            .get_mut(cognito_id)
            .ok_or_else(|| StoreError::not_found(format!("Tenant {}", cognito_id)))?;
        tenant.name = profile.name;
        tenant.email = profile.email;
        tenant.phone_number = profile.phone_number;
        Ok(tenant.clone())
    }

    async fn add_favorite(&self, cognito_id: &str, property_id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.tenants.contains_key(cognito_id) {
            return Err(StoreError::not_found(format!("Tenant {}", cognito_id)));
        }
        if !tables.listings.contains_key(&property_id) {
            return Err(StoreError::not_found(format!("Property {}", property_id)));
        }
        if !tables.favorites.insert((cognito_id.to_string(), property_id)) {
            return Err(StoreError::conflict("Property already added as favorite"));
        }
        Ok(())
    }

    async fn remove_favorite(&self, cognito_id: &str, property_id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.tenants.contains_key(cognito_id) {
            return Err(StoreError::not_found(format!("Tenant {}", cognito_id)));
        }
        tables.favorites.remove(&(cognito_id.to_string(), property_id));
        Ok(())
    }
}

#[async_trait]
impl ManagerStore for MemoryStore {
    async fn manager(&self, cognito_id: &str) -> Result<Option<Manager>, StoreError> {
        Ok(self.tables.read().await.managers.get(cognito_id).cloned())
    }

    async fn create_manager(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.managers.contains_key(cognito_id) {
            return Err(StoreError::conflict(format!("Manager {} already exists", cognito_id)));
        }
        let id = tables.managers.values().map(|m| m.id).max().map_or(1, |id| id + 1);
        let manager = Manager {
            id,
            cognito_id: cognito_id.to_string(),
            name: profile.name,
            email: profile.email,
            phone_number: profile.phone_number,
        };
        tables.managers.insert(manager.cognito_id.clone(), manager.clone());
        Ok(manager)
    }

    async fn update_manager(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, StoreError> {
        let mut tables = self.tables.write().await;
        let manager = tables
            .managers
            .get_mut(cognito_id)
            .ok_or_else(|| StoreError::not_found(format!("Manager {}", cognito_id)))?;
        manager.name = profile.name;
        manager.email = profile.email;
        manager.phone_number = profile.phone_number;
        Ok(manager.clone())
    }
}

#[async_trait]
impl LeaseStore for MemoryStore {
    async fn leases(&self) -> Result<Vec<LeaseWithRelations>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .leases
            .values()
            .filter_map(|lease| {
                Some(LeaseWithRelations {
                    lease: lease.clone(),
                    tenant: tables.tenants.get(&lease.tenant_cognito_id)?.clone(),
                    property: tables.listings.get(&lease.property_id)?.property.clone(),
                })
            })
            .collect())
    }

    async fn lease(&self, id: i32) -> Result<Option<Lease>, StoreError> {
        Ok(self.tables.read().await.leases.get(&id).cloned())
    }

    async fn payments(&self, lease_id: i32) -> Result<Vec<Payment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.payments.iter().filter(|p| p.lease_id == lease_id).cloned().collect())
    }

    async fn latest_lease(&self, tenant_cognito_id: &str, property_id: i32) -> Result<Option<Lease>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .leases
            .values()
            .filter(|l| l.tenant_cognito_id == tenant_cognito_id && l.property_id == property_id)
            .max_by_key(|l| (l.start_date, l.id))
            .cloned())
    }
}

#[async_trait]
impl ApplicationStore for MemoryStore {
    async fn applications(&self, scope: &ApplicationScope) -> Result<Vec<ApplicationSummary>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .applications
            .values()
            .filter(|a| match scope {
                ApplicationScope::All => true,
                ApplicationScope::Tenant(cognito_id) => &a.tenant_cognito_id == cognito_id,
                ApplicationScope::Manager(cognito_id) => tables
                    .listings
                    .get(&a.property_id)
                    .is_some_and(|l| &l.property.manager_cognito_id == cognito_id),
            })
            .filter_map(|a| tables.summarize(a))
            .collect())
    }

    async fn application(&self, id: i32) -> Result<Option<Application>, StoreError> {
        Ok(self.tables.read().await.applications.get(&id).cloned())
    }

    async fn create_application(&self, application: NewApplication) -> Result<Application, StoreError> {
        let mut tables = self.tables.write().await;
        if !tables.listings.contains_key(&application.property_id) {
            return Err(StoreError::not_found(format!("Property {}", application.property_id)));
        }
        let id = Tables::next_id(&tables.applications);
        let application = application.into_application(id);
        tables.applications.insert(id, application.clone());
        Ok(application)
    }

    async fn approve(&self, id: i32, lease: NewLease) -> Result<Application, StoreError> {
        let mut tables = self.tables.write().await;
        let current = tables
            .applications
            .get(&id)
            .ok_or_else(|| StoreError::not_found(format!("Application {}", id)))?;
        if current.status != ApplicationStatus::Pending {
            return Err(not_pending(id, current.status));
        }

        let lease_id = Tables::next_id(&tables.leases);
        let lease = lease.into_lease(lease_id);
        tables.residences.insert((lease.tenant_cognito_id.clone(), lease.property_id));
        tables.leases.insert(lease_id, lease);

        let application = tables
            .applications
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(format!("Application {}", id)))?;
        application.status = ApplicationStatus::Approved;
        application.lease_id = Some(lease_id);
        Ok(application.clone())
    }

    async fn set_status(&self, id: i32, status: ApplicationStatus) -> Result<Application, StoreError> {
        let mut tables = self.tables.write().await;
        let application = tables
            .applications
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found(format!("Application {}", id)))?;
        if application.status != ApplicationStatus::Pending {
            return Err(not_pending(id, application.status));
        }
        application.status = status;
        Ok(application.clone())
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
