use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;
use serde::Deserialize;
use tracing::info;

use super::ServiceError;
use crate::database::models::{
    Application, ApplicationStatus, ApplicationSummary, LeaseSummary, NewApplication, NewLease,
};
use crate::database::{ApplicationScope, ApplicationStore, LeaseStore, PropertyStore};

/// Body of `POST /applications`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub property_id: i32,
    pub tenant_cognito_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    /// Defaults to the time of the request
    pub application_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /applications/:id/status`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

#[derive(Clone)]
pub struct ApplicationService {
    applications: Arc<dyn ApplicationStore>,
    leases: Arc<dyn LeaseStore>,
    properties: Arc<dyn PropertyStore>,
}

impl ApplicationService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        leases: Arc<dyn LeaseStore>,
        properties: Arc<dyn PropertyStore>,
    ) -> Self {
        Self { applications, leases, properties }
    }

    /// Resolves the `userId`/`userType` query pair to a listing scope
    pub fn scope(user_id: Option<&str>, user_type: Option<&str>) -> Result<ApplicationScope, ServiceError> {
        let user_id = user_id.map(str::trim).filter(|s| !s.is_empty());
        match (user_type.map(str::trim).filter(|s| !s.is_empty()), user_id) {
            (None, _) => Ok(ApplicationScope::All),
            (Some("tenant"), Some(id)) => Ok(ApplicationScope::Tenant(id.to_string())),
            (Some("manager"), Some(id)) => Ok(ApplicationScope::Manager(id.to_string())),
            (Some("tenant" | "manager"), None) => Err(ServiceError::invalid("userId is required with userType")),
            (Some(other), _) => Err(ServiceError::invalid(format!("Unknown userType: {}", other))),
        }
    }

    /// Applications in scope, each with the latest lease between its tenant and property
    pub async fn list(&self, scope: &ApplicationScope) -> Result<Vec<ApplicationSummary>, ServiceError> {
        let summaries = self.applications.applications(scope).await?;
        let now = Utc::now();

        let with_leases = summaries.into_iter().map(|mut summary| async move {
            let lease = self
                .leases
                .latest_lease(&summary.application.tenant_cognito_id, summary.application.property_id)
                .await?;
            summary.lease = lease.map(|lease| LeaseSummary {
                next_payment_date: lease.next_payment_date(now),
                lease,
            });
            Ok::<_, ServiceError>(summary)
        });

        try_join_all(with_leases).await
    }

    pub async fn create(&self, request: CreateApplicationRequest) -> Result<Application, ServiceError> {
        let application = self
            .applications
            .create_application(NewApplication {
                application_date: request.application_date.unwrap_or_else(Utc::now),
                property_id: request.property_id,
                tenant_cognito_id: request.tenant_cognito_id,
                name: request.name,
                email: request.email,
                phone_number: request.phone_number,
                message: request.message,
            })
            .await?;
        info!(id = application.id, property = application.property_id, "application submitted");
        Ok(application)
    }

    /// Approving creates a one-year lease starting now; only pending applications may change
    pub async fn update_status(&self, id: i32, status: ApplicationStatus) -> Result<Application, ServiceError> {
        match status {
            ApplicationStatus::Pending => Err(ServiceError::invalid("Status can only move to Approved or Denied")),
            ApplicationStatus::Denied => Ok(self.applications.set_status(id, status).await?),
            ApplicationStatus::Approved => {
                let application = self
                    .applications
                    .application(id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Application not found"))?;
                let listing = self
                    .properties
                    .find(application.property_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("Property not found"))?;

                let lease = NewLease::one_year(&listing.property, &application.tenant_cognito_id, Utc::now());
                let approved = self.applications.approve(id, lease).await?;
                info!(id, lease = ?approved.lease_id, "application approved");
                Ok(approved)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Fixtures, MemoryStore};

    fn service() -> (ApplicationService, Arc<MemoryStore>) {
        let fixtures = Fixtures::load(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/listings.yaml")).unwrap();
        let store = Arc::new(MemoryStore::from_fixtures(fixtures));
        (ApplicationService::new(store.clone(), store.clone(), store.clone()), store)
    }

    #[test]
    fn scope_from_query() {
        assert_eq!(ApplicationService::scope(None, None).unwrap(), ApplicationScope::All);
        assert_eq!(
            ApplicationService::scope(Some("ten-carol"), Some("tenant")).unwrap(),
            ApplicationScope::Tenant("ten-carol".to_string())
        );
        assert!(matches!(ApplicationService::scope(None, Some("manager")), Err(ServiceError::Invalid(_))));
        assert!(matches!(ApplicationService::scope(Some("x"), Some("admin")), Err(ServiceError::Invalid(_))));
    }

    #[tokio::test]
    async fn manager_scope_covers_owned_properties() {
        let (service, _) = service();
        let apps = service.list(&ApplicationScope::Manager("mgr-alice".to_string())).await.unwrap();
        let ids: Vec<i32> = apps.iter().map(|a| a.application.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(apps[0].manager.as_ref().map(|m| m.cognito_id.as_str()), Some("mgr-alice"));
        assert_eq!(apps[0].property.address, "2150 Mount Olympus Dr");
    }

    #[tokio::test]
    async fn approved_application_lists_its_lease() {
        let (service, _) = service();
        let apps = service.list(&ApplicationScope::Tenant("ten-carol".to_string())).await.unwrap();
        let approved = apps.iter().find(|a| a.application.id == 1).unwrap();
        let lease = approved.lease.as_ref().unwrap();
        assert_eq!(lease.lease.id, 1);
        assert!(lease.next_payment_date > lease.lease.start_date);
        assert!(apps.iter().find(|a| a.application.id == 3).unwrap().lease.is_none());
    }

    #[tokio::test]
    async fn approving_creates_lease_and_residence() {
        let (service, store) = service();
        let approved = service.update_status(2, ApplicationStatus::Approved).await.unwrap();
        assert_eq!(approved.status, ApplicationStatus::Approved);

        let lease_id = approved.lease_id.unwrap();
        let lease = store.lease(lease_id).await.unwrap().unwrap();
        assert_eq!(lease.property_id, 1);
        assert_eq!(lease.rent, 1000.0);
        assert_eq!(lease.available_from, lease.start_date);
        assert!(store.residences("ten-dave").await.unwrap().iter().any(|l| l.property.id == 1));
    }

    #[tokio::test]
    async fn decided_applications_cannot_change() {
        let (service, _) = service();
        assert!(matches!(
            service.update_status(1, ApplicationStatus::Denied).await,
            Err(ServiceError::Conflict(_))
        ));
        assert!(matches!(
            service.update_status(3, ApplicationStatus::Pending).await,
            Err(ServiceError::Invalid(_))
        ));
        service.update_status(3, ApplicationStatus::Denied).await.unwrap();
        assert!(matches!(
            service.update_status(3, ApplicationStatus::Approved).await,
            Err(ServiceError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn applying_for_unknown_property_is_not_found() {
        let (service, _) = service();
        let result = service
            .create(CreateApplicationRequest {
                property_id: 404,
                tenant_cognito_id: "ten-dave".to_string(),
                name: "Dave".to_string(),
                email: "dave@example.com".to_string(),
                phone_number: "555".to_string(),
                message: None,
                application_date: None,
            })
            .await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }
}
