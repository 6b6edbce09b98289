use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::ServiceError;
use crate::database::models::{Manager, ManagerProfile};
use crate::database::ManagerStore;

/// Body of `POST /managers`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateManagerRequest {
    pub cognito_id: String,
    #[serde(flatten)]
    pub profile: ManagerProfile,
}

#[derive(Clone)]
pub struct ManagerService {
    managers: Arc<dyn ManagerStore>,
}

impl ManagerService {
    pub fn new(managers: Arc<dyn ManagerStore>) -> Self {
        Self { managers }
    }

    pub async fn get(&self, cognito_id: &str) -> Result<Manager, ServiceError> {
        self.managers
            .manager(cognito_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Manager not found"))
    }

    pub async fn create(&self, request: CreateManagerRequest) -> Result<Manager, ServiceError> {
        if request.cognito_id.trim().is_empty() {
            return Err(ServiceError::invalid("cognitoId is required"));
        }
        let manager = self.managers.create_manager(&request.cognito_id, request.profile).await?;
        info!("created manager {}", manager.cognito_id);
        Ok(manager)
    }

    pub async fn update(&self, cognito_id: &str, profile: ManagerProfile) -> Result<Manager, ServiceError> {
        Ok(self.managers.update_manager(cognito_id, profile).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;

    #[tokio::test]
    async fn create_then_update() {
        let service = ManagerService::new(Arc::new(MemoryStore::default()));
        let created = service
            .create(CreateManagerRequest {
                cognito_id: "mgr-new".to_string(),
                profile: ManagerProfile {
                    name: "New".to_string(),
                    email: "new@example.com".to_string(),
                    phone_number: "555".to_string(),
                },
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);

        let updated = service
            .update(
                "mgr-new",
                ManagerProfile {
                    name: "Renamed".to_string(),
                    email: "new@example.com".to_string(),
                    phone_number: "556".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(service.get("mgr-new").await.unwrap(), updated);
    }

    #[tokio::test]
    async fn blank_cognito_id_is_invalid() {
        let service = ManagerService::new(Arc::new(MemoryStore::default()));
        let result = service
            .create(CreateManagerRequest {
                cognito_id: " ".to_string(),
                profile: ManagerProfile {
                    name: "x".to_string(),
                    email: "x".to_string(),
                    phone_number: "x".to_string(),
                },
            })
            .await;
        assert!(matches!(result, Err(ServiceError::Invalid(_))));
    }
}
