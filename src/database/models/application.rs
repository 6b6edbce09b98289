use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::lease::LeaseSummary;
use super::manager::Manager;
use super::property::Property;
use super::tenant::Tenant;

string_enum! {
    pub enum ApplicationStatus {
        Pending,
        Approved,
        Denied,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i32,
    pub application_date: DateTime<Utc>,
    #[sqlx(try_from = "String")]
    pub status: ApplicationStatus,
    pub property_id: i32,
    pub tenant_cognito_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
    pub lease_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub application_date: DateTime<Utc>,
    pub property_id: i32,
    pub tenant_cognito_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub message: Option<String>,
}

impl NewApplication {
    pub(crate) fn into_application(self, id: i32) -> Application {
        Application {
            id,
            application_date: self.application_date,
            status: ApplicationStatus::Pending,
            property_id: self.property_id,
            tenant_cognito_id: self.tenant_cognito_id,
            name: self.name,
            email: self.email,
            phone_number: self.phone_number,
            message: self.message,
            lease_id: None,
        }
    }
}

/// Property as shown inside an application listing, with its street address inlined
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProperty {
    #[serde(flatten)]
    pub property: Property,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSummary {
    #[serde(flatten)]
    pub application: Application,
    pub property: ApplicationProperty,
    pub tenant: Option<Tenant>,
    pub manager: Option<Manager>,
    pub lease: Option<LeaseSummary>,
}
