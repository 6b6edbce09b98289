use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::property::Property;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub id: i32,
    pub cognito_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

/// Contact fields a tenant supplies on sign-up or profile update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantWithFavorites {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub favorites: Vec<Property>,
}
