use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Manager {
    pub id: i32,
    pub cognito_id: String,
    pub name: String,
    pub email: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerProfile {
    pub name: String,
    pub email: String,
    pub phone_number: String,
}
