use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::database::models::{Application, Lease, Manager, Payment, StoredListing, Tenant};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixtures {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid fixtures: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A tenant/property pair, used for both favorites and residences
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantProperty {
    pub tenant_cognito_id: String,
    pub property_id: i32,
}

/// Seed data for the in-memory store
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub managers: Vec<Manager>,
    #[serde(default)]
    pub tenants: Vec<Tenant>,
    #[serde(default)]
    pub listings: Vec<StoredListing>,
    #[serde(default)]
    pub leases: Vec<Lease>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub favorites: Vec<TenantProperty>,
    #[serde(default)]
    pub residences: Vec<TenantProperty>,
}

impl Fixtures {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fixtures_parse() {
        let fixtures = Fixtures::load(concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/listings.yaml")).unwrap();
        assert!(!fixtures.listings.is_empty());
        assert!(!fixtures.managers.is_empty());
        assert!(fixtures
            .listings
            .iter()
            .all(|l| l.property.location_id == l.location.id));
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let fixtures = Fixtures::from_yaml_str("managers: []\n").unwrap();
        assert!(fixtures.listings.is_empty());
        assert!(fixtures.favorites.is_empty());
    }

    #[test]
    fn reports_missing_file() {
        let err = Fixtures::load("/nonexistent/fixtures.yaml").unwrap_err();
        assert!(matches!(err, FixtureError::Io { .. }));
    }
}
