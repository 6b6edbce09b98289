use std::sync::Arc;

use tracing::debug;

use super::ServiceError;
use crate::database::models::{Listing, StoredListing};
use crate::database::PropertyStore;
use crate::filter::{SearchFilter, SearchParams};
use crate::geo::CoordinateCodec;

/// Composes property searches from optional query parameters and decodes
/// the stored coordinates of every listing returned.
///
/// Stateless: every call is one filtered read against the store.
#[derive(Clone)]
pub struct SearchQueryComposer {
    store: Arc<dyn PropertyStore>,
    codec: Arc<dyn CoordinateCodec>,
}

impl SearchQueryComposer {
    pub fn new(store: Arc<dyn PropertyStore>, codec: Arc<dyn CoordinateCodec>) -> Self {
        Self { store, codec }
    }

    pub async fn search(&self, params: &SearchParams) -> Result<Vec<Listing>, ServiceError> {
        let filter = SearchFilter::from_params(params);
        debug!(predicates = filter.predicates().len(), "composed property search");

        let stored = self.store.search(&filter).await?;
        decode_listings(self.codec.as_ref(), stored)
    }

    pub async fn find(&self, id: i32) -> Result<Listing, ServiceError> {
        let stored = self
            .store
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Property not found"))?;
        Ok(stored.decode(self.codec.as_ref())?)
    }
}

/// Decodes every listing, failing the whole batch on the first bad point
pub(crate) fn decode_listings(
    codec: &dyn CoordinateCodec,
    stored: Vec<StoredListing>,
) -> Result<Vec<Listing>, ServiceError> {
    stored
        .into_iter()
        .map(|listing| listing.decode(codec).map_err(ServiceError::from))
        .collect()
}
