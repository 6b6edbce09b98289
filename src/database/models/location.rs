use serde::{Deserialize, Serialize};

use crate::geo::{CodecError, Coordinates, CoordinateCodec};

/// Location as persisted: the point is kept in the store's spatial text form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredLocation {
    pub id: i32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: String,
}

/// Location as returned to callers, with decoded coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: i32,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: Coordinates,
}

/// Location supplied on creation, the point already encoded for the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewLocation {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub coordinates: String,
}

impl NewLocation {
    pub(crate) fn into_stored(self, id: i32) -> StoredLocation {
        StoredLocation {
            id,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
            coordinates: self.coordinates,
        }
    }
}

impl StoredLocation {
    pub fn decode(self, codec: &dyn CoordinateCodec) -> Result<Location, CodecError> {
        let coordinates = codec.decode(&self.coordinates)?;
        Ok(Location {
            id: self.id,
            address: self.address,
            city: self.city,
            state: self.state,
            country: self.country,
            postal_code: self.postal_code,
            coordinates,
        })
    }
}
