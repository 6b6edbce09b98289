pub mod codec;
pub mod geocoder;

pub use codec::{CodecError, Coordinates, CoordinateCodec, WktPointCodec};
pub use geocoder::{AddressQuery, GeocodeError, Geocoder, NominatimGeocoder};
