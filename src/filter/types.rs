use serde::{Deserialize, Serialize};

/// Raw property search parameters, exactly as received on the query string.
/// Every field is optional and parsed leniently by `SearchFilter::from_params`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub favorite_ids: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub property_type: Option<String>,
    pub square_feet_min: Option<String>,
    pub square_feet_max: Option<String>,
    pub amenities: Option<String>,
    pub available_from: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

impl SearchParams {
    /// Decodes a raw query string without rejecting anything.
    ///
    /// Unknown keys are ignored. A repeated list filter (`favoriteIds`,
    /// `amenities`) accumulates its values as if comma-separated; any other
    /// repeated key keeps its first value.
    pub fn from_query(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "favoriteIds" => {
                    append_list(&mut params.favorite_ids, &value);
                    continue;
                }
                "amenities" => {
                    append_list(&mut params.amenities, &value);
                    continue;
                }
                "priceMin" => &mut params.price_min,
                "priceMax" => &mut params.price_max,
                "beds" => &mut params.beds,
                "baths" => &mut params.baths,
                "propertyType" => &mut params.property_type,
                "squareFeetMin" => &mut params.square_feet_min,
                "squareFeetMax" => &mut params.square_feet_max,
                "availableFrom" => &mut params.available_from,
                "latitude" => &mut params.latitude,
                "longitude" => &mut params.longitude,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

fn append_list(slot: &mut Option<String>, value: &str) {
    match slot {
        Some(existing) if !value.trim().is_empty() => {
            existing.push(',');
            existing.push_str(value);
        }
        Some(_) => {}
        None => *slot = Some(value.to_string()),
    }
}

/// Sentinel accepted by the categorical filters to mean "do not constrain"
pub const ANY: &str = "any";

/// Fixed search radius around a requested point
pub const SEARCH_RADIUS_KM: f64 = 1000.0;

/// Degree-based approximation used to turn the radius into planar degrees
pub const KM_PER_DEGREE: f64 = 111.0;

pub fn search_radius_degrees() -> f64 {
    SEARCH_RADIUS_KM / KM_PER_DEGREE
}
