use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use super::predicate::{Candidate, Predicate};
use super::types::{search_radius_degrees, SearchParams, ANY};
use crate::database::models::{Amenity, PropertyType};
use crate::geo::Coordinates;

/// Conjunction of independent search predicates.
///
/// Built leniently from query parameters: a value that does not parse as
/// its expected type leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
    predicates: Vec<Predicate>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_params(params: &SearchParams) -> Self {
        let mut filter = Self::new();

        if let Some(ids) = present(&params.favorite_ids).and_then(parse_id_list) {
            filter.push(Predicate::IdIn(ids));
        }
        if let Some(min) = present(&params.price_min).and_then(parse_number) {
            filter.push(Predicate::PriceMin(min));
        }
        if let Some(max) = present(&params.price_max).and_then(parse_number) {
            filter.push(Predicate::PriceMax(max));
        }
        if let Some(beds) = categorical(&params.beds).and_then(parse_count) {
            filter.push(Predicate::Beds(beds));
        }
        if let Some(baths) = categorical(&params.baths).and_then(parse_count) {
            filter.push(Predicate::Baths(baths));
        }
        if let Some(min) = present(&params.square_feet_min).and_then(parse_number) {
            filter.push(Predicate::SquareFeetMin(min));
        }
        if let Some(max) = present(&params.square_feet_max).and_then(parse_number) {
            filter.push(Predicate::SquareFeetMax(max));
        }
        if let Some(kind) = categorical(&params.property_type).and_then(|v| v.parse::<PropertyType>().ok()) {
            filter.push(Predicate::PropertyType(kind));
        }
        if let Some(amenities) = categorical(&params.amenities).and_then(parse_amenities) {
            filter.push(Predicate::Amenities(amenities));
        }
        if let Some(date) = categorical(&params.available_from).and_then(parse_date) {
            filter.push(Predicate::AvailableBy(date));
        }
        if let Some(center) = parse_center(&params.latitude, &params.longitude) {
            filter.push(Predicate::WithinRadius { center, degrees: search_radius_degrees() });
        }

        filter
    }

    pub fn with(mut self, predicate: Predicate) -> Self {
        self.push(predicate);
        self
    }

    pub fn push(&mut self, predicate: Predicate) {
        self.predicates.push(predicate);
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        self.predicates.iter().all(|p| p.matches(candidate))
    }

    /// Appends ` WHERE a AND b ...`, or nothing when unconstrained
    pub fn push_where<'args>(&self, qb: &mut QueryBuilder<'args, Postgres>) {
        if self.predicates.is_empty() {
            return;
        }
        qb.push(" WHERE ");
        for (i, predicate) in self.predicates.iter().enumerate() {
            if i > 0 {
                qb.push(" AND ");
            }
            predicate.push_sql(qb);
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn categorical(value: &Option<String>) -> Option<&str> {
    present(value).filter(|v| !v.eq_ignore_ascii_case(ANY))
}

fn parse_number(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_count(value: &str) -> Option<i32> {
    value.parse::<i32>().ok()
}

fn parse_id_list(value: &str) -> Option<Vec<i32>> {
    let ids = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<i32>().ok())
        .collect::<Option<Vec<_>>>()?;
    (!ids.is_empty()).then_some(ids)
}

fn parse_amenities(value: &str) -> Option<Vec<Amenity>> {
    let amenities = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<Amenity>().ok())
        .collect::<Option<Vec<_>>>()?;
    (!amenities.is_empty()).then_some(amenities)
}

/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC) and plain dates (UTC midnight)
pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_center(latitude: &Option<String>, longitude: &Option<String>) -> Option<Coordinates> {
    let lat = present(latitude).and_then(parse_number)?;
    let lon = present(longitude).and_then(parse_number)?;
    Coordinates::new(lon, lat).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn params() -> SearchParams {
        SearchParams::default()
    }

    #[test]
    fn empty_params_compose_no_predicates() {
        let filter = SearchFilter::from_params(&params());
        assert!(filter.is_empty());

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM properties p");
        filter.push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT 1 FROM properties p");
    }

    #[test]
    fn any_sentinel_is_a_no_op() {
        let filter = SearchFilter::from_params(&SearchParams {
            beds: Some("any".to_string()),
            baths: Some("ANY".to_string()),
            property_type: Some("any".to_string()),
            amenities: Some("any".to_string()),
            available_from: Some("any".to_string()),
            ..params()
        });
        assert!(filter.is_empty());
    }

    #[test]
    fn each_filter_maps_to_one_predicate() {
        let filter = SearchFilter::from_params(&SearchParams {
            favorite_ids: Some("3, 1,2".to_string()),
            price_min: Some("500".to_string()),
            price_max: Some("1500.50".to_string()),
            beds: Some("2".to_string()),
            baths: Some("1".to_string()),
            property_type: Some("Apartment".to_string()),
            square_feet_min: Some("400".to_string()),
            square_feet_max: Some("1200".to_string()),
            amenities: Some("WiFi,Pool".to_string()),
            available_from: Some("2024-05-01".to_string()),
            latitude: Some("37.77".to_string()),
            longitude: Some("-122.42".to_string()),
        });

        assert_eq!(
            filter.predicates(),
            &[
                Predicate::IdIn(vec![3, 1, 2]),
                Predicate::PriceMin(500.0),
                Predicate::PriceMax(1500.5),
                Predicate::Beds(2),
                Predicate::Baths(1),
                Predicate::SquareFeetMin(400.0),
                Predicate::SquareFeetMax(1200.0),
                Predicate::PropertyType(PropertyType::Apartment),
                Predicate::Amenities(vec![Amenity::WiFi, Amenity::Pool]),
                Predicate::AvailableBy(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
                Predicate::WithinRadius {
                    center: Coordinates::new(-122.42, 37.77).unwrap(),
                    degrees: 1000.0 / 111.0,
                },
            ]
        );
    }

    #[test]
    fn unparseable_values_are_treated_as_absent() {
        let filter = SearchFilter::from_params(&SearchParams {
            favorite_ids: Some("1,two".to_string()),
            price_min: Some("cheap".to_string()),
            price_max: Some("NaN".to_string()),
            beds: Some("2.5".to_string()),
            property_type: Some("Castle".to_string()),
            amenities: Some("WiFi,Moat".to_string()),
            available_from: Some("not-a-date".to_string()),
            latitude: Some("north".to_string()),
            longitude: Some("-122.42".to_string()),
            ..params()
        });
        assert!(filter.is_empty(), "unexpected predicates: {:?}", filter.predicates());
    }

    #[test]
    fn half_a_point_is_ignored() {
        let only_lat = SearchFilter::from_params(&SearchParams { latitude: Some("10".to_string()), ..params() });
        let only_lon = SearchFilter::from_params(&SearchParams { longitude: Some("10".to_string()), ..params() });
        assert!(only_lat.is_empty());
        assert!(only_lon.is_empty());
    }

    #[test]
    fn parses_supported_date_forms() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_date("2024-05-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_date("2024-05-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_date("2024-05-01T12:30:00"), Some(expected));
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn where_clause_joins_predicates_with_and() {
        let filter = SearchFilter::new()
            .with(Predicate::PriceMax(1500.0))
            .with(Predicate::Beds(2));
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM properties p");
        filter.push_where(&mut qb);
        assert_eq!(qb.sql(), "SELECT 1 FROM properties p WHERE p.price_per_month <= $1 AND p.beds = $2");
    }
}
