use chrono::{DateTime, Utc};
use sqlx::{Postgres, QueryBuilder};

use crate::database::models::{Amenity, Property, PropertyType};
use crate::geo::Coordinates;

/// One independent constraint of a property search.
///
/// The SQL form assumes the search query aliases `properties` as `p` and
/// `locations` as `l`.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    IdIn(Vec<i32>),
    PriceMin(f64),
    PriceMax(f64),
    Beds(i32),
    Baths(i32),
    SquareFeetMin(f64),
    SquareFeetMax(f64),
    PropertyType(PropertyType),
    /// Listing amenities must contain every one of these
    Amenities(Vec<Amenity>),
    /// Some lease of the listing is available on or before this instant
    AvailableBy(DateTime<Utc>),
    WithinRadius { center: Coordinates, degrees: f64 },
}

/// What an in-memory store knows about one listing when evaluating predicates
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub property: &'a Property,
    /// Decoded point of the listing's location; `None` if it could not be decoded
    pub point: Option<Coordinates>,
    /// `available_from` of every lease attached to the listing
    pub lease_availability: &'a [DateTime<Utc>],
}

impl Predicate {
    pub fn matches(&self, candidate: &Candidate<'_>) -> bool {
        let p = candidate.property;
        match self {
            Predicate::IdIn(ids) => ids.contains(&p.id),
            Predicate::PriceMin(min) => p.price_per_month >= *min,
            Predicate::PriceMax(max) => p.price_per_month <= *max,
            Predicate::Beds(beds) => p.beds == *beds,
            Predicate::Baths(baths) => p.baths == *baths,
            Predicate::SquareFeetMin(min) => f64::from(p.square_feet) >= *min,
            Predicate::SquareFeetMax(max) => f64::from(p.square_feet) <= *max,
            Predicate::PropertyType(kind) => p.property_type == *kind,
            Predicate::Amenities(required) => required.iter().all(|a| p.amenities.contains(a)),
            Predicate::AvailableBy(date) => candidate.lease_availability.iter().any(|from| from <= date),
            Predicate::WithinRadius { center, degrees } => candidate
                .point
                .map(|point| point.planar_distance_degrees(center) <= *degrees)
                .unwrap_or(false),
        }
    }

    /// Appends this predicate as a single parameterized SQL condition
    pub fn push_sql<'args>(&self, qb: &mut QueryBuilder<'args, Postgres>) {
        match self {
            Predicate::IdIn(ids) => {
                qb.push("p.id = ANY(").push_bind(ids.clone()).push(")");
            }
            Predicate::PriceMin(min) => {
                qb.push("p.price_per_month >= ").push_bind(*min);
            }
            Predicate::PriceMax(max) => {
                qb.push("p.price_per_month <= ").push_bind(*max);
            }
            Predicate::Beds(beds) => {
                qb.push("p.beds = ").push_bind(*beds);
            }
            Predicate::Baths(baths) => {
                qb.push("p.baths = ").push_bind(*baths);
            }
            Predicate::SquareFeetMin(min) => {
                qb.push("p.square_feet >= ").push_bind(*min);
            }
            Predicate::SquareFeetMax(max) => {
                qb.push("p.square_feet <= ").push_bind(*max);
            }
            Predicate::PropertyType(kind) => {
                qb.push("p.property_type = ").push_bind(kind.as_str());
            }
            Predicate::Amenities(required) => {
                let names: Vec<String> = required.iter().map(|a| a.as_str().to_string()).collect();
                qb.push("p.amenities @> ").push_bind(names);
            }
            Predicate::AvailableBy(date) => {
                qb.push("EXISTS (SELECT 1 FROM leases le WHERE le.property_id = p.id AND le.available_from <= ")
                    .push_bind(*date)
                    .push(")");
            }
            Predicate::WithinRadius { center, degrees } => {
                qb.push("ST_DWithin(l.coordinates::geometry, ST_SetSRID(ST_MakePoint(")
                    .push_bind(center.longitude)
                    .push(", ")
                    .push_bind(center.latitude)
                    .push("), 4326), ")
                    .push_bind(*degrees)
                    .push(")");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn property() -> Property {
        Property {
            id: 4,
            name: "Cottage".to_string(),
            description: "Quiet".to_string(),
            price_per_month: 1500.0,
            security_deposit: 750.0,
            application_fee: 25.0,
            photo_urls: vec![],
            amenities: vec![Amenity::WiFi, Amenity::Garden],
            highlights: vec![],
            is_pets_allowed: false,
            is_parking_included: true,
            beds: 2,
            baths: 1,
            square_feet: 900,
            property_type: PropertyType::Cottage,
            available_from: None,
            year_built: None,
            floor_number: None,
            total_floors: None,
            lease_term: None,
            availability_status: None,
            location_description: None,
            nearby_schools: None,
            nearby_hospitals: None,
            nearby_transit: None,
            nearby_shopping: None,
            posted_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            location_id: 4,
            manager_cognito_id: "mgr".to_string(),
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let p = property();
        let c = Candidate { property: &p, point: None, lease_availability: &[] };
        assert!(Predicate::PriceMin(1500.0).matches(&c));
        assert!(Predicate::PriceMax(1500.0).matches(&c));
        assert!(!Predicate::PriceMax(1499.99).matches(&c));
        assert!(Predicate::SquareFeetMin(900.0).matches(&c));
        assert!(Predicate::SquareFeetMax(900.0).matches(&c));
    }

    #[test]
    fn amenities_require_superset() {
        let p = property();
        let c = Candidate { property: &p, point: None, lease_availability: &[] };
        assert!(Predicate::Amenities(vec![Amenity::WiFi]).matches(&c));
        assert!(Predicate::Amenities(vec![Amenity::Garden, Amenity::WiFi]).matches(&c));
        assert!(!Predicate::Amenities(vec![Amenity::WiFi, Amenity::Pool]).matches(&c));
    }

    #[test]
    fn availability_needs_a_lease_on_or_before_date() {
        let p = property();
        let march = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let leases = [march];
        let with_lease = Candidate { property: &p, point: None, lease_availability: &leases };
        let without = Candidate { property: &p, point: None, lease_availability: &[] };

        assert!(Predicate::AvailableBy(march).matches(&with_lease));
        assert!(!Predicate::AvailableBy(Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap()).matches(&with_lease));
        assert!(!Predicate::AvailableBy(march).matches(&without));
    }

    #[test]
    fn radius_needs_a_decoded_point() {
        let p = property();
        let center = Coordinates::new(0.0, 0.0).unwrap();
        let near = Candidate { property: &p, point: Some(Coordinates::new(5.0, 5.0).unwrap()), lease_availability: &[] };
        let far = Candidate { property: &p, point: Some(Coordinates::new(10.0, 0.0).unwrap()), lease_availability: &[] };
        let unknown = Candidate { property: &p, point: None, lease_availability: &[] };
        let within = Predicate::WithinRadius { center, degrees: 1000.0 / 111.0 };

        assert!(within.matches(&near));
        assert!(!within.matches(&far));
        assert!(!within.matches(&unknown));
    }

    #[test]
    fn renders_bound_parameters_only() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        Predicate::WithinRadius { center: Coordinates::new(-122.0, 37.0).unwrap(), degrees: 9.0 }.push_sql(&mut qb);
        assert_eq!(
            qb.sql(),
            "ST_DWithin(l.coordinates::geometry, ST_SetSRID(ST_MakePoint($1, $2), 4326), $3)"
        );

        let mut qb = QueryBuilder::<Postgres>::new("");
        Predicate::Amenities(vec![Amenity::Pool]).push_sql(&mut qb);
        assert_eq!(qb.sql(), "p.amenities @> $1");
    }
}
