use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::location::{Location, StoredLocation};
use crate::geo::{CodecError, CoordinateCodec};

string_enum! {
    pub enum PropertyType {
        Rooms,
        TinyHouse,
        Apartment,
        Villa,
        Townhouse,
        Cottage,
        Studio,
        Duplex,
        Penthouse,
        Bungalow,
        Farmhouse,
        CoLivingSpace,
    }
}

string_enum! {
    pub enum Amenity {
        WasherDryer,
        AirConditioning,
        Dishwasher,
        HighSpeedInternet,
        HardwoodFloors,
        WalkInClosets,
        Microwave,
        Refrigerator,
        Pool,
        Gym,
        Parking,
        PetsAllowed,
        WiFi,
        Heating,
        CableReady,
        SatelliteTV,
        SmokeFree,
        WheelchairAccessible,
        BalconyOrPatio,
        Fireplace,
        SecuritySystem,
        Elevator,
        Furnished,
        Storage,
        LaundryFacilities,
        CommunityLounge,
        BusinessCenter,
        Playground,
        BarbecueArea,
        TennisCourt,
        Clubhouse,
        Spa,
        RooftopAccess,
        FireExtinguisher,
        SmokeDetectors,
        SolarPanels,
        Garden,
        SecurityCameras,
    }
}

string_enum! {
    pub enum Highlight {
        HighSpeedInternetAccess,
        WasherDryer,
        AirConditioning,
        Heating,
        SmokeFree,
        CableReady,
        SatelliteTV,
        DoubleVanities,
        TubShower,
        Intercom,
        SprinklerSystem,
        RecentlyRenovated,
        CloseToTransit,
        GreatView,
        QuietNeighborhood,
        WheelchairAccessible,
        BalconyOrPatio,
        Fireplace,
        PrivateEntrance,
        SmartHomeFeatures,
        EnergyEfficientAppliances,
        GatedCommunity,
        RooftopAccess,
        SecureParking,
        OnSiteManagement,
        PetFriendly,
        NearSchool,
        NearHospital,
    }
}

string_enum! {
    pub enum AvailabilityStatus {
        Active,
        Rented,
        UnderOffer,
    }
}

/// Property attributes shared by the persisted and the wire form of a listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<Amenity>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: i32,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub available_from: Option<DateTime<Utc>>,
    pub year_built: Option<i32>,
    pub floor_number: Option<i32>,
    pub total_floors: Option<i32>,
    pub lease_term: Option<String>,
    pub availability_status: Option<AvailabilityStatus>,
    pub location_description: Option<String>,
    pub nearby_schools: Option<String>,
    pub nearby_hospitals: Option<String>,
    pub nearby_transit: Option<String>,
    pub nearby_shopping: Option<String>,
    pub posted_date: DateTime<Utc>,
    pub location_id: i32,
    pub manager_cognito_id: String,
}

/// A property joined with its location as read from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredListing {
    #[serde(flatten)]
    pub property: Property,
    pub location: StoredLocation,
}

/// A property joined with its location, coordinates decoded for callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(flatten)]
    pub property: Property,
    pub location: Location,
}

impl StoredListing {
    pub fn decode(self, codec: &dyn CoordinateCodec) -> Result<Listing, CodecError> {
        Ok(Listing {
            property: self.property,
            location: self.location.decode(codec)?,
        })
    }
}

/// Property attributes supplied on creation; ids and posting date are assigned by the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    pub security_deposit: f64,
    pub application_fee: f64,
    pub photo_urls: Vec<String>,
    pub amenities: Vec<Amenity>,
    pub highlights: Vec<Highlight>,
    pub is_pets_allowed: bool,
    pub is_parking_included: bool,
    pub beds: i32,
    pub baths: i32,
    pub square_feet: i32,
    pub property_type: PropertyType,
    pub available_from: Option<DateTime<Utc>>,
    pub year_built: Option<i32>,
    pub floor_number: Option<i32>,
    pub total_floors: Option<i32>,
    pub lease_term: Option<String>,
    pub availability_status: Option<AvailabilityStatus>,
    pub location_description: Option<String>,
    pub nearby_schools: Option<String>,
    pub nearby_hospitals: Option<String>,
    pub nearby_transit: Option<String>,
    pub nearby_shopping: Option<String>,
    pub manager_cognito_id: String,
}

impl NewProperty {
    pub(crate) fn into_property(self, id: i32, location_id: i32, posted_date: DateTime<Utc>) -> Property {
        Property {
            id,
            name: self.name,
            description: self.description,
            price_per_month: self.price_per_month,
            security_deposit: self.security_deposit,
            application_fee: self.application_fee,
            photo_urls: self.photo_urls,
            amenities: self.amenities,
            highlights: self.highlights,
            is_pets_allowed: self.is_pets_allowed,
            is_parking_included: self.is_parking_included,
            beds: self.beds,
            baths: self.baths,
            square_feet: self.square_feet,
            property_type: self.property_type,
            available_from: self.available_from,
            year_built: self.year_built,
            floor_number: self.floor_number,
            total_floors: self.total_floors,
            lease_term: self.lease_term,
            availability_status: self.availability_status,
            location_description: self.location_description,
            nearby_schools: self.nearby_schools,
            nearby_hospitals: self.nearby_hospitals,
            nearby_transit: self.nearby_transit,
            nearby_shopping: self.nearby_shopping,
            posted_date,
            location_id,
            manager_cognito_id: self.manager_cognito_id,
        }
    }
}
