/// Error for a string that names no variant of a stored enumeration
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a fieldless enum persisted and transmitted by its variant name,
/// with `as_str`, `FromStr`, `TryFrom<String>` (for `#[sqlx(try_from)]` columns)
/// and `Display` alongside the serde derives.
macro_rules! string_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::database::models::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    other => Err($crate::database::models::UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::database::models::UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod application;
pub mod lease;
pub mod location;
pub mod manager;
pub mod property;
pub mod tenant;

pub use application::{Application, ApplicationProperty, ApplicationStatus, ApplicationSummary, NewApplication};
pub use lease::{Lease, LeaseSummary, LeaseWithRelations, NewLease, Payment, PaymentStatus};
pub use location::{Location, NewLocation, StoredLocation};
pub use manager::{Manager, ManagerProfile};
pub use property::{
    Amenity, AvailabilityStatus, Highlight, Listing, NewProperty, Property, PropertyType, StoredListing,
};
pub use tenant::{Tenant, TenantProfile, TenantWithFavorites};
