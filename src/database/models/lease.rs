use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::property::Property;
use super::tenant::Tenant;

string_enum! {
    pub enum PaymentStatus {
        Pending,
        Paid,
        PartiallyPaid,
        Overdue,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Date from which the leased property is available; drives the `availableFrom` search filter
    pub available_from: DateTime<Utc>,
    pub rent: f64,
    pub deposit: f64,
    pub property_id: i32,
    pub tenant_cognito_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLease {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub available_from: DateTime<Utc>,
    pub rent: f64,
    pub deposit: f64,
    pub property_id: i32,
    pub tenant_cognito_id: String,
}

impl NewLease {
    /// One-year lease starting at `start`, priced from the property
    pub fn one_year(property: &Property, tenant_cognito_id: &str, start: DateTime<Utc>) -> Self {
        let end = start.checked_add_months(Months::new(12)).unwrap_or(start);
        Self {
            start_date: start,
            end_date: end,
            available_from: start,
            rent: property.price_per_month,
            deposit: property.security_deposit,
            property_id: property.id,
            tenant_cognito_id: tenant_cognito_id.to_string(),
        }
    }

    pub(crate) fn into_lease(self, id: i32) -> Lease {
        Lease {
            id,
            start_date: self.start_date,
            end_date: self.end_date,
            available_from: self.available_from,
            rent: self.rent,
            deposit: self.deposit,
            property_id: self.property_id,
            tenant_cognito_id: self.tenant_cognito_id,
        }
    }
}

impl Lease {
    /// First monthly anniversary of the start date strictly after `now`
    pub fn next_payment_date(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        if self.start_date > now {
            return self.start_date;
        }
        let mut months = 1;
        loop {
            match self.start_date.checked_add_months(Months::new(months)) {
                Some(candidate) if candidate > now => return candidate,
                Some(_) => months += 1,
                None => return now,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseWithRelations {
    #[serde(flatten)]
    pub lease: Lease,
    pub tenant: Tenant,
    pub property: Property,
}

/// Lease as shown alongside an application, with the upcoming payment date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseSummary {
    #[serde(flatten)]
    pub lease: Lease,
    pub next_payment_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub lease_id: i32,
    pub amount_due: f64,
    pub amount_paid: f64,
    pub due_date: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
    #[sqlx(try_from = "String")]
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lease_starting(start: DateTime<Utc>) -> Lease {
        Lease {
            id: 1,
            start_date: start,
            end_date: start.checked_add_months(Months::new(12)).unwrap(),
            available_from: start,
            rent: 1000.0,
            deposit: 500.0,
            property_id: 1,
            tenant_cognito_id: "t-1".to_string(),
        }
    }

    #[test]
    fn next_payment_is_first_anniversary_after_now() {
        let lease = lease_starting(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        let now = Utc.with_ymd_and_hms(2024, 3, 20, 12, 0, 0).unwrap();
        assert_eq!(lease.next_payment_date(now), Utc.with_ymd_and_hms(2024, 4, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn next_payment_skips_exact_anniversary() {
        let lease = lease_starting(Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
        let now = Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap();
        assert_eq!(lease.next_payment_date(now), Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn future_lease_pays_on_start_date() {
        let start = Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap();
        let lease = lease_starting(start);
        assert_eq!(lease.next_payment_date(Utc.with_ymd_and_hms(2029, 1, 1, 0, 0, 0).unwrap()), start);
    }

    #[test]
    fn month_end_start_clamps_to_shorter_months() {
        let lease = lease_starting(Utc.with_ymd_and_hms(2024, 1, 31, 0, 0, 0).unwrap());
        let now = Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap();
        assert_eq!(lease.next_payment_date(now), Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
    }
}
