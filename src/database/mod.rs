pub mod fixtures;
pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use fixtures::{FixtureError, Fixtures};
pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{
    ApplicationScope, ApplicationStore, LeaseStore, ManagerStore, PropertyStore, StoreError, StoreHealth, TenantStore,
};
