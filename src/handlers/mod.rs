pub mod applications;
pub mod leases;
pub mod managers;
pub mod properties;
pub mod root;
pub mod tenants;
