pub mod types;
pub mod predicate;
pub mod filter;

pub use types::*;
pub use predicate::{Candidate, Predicate};
pub use filter::SearchFilter;
