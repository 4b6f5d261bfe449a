pub mod availability;
pub mod catalog;

pub use availability::{AvailabilityService, compute_availability};
pub use catalog::CatalogService;
