pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod services;

pub use middleware::require_admin;
pub use models::*;
pub use router::auth_routes;
pub use services::{AccessControl, UserService};
