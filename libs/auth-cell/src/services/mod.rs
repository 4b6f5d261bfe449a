pub mod access;
pub mod user;

pub use access::AccessControl;
pub use user::UserService;
