mod claims;
mod extract;
mod jwt;
pub mod second_factor;

pub use claims::{Actor, Claims, ADMIN_ROLE};
pub use jwt::JwtValidator;
