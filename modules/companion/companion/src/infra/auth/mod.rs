//! Password hashing and token signing adapters.

pub mod jwt;
pub mod password;

pub use jwt::JwtTokenIssuer;
pub use password::Argon2Hasher;
