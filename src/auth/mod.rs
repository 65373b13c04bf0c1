//! Authentication module
//!
//! JWT-based authentication with argon2 password hashing, plus the
//! guard layer that turns token arguments into validated identities.

mod guard;
mod jwt;
mod password;

pub use guard::{require_access, require_refresh, AuthError, Identity};
pub use jwt::{Claims, JwtService};
pub use password::PasswordService;
