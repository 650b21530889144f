//! Password hashing, signed sessions, and the request extractors guarding the routes.

mod extract;
mod password;
mod session;

pub use extract::{bearer_token, AdminSession, Session};
pub use password::{PasswordError, PasswordService};
pub use session::{Claims, IssuedToken, Role, SessionAuthority, SessionError};
