//! Auth-domain identifiers, token secrets, and the cached session user.

pub mod id;
pub mod secret;
pub mod user;

pub use id::*;
pub use secret::*;
pub use user::*;
