//! Domain types shared by the waiters and the CLI.

pub mod user;

pub use user::{TestUser, SUPER_TENANT_DOMAIN};
