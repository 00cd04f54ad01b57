// handlers/protected/mod.rs - any authenticated account
pub mod auth;
pub mod kpis;

pub use auth::whoami;
pub use kpis::{channels_get, kpis_get};
