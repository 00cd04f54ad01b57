// handlers/elevated/mod.rs - admin accounts only
//
// Mounted behind jwt_auth -> validate_user -> require_admin. The admin check
// reads the role stored in the users table, so a demoted account loses access
// immediately even with an unexpired token.
pub mod config;
pub mod dataset;
pub mod users;

pub use config::{config_get, config_post};
pub use dataset::{dataset_get, upload_post};
pub use users::{user_delete, user_password_put, user_role_put, users_list};
