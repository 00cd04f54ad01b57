pub mod manager;
pub mod models;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager};
pub use models::user::{User, UserResponse};
pub use users::UserRepository;
