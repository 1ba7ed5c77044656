pub mod comments;
pub mod communities;
pub mod manager;
pub mod models;
pub mod posts;
pub mod users;

pub use manager::{DatabaseError, DatabaseManager};
