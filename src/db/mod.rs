pub mod activity;
pub mod chat;
pub mod medical;
pub mod nutrition;
pub mod pool;
pub mod tracking;
pub mod users;

pub use pool::create_pool;
