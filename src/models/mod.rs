pub mod activity;
pub mod chat;
pub mod medical;
pub mod nutrition;
pub mod tracking;
pub mod user;
