pub mod activity;
pub mod assistant;
pub mod dashboard;
pub mod health;
pub mod medical;
pub mod news;
pub mod nutrition;
pub mod profile;
pub mod tracking;
