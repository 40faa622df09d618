pub mod auth;
pub mod booking;
pub mod error;
pub mod health;
pub mod provider;
pub mod user;
