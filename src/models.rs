pub mod booking;
pub mod health;
pub mod provider;
pub mod session;
pub mod user;
