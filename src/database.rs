pub mod booking;
pub mod postgres_repository;
pub mod session;
pub mod user;
