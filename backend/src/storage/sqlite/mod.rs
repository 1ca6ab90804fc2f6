//! # SQLite Storage Module
//!
//! - **connection.rs** - pool setup and schema
//! - **birthday_repository.rs** - [`BirthdayStorage`](super::BirthdayStorage) over the `birthdays` table

pub mod birthday_repository;
pub mod connection;

pub use birthday_repository::SqliteBirthdayRepository;
pub use connection::DbConnection;
