//! Record repository implementations.
//!
//! # Repositories
//!
//! - [`MemoryRecordRepository`] - In-process store, used when no database is configured
//! - [`PgRecordRepository`] - PostgreSQL store backed by the `shortener` table

pub mod memory_record_repository;
pub mod pg_record_repository;

pub use memory_record_repository::MemoryRecordRepository;
pub use pg_record_repository::PgRecordRepository;
