//! Repository trait definitions for the domain layer.
//!
//! The record store is polymorphic over backends that all implement
//! [`RecordRepository`]. Implementations live in
//! `crate::infrastructure::persistence`; mock implementations are generated via
//! `mockall` for unit tests.
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod record_repository;

pub use record_repository::{BatchOutcome, InsertOutcome, RecordRepository, RecordSink};

#[cfg(test)]
pub use record_repository::MockRecordRepository;
