//! Domain layer containing business entities and the deletion pipeline.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures and read projections
//! - [`repositories`] - Record store contract implemented by the infrastructure layer
//! - [`error`] - Backend failure type shared by all stores
//! - [`deletion_job`] - Soft deletion job model
//! - [`deletion_worker`] - Bounded worker pool applying deletion jobs
//!
//! # Deletion Flow
//!
//! 1. HTTP handler accepts a list of keys and answers `202 Accepted`
//! 2. [`crate::application::services::ShortenerService::request_deletion`]
//!    splits the keys into [`deletion_job::DeletionJob`]s
//! 3. [`deletion_worker::DeletionPool`] workers apply each job via
//!    [`repositories::RecordRepository::delete_batch`]
//! 4. Failed jobs are logged and dropped, never redelivered

pub mod deletion_job;
pub mod deletion_worker;
pub mod entities;
pub mod error;
pub mod repositories;
