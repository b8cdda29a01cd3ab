//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! key generation and the deletion pool. Services consume the repository trait
//! and provide a transport-neutral API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::shortener_service::ShortenerService`] - Shortening, resolution,
//!   listing, deletion requests and statistics

pub mod services;
