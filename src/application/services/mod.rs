//! Business logic services for the application layer.

pub mod shortener_service;

pub use shortener_service::{
    BatchRequestItem, BatchResultItem, BatchShortenOutcome, DELETION_CHUNK_SIZE,
    MAX_KEY_ATTEMPTS, Resolution, ShortenOutcome, ShortenerService,
};
