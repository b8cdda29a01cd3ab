//! Core domain entities.
//!
//! Entities are plain data without behaviour beyond trivial accessors.
//!
//! # Entity Types
//!
//! - [`Record`] - A stored short link with its owner and deletion flag
//! - [`NewRecord`] - Input for inserting a record
//! - [`RecordView`], [`OwnedLink`], [`StoreStats`] - Read-only projections
//!
//! Callers outside the store only ever see projections, never a mutable
//! [`Record`].

pub mod record;

pub use record::{NewRecord, OwnedLink, Record, RecordView, StoreStats};
