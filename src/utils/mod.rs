//! Utility functions shared across layers.
//!
//! - [`key_generator`] - Short key and caller id generation
//! - [`db_error`] - PostgreSQL unique violation classification
//! - [`trusted_subnet`] - CIDR membership test for internal endpoints

pub mod db_error;
pub mod key_generator;
pub mod trusted_subnet;
