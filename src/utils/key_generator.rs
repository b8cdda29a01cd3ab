//! Short key and caller id generation.

use base64::Engine as _;
use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of every generated short key.
pub const KEY_LENGTH: usize = 8;

/// Number of random bytes behind a generated caller id.
const CALLER_ID_BYTES: usize = 16;

/// Generates a random short key.
///
/// Draws [`KEY_LENGTH`] characters from `[A-Za-z0-9]`. The RNG is not meant to
/// be unpredictable: collisions are caught by the store's uniqueness check.
///
/// # Examples
///
/// ```ignore
/// let key = generate_key();
/// assert_eq!(key.len(), 8);
/// assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(KEY_LENGTH)
        .map(char::from)
        .collect()
}

/// Generates an opaque caller id for clients that do not carry one yet.
///
/// Standard base64 of 16 random bytes (24 characters, padded).
pub fn generate_caller_id() -> String {
    let mut buffer = [0u8; CALLER_ID_BYTES];
    rand::rng().fill(&mut buffer);

    base64::engine::general_purpose::STANDARD.encode(buffer)
}
