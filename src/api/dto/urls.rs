//! DTOs for the caller's link listing.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct UserUrlItem {
    pub short_url: String,
    pub original_url: String,
}
