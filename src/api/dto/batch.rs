//! DTOs for batch shortening.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One URL of a batch, tagged with a caller-chosen correlation id.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchItemRequest {
    #[validate(length(min = 1, message = "correlation_id must not be empty"))]
    pub correlation_id: String,

    #[validate(url(message = "Invalid URL format"))]
    pub original_url: String,
}

/// Short URL assigned to the request with the same correlation id.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItemResponse {
    pub correlation_id: String,
    pub short_url: String,
}
