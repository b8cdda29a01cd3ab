//! DTOs for the single URL shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten one URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,
}

/// Short URL created for the request, or the existing one on conflict.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}
