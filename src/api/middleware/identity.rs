//! Caller identification through the `user_id` cookie.

use axum::{
    extract::Request,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    middleware::Next,
    response::Response,
};

use crate::utils::key_generator::generate_caller_id;

/// Name of the cookie carrying the caller id.
pub const COOKIE_NAME: &str = "user_id";

/// Opaque id of the caller, available to handlers as a request extension.
///
/// ```rust,ignore
/// async fn handler(Extension(CallerId(owner)): Extension<CallerId>) { ... }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

/// Attaches a [`CallerId`] to every request.
///
/// Reuses the value of the `user_id` cookie when present and non-empty.
/// Otherwise a fresh id is generated and returned to the client with
/// `Set-Cookie`, so later requests are attributed to the same caller.
///
/// The id is not signed: any client can claim any id.
pub async fn layer(mut req: Request, next: Next) -> Response {
    let (caller_id, issued) = match cookie_value(req.headers(), COOKIE_NAME) {
        Some(id) => (id, false),
        None => (generate_caller_id(), true),
    };

    req.extensions_mut().insert(CallerId(caller_id.clone()));

    let mut response = next.run(req).await;

    if issued {
        let cookie = format!("{}={}; Path=/; HttpOnly", COOKIE_NAME, caller_id);
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode caller cookie"),
        }
    }

    response
}

/// Finds a non-empty cookie by name across every `Cookie` header.
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| {
            let mut parts = cookie.trim().splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(key), Some(value)) if key == name && !value.is_empty() => {
                    Some(value.to_string())
                }
                _ => None,
            }
        })
}
