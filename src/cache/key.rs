//! Cache key derivation.

use thiserror::Error;

use crate::http::{Request, Response};

/// Errors raised by a [`KeyStrategy`].
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("cannot derive a cache key for {uri}: {reason}")]
    Unkeyable { uri: String, reason: String },
}

/// Maps requests to store keys.
///
/// The post-response key may differ from the pre-origin one when the strategy
/// takes response data such as `Vary` into account.
pub trait KeyStrategy: Send + Sync {
    /// Returns the key to look the request up under.
    fn key(&self, request: &Request) -> Result<String, KeyError>;

    /// Returns the key to store the origin's response under.
    fn key_for_response(&self, request: &Request, _response: &Response) -> Result<String, KeyError> {
        self.key(request)
    }
}

/// Keys requests by method and URI: `"GET https://example.com/a?b=c"`.
///
/// The fragment, which never reaches the origin, is dropped.
///
/// # Examples
///
/// ```
/// use rttp_cache::cache::{DefaultKeyStrategy, KeyStrategy};
/// use rttp_cache::http::Request;
///
/// let key = DefaultKeyStrategy.key(&Request::get("https://example.com/a#top")).unwrap();
/// assert_eq!(key, "GET https://example.com/a");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyStrategy;

impl KeyStrategy for DefaultKeyStrategy {
    fn key(&self, request: &Request) -> Result<String, KeyError> {
        let uri = request.uri();
        let uri = uri.split_once('#').map_or(uri, |(before, _)| before);
        if uri.is_empty() {
            return Err(KeyError::Unkeyable {
                uri: request.uri().to_owned(),
                reason: "empty URI".to_owned(),
            });
        }
        Ok(format!("{} {}", request.method(), uri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, StatusCode};

    #[test]
    fn method_is_part_of_the_key() {
        let get = DefaultKeyStrategy.key(&Request::get("/a")).unwrap();
        let head = DefaultKeyStrategy.key(&Request::new(Method::Head, "/a")).unwrap();
        assert_ne!(get, head);
    }

    #[test]
    fn response_key_defaults_to_request_key() {
        let req = Request::get("/a?x=1");
        let res = Response::new(StatusCode::Ok).header("Vary", "Accept");
        assert_eq!(
            DefaultKeyStrategy.key_for_response(&req, &res).unwrap(),
            "GET /a?x=1"
        );
    }

    #[test]
    fn empty_uri_is_unkeyable() {
        assert!(matches!(
            DefaultKeyStrategy.key(&Request::get("#frag")),
            Err(KeyError::Unkeyable { .. })
        ));
    }
}
