//! Pure mapping from a logical call to an `HttpRequest` descriptor.
//!
//! The builder never touches the network and never encodes query strings;
//! the client appends those to the URL before calling `build`.

use crate::http::{HttpMethod, HttpRequest, Payload};

pub const AUTHORIZATION: &str = "Authorization";

/// Builds request descriptors carrying the configured token.
#[derive(Clone)]
pub struct RequestBuilder {
    token: String,
}

impl RequestBuilder {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Produce the descriptor for one call.
    ///
    /// The only header set is `Authorization`. A GET request never carries a
    /// body even when `payload` is given; any other method carries the
    /// payload unchanged.
    pub fn build(&self, method: HttpMethod, url: String, payload: Option<Payload>) -> HttpRequest {
        let body = match method {
            HttpMethod::Get => None,
            _ => payload,
        };
        HttpRequest {
            method,
            url,
            headers: vec![(AUTHORIZATION.to_string(), self.token.clone())],
            body,
        }
    }
}
