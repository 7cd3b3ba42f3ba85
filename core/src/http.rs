//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe a TerrAvion request and its response as plain data.
//! The core builds `HttpRequest` values and classifies `HttpResponse` values
//! without touching the network; the `terravion` crate (or any other host)
//! executes the actual GET.
//!
//! The access token travels inside `query` like every other parameter, so a
//! host only has to forward `url` and `query` verbatim.

use crate::query::QueryParams;

/// HTTP method for a request. The upstream API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// A TerrAvion request described as plain data.
///
/// `url` is absolute and carries no query string; `query` holds the merged
/// caller parameters plus the resolved `access_token`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: QueryParams,
}

impl HttpRequest {
    /// The URL with its query string appended, form-urlencoded.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query.iter())
            .finish();
        format!("{}?{encoded}", self.url)
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by the host after executing an `HttpRequest`, then passed to
/// `TerrAvionClient::parse_response` for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_url_without_params_is_bare_url() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api2.terravion.com/users/getUserId".to_string(),
            query: QueryParams::new(),
        };
        assert_eq!(req.full_url(), "https://api2.terravion.com/users/getUserId");
    }

    #[test]
    fn full_url_encodes_params_in_order() {
        let mut query = QueryParams::new();
        query.insert("filter", r#"{"where":{"name":"north field"}}"#);
        query.insert("access_token", "abc");
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api2.terravion.com/blocks/b1".to_string(),
            query,
        };
        assert_eq!(
            req.full_url(),
            "https://api2.terravion.com/blocks/b1?filter=%7B%22where%22%3A%7B%22name%22%3A%22north+field%22%7D%7D&access_token=abc"
        );
    }

    #[test]
    fn method_renders_as_verb() {
        assert_eq!(HttpMethod::Get.as_str(), "GET");
    }
}
