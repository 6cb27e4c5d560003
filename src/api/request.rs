use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// Ordered query pairs; repeated keys are kept.
pub type QueryPairs = SmallVec<[(String, String); 8]>;

/// HTTP method an endpoint is exposed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiMethod {
    #[serde(rename = "GET", alias = "get")]
    Get,
    #[default]
    #[serde(rename = "POST", alias = "post")]
    Post,
}

impl ApiMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiMethod::Get => "GET",
            ApiMethod::Post => "POST",
        }
    }

    /// `None` for methods endpoints cannot be registered under.
    #[must_use]
    pub fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::GET => Some(ApiMethod::Get),
            http::Method::POST => Some(ApiMethod::Post),
            _ => None,
        }
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("GET") {
            Ok(ApiMethod::Get)
        } else if s.eq_ignore_ascii_case("POST") {
            Ok(ApiMethod::Post)
        } else {
            Err(format!("unsupported method '{s}', expected GET or POST"))
        }
    }
}

/// Transport-neutral request handed to [`Api::handle`](crate::Api::handle).
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: http::Method,
    /// Path without the query string
    pub path: String,
    pub query: QueryPairs,
    /// Raw request body, if one was sent
    pub body: Option<String>,
}

impl ApiRequest {
    /// Build a request from a method and a request target such as
    /// `/subtract?x=5&y=1`.
    pub fn new(method: http::Method, target: &str) -> Self {
        let (path, query) = split_target(target);
        Self {
            method,
            path,
            query,
            body: None,
        }
    }

    pub fn get(target: &str) -> Self {
        Self::new(http::Method::GET, target)
    }

    pub fn post(target: &str, body: impl Into<String>) -> Self {
        Self::new(http::Method::POST, target).with_body(body)
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// All values of a query key, in order.
    pub fn query_values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.query
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Split a request target into its path and decoded query pairs.
pub fn split_target(target: &str) -> (String, QueryPairs) {
    match target.split_once('?') {
        Some((path, query)) => (normalize_path(path), parse_query_pairs(query)),
        None => (normalize_path(target), QueryPairs::new()),
    }
}

/// URL-decode a query string, keeping repeated keys in order.
pub fn parse_query_pairs(query: &str) -> QueryPairs {
    url::form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_target() {
        let req = ApiRequest::get("/subtract?x=5&y=1&tag=a&tag=b%20c");
        assert_eq!(req.path, "/subtract");
        assert_eq!(req.query.len(), 4);
        assert_eq!(req.query_values("tag").collect::<Vec<_>>(), ["a", "b c"]);
        assert_eq!(ApiRequest::get("").path, "/");
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<ApiMethod>(), Ok(ApiMethod::Get));
        assert_eq!("POST".parse::<ApiMethod>(), Ok(ApiMethod::Post));
        assert!("PUT".parse::<ApiMethod>().is_err());
        assert_eq!(ApiMethod::default(), ApiMethod::Post);
        assert_eq!(ApiMethod::from_http(&http::Method::DELETE), None);
    }

    #[test]
    fn test_method_serde_names() {
        assert_eq!(serde_json::to_string(&ApiMethod::Get).ok(), Some("\"GET\"".to_string()));
        let m: Option<ApiMethod> = serde_json::from_str("\"get\"").ok();
        assert_eq!(m, Some(ApiMethod::Get));
    }
}
