//! Deep-link resolution.
//!
//! Parsing is a pure function of the URL; it never looks at a stack, so
//! routes can be resolved and tested without any navigation context.

use thiserror::Error;
use url::Url;

use super::Route;

/// Errors produced while turning a URL into a route.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported scheme '{found}' (expected '{expected}')")]
    UnsupportedScheme {
        expected: &'static str,
        found: String,
    },

    #[error("No route matches '/{path}'")]
    UnknownRoute { path: String },

    #[error("Missing query parameter '{name}'")]
    MissingParameter { name: String },

    #[error("Invalid value '{value}' for '{name}'")]
    InvalidParameter { name: String, value: String },
}

/// A URL split into the parts routes match on.
///
/// `catalog://item/42?tab=reviews` has segments `["item", "42"]` and one
/// query pair `("tab", "reviews")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl LinkTarget {
    pub fn segments(&self) -> Vec<&str> {
        self.segments.iter().map(String::as_str).collect()
    }

    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn require(&self, name: &str) -> Result<&str, ParseError> {
        self.query(name)
            .ok_or_else(|| ParseError::MissingParameter {
                name: name.to_string(),
            })
    }

    /// Error for a target no route accepts.
    pub fn unknown(&self) -> ParseError {
        ParseError::UnknownRoute { path: self.path() }
    }
}

/// A route family that can be reached from a URL.
pub trait DeepLink: Route + Sized {
    /// Scheme the family answers to, e.g. `"catalog"`.
    const SCHEME: &'static str;

    fn from_target(target: &LinkTarget) -> Result<Self, ParseError>;
}

/// Resolve `input` into a route of family `R`.
pub fn parse<R: DeepLink>(input: &str) -> Result<R, ParseError> {
    let url = Url::parse(input).map_err(|source| ParseError::InvalidUrl {
        url: input.to_string(),
        source,
    })?;

    if url.scheme() != R::SCHEME {
        return Err(ParseError::UnsupportedScheme {
            expected: R::SCHEME,
            found: url.scheme().to_string(),
        });
    }

    let mut segments = Vec::new();
    if let Some(host) = url.host_str().filter(|host| !host.is_empty()) {
        segments.push(host.to_string());
    }
    if let Some(path) = url.path_segments() {
        segments.extend(
            path.filter(|segment| !segment.is_empty())
                .map(str::to_string),
        );
    }

    let query = url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    R::from_target(&LinkTarget { segments, query })
}
