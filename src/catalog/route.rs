use std::fmt;

use crate::navigation::{DeepLink, LinkTarget, ParseError};

/// Screens reachable from the catalog root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRoute {
    Item(u64),
    Search { query: String },
    Settings,
}

impl fmt::Display for CatalogRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogRoute::Item(id) => write!(f, "item/{}", id),
            CatalogRoute::Search { query } => write!(f, "search?q={}", query),
            CatalogRoute::Settings => f.write_str("settings"),
        }
    }
}

/// `catalog://item/<id>`, `catalog://search?q=<query>`, `catalog://settings`.
impl DeepLink for CatalogRoute {
    const SCHEME: &'static str = "catalog";

    fn from_target(target: &LinkTarget) -> Result<Self, ParseError> {
        match target.segments().as_slice() {
            ["item", id] => id
                .parse()
                .map(CatalogRoute::Item)
                .map_err(|_| ParseError::InvalidParameter {
                    name: "id".to_string(),
                    value: id.to_string(),
                }),
            ["search"] => Ok(CatalogRoute::Search {
                query: target.require("q")?.to_string(),
            }),
            ["settings"] => Ok(CatalogRoute::Settings),
            _ => Err(target.unknown()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::parse;

    #[test]
    fn item_link() {
        assert_eq!(parse::<CatalogRoute>("catalog://item/42"), Ok(CatalogRoute::Item(42)));
    }

    #[test]
    fn search_link_decodes_query() {
        assert_eq!(
            parse::<CatalogRoute>("catalog://search?q=red%20shoes"),
            Ok(CatalogRoute::Search {
                query: "red shoes".to_string()
            })
        );
    }

    #[test]
    fn search_without_query_is_rejected() {
        assert_eq!(
            parse::<CatalogRoute>("catalog://search"),
            Err(ParseError::MissingParameter {
                name: "q".to_string()
            })
        );
    }

    #[test]
    fn non_numeric_item_id() {
        assert_eq!(
            parse::<CatalogRoute>("catalog://item/abc"),
            Err(ParseError::InvalidParameter {
                name: "id".to_string(),
                value: "abc".to_string()
            })
        );
    }

    #[test]
    fn unknown_path_and_scheme() {
        assert_eq!(
            parse::<CatalogRoute>("catalog://cart"),
            Err(ParseError::UnknownRoute {
                path: "cart".to_string()
            })
        );
        assert!(matches!(
            parse::<CatalogRoute>("https://example.com/item/1"),
            Err(ParseError::UnsupportedScheme { .. })
        ));
    }

    #[test]
    fn display_matches_link_path() {
        assert_eq!(CatalogRoute::Item(7).to_string(), "item/7");
        assert_eq!(CatalogRoute::Settings.to_string(), "settings");
    }
}
