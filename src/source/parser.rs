use crate::catalog::AppRecord;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("top-level value is not an object")]
    NotAnObject,
    #[error("`apps` is not an array")]
    AppsNotArray,
}

/// Records decoded from a catalog document plus the number of array
/// elements that could not be decoded.
#[derive(Debug)]
pub struct ParseResult {
    pub apps: Vec<AppRecord>,
    pub skipped: usize,
}

/// Parse a catalog document of the shape `{"apps": [...]}`.
///
/// A missing or `null` `apps` field is an empty catalog. Elements that fail
/// to decode as [`AppRecord`] (no `id`, wrong types) are skipped and counted
/// rather than failing the whole document.
pub fn parse_catalog(bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let root: Value = serde_json::from_slice(bytes)?;
    let Value::Object(mut root) = root else {
        return Err(ParseError::NotAnObject);
    };

    let items = match root.remove("apps") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ParseError::AppsNotArray),
    };

    let total = items.len();
    let apps: Vec<AppRecord> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<AppRecord>(item) {
            Ok(app) => Some(app),
            Err(e) => {
                tracing::debug!(index, error = %e, "Skipping undecodable catalog entry");
                None
            }
        })
        .collect();

    Ok(ParseResult {
        skipped: total - apps.len(),
        apps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, UNKNOWN_APP};

    #[test]
    fn parses_well_formed_document() {
        let doc = br#"{"apps": [
            {"id": 1, "name": "Alpha", "company": "Acme", "category": "game"},
            {"id": 2, "name": "Beta", "company": "Zenith", "category": "news"}
        ]}"#;
        let result = parse_catalog(doc).unwrap();
        assert_eq!(result.apps.len(), 2);
        assert_eq!(result.skipped, 0);
        assert_eq!(result.apps[1].category, Category::News);
    }

    #[test]
    fn missing_or_null_apps_is_empty_catalog() {
        assert!(parse_catalog(b"{}").unwrap().apps.is_empty());
        assert!(parse_catalog(br#"{"apps": null}"#).unwrap().apps.is_empty());
    }

    #[test]
    fn extra_top_level_fields_are_ignored() {
        let doc = br#"{"version": 3, "apps": [{"id": 1}]}"#;
        let result = parse_catalog(doc).unwrap();
        assert_eq!(result.apps[0].name, UNKNOWN_APP);
    }

    #[test]
    fn bad_elements_are_skipped_and_counted() {
        let doc = br#"{"apps": [
            {"id": 1, "name": "Ok"},
            {"name": "No id"},
            "not an object",
            {"id": "seven"}
        ]}"#;
        let result = parse_catalog(doc).unwrap();
        assert_eq!(result.apps.len(), 1);
        assert_eq!(result.skipped, 3);
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            parse_catalog(b"{\"apps\": [").unwrap_err(),
            ParseError::Json(_)
        ));
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        assert!(matches!(
            parse_catalog(b"[1, 2]").unwrap_err(),
            ParseError::NotAnObject
        ));
        assert!(matches!(
            parse_catalog(br#"{"apps": {"id": 1}}"#).unwrap_err(),
            ParseError::AppsNotArray
        ));
    }
}
