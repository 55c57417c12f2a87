//! Splitting path patterns and concrete request paths into segments.
//!
//! Segments keep their leading `/` (`/orders`). An empty path and `/` both
//! become the single root segment `/`. A segment written as `:name` is a
//! parameter; it is stored under [`PARAM_SENTINEL`] so that `:id` and `:sku`
//! at the same position share one node.

use crate::error::MockError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Stored segment value for every parameter segment.
pub const PARAM_SENTINEL: &str = "/<param>";

/// Segment representing the path `/` itself.
pub const ROOT_SEGMENT: &str = "/";

const PARAM_PREFIX: &str = "/:";

static VALID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/?([a-zA-Z0-9_\-:]+/?)*$").expect("pattern regex is valid")
});

static VALID_PARAM_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_\-]+$").expect("param name regex is valid"));

/// One segment of a registered pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentSpec {
    Literal(String),
    Param { name: String },
}

impl SegmentSpec {
    /// Value that participates in the sibling uniqueness key.
    pub fn key(&self) -> &str {
        match self {
            SegmentSpec::Literal(value) => value,
            SegmentSpec::Param { .. } => PARAM_SENTINEL,
        }
    }

    pub fn is_param(&self) -> bool {
        matches!(self, SegmentSpec::Param { .. })
    }

    pub fn param_name(&self) -> Option<&str> {
        match self {
            SegmentSpec::Param { name } => Some(name),
            SegmentSpec::Literal(_) => None,
        }
    }
}

/// Split a path into `/`-prefixed segments, root-to-leaf.
///
/// Empty components are dropped, so `/a//b/` splits like `/a/b`.
pub fn split_path(path: &str) -> Vec<String> {
    let parts: Vec<String> = path
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| format!("/{part}"))
        .collect();

    if parts.is_empty() {
        vec![ROOT_SEGMENT.to_string()]
    } else {
        parts
    }
}

/// Canonical rendering of a concrete path: its segments joined back together.
pub fn canonical_path(path: &str) -> String {
    split_path(path).concat()
}

/// Classify each segment of a pattern. Does not validate syntax.
pub fn segments_of(pattern: &str) -> Vec<SegmentSpec> {
    split_path(pattern)
        .into_iter()
        .map(|part| match part.strip_prefix(PARAM_PREFIX) {
            Some(name) => SegmentSpec::Param {
                name: name.to_string(),
            },
            None => SegmentSpec::Literal(part),
        })
        .collect()
}

pub fn is_valid_pattern(pattern: &str) -> bool {
    VALID_PATTERN.is_match(pattern)
}

/// Validate a pattern and split it into segments.
pub fn parse_pattern(pattern: &str) -> Result<Vec<SegmentSpec>, MockError> {
    if !is_valid_pattern(pattern) {
        return Err(MockError::invalid(format!(
            "path [{pattern}] is not a valid pattern"
        )));
    }

    let segments = segments_of(pattern);
    for segment in &segments {
        if let Some(name) = segment.param_name() {
            if !VALID_PARAM_NAME.is_match(name) {
                return Err(MockError::invalid(format!(
                    "path [{pattern}] has an invalid parameter name [{name}]"
                )));
            }
        }
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("/a/b"), vec!["/a", "/b"]);
        assert_eq!(split_path("a/b"), vec!["/a", "/b"]);
        assert_eq!(split_path("/a//b/"), vec!["/a", "/b"]);
        assert_eq!(split_path("/"), vec!["/"]);
        assert_eq!(split_path(""), vec!["/"]);
        assert_eq!(split_path("//"), vec!["/"]);
    }

    #[test]
    fn test_canonical_path() {
        assert_eq!(canonical_path("/items/42/"), "/items/42");
        assert_eq!(canonical_path("items"), "/items");
        assert_eq!(canonical_path(""), "/");
    }

    #[test]
    fn test_segments_of_classifies_params() {
        let segments = segments_of("/resources/:resourceId");
        assert_eq!(
            segments,
            vec![
                SegmentSpec::Literal("/resources".to_string()),
                SegmentSpec::Param {
                    name: "resourceId".to_string()
                },
            ]
        );
        assert_eq!(segments[0].key(), "/resources");
        assert_eq!(segments[1].key(), PARAM_SENTINEL);
    }

    #[test]
    fn test_different_param_names_share_key() {
        let a = segments_of("/items/:id");
        let b = segments_of("/items/:sku");
        assert_eq!(a[1].key(), b[1].key());
        assert_ne!(a[1].param_name(), b[1].param_name());
    }

    #[test]
    fn test_colon_inside_segment_is_literal() {
        let segments = segments_of("/a:b");
        assert_eq!(segments, vec![SegmentSpec::Literal("/a:b".to_string())]);
    }

    #[test]
    fn test_pattern_validation() {
        for valid in ["/", "", "/a", "a/b", "/a/b/", "/a/:id", "/v1/my_res-1/:x_y"] {
            assert!(is_valid_pattern(valid), "{valid} should be valid");
        }
        for invalid in ["/a//b", "/a b", "/a?b=1", "/a/*", "/é"] {
            assert!(!is_valid_pattern(invalid), "{invalid} should be invalid");
        }
    }

    #[test]
    fn test_parse_pattern_rejects_bad_param_names() {
        assert!(matches!(
            parse_pattern("/items/:"),
            Err(MockError::InvalidInput(_))
        ));
        assert!(matches!(
            parse_pattern("/items/::id"),
            Err(MockError::InvalidInput(_))
        ));
        assert_eq!(parse_pattern("/items/:id").unwrap().len(), 2);
    }
}
