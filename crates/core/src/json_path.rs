//! Null-safe traversal of JSON payloads.
//!
//! Upstream GraphQL responses may be missing any intermediate level
//! (`data` can be `null`, a connection can be empty). [`get`] walks a fixed
//! path and reports exactly where it stopped instead of panicking or
//! collapsing every failure into the same `None`.
//!
//! A level is *missing* when the key or index is absent, when the value
//! there is `null`, or when the parent has the wrong shape (indexing an
//! object, keying into an array, descending into a scalar). Any other value,
//! including `false`, `0` and `""`, is found; callers that want
//! truthiness check the result themselves.
//!
//! ```
//! use draft_lookup_core::json_path::{self, Segment, Traversal};
//! use serde_json::json;
//!
//! let body = json!({"data": {"draftOrders": {"nodes": []}}});
//! let path = [
//!     Segment::Key("data"),
//!     Segment::Key("draftOrders"),
//!     Segment::Key("nodes"),
//!     Segment::Index(0),
//! ];
//!
//! match json_path::get(&body, &path) {
//!     Traversal::Found(_) => unreachable!(),
//!     Traversal::Missing { depth, .. } => assert_eq!(depth, 3),
//! }
//! ```

use core::fmt;

use serde_json::Value;

/// One step of a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Object member.
    Key(&'a str),
    /// Array element.
    Index(usize),
}

impl fmt::Display for Segment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Outcome of walking a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Traversal<'v, 'p> {
    /// Every segment resolved to a non-null value.
    Found(&'v Value),
    /// Traversal stopped at `segment`, the `depth`-th (0-based) step of the path.
    Missing {
        depth: usize,
        segment: Segment<'p>,
    },
}

impl<'v> Traversal<'v, '_> {
    /// The resolved value, if any.
    #[must_use]
    pub const fn found(self) -> Option<&'v Value> {
        match self {
            Self::Found(value) => Some(value),
            Self::Missing { .. } => None,
        }
    }
}

/// Walk `path` from `root`.
///
/// An empty path returns `root` itself unless `root` is `null`, in which case
/// it is reported missing at depth 0 with a `Key("")` segment.
#[must_use]
pub fn get<'v, 'p>(root: &'v Value, path: &[Segment<'p>]) -> Traversal<'v, 'p> {
    let mut current = root;

    for (depth, segment) in path.iter().enumerate() {
        let next = match (*segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Index(index), Value::Array(items)) => items.get(index),
            _ => None,
        };

        match next {
            Some(value) if !value.is_null() => current = value,
            _ => {
                return Traversal::Missing {
                    depth,
                    segment: *segment,
                };
            }
        }
    }

    if current.is_null() {
        return Traversal::Missing {
            depth: 0,
            segment: Segment::Key(""),
        };
    }

    Traversal::Found(current)
}

/// Render a path as `a.b[0]` for log fields.
#[must_use]
pub fn display(path: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in path {
        if matches!(segment, Segment::Key(_)) && !out.is_empty() {
            out.push('.');
        }
        out.push_str(&segment.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const NODE_PATH: [Segment<'static>; 4] = [
        Segment::Key("data"),
        Segment::Key("draftOrders"),
        Segment::Key("nodes"),
        Segment::Index(0),
    ];

    fn missing_depth(body: &Value) -> Option<usize> {
        match get(body, &NODE_PATH) {
            Traversal::Found(_) => None,
            Traversal::Missing { depth, .. } => Some(depth),
        }
    }

    #[test]
    fn test_found_first_node() {
        let body = json!({"data": {"draftOrders": {"nodes": [{"name": "#D1"}, {"name": "#D2"}]}}});
        assert_eq!(get(&body, &NODE_PATH).found(), Some(&json!({"name": "#D1"})));
    }

    #[test]
    fn test_missing_at_each_level() {
        assert_eq!(missing_depth(&json!({})), Some(0));
        assert_eq!(missing_depth(&json!({"data": null})), Some(0));
        assert_eq!(missing_depth(&json!({"data": {}})), Some(1));
        assert_eq!(missing_depth(&json!({"data": {"draftOrders": null}})), Some(1));
        assert_eq!(
            missing_depth(&json!({"data": {"draftOrders": {"nodes": null}}})),
            Some(2)
        );
        assert_eq!(
            missing_depth(&json!({"data": {"draftOrders": {"nodes": []}}})),
            Some(3)
        );
        assert_eq!(
            missing_depth(&json!({"data": {"draftOrders": {"nodes": [null]}}})),
            Some(3)
        );
    }

    #[test]
    fn test_falsy_scalars_are_found() {
        for node in [json!(false), json!(0), json!("")] {
            let body = json!({"data": {"draftOrders": {"nodes": [node.clone()]}}});
            assert_eq!(get(&body, &NODE_PATH).found(), Some(&node));
        }
    }

    #[test]
    fn test_wrong_shape_is_missing() {
        // nodes is an object, not a list
        assert_eq!(
            missing_depth(&json!({"data": {"draftOrders": {"nodes": {"0": {}}}}})),
            Some(3)
        );
        // data is a scalar
        assert_eq!(missing_depth(&json!({"data": "oops"})), Some(1));
        assert_eq!(missing_depth(&json!([1, 2, 3])), Some(0));
    }

    #[test]
    fn test_missing_reports_segment() {
        let body = json!({"data": {"draftOrders": null}});
        assert_eq!(
            get(&body, &NODE_PATH),
            Traversal::Missing {
                depth: 1,
                segment: Segment::Key("draftOrders"),
            }
        );
    }

    #[test]
    fn test_empty_path() {
        let body = json!({"a": 1});
        assert_eq!(get(&body, &[]).found(), Some(&body));
        assert!(get(&Value::Null, &[]).found().is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(display(&NODE_PATH), "data.draftOrders.nodes[0]");
        assert_eq!(display(&[]), "");
    }
}
