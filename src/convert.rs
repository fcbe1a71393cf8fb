//! Building a document tree from an in-memory [`serde_json::Value`].
//!
//! This is the serialize path: the value is rendered to raw JSON text
//! node by node, then laid out by the same planner and writer as parsed
//! input. A depth limit guards against pathologically deep values.

use crate::document::{DocumentTree, Entry, NodeId, NodeKind, ScalarKind};
use crate::error::RefractError;

/// Converts `value` into a single-root document tree.
pub fn value_to_tree(
    value: &serde_json::Value,
    recursion_limit: usize,
) -> Result<DocumentTree, RefractError> {
    let mut tree = DocumentTree::new();
    let root = convert(value, &mut tree, recursion_limit)?;
    tree.roots.push(Entry {
        key: None,
        node: root,
    });
    Ok(tree)
}

fn convert(
    value: &serde_json::Value,
    tree: &mut DocumentTree,
    recursion_limit: usize,
) -> Result<NodeId, RefractError> {
    if recursion_limit == 0 {
        return Err(RefractError::Serialize(
            "depth limit exceeded - possible circular reference".to_string(),
        ));
    }

    let kind = match value {
        serde_json::Value::Null => NodeKind::Scalar {
            raw: "null".to_string(),
            kind: ScalarKind::Null,
        },
        serde_json::Value::Bool(true) => NodeKind::Scalar {
            raw: "true".to_string(),
            kind: ScalarKind::True,
        },
        serde_json::Value::Bool(false) => NodeKind::Scalar {
            raw: "false".to_string(),
            kind: ScalarKind::False,
        },
        serde_json::Value::Number(num) => NodeKind::Scalar {
            raw: num.to_string(),
            kind: ScalarKind::Number,
        },
        serde_json::Value::String(val) => NodeKind::Scalar {
            raw: quote(val)?,
            kind: ScalarKind::String,
        },
        serde_json::Value::Array(arr) => {
            let mut entries = Vec::with_capacity(arr.len());
            for child in arr {
                let node = convert(child, tree, recursion_limit - 1)?;
                entries.push(Entry { key: None, node });
            }
            NodeKind::Array { entries }
        }
        serde_json::Value::Object(map) => {
            let mut entries = Vec::with_capacity(map.len());
            for (key, child) in map {
                let node = convert(child, tree, recursion_limit - 1)?;
                entries.push(Entry {
                    key: Some(quote(key)?),
                    node,
                });
            }
            NodeKind::Object { entries }
        }
    };
    Ok(tree.push(kind))
}

/// Renders a string as a quoted, escaped JSON string literal.
fn quote(text: &str) -> Result<String, RefractError> {
    serde_json::to_string(text).map_err(|e| RefractError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_keep_their_rendered_text() {
        let tree = value_to_tree(&json!(1.5), 16).unwrap();
        let root = tree.root_value().unwrap();
        assert!(matches!(
            tree.kind(root),
            NodeKind::Scalar { raw, kind: ScalarKind::Number } if raw == "1.5"
        ));
    }

    #[test]
    fn strings_are_quoted_and_escaped() {
        let tree = value_to_tree(&json!("a\"b"), 16).unwrap();
        let root = tree.root_value().unwrap();
        assert!(matches!(
            tree.kind(root),
            NodeKind::Scalar { raw, .. } if raw == r#""a\"b""#
        ));
    }

    #[test]
    fn objects_carry_quoted_keys() {
        let tree = value_to_tree(&json!({"x": [1, 2]}), 16).unwrap();
        let root = tree.root_value().unwrap();
        let entries = tree.entries(root);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key.as_deref(), Some("\"x\""));
        assert_eq!(tree.entries(entries[0].node).len(), 2);
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut value = json!(1);
        for _ in 0..5 {
            value = json!([value]);
        }
        assert!(value_to_tree(&value, 3).is_err());
        assert!(value_to_tree(&value, 16).is_ok());
    }
}
