//! Width measurement: the post-order pass that fills the per-node side
//! table the planner reads.
//!
//! Widths are strict single-line rendering costs, including brackets,
//! separators, and bracket padding, excluding indentation (that depends on
//! context and is added by the planner's margin arithmetic). Each node is
//! measured exactly once per format call.

use crate::buffer::{PadSet, PadType};
use crate::document::{DocumentTree, NodeId, NodeKind};

#[derive(Debug, Clone, Copy)]
pub struct NodeMetrics {
    /// Columns needed to render this node inline, no indentation.
    pub inline_width: usize,
    /// 0 for scalars and empty containers, else 1 + the most complex child.
    pub complexity: u32,
    /// True when the subtree cannot sit on one line: it contains a comment
    /// or a preserved blank line somewhere.
    pub multiline: bool,
    /// Bracket padding class, for containers.
    pub pad: PadType,
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self {
            inline_width: 0,
            complexity: 0,
            multiline: false,
            pad: PadType::Empty,
        }
    }
}

pub struct MetricsTable {
    metrics: Vec<NodeMetrics>,
}

impl MetricsTable {
    pub fn measure(tree: &DocumentTree, pads: &PadSet, len: &dyn Fn(&str) -> usize) -> Self {
        let mut metrics = vec![NodeMetrics::default(); tree.len()];
        for entry in &tree.roots {
            measure_node(tree, pads, len, entry.node, &mut metrics);
        }
        Self { metrics }
    }

    pub fn get(&self, id: NodeId) -> NodeMetrics {
        self.metrics[id.index()]
    }
}

fn measure_node(
    tree: &DocumentTree,
    pads: &PadSet,
    len: &dyn Fn(&str) -> usize,
    id: NodeId,
    metrics: &mut Vec<NodeMetrics>,
) {
    let computed = match tree.kind(id) {
        NodeKind::Scalar { raw, .. } => NodeMetrics {
            inline_width: len(raw),
            ..NodeMetrics::default()
        },
        NodeKind::Comment { text, .. } => NodeMetrics {
            inline_width: len(text),
            multiline: true,
            ..NodeMetrics::default()
        },
        NodeKind::BlankLine => NodeMetrics {
            multiline: true,
            ..NodeMetrics::default()
        },
        NodeKind::Array { entries } | NodeKind::Object { entries } => {
            let is_array = matches!(tree.kind(id), NodeKind::Array { .. });
            let mut width = 0usize;
            let mut complexity = 0u32;
            let mut multiline = false;
            let mut value_count = 0usize;

            for entry in entries {
                measure_node(tree, pads, len, entry.node, metrics);
                let child = metrics[entry.node.index()];
                multiline |= child.multiline;
                if matches!(
                    tree.kind(entry.node),
                    NodeKind::Comment { .. } | NodeKind::BlankLine
                ) {
                    continue;
                }
                value_count += 1;
                complexity = complexity.max(child.complexity + 1);
                if let Some(key) = &entry.key {
                    width += len(key) + pads.colon_len();
                }
                width += child.inline_width;
            }
            if value_count > 1 {
                width += pads.comma_len() * (value_count - 1);
            }

            let pad = if entries.is_empty() {
                PadType::Empty
            } else if complexity >= 2 {
                PadType::Complex
            } else {
                PadType::Simple
            };
            width += pads.open_len(is_array, pad) + pads.close_len(is_array, pad);

            NodeMetrics {
                inline_width: width,
                complexity,
                multiline,
                pad,
            }
        }
    };
    metrics[id.index()] = computed;
}
