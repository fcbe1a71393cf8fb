//! The layout planner: one decision per container.
//!
//! Eligibility facts flow bottom-up through the width side table (a child
//! too wide or comment-bearing makes its ancestors too wide or
//! comment-bearing), and this pass walks top-down carrying the depth so
//! the always-expand rule and margin widths apply. The most compact legal
//! mode wins: Inline, then Table, then Expanded.

use crate::buffer::PadSet;
use crate::document::{DocumentTree, NodeId, NodeKind};
use crate::options::LayoutOptions;
use crate::table::{self, TablePlan};
use crate::width::MetricsTable;

/// The chosen rendering for one container. Computed once during planning,
/// consumed once by the writer, never persisted.
#[derive(Debug, Clone)]
pub enum LayoutDecision {
    /// Whole subtree on one line.
    Inline,
    /// One child per line, children planned independently.
    Expanded,
    /// One row per line with columns aligned across rows.
    Table(TablePlan),
}

pub struct LayoutPlan {
    decisions: Vec<Option<LayoutDecision>>,
}

impl LayoutPlan {
    /// Decision for a container; scalars and nodes inside an inline or
    /// table rendering have none.
    pub fn decision(&self, id: NodeId) -> Option<&LayoutDecision> {
        self.decisions[id.index()].as_ref()
    }
}

pub struct Planner<'a> {
    tree: &'a DocumentTree,
    metrics: &'a MetricsTable,
    pads: &'a PadSet,
    options: &'a LayoutOptions,
    len: &'a dyn Fn(&str) -> usize,
}

impl<'a> Planner<'a> {
    pub fn new(
        tree: &'a DocumentTree,
        metrics: &'a MetricsTable,
        pads: &'a PadSet,
        options: &'a LayoutOptions,
        len: &'a dyn Fn(&str) -> usize,
    ) -> Self {
        Self {
            tree,
            metrics,
            pads,
            options,
            len,
        }
    }

    pub fn plan(&self, starting_depth: usize) -> LayoutPlan {
        let mut decisions: Vec<Option<LayoutDecision>> = vec![None; self.tree.len()];
        if let Some(root) = self.tree.root_value() {
            self.plan_node(root, starting_depth, 0, &mut decisions);
        }
        LayoutPlan { decisions }
    }

    /// `key_len` is the rendered width of the property name and colon in
    /// front of this node on its line, zero for array elements and roots.
    fn plan_node(
        &self,
        id: NodeId,
        depth: usize,
        key_len: usize,
        decisions: &mut Vec<Option<LayoutDecision>>,
    ) {
        if !self.tree.is_container(id) {
            return;
        }
        let m = self.metrics.get(id);
        let forced = self.options.always_expand_depth >= 0
            && (depth as isize) < self.options.always_expand_depth;
        let fits = self.pads.margin_len(depth) + key_len + m.inline_width
            <= self.options.max_inline_length;

        if !forced && !m.multiline && fits {
            log::trace!("node {:?} at depth {}: inline ({} cols)", id, depth, m.inline_width);
            decisions[id.index()] = Some(LayoutDecision::Inline);
            return;
        }

        if let Some(plan) =
            table::try_plan(self.tree, self.metrics, self.pads, self.options, self.len, id, depth)
        {
            log::trace!(
                "node {:?} at depth {}: table with {} columns",
                id,
                depth,
                plan.columns.len()
            );
            decisions[id.index()] = Some(LayoutDecision::Table(plan));
            return;
        }

        log::trace!("node {:?} at depth {}: expanded", id, depth);
        decisions[id.index()] = Some(LayoutDecision::Expanded);
        for entry in self.tree.entries(id) {
            if !matches!(
                self.tree.kind(entry.node),
                NodeKind::Comment { .. } | NodeKind::BlankLine
            ) {
                let child_key_len = entry
                    .key
                    .as_deref()
                    .map(|k| (self.len)(k) + self.pads.colon_len())
                    .unwrap_or(0);
                self.plan_node(entry.node, depth + 1, child_key_len, decisions);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    fn plan_root(input: &str, options: &LayoutOptions) -> (DocumentTree, LayoutPlan, NodeId) {
        let tree = Parser::new(options).parse(input).unwrap();
        let len = |s: &str| s.chars().count();
        let pads = PadSet::new(options, &len);
        let metrics = MetricsTable::measure(&tree, &pads, &len);
        let plan = Planner::new(&tree, &metrics, &pads, options, &len).plan(0);
        let root = tree.root_value().unwrap();
        (tree, plan, root)
    }

    #[test]
    fn short_container_goes_inline() {
        let (_, plan, root) = plan_root(r#"{"a": 1}"#, &LayoutOptions::default());
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Inline)));
    }

    #[test]
    fn wide_container_expands() {
        let mut opts = LayoutOptions::default();
        opts.max_inline_length = 10;
        let (_, plan, root) = plan_root(r#"{"alpha": 1, "beta": "two"}"#, &opts);
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Expanded)));
    }

    #[test]
    fn homogeneous_rows_become_a_table() {
        let mut opts = LayoutOptions::default();
        opts.max_inline_length = 14;
        let (_, plan, root) = plan_root("[[1,2],[3,4]]", &opts);
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Table(_))));
    }

    #[test]
    fn inline_beats_table_when_everything_fits() {
        let (_, plan, root) = plan_root("[[1,2],[3,4]]", &LayoutOptions::default());
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Inline)));
    }

    #[test]
    fn heterogeneous_rows_fall_back_to_expanded() {
        let mut opts = LayoutOptions::default();
        opts.max_inline_length = 14;
        let (tree, plan, root) = plan_root(r#"[[1,2],["ab",4]]"#, &opts);
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Expanded)));
        // Each row still gets its own (inline) decision.
        for entry in tree.entries(root) {
            assert!(matches!(plan.decision(entry.node), Some(LayoutDecision::Inline)));
        }
    }

    #[test]
    fn always_expand_depth_forces_expansion() {
        let mut opts = LayoutOptions::default();
        opts.always_expand_depth = 2;
        let (tree, plan, root) = plan_root(r#"{"a": [1, 2]}"#, &opts);
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Expanded)));
        let inner = tree.entries(root)[0].node;
        assert!(matches!(plan.decision(inner), Some(LayoutDecision::Expanded)));
    }

    #[test]
    fn always_expand_depth_spares_deeper_levels() {
        let mut opts = LayoutOptions::default();
        opts.always_expand_depth = 1;
        let (tree, plan, root) = plan_root(r#"{"a": [1, 2]}"#, &opts);
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Expanded)));
        let inner = tree.entries(root)[0].node;
        assert!(matches!(plan.decision(inner), Some(LayoutDecision::Inline)));
    }

    #[test]
    fn comments_keep_containers_off_one_line() {
        let mut opts = LayoutOptions::default();
        opts.comment_policy = crate::options::CommentPolicy::Preserve;
        let (_, plan, root) = plan_root("[1, // c\n2]", &opts);
        assert!(matches!(plan.decision(root), Some(LayoutDecision::Expanded)));
    }
}
