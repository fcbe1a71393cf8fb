//! Serialization of a planned document back to text.
//!
//! Output is a pure function of (tree, plan, options): indentation, comma
//! and bracket padding, comment re-insertion, the configured line ending,
//! and exactly one trailing newline. The minify emitter lives here too.

use crate::buffer::{LineBuffer, PadSet};
use crate::document::{
    CommentPlacement, CommentStyle, DocumentTree, Entry, NodeId, NodeKind,
};
use crate::options::LayoutOptions;
use crate::planner::{LayoutDecision, LayoutPlan};
use crate::table::{self, RowShape, TablePlan};
use crate::width::MetricsTable;

pub struct Writer<'a> {
    tree: &'a DocumentTree,
    metrics: &'a MetricsTable,
    plan: &'a LayoutPlan,
    pads: &'a PadSet,
    options: &'a LayoutOptions,
    len: &'a dyn Fn(&str) -> usize,
    out: LineBuffer,
}

impl<'a> Writer<'a> {
    pub fn new(
        tree: &'a DocumentTree,
        metrics: &'a MetricsTable,
        plan: &'a LayoutPlan,
        pads: &'a PadSet,
        options: &'a LayoutOptions,
        len: &'a dyn Fn(&str) -> usize,
    ) -> Self {
        Self {
            tree,
            metrics,
            plan,
            pads,
            options,
            len,
            out: LineBuffer::new(),
        }
    }

    pub fn write(mut self, starting_depth: usize) -> String {
        let tree = self.tree;
        self.write_entry_list(&tree.roots, starting_depth, false, None);
        self.out.finish()
    }

    /// Writes a run of entries, one line each: values with their commas
    /// and trailing comments, standalone comments, and blank lines.
    fn write_entry_list(
        &mut self,
        entries: &'a [Entry],
        depth: usize,
        with_commas: bool,
        key_pad: Option<usize>,
    ) {
        let last_value_idx = entries.iter().rposition(|e| self.is_value(e.node));
        let mut i = 0;
        while i < entries.len() {
            let entry = &entries[i];
            match self.tree.kind(entry.node) {
                NodeKind::BlankLine => {
                    self.pads.write_margin(&mut self.out, 0);
                    self.out.end_line(self.pads.eol());
                }
                NodeKind::Comment { .. } => {
                    // A trailing comment that lost its value (filtered or
                    // reordered input) falls back to its own line.
                    self.write_standalone_comment(entry.node, depth);
                }
                _ => {
                    self.pads.write_margin(&mut self.out, depth);
                    if let Some(key) = &entry.key {
                        self.write_key(key, key_pad);
                    }
                    self.write_value(entry.node, depth);
                    let is_last = last_value_idx == Some(i);
                    if with_commas && (!is_last || self.options.write_trailing_commas) {
                        self.out.push(self.pads.comma());
                    }
                    i = self.append_trailing_comments(entries, i);
                    self.out.end_line(self.pads.eol());
                }
            }
            i += 1;
        }
    }

    /// Appends any same-line-trailing comments stored right after the
    /// value at `i`; returns the index of the last entry consumed.
    fn append_trailing_comments(&mut self, entries: &'a [Entry], mut i: usize) -> usize {
        while let Some(next) = entries.get(i + 1) {
            match self.tree.kind(next.node) {
                NodeKind::Comment {
                    text,
                    placement: CommentPlacement::SameLineTrailing,
                    ..
                } => {
                    // A padded comma (or a table row's comma-width filler)
                    // already supplies the separating space.
                    if !self.out.ends_with_space() {
                        self.out.push(self.pads.comment_gap());
                    }
                    self.out.push(text);
                    i += 1;
                }
                _ => break,
            }
        }
        i
    }

    fn write_key(&mut self, key: &'a str, key_pad: Option<usize>) {
        let key_width = (self.len)(key);
        self.out.push(key);
        match key_pad {
            None => self.out.push(self.pads.colon()),
            Some(target) if self.options.colon_before_prop_name_padding => {
                self.out.push(self.pads.colon());
                self.out.push_spaces(target.saturating_sub(key_width));
            }
            Some(target) => {
                self.out.push_spaces(target.saturating_sub(key_width));
                self.out.push(self.pads.colon());
            }
        }
    }

    fn write_value(&mut self, id: NodeId, depth: usize) {
        match self.tree.kind(id) {
            NodeKind::Scalar { raw, .. } => self.out.push(raw),
            NodeKind::Array { .. } | NodeKind::Object { .. } => match self.plan.decision(id) {
                Some(LayoutDecision::Expanded) => self.write_expanded(id, depth),
                Some(LayoutDecision::Table(plan)) => self.write_table(id, plan, depth),
                Some(LayoutDecision::Inline) | None => self.write_inline(id),
            },
            // Comments and blanks are handled by the entry-list writer.
            NodeKind::Comment { .. } | NodeKind::BlankLine => {}
        }
    }

    fn write_inline(&mut self, id: NodeId) {
        match self.tree.kind(id) {
            NodeKind::Scalar { raw, .. } => self.out.push(raw),
            NodeKind::Array { entries } | NodeKind::Object { entries } => {
                let is_array = matches!(self.tree.kind(id), NodeKind::Array { .. });
                let pad = self.metrics.get(id).pad;
                self.out.push(self.pads.open(is_array, pad));
                let mut first = true;
                for entry in entries {
                    if !self.is_value(entry.node) {
                        continue;
                    }
                    if !first {
                        self.out.push(self.pads.comma());
                    }
                    first = false;
                    if let Some(key) = &entry.key {
                        self.out.push(key);
                        self.out.push(self.pads.colon());
                    }
                    self.write_inline(entry.node);
                }
                self.out.push(self.pads.close(is_array, pad));
            }
            NodeKind::Comment { .. } | NodeKind::BlankLine => {}
        }
    }

    fn write_expanded(&mut self, id: NodeId, depth: usize) {
        let entries = self.tree.entries(id);
        let is_array = matches!(self.tree.kind(id), NodeKind::Array { .. });
        self.out.push(if is_array { "[" } else { "{" });
        self.out.end_line(self.pads.eol());

        let key_pad = if !is_array && self.options.align_expanded_property_names {
            entries
                .iter()
                .filter(|e| self.is_value(e.node))
                .filter_map(|e| e.key.as_deref())
                .map(|k| (self.len)(k))
                .max()
        } else {
            None
        };
        self.write_entry_list(entries, depth + 1, true, key_pad);

        self.pads.write_margin(&mut self.out, depth);
        self.out.push(if is_array { "]" } else { "}" });
    }

    fn write_table(&mut self, id: NodeId, plan: &'a TablePlan, depth: usize) {
        let entries = self.tree.entries(id);
        self.out.push("[");
        self.out.end_line(self.pads.eol());

        let last_value_idx = entries.iter().rposition(|e| self.is_value(e.node));
        let mut i = 0;
        while i < entries.len() {
            let entry = &entries[i];
            match self.tree.kind(entry.node) {
                NodeKind::BlankLine => {
                    self.pads.write_margin(&mut self.out, 0);
                    self.out.end_line(self.pads.eol());
                }
                NodeKind::Comment { .. } => {
                    self.write_standalone_comment(entry.node, depth + 1);
                }
                _ => {
                    self.pads.write_margin(&mut self.out, depth + 1);
                    self.write_table_row(entry.node, plan);
                    let is_last = last_value_idx == Some(i);
                    if !is_last || self.options.write_trailing_commas {
                        self.out.push(self.pads.comma());
                    } else {
                        // Keeps a trailing comment aligned with the rows
                        // above; trimmed at end of line when nothing follows.
                        let mut filler = self.pads.comma_len();
                        if !self.pads.comma().ends_with(' ') {
                            filler += self.pads.comment_gap().len();
                        }
                        self.out.push_spaces(filler);
                    }
                    i = self.append_trailing_comments(entries, i);
                    self.out.end_line(self.pads.eol());
                }
            }
            i += 1;
        }

        self.pads.write_margin(&mut self.out, depth);
        self.out.push("]");
    }

    fn write_table_row(&mut self, row: NodeId, plan: &'a TablePlan) {
        let is_array = plan.shape == RowShape::Arrays;
        self.out.push(self.pads.open(is_array, plan.row_pad));
        let cells = self.tree.entries(row);
        let count = plan.columns.len();
        for (slot, column) in plan.columns.iter().enumerate() {
            let cell = &cells[slot];
            if let Some(key) = &cell.key {
                self.out.push(key);
                self.out.push(self.pads.colon());
            }
            let shape = table::cell_shape(self.tree, cell.node);
            let value_width = self.metrics.get(cell.node).inline_width;
            let (left, right) =
                column.padding_for(value_width, shape, self.options.number_list_alignment);
            self.out.push_spaces(left);
            self.write_inline(cell.node);
            if slot + 1 < count {
                self.out.push(self.pads.comma());
            }
            self.out.push_spaces(right);
        }
        self.out.push(self.pads.close(is_array, plan.row_pad));
    }

    fn write_standalone_comment(&mut self, id: NodeId, depth: usize) {
        let NodeKind::Comment { text, .. } = self.tree.kind(id) else {
            return;
        };
        for (n, line) in text.split('\n').enumerate() {
            self.pads.write_margin(&mut self.out, depth);
            self.out.push(if n == 0 { line } else { line.trim_start() });
            self.out.end_line(self.pads.eol());
        }
    }

    fn is_value(&self, id: NodeId) -> bool {
        !matches!(
            self.tree.kind(id),
            NodeKind::Comment { .. } | NodeKind::BlankLine
        )
    }
}

/// Emits the document with no layout whitespace at all. Preserved line
/// comments keep a newline after themselves; nothing else gets one.
pub fn minify(tree: &DocumentTree) -> String {
    let mut out = String::new();
    minify_entries(tree, &tree.roots, &mut out);
    out
}

fn minify_entries(tree: &DocumentTree, entries: &[Entry], out: &mut String) {
    let mut first = true;
    for entry in entries {
        match tree.kind(entry.node) {
            NodeKind::BlankLine => {}
            NodeKind::Comment { text, style, .. } => {
                out.push_str(text);
                if *style == CommentStyle::Line {
                    out.push('\n');
                }
            }
            _ => {
                if !first {
                    out.push(',');
                }
                first = false;
                if let Some(key) = &entry.key {
                    out.push_str(key);
                    out.push(':');
                }
                minify_value(tree, entry.node, out);
            }
        }
    }
}

fn minify_value(tree: &DocumentTree, id: NodeId, out: &mut String) {
    match tree.kind(id) {
        NodeKind::Scalar { raw, .. } => out.push_str(raw),
        NodeKind::Array { entries } => {
            out.push('[');
            minify_entries(tree, entries, out);
            out.push(']');
        }
        NodeKind::Object { entries } => {
            out.push('{');
            minify_entries(tree, entries, out);
            out.push('}');
        }
        NodeKind::Comment { .. } | NodeKind::BlankLine => {}
    }
}
