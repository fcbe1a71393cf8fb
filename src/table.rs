//! Table layout: homogeneity detection and column measurement.
//!
//! An array qualifies for table layout when its rows share one structural
//! signature — all objects with the same ordered key list, or all arrays
//! with the same arity and compatible element kinds (null matches any
//! kind). This module re-validates that itself; any violation yields
//! `None` and the planner falls back to Expanded. It never errors.

use crate::buffer::{PadSet, PadType};
use crate::document::{DocumentTree, NodeId, NodeKind, ScalarKind};
use crate::options::{LayoutOptions, NumberListAlignment};
use crate::width::MetricsTable;

/// Width of the `null` literal, the floor for numeric columns holding one.
const NULL_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Unset,
    Number,
    Text,
    Array,
    Object,
    Mixed,
}

/// What a single table cell holds, as far as padding is concerned.
#[derive(Debug, Clone, Copy)]
pub enum CellShape {
    Number { digits_before_point: usize },
    Null,
    Other,
}

#[derive(Debug, Clone)]
pub struct Column {
    /// Raw key text for object tables; `None` for array tables.
    pub key: Option<String>,
    /// Composite width of the padded value field.
    pub width: usize,
    /// True when every cell is a number or null.
    pub numeric: bool,
    max_before_dec: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    Arrays,
    Objects,
}

/// A committed table layout: consumed once by the writer, then discarded.
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub shape: RowShape,
    pub columns: Vec<Column>,
    pub row_pad: PadType,
}

impl Column {
    /// Spaces to emit before and after a cell value; the caller writes
    /// `spaces(left) value separator spaces(right)`, which places commas
    /// before the padding except inside number alignment.
    pub fn padding_for(
        &self,
        value_width: usize,
        shape: CellShape,
        alignment: NumberListAlignment,
    ) -> (usize, usize) {
        if !self.numeric {
            return (0, self.width.saturating_sub(value_width));
        }
        match alignment {
            NumberListAlignment::Left => (0, self.width.saturating_sub(value_width)),
            NumberListAlignment::Right => (self.width.saturating_sub(value_width), 0),
            NumberListAlignment::Decimal => match shape {
                CellShape::Null => (
                    self.max_before_dec.saturating_sub(value_width),
                    self.width.saturating_sub(self.max_before_dec),
                ),
                CellShape::Number {
                    digits_before_point,
                } => {
                    let left = self.max_before_dec.saturating_sub(digits_before_point);
                    (left, self.width.saturating_sub(left + value_width))
                }
                CellShape::Other => (0, self.width.saturating_sub(value_width)),
            },
        }
    }
}

/// Digit count before the decimal point (or exponent marker) of a raw
/// number literal; the whole literal when there is neither.
pub fn digits_before_point(raw: &str) -> usize {
    raw.find(['.', 'e', 'E']).unwrap_or(raw.len())
}

fn digits_after_point(raw: &str) -> usize {
    match raw.find(['.', 'e', 'E']) {
        Some(idx) => raw.len().saturating_sub(idx + 1),
        None => 0,
    }
}

pub fn cell_shape(tree: &DocumentTree, id: NodeId) -> CellShape {
    match tree.kind(id) {
        NodeKind::Scalar {
            raw,
            kind: ScalarKind::Number,
        } => CellShape::Number {
            digits_before_point: digits_before_point(raw),
        },
        NodeKind::Scalar {
            kind: ScalarKind::Null,
            ..
        } => CellShape::Null,
        _ => CellShape::Other,
    }
}

/// Attempts a table layout for the array at `id`, whose rows would sit at
/// `depth + 1`. Returns `None` whenever any eligibility rule fails.
pub fn try_plan(
    tree: &DocumentTree,
    metrics: &MetricsTable,
    pads: &PadSet,
    options: &LayoutOptions,
    len: &dyn Fn(&str) -> usize,
    id: NodeId,
    depth: usize,
) -> Option<TablePlan> {
    if options.max_table_row_complexity < 0 {
        return None;
    }
    if options.always_expand_depth >= 0 && ((depth + 1) as isize) < options.always_expand_depth {
        return None;
    }
    let NodeKind::Array { entries } = tree.kind(id) else {
        return None;
    };

    let rows: Vec<NodeId> = entries
        .iter()
        .map(|e| e.node)
        .filter(|&n| {
            !matches!(
                tree.kind(n),
                NodeKind::Comment { .. } | NodeKind::BlankLine
            )
        })
        .collect();
    if rows.len() < 2 {
        return None;
    }

    let mut row_pad = PadType::Simple;
    for &row in &rows {
        let m = metrics.get(row);
        if m.multiline || m.complexity as isize > options.max_table_row_complexity {
            return None;
        }
        if m.complexity >= 2 {
            row_pad = PadType::Complex;
        }
    }

    let all_arrays = rows
        .iter()
        .all(|&r| matches!(tree.kind(r), NodeKind::Array { .. }));
    let all_objects = rows
        .iter()
        .all(|&r| matches!(tree.kind(r), NodeKind::Object { .. }));

    let (shape, columns) = if all_arrays {
        (RowShape::Arrays, array_columns(tree, metrics, &rows)?)
    } else if all_objects {
        (RowShape::Objects, object_columns(tree, metrics, &rows)?)
    } else {
        return None;
    };
    if columns.is_empty() {
        return None;
    }

    let is_array_rows = shape == RowShape::Arrays;
    let mut row_width =
        pads.open_len(is_array_rows, row_pad) + pads.close_len(is_array_rows, row_pad);
    row_width += pads.comma_len() * (columns.len() - 1);
    for column in &columns {
        if let Some(key) = &column.key {
            row_width += len(key) + pads.colon_len();
        }
        row_width += column.width;
    }

    // The widest padded row, with its comma, still has to fit the line.
    if pads.margin_len(depth + 1) + row_width + pads.comma_len() > options.max_inline_length {
        return None;
    }

    Some(TablePlan {
        shape,
        columns,
        row_pad,
    })
}

fn array_columns(
    tree: &DocumentTree,
    metrics: &MetricsTable,
    rows: &[NodeId],
) -> Option<Vec<Column>> {
    let arity = tree.entries(rows[0]).len();
    if rows.iter().any(|&r| tree.entries(r).len() != arity) {
        return None;
    }
    let mut columns = Vec::with_capacity(arity);
    for slot in 0..arity {
        let cells: Vec<NodeId> = rows.iter().map(|&r| tree.entries(r)[slot].node).collect();
        let column = build_column(tree, metrics, &cells, None, true)?;
        columns.push(column);
    }
    Some(columns)
}

fn object_columns(
    tree: &DocumentTree,
    metrics: &MetricsTable,
    rows: &[NodeId],
) -> Option<Vec<Column>> {
    // Signature: the first row's ordered key list, computed once.
    let signature: Vec<&str> = tree.entries(rows[0])
        .iter()
        .map(|e| e.key.as_deref().unwrap_or_default())
        .collect();
    let mut seen = std::collections::HashSet::new();
    if !signature.iter().all(|k| seen.insert(*k)) {
        return None;
    }
    for &row in &rows[1..] {
        let keys: Vec<&str> = tree.entries(row)
            .iter()
            .map(|e| e.key.as_deref().unwrap_or_default())
            .collect();
        if keys != signature {
            return None;
        }
    }

    let mut columns = Vec::with_capacity(signature.len());
    for slot in 0..signature.len() {
        let cells: Vec<NodeId> = rows.iter().map(|&r| tree.entries(r)[slot].node).collect();
        let column = build_column(
            tree,
            metrics,
            &cells,
            Some(signature[slot].to_string()),
            false,
        )?;
        columns.push(column);
    }
    Some(columns)
}

/// Measures one column. For array tables a kind clash breaks the type
/// pattern and fails the whole table; object tables tolerate mixed kinds
/// and simply lose numeric alignment for that column.
fn build_column(
    tree: &DocumentTree,
    metrics: &MetricsTable,
    cells: &[NodeId],
    key: Option<String>,
    strict_kinds: bool,
) -> Option<Column> {
    let mut kind = ColumnKind::Unset;
    let mut max_width = 0usize;
    let mut max_before = 0usize;
    let mut max_after = 0usize;
    let mut contains_null = false;

    for &cell in cells {
        max_width = max_width.max(metrics.get(cell).inline_width);
        let cell_kind = match tree.kind(cell) {
            NodeKind::Scalar { raw, kind } => match kind {
                ScalarKind::Number => {
                    max_before = max_before.max(digits_before_point(raw));
                    max_after = max_after.max(digits_after_point(raw));
                    ColumnKind::Number
                }
                ScalarKind::Null => {
                    contains_null = true;
                    continue;
                }
                _ => ColumnKind::Text,
            },
            NodeKind::Array { .. } => ColumnKind::Array,
            NodeKind::Object { .. } => ColumnKind::Object,
            NodeKind::Comment { .. } | NodeKind::BlankLine => return None,
        };
        if kind == ColumnKind::Unset {
            kind = cell_kind;
        } else if kind != cell_kind {
            if strict_kinds {
                return None;
            }
            kind = ColumnKind::Mixed;
        }
    }

    // All-null columns count as numeric so nulls line up with neighbors.
    let numeric = matches!(kind, ColumnKind::Number | ColumnKind::Unset);
    if numeric && contains_null {
        max_before = max_before.max(NULL_WIDTH);
    }
    let width = if numeric {
        let point = if max_after > 0 { 1 } else { 0 };
        max_width.max(max_before + point + max_after)
    } else {
        max_width
    };

    Some(Column {
        key,
        width,
        numeric,
        max_before_dec: max_before,
    })
}
