//! The parsed document model: an arena of immutable nodes.
//!
//! The tree is append-only while the parser runs and read-only afterwards.
//! Layout stages never write into it; widths, complexities, and layout
//! decisions live in side tables indexed by [`NodeId`].

/// A position within the JSON input text.
///
/// Used to report the location of errors within the source.
/// All values are zero-indexed; `index` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputPosition {
    /// Character offset from the start of the input.
    pub index: usize,
    /// Line number (first line is 0).
    pub row: usize,
    /// Column within the line.
    pub column: usize,
}

/// Index of a node in its [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of leaf value a [`NodeKind::Scalar`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Number,
    True,
    False,
    Null,
}

/// Whether a comment was written `// ...` or `/* ... */`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Line,
    Block,
}

/// Where a comment sits relative to the value it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPlacement {
    /// On its own line (or lines) before the value.
    StandaloneBefore,
    /// After the value (and its comma, if any) on the same line.
    SameLineTrailing,
}

/// One slot in a container: an optional property name plus a node.
///
/// Array elements, comments, and blank lines carry no key; object members
/// carry the raw key text exactly as it appeared in the source, quotes
/// included. Duplicate keys are passed through, not deduplicated.
#[derive(Debug, Clone)]
pub struct Entry {
    pub key: Option<String>,
    pub node: NodeId,
}

/// A node in the parsed document.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A leaf value, kept as raw source text so `1.0` stays `1.0`.
    Scalar { raw: String, kind: ScalarKind },
    Array { entries: Vec<Entry> },
    Object { entries: Vec<Entry> },
    Comment {
        text: String,
        style: CommentStyle,
        placement: CommentPlacement,
    },
    /// A preserved blank line between entries.
    BlankLine,
}

/// The whole parsed document: an arena plus the top-level entry list.
///
/// There is exactly one value entry at the top level; the others, if any,
/// are preserved comments and blank lines surrounding it.
#[derive(Debug, Clone, Default)]
pub struct DocumentTree {
    nodes: Vec<NodeKind>,
    pub roots: Vec<Entry>,
}

impl DocumentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(kind);
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()]
    }

    /// Number of nodes in the arena; side tables size themselves from this.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// The single top-level value, if the document has one.
    pub fn root_value(&self) -> Option<NodeId> {
        self.roots.iter().map(|e| e.node).find(|&id| {
            !matches!(
                self.kind(id),
                NodeKind::Comment { .. } | NodeKind::BlankLine
            )
        })
    }

    /// Entries of a container node; empty for anything else.
    pub fn entries(&self, id: NodeId) -> &[Entry] {
        match self.kind(id) {
            NodeKind::Array { entries } | NodeKind::Object { entries } => entries,
            _ => &[],
        }
    }

    pub fn is_container(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            NodeKind::Array { .. } | NodeKind::Object { .. }
        )
    }
}
