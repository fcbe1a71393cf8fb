//! Recursive-descent parser from tokens to the document arena.
//!
//! Exactly one top-level value is accepted; preserved comments and blank
//! lines may surround it. Comment attachment follows two placements: a
//! comment starting on the same row where the previous value ended is
//! same-line-trailing; every other comment is standalone-before.

use crate::document::{
    CommentPlacement, CommentStyle, DocumentTree, Entry, InputPosition, NodeId, NodeKind,
    ScalarKind,
};
use crate::error::RefractError;
use crate::options::{CommentPolicy, LayoutOptions};
use crate::tokenizer::{Lexer, Token, TokenKind};

pub struct Parser<'a> {
    options: &'a LayoutOptions,
}

struct Tokens<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Tokens<'a> {
    fn next(&mut self) -> Result<Option<Token>, RefractError> {
        self.lexer.next().transpose()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommaState {
    Empty,
    ElementSeen,
    CommaSeen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectPhase {
    BeforeName,
    AfterName,
    AfterColon,
    AfterValue,
    AfterComma,
}

impl<'a> Parser<'a> {
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    pub fn parse(&self, input: &str) -> Result<DocumentTree, RefractError> {
        let mut tokens = Tokens {
            lexer: Lexer::new(input),
        };
        let mut tree = DocumentTree::new();
        let mut value_seen = false;
        let mut last_end_row: Option<usize> = None;

        while let Some(token) = tokens.next()? {
            match token.kind {
                TokenKind::BlankLine => {
                    if self.options.preserve_blank_lines {
                        let id = tree.push(NodeKind::BlankLine);
                        tree.roots.push(Entry { key: None, node: id });
                    }
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    let mut roots = std::mem::take(&mut tree.roots);
                    self.handle_comment(&mut tree, &mut roots, &token, last_end_row, false)?;
                    tree.roots = roots;
                }
                TokenKind::ObjectClose
                | TokenKind::ArrayClose
                | TokenKind::Colon
                | TokenKind::Comma => {
                    return Err(RefractError::syntax(
                        "unexpected token at top level",
                        token.position,
                    ));
                }
                _ => {
                    if value_seen {
                        return Err(RefractError::syntax(
                            "unexpected second top-level value",
                            token.position,
                        ));
                    }
                    let (id, end_row) = self.parse_value(&mut tokens, &mut tree, token)?;
                    tree.roots.push(Entry { key: None, node: id });
                    value_seen = true;
                    last_end_row = Some(end_row);
                }
            }
        }

        if !value_seen {
            return Err(RefractError::syntax(
                "input contains no JSON value",
                InputPosition::default(),
            ));
        }
        log::debug!("parsed document with {} nodes", tree.len());
        Ok(tree)
    }

    /// Parses the value introduced by `token`, returning its node and the
    /// row its final character sits on (used for trailing-comment
    /// attachment by the caller).
    fn parse_value(
        &self,
        tokens: &mut Tokens<'_>,
        tree: &mut DocumentTree,
        token: Token,
    ) -> Result<(NodeId, usize), RefractError> {
        let scalar = |kind| NodeKind::Scalar {
            raw: token.text.clone(),
            kind,
        };
        let kind = match token.kind {
            TokenKind::String => scalar(ScalarKind::String),
            TokenKind::Number => scalar(ScalarKind::Number),
            TokenKind::True => scalar(ScalarKind::True),
            TokenKind::False => scalar(ScalarKind::False),
            TokenKind::Null => scalar(ScalarKind::Null),
            TokenKind::ArrayOpen => return self.parse_array(tokens, tree, token.position),
            TokenKind::ObjectOpen => return self.parse_object(tokens, tree, token.position),
            _ => {
                return Err(RefractError::syntax("expected a value", token.position));
            }
        };
        let id = tree.push(kind);
        Ok((id, token.position.row))
    }

    fn parse_array(
        &self,
        tokens: &mut Tokens<'_>,
        tree: &mut DocumentTree,
        open: InputPosition,
    ) -> Result<(NodeId, usize), RefractError> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut state = CommaState::Empty;
        let mut last_end_row: Option<usize> = None;

        loop {
            let token = match tokens.next()? {
                Some(token) => token,
                None => {
                    return Err(RefractError::syntax("unterminated array", open));
                }
            };
            match token.kind {
                TokenKind::ArrayClose => {
                    if state == CommaState::CommaSeen && !self.options.allow_trailing_commas {
                        return Err(RefractError::syntax(
                            "array may not end with a comma with the current options",
                            token.position,
                        ));
                    }
                    let id = tree.push(NodeKind::Array { entries });
                    return Ok((id, token.position.row));
                }
                TokenKind::Comma => {
                    if state != CommaState::ElementSeen {
                        return Err(RefractError::syntax(
                            "unexpected comma in array",
                            token.position,
                        ));
                    }
                    state = CommaState::CommaSeen;
                }
                TokenKind::BlankLine => {
                    if self.options.preserve_blank_lines {
                        let id = tree.push(NodeKind::BlankLine);
                        entries.push(Entry { key: None, node: id });
                    }
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    self.handle_comment(tree, &mut entries, &token, last_end_row, false)?;
                }
                TokenKind::ObjectClose | TokenKind::Colon => {
                    return Err(RefractError::syntax(
                        "unexpected token in array",
                        token.position,
                    ));
                }
                _ => {
                    if state == CommaState::ElementSeen {
                        return Err(RefractError::syntax(
                            "missing comma in array",
                            token.position,
                        ));
                    }
                    let (id, end_row) = self.parse_value(tokens, tree, token)?;
                    entries.push(Entry { key: None, node: id });
                    last_end_row = Some(end_row);
                    state = CommaState::ElementSeen;
                }
            }
        }
    }

    fn parse_object(
        &self,
        tokens: &mut Tokens<'_>,
        tree: &mut DocumentTree,
        open: InputPosition,
    ) -> Result<(NodeId, usize), RefractError> {
        let mut entries: Vec<Entry> = Vec::new();
        let mut phase = ObjectPhase::BeforeName;
        let mut pending_key: Option<String> = None;
        let mut last_end_row: Option<usize> = None;

        loop {
            let token = match tokens.next()? {
                Some(token) => token,
                None => {
                    return Err(RefractError::syntax("unterminated object", open));
                }
            };
            match token.kind {
                TokenKind::ObjectClose => {
                    match phase {
                        ObjectPhase::AfterName | ObjectPhase::AfterColon => {
                            return Err(RefractError::syntax(
                                "unexpected end of object",
                                token.position,
                            ));
                        }
                        ObjectPhase::AfterComma if !self.options.allow_trailing_commas => {
                            return Err(RefractError::syntax(
                                "object may not end with a comma with the current options",
                                token.position,
                            ));
                        }
                        _ => {}
                    }
                    let id = tree.push(NodeKind::Object { entries });
                    return Ok((id, token.position.row));
                }
                TokenKind::Colon => {
                    if phase != ObjectPhase::AfterName {
                        return Err(RefractError::syntax(
                            "unexpected colon in object",
                            token.position,
                        ));
                    }
                    phase = ObjectPhase::AfterColon;
                }
                TokenKind::Comma => {
                    if phase != ObjectPhase::AfterValue {
                        return Err(RefractError::syntax(
                            "unexpected comma in object",
                            token.position,
                        ));
                    }
                    phase = ObjectPhase::AfterComma;
                }
                TokenKind::BlankLine => {
                    // Mid-member blanks are dropped; they have no stable slot.
                    let mid_member =
                        matches!(phase, ObjectPhase::AfterName | ObjectPhase::AfterColon);
                    if self.options.preserve_blank_lines && !mid_member {
                        let id = tree.push(NodeKind::BlankLine);
                        entries.push(Entry { key: None, node: id });
                    }
                }
                TokenKind::LineComment | TokenKind::BlockComment => {
                    let mid_member =
                        matches!(phase, ObjectPhase::AfterName | ObjectPhase::AfterColon);
                    self.handle_comment(tree, &mut entries, &token, last_end_row, mid_member)?;
                }
                TokenKind::String if matches!(phase, ObjectPhase::BeforeName | ObjectPhase::AfterComma) => {
                    pending_key = Some(token.text);
                    phase = ObjectPhase::AfterName;
                }
                _ => {
                    if phase != ObjectPhase::AfterColon {
                        return Err(RefractError::syntax(
                            "unexpected token in object",
                            token.position,
                        ));
                    }
                    let (id, end_row) = self.parse_value(tokens, tree, token)?;
                    entries.push(Entry {
                        key: pending_key.take(),
                        node: id,
                    });
                    last_end_row = Some(end_row);
                    phase = ObjectPhase::AfterValue;
                }
            }
        }
    }

    /// Applies the comment policy, then records a comment entry with its
    /// placement. `force_standalone` covers comments caught between a
    /// property name and its value, which have no trailing slot.
    fn handle_comment(
        &self,
        tree: &mut DocumentTree,
        entries: &mut Vec<Entry>,
        token: &Token,
        last_end_row: Option<usize>,
        force_standalone: bool,
    ) -> Result<(), RefractError> {
        match self.options.comment_policy {
            CommentPolicy::TreatAsError => {
                return Err(RefractError::Comment {
                    position: token.position,
                });
            }
            CommentPolicy::Remove => return Ok(()),
            CommentPolicy::Preserve => {}
        }
        // Multi-line block comments never trail; they need their own lines.
        let trailing = !force_standalone
            && last_end_row == Some(token.position.row)
            && !token.text.contains('\n');
        let style = if token.kind == TokenKind::LineComment {
            CommentStyle::Line
        } else {
            CommentStyle::Block
        };
        let id = tree.push(NodeKind::Comment {
            text: token.text.clone(),
            style,
            placement: if trailing {
                CommentPlacement::SameLineTrailing
            } else {
                CommentPlacement::StandaloneBefore
            },
        });
        entries.push(Entry { key: None, node: id });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with(input: &str, options: &LayoutOptions) -> Result<DocumentTree, RefractError> {
        Parser::new(options).parse(input)
    }

    fn parse(input: &str) -> DocumentTree {
        parse_with(input, &LayoutOptions::default()).unwrap()
    }

    #[test]
    fn parses_nested_structure() {
        let tree = parse(r#"{"a": [1, 2], "b": {"c": null}}"#);
        let root = tree.root_value().unwrap();
        let entries = tree.entries(root);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].key.as_deref(), Some("\"a\""));
        assert_eq!(tree.entries(entries[0].node).len(), 2);
        assert_eq!(entries[1].key.as_deref(), Some("\"b\""));
    }

    #[test]
    fn preserves_duplicate_keys_in_order() {
        let tree = parse(r#"{"k": 1, "k": 2}"#);
        let entries = tree.entries(tree.root_value().unwrap());
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.key.as_deref() == Some("\"k\"")));
    }

    #[test]
    fn rejects_second_root_value() {
        let err = parse_with("1 2", &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, RefractError::Syntax { .. }));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_with("  \n ", &LayoutOptions::default()).is_err());
    }

    #[test]
    fn trailing_comma_policy() {
        let input = r#"{"a": 1,}"#;
        assert!(matches!(
            parse_with(input, &LayoutOptions::default()),
            Err(RefractError::Syntax { .. })
        ));

        let mut opts = LayoutOptions::default();
        opts.allow_trailing_commas = true;
        let tree = parse_with(input, &opts).unwrap();
        assert_eq!(tree.entries(tree.root_value().unwrap()).len(), 1);

        assert!(parse_with("[1, 2,]", &opts).is_ok());
        assert!(parse_with("[1, 2,]", &LayoutOptions::default()).is_err());
    }

    #[test]
    fn comment_policy_error_and_remove() {
        let input = "[1, // note\n2]";
        let err = parse_with(input, &LayoutOptions::default()).unwrap_err();
        assert!(matches!(err, RefractError::Comment { .. }));

        let mut opts = LayoutOptions::default();
        opts.comment_policy = CommentPolicy::Remove;
        let tree = parse_with(input, &opts).unwrap();
        assert_eq!(tree.entries(tree.root_value().unwrap()).len(), 2);
    }

    #[test]
    fn trailing_comment_attaches_to_same_row_value() {
        let mut opts = LayoutOptions::default();
        opts.comment_policy = CommentPolicy::Preserve;
        let tree = parse_with("[1, // one\n 2]", &opts).unwrap();
        let entries = tree.entries(tree.root_value().unwrap());
        assert_eq!(entries.len(), 3);
        match tree.kind(entries[1].node) {
            NodeKind::Comment { placement, .. } => {
                assert_eq!(*placement, CommentPlacement::SameLineTrailing)
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn standalone_comment_keeps_its_own_slot() {
        let mut opts = LayoutOptions::default();
        opts.comment_policy = CommentPolicy::Preserve;
        let tree = parse_with("[\n// lead\n1\n]", &opts).unwrap();
        let entries = tree.entries(tree.root_value().unwrap());
        assert_eq!(entries.len(), 2);
        match tree.kind(entries[0].node) {
            NodeKind::Comment { placement, .. } => {
                assert_eq!(*placement, CommentPlacement::StandaloneBefore)
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn blank_lines_only_with_policy() {
        let input = "[\n1,\n\n2\n]";
        let tree = parse(input);
        assert_eq!(tree.entries(tree.root_value().unwrap()).len(), 2);

        let mut opts = LayoutOptions::default();
        opts.preserve_blank_lines = true;
        let tree = parse_with(input, &opts).unwrap();
        let entries = tree.entries(tree.root_value().unwrap());
        assert_eq!(entries.len(), 3);
        assert!(matches!(tree.kind(entries[1].node), NodeKind::BlankLine));
    }

    #[test]
    fn rejects_missing_comma_and_colon() {
        assert!(parse_with("[1 2]", &LayoutOptions::default()).is_err());
        assert!(parse_with(r#"{"a" 1}"#, &LayoutOptions::default()).is_err());
        assert!(parse_with(r#"{"a": }"#, &LayoutOptions::default()).is_err());
    }

    #[test]
    fn rejects_unterminated_containers() {
        assert!(parse_with("[1, 2", &LayoutOptions::default()).is_err());
        assert!(parse_with(r#"{"a": 1"#, &LayoutOptions::default()).is_err());
    }
}
