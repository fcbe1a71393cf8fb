//! Lexical scanning of JSON/JSONC text.
//!
//! The lexer is a lazy iterator of tokens. It recognizes `//` and `/* */`
//! comments and blank lines unconditionally; whether those are acceptable
//! is the parser's policy decision, not a lexical one. String, number, and
//! comment tokens keep their raw source text so literals round-trip
//! unchanged.

use crate::document::InputPosition;
use crate::error::RefractError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    Colon,
    Comma,
    String,
    Number,
    True,
    False,
    Null,
    LineComment,
    BlockComment,
    /// A line containing no non-whitespace content.
    BlankLine,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub position: InputPosition,
}

pub struct Lexer<'a> {
    src: &'a str,
    chars: Vec<char>,
    /// Byte offset of each char, with one past-the-end sentinel, so raw
    /// token text can be sliced out of `src`.
    byte_offsets: Vec<usize>,
    pos: InputPosition,
    start: InputPosition,
    line_has_content: bool,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        let mut chars = Vec::new();
        let mut byte_offsets = Vec::new();
        for (offset, ch) in src.char_indices() {
            byte_offsets.push(offset);
            chars.push(ch);
        }
        byte_offsets.push(src.len());
        Self {
            src,
            chars,
            byte_offsets,
            pos: InputPosition::default(),
            start: InputPosition::default(),
            line_has_content: false,
            failed: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos.index).copied()
    }

    fn bump(&mut self) {
        let ch = self.chars[self.pos.index];
        self.pos.index += 1;
        if ch == '\n' {
            self.pos.row += 1;
            self.pos.column = 0;
            self.line_has_content = false;
        } else {
            self.pos.column += 1;
            if !matches!(ch, ' ' | '\t' | '\r') {
                self.line_has_content = true;
            }
        }
    }

    fn mark(&mut self) {
        self.start = self.pos;
    }

    fn raw_text(&self) -> &str {
        &self.src[self.byte_offsets[self.start.index]..self.byte_offsets[self.pos.index]]
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token {
            kind,
            text: self.raw_text().to_string(),
            position: self.start,
        }
    }

    fn error(&self, message: &str) -> RefractError {
        log::trace!("lex error at {:?}: {}", self.pos, message);
        RefractError::syntax(message, self.pos)
    }

    fn scan_keyword(&mut self, word: &'static str, kind: TokenKind) -> Result<Token, RefractError> {
        self.mark();
        for expected in word.chars() {
            match self.peek() {
                Some(ch) if ch == expected => self.bump(),
                Some(_) => return Err(self.error("unexpected keyword")),
                None => return Err(self.error("unexpected end of input in keyword")),
            }
        }
        Ok(self.token(kind))
    }

    fn scan_string(&mut self) -> Result<Token, RefractError> {
        self.mark();
        self.bump();
        loop {
            let ch = match self.peek() {
                Some(ch) => ch,
                None => return Err(self.error("unterminated string")),
            };
            if is_control(ch) {
                return Err(self.error("control character in string"));
            }
            self.bump();
            match ch {
                '"' => return Ok(self.token(TokenKind::String)),
                '\\' => self.scan_escape()?,
                _ => {}
            }
        }
    }

    fn scan_escape(&mut self) -> Result<(), RefractError> {
        let ch = match self.peek() {
            Some(ch) => ch,
            None => return Err(self.error("unterminated string escape")),
        };
        match ch {
            '"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => {
                self.bump();
                Ok(())
            }
            'u' => {
                self.bump();
                for _ in 0..4 {
                    match self.peek() {
                        Some(h) if h.is_ascii_hexdigit() => self.bump(),
                        _ => return Err(self.error("bad unicode escape in string")),
                    }
                }
                Ok(())
            }
            _ => Err(self.error("bad escape character in string")),
        }
    }

    fn scan_number(&mut self) -> Result<Token, RefractError> {
        self.mark();
        if self.peek() == Some('-') {
            self.bump();
        }
        match self.peek() {
            Some('0') => self.bump(),
            Some(ch) if ch.is_ascii_digit() => {
                while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                    self.bump();
                }
            }
            _ => return Err(self.error("expected digit in number")),
        }
        if self.peek() == Some('.') {
            self.bump();
            if !matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                return Err(self.error("expected digit after decimal point"));
            }
            while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if !matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                return Err(self.error("expected digit in exponent"));
            }
            while matches!(self.peek(), Some(d) if d.is_ascii_digit()) {
                self.bump();
            }
        }
        Ok(self.token(TokenKind::Number))
    }

    fn scan_comment(&mut self) -> Result<Token, RefractError> {
        self.mark();
        self.bump();
        let block = match self.peek() {
            Some('*') => true,
            Some('/') => false,
            _ => return Err(self.error("bad character after start of comment")),
        };
        self.bump();

        if block {
            let mut prev_was_star = false;
            loop {
                let ch = match self.peek() {
                    Some(ch) => ch,
                    None => return Err(self.error("unterminated block comment")),
                };
                self.bump();
                if prev_was_star && ch == '/' {
                    return Ok(self.token(TokenKind::BlockComment));
                }
                prev_was_star = ch == '*';
            }
        }

        while !matches!(self.peek(), None | Some('\n')) {
            self.bump();
        }
        let mut token = self.token(TokenKind::LineComment);
        token.text.truncate(token.text.trim_end().len());
        Ok(token)
    }

    fn single(&mut self, kind: TokenKind) -> Token {
        self.mark();
        self.bump();
        self.token(kind)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, RefractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            let ch = self.peek()?;
            let item = match ch {
                ' ' | '\t' | '\r' => {
                    self.bump();
                    continue;
                }
                '\n' => {
                    let blank = !self.line_has_content;
                    self.mark();
                    self.bump();
                    if blank {
                        Some(Ok(Token {
                            kind: TokenKind::BlankLine,
                            text: String::new(),
                            position: self.start,
                        }))
                    } else {
                        continue;
                    }
                }
                '{' => Some(Ok(self.single(TokenKind::ObjectOpen))),
                '}' => Some(Ok(self.single(TokenKind::ObjectClose))),
                '[' => Some(Ok(self.single(TokenKind::ArrayOpen))),
                ']' => Some(Ok(self.single(TokenKind::ArrayClose))),
                ':' => Some(Ok(self.single(TokenKind::Colon))),
                ',' => Some(Ok(self.single(TokenKind::Comma))),
                't' => Some(self.scan_keyword("true", TokenKind::True)),
                'f' => Some(self.scan_keyword("false", TokenKind::False)),
                'n' => Some(self.scan_keyword("null", TokenKind::Null)),
                '"' => Some(self.scan_string()),
                '/' => Some(self.scan_comment()),
                '-' => Some(self.scan_number()),
                d if d.is_ascii_digit() => Some(self.scan_number()),
                _ => Some(Err(self.error("unexpected character"))),
            };
            if let Some(Err(_)) = &item {
                self.failed = true;
            }
            return item;
        }
    }
}

fn is_control(ch: char) -> bool {
    let code = ch as u32;
    code <= 0x1F || code == 0x7F || (0x80..=0x9F).contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).map(|t| t.unwrap().kind).collect()
    }

    #[test]
    fn scans_simple_object() {
        assert_eq!(
            kinds(r#"{"a": 1, "b": [true, null]}"#),
            vec![
                TokenKind::ObjectOpen,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::String,
                TokenKind::Colon,
                TokenKind::ArrayOpen,
                TokenKind::True,
                TokenKind::Comma,
                TokenKind::Null,
                TokenKind::ArrayClose,
                TokenKind::ObjectClose,
            ]
        );
    }

    #[test]
    fn keeps_raw_number_text() {
        let tokens: Vec<Token> = Lexer::new("[1.50, -0.25e+10, 7]")
            .map(|t| t.unwrap())
            .collect();
        let numbers: Vec<&str> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Number)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(numbers, vec!["1.50", "-0.25e+10", "7"]);
    }

    #[test]
    fn scans_comments() {
        let tokens: Vec<Token> = Lexer::new("// note  \n/* wide\n block */ 1")
            .map(|t| t.unwrap())
            .collect();
        assert_eq!(tokens[0].kind, TokenKind::LineComment);
        assert_eq!(tokens[0].text, "// note");
        assert_eq!(tokens[1].kind, TokenKind::BlockComment);
        assert_eq!(tokens[1].text, "/* wide\n block */");
        assert_eq!(tokens[2].kind, TokenKind::Number);
    }

    #[test]
    fn emits_blank_line_tokens() {
        assert_eq!(
            kinds("1\n\n\n"),
            vec![TokenKind::Number, TokenKind::BlankLine, TokenKind::BlankLine]
        );
    }

    #[test]
    fn whitespace_only_line_is_blank() {
        assert_eq!(kinds("1\n   \n"), vec![TokenKind::Number, TokenKind::BlankLine]);
    }

    #[test]
    fn reports_position_of_bad_character() {
        let err = Lexer::new("{\n  @").find_map(|r| r.err()).unwrap();
        let pos = err.position().unwrap();
        assert_eq!((pos.row, pos.column), (1, 2));
    }

    #[test]
    fn rejects_unterminated_string() {
        let result: Result<Vec<_>, _> = Lexer::new(r#""abc"#).collect();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bad_escape() {
        let result: Result<Vec<_>, _> = Lexer::new(r#""a\q""#).collect();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_bare_minus() {
        let result: Result<Vec<_>, _> = Lexer::new("[-]").collect();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unterminated_block_comment() {
        let result: Result<Vec<_>, _> = Lexer::new("/* open").collect();
        assert!(result.is_err());
    }
}
