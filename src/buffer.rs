//! Output assembly helpers: a line-oriented buffer and precomputed
//! padded separators.

use crate::options::{EolStyle, LayoutOptions};

/// Accumulates output a line at a time, trimming trailing whitespace from
/// each finished line so padded commas never leave spaces at line ends.
#[derive(Debug, Default)]
pub struct LineBuffer {
    text: String,
    line_start: usize,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, piece: &str) {
        self.text.push_str(piece);
    }

    pub fn push_spaces(&mut self, count: usize) {
        for _ in 0..count {
            self.text.push(' ');
        }
    }

    /// True when the current line already ends in a space or tab, such as
    /// a padded comma's trailing space.
    pub fn ends_with_space(&self) -> bool {
        self.text[self.line_start..].ends_with([' ', '\t'])
    }

    pub fn end_line(&mut self, eol: &str) {
        while self.text.len() > self.line_start {
            let last = self.text.as_bytes()[self.text.len() - 1];
            if last == b' ' || last == b'\t' {
                self.text.pop();
            } else {
                break;
            }
        }
        self.text.push_str(eol);
        self.line_start = self.text.len();
    }

    pub fn finish(self) -> String {
        self.text
    }
}

/// How much interior padding a container's brackets get, keyed by what the
/// container holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadType {
    /// No entries at all: `[]`.
    Empty = 0,
    /// Only primitives or empty containers inside.
    Simple = 1,
    /// Contains non-empty containers.
    Complex = 2,
}

/// Separator and bracket strings assembled once per format call from the
/// options, with their rendered widths measured through the configured
/// string-length function.
#[derive(Debug, Clone)]
pub struct PadSet {
    comma: String,
    colon: String,
    comment_gap: String,
    eol: &'static str,
    array_open: [String; 3],
    array_close: [String; 3],
    object_open: [String; 3],
    object_close: [String; 3],
    comma_len: usize,
    colon_len: usize,
    array_open_len: [usize; 3],
    array_close_len: [usize; 3],
    object_open_len: [usize; 3],
    object_close_len: [usize; 3],
    indent_unit: String,
    indent_unit_len: usize,
    prefix: String,
    prefix_len: usize,
}

impl PadSet {
    pub fn new(options: &LayoutOptions, len: &dyn Fn(&str) -> usize) -> Self {
        let bracket = |open: &str, padded: &str, simple: bool, nested: bool| {
            [
                open.to_string(),
                if simple { padded } else { open }.to_string(),
                if nested { padded } else { open }.to_string(),
            ]
        };
        let simple = options.simple_bracket_padding;
        let nested = options.nested_bracket_padding;
        let array_open = bracket("[", "[ ", simple, nested);
        let array_close = bracket("]", " ]", simple, nested);
        let object_open = bracket("{", "{ ", simple, nested);
        let object_close = bracket("}", " }", simple, nested);

        let comma = if options.comma_padding { ", " } else { "," }.to_string();
        let colon = if options.colon_padding { ": " } else { ":" }.to_string();
        let comment_gap = if options.comment_padding { " " } else { "" }.to_string();
        let eol = match options.eol_style {
            EolStyle::Lf => "\n",
            EolStyle::Crlf => "\r\n",
        };
        let indent_unit = if options.use_tab_to_indent {
            "\t".to_string()
        } else {
            " ".repeat(options.indent_spaces)
        };

        let measure = |strings: &[String; 3]| {
            [len(&strings[0]), len(&strings[1]), len(&strings[2])]
        };

        Self {
            comma_len: len(&comma),
            colon_len: len(&colon),
            array_open_len: measure(&array_open),
            array_close_len: measure(&array_close),
            object_open_len: measure(&object_open),
            object_close_len: measure(&object_close),
            indent_unit_len: len(&indent_unit),
            prefix_len: len(&options.prefix_string),
            comma,
            colon,
            comment_gap,
            eol,
            array_open,
            array_close,
            object_open,
            object_close,
            indent_unit,
            prefix: options.prefix_string.clone(),
        }
    }

    pub fn comma(&self) -> &str {
        &self.comma
    }
    pub fn colon(&self) -> &str {
        &self.colon
    }
    pub fn comment_gap(&self) -> &str {
        &self.comment_gap
    }
    pub fn eol(&self) -> &str {
        self.eol
    }
    pub fn comma_len(&self) -> usize {
        self.comma_len
    }
    pub fn colon_len(&self) -> usize {
        self.colon_len
    }

    pub fn open(&self, is_array: bool, pad: PadType) -> &str {
        if is_array {
            &self.array_open[pad as usize]
        } else {
            &self.object_open[pad as usize]
        }
    }

    pub fn close(&self, is_array: bool, pad: PadType) -> &str {
        if is_array {
            &self.array_close[pad as usize]
        } else {
            &self.object_close[pad as usize]
        }
    }

    pub fn open_len(&self, is_array: bool, pad: PadType) -> usize {
        if is_array {
            self.array_open_len[pad as usize]
        } else {
            self.object_open_len[pad as usize]
        }
    }

    pub fn close_len(&self, is_array: bool, pad: PadType) -> usize {
        if is_array {
            self.array_close_len[pad as usize]
        } else {
            self.object_close_len[pad as usize]
        }
    }

    /// Rendered width of the left margin at `depth`: prefix plus indent.
    pub fn margin_len(&self, depth: usize) -> usize {
        self.prefix_len + depth * self.indent_unit_len
    }

    /// Writes the left margin for a new line at `depth`.
    pub fn write_margin(&self, out: &mut LineBuffer, depth: usize) {
        out.push(&self.prefix);
        for _ in 0..depth {
            out.push(&self.indent_unit);
        }
    }
}
