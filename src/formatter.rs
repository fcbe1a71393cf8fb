//! The public entry point tying the pipeline together.

use serde::Serialize;

use crate::buffer::PadSet;
use crate::convert;
use crate::error::RefractError;
use crate::options::LayoutOptions;
use crate::parser::Parser;
use crate::planner::Planner;
use crate::width::MetricsTable;
use crate::writer::{self, Writer};

/// Counts characters. Good enough for ASCII and most terminal fonts.
fn default_string_length(s: &str) -> usize {
    s.chars().count()
}

/// Reformats JSON (or JSONC) text, or serializes values, according to its
/// [`LayoutOptions`].
///
/// The options field is public and may be edited freely between calls.
/// Each call re-validates the options, so a bad combination is reported as
/// [`RefractError::Config`] rather than producing mangled output.
///
/// ```
/// use refract_json::Formatter;
///
/// let mut formatter = Formatter::new();
/// formatter.options.max_inline_length = 60;
/// let output = formatter.reformat(r#"{"a":1,"b":[2,3]}"#, 0).unwrap();
/// assert_eq!(output, "{ \"a\": 1, \"b\": [2, 3] }\n");
/// ```
pub struct Formatter {
    pub options: LayoutOptions,
    string_length_func: Box<dyn Fn(&str) -> usize + Send + Sync>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    pub fn with_options(options: LayoutOptions) -> Self {
        Self {
            options,
            string_length_func: Box::new(default_string_length),
        }
    }

    /// Replaces the function used to measure the rendered width of text.
    ///
    /// The default counts `char`s. Supply something based on Unicode
    /// character widths when the output is meant for a terminal and the
    /// data is rich in East Asian text or emoji.
    pub fn set_string_length_func<F>(&mut self, func: F)
    where
        F: Fn(&str) -> usize + Send + Sync + 'static,
    {
        self.string_length_func = Box::new(func);
    }

    /// Parses `input` and writes it back out, formatted.
    ///
    /// `starting_depth` shifts the whole output right by that many indent
    /// units, for embedding the result inside an already-indented context.
    ///
    /// Error positions count characters, not bytes: `index` is the char
    /// offset from the start of `input`, and `column` is the char offset
    /// within the line.
    pub fn reformat(&self, input: &str, starting_depth: usize) -> Result<String, RefractError> {
        self.options.validate()?;
        let tree = Parser::new(&self.options).parse(input)?;
        Ok(self.layout(&tree, starting_depth))
    }

    /// Parses `input` and writes it back out with all layout whitespace
    /// removed. Preserved comments survive; blank lines do not.
    pub fn minify(&self, input: &str) -> Result<String, RefractError> {
        self.options.validate()?;
        let tree = Parser::new(&self.options).parse(input)?;
        Ok(writer::minify(&tree))
    }

    /// Formats any serializable value without a round trip through text.
    ///
    /// `recursion_limit` bounds nesting depth; exceeding it reports
    /// [`RefractError::Serialize`] instead of overflowing the stack.
    pub fn serialize<T: Serialize>(
        &self,
        value: &T,
        starting_depth: usize,
        recursion_limit: usize,
    ) -> Result<String, RefractError> {
        self.options.validate()?;
        let json = serde_json::to_value(value)
            .map_err(|e| RefractError::Serialize(e.to_string()))?;
        let tree = convert::value_to_tree(&json, recursion_limit)?;
        Ok(self.layout(&tree, starting_depth))
    }

    fn layout(&self, tree: &crate::document::DocumentTree, starting_depth: usize) -> String {
        let len = self.string_length_func.as_ref();
        let pads = PadSet::new(&self.options, len);
        let metrics = MetricsTable::measure(tree, &pads, len);
        let plan = Planner::new(tree, &metrics, &pads, &self.options, len).plan(starting_depth);
        Writer::new(tree, &metrics, &plan, &pads, &self.options, len).write(starting_depth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatter_is_reusable_and_reentrant() {
        let formatter = Formatter::new();
        let a = formatter.reformat("[1,2,3]", 0).unwrap();
        let b = formatter.reformat("[1,2,3]", 0).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, "[1, 2, 3]\n");
    }

    #[test]
    fn invalid_options_fail_before_parsing() {
        let mut formatter = Formatter::new();
        formatter.options.max_inline_length = 0;
        assert!(matches!(
            formatter.reformat("[]", 0),
            Err(RefractError::Config(_))
        ));
    }

    #[test]
    fn starting_depth_indents_every_line() {
        let mut formatter = Formatter::new();
        formatter.options.max_inline_length = 4;
        let out = formatter.reformat("[1, 2]", 1).unwrap();
        assert_eq!(out, "    [\n        1,\n        2\n    ]\n");
    }

    #[test]
    fn serialize_matches_reformat() {
        let formatter = Formatter::new();
        let from_value = formatter
            .serialize(&serde_json::json!({"a": [1, 2]}), 0, 100)
            .unwrap();
        let from_text = formatter.reformat(r#"{"a":[1,2]}"#, 0).unwrap();
        assert_eq!(from_value, from_text);
    }

    #[test]
    fn minify_strips_layout() {
        let formatter = Formatter::new();
        let out = formatter.minify("{\n  \"a\": [1, 2]\n}").unwrap();
        assert_eq!(out, r#"{"a":[1,2]}"#);
    }
}
