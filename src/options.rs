use crate::error::RefractError;

/// Line ending style for the formatted output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EolStyle {
    /// Unix-style line endings (`\n`).
    Lf,
    /// Windows-style line endings (`\r\n`).
    Crlf,
}

/// Policy for handling comments in the input.
///
/// Standard JSON has no comments, but JSONC-style `//` and `/* */` comments
/// are widespread. This controls what happens when one is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPolicy {
    /// Fail with [`RefractError::Comment`]. The default; strict JSON.
    TreatAsError,
    /// Silently drop comments from the output.
    Remove,
    /// Keep comments, preserving their relative positions.
    Preserve,
}

/// How numeric table columns are padded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberListAlignment {
    /// Flush left, padded on the right.
    Left,
    /// Flush right, padded on the left.
    Right,
    /// Aligned on the decimal point (or where one would be).
    /// Usually the most readable choice for mixed integers and decimals.
    Decimal,
}

/// Configuration for one format call.
///
/// Immutable as far as the engine is concerned: it is read, never written,
/// and can be shared by reference across threads. Start from
/// [`Default::default()`] or [`LayoutOptions::recommended()`] and adjust
/// fields as needed.
///
/// # Example
///
/// ```rust
/// use refract_json::{LayoutOptions, CommentPolicy};
///
/// let mut options = LayoutOptions::default();
/// options.max_inline_length = 80;
/// options.indent_spaces = 2;
/// options.comment_policy = CommentPolicy::Preserve;
/// ```
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Line ending for the output. Default: [`EolStyle::Lf`].
    pub eol_style: EolStyle,

    /// Maximum width of an inline rendering, counting indentation and
    /// `prefix_string`. Containers wider than this are expanded or
    /// table-formatted. Default: 120.
    pub max_inline_length: usize,

    /// Containers at nesting depth shallower than this are always expanded,
    /// no matter how short. The root is depth 0. Set to -1 to disable.
    /// Default: -1.
    pub always_expand_depth: isize,

    /// Maximum nesting complexity a row may have to qualify for table
    /// layout. Set to -1 to disable table layout entirely. Default: 2.
    pub max_table_row_complexity: isize,

    /// Spaces per indentation level. Ignored when `use_tab_to_indent`.
    /// Default: 4.
    pub indent_spaces: usize,

    /// Indent with one tab per level instead of spaces. Default: false.
    pub use_tab_to_indent: bool,

    /// Prepended to every output line. Anything other than whitespace will
    /// make the output invalid as JSON, but it is useful for embedding.
    /// Default: empty.
    pub prefix_string: String,

    /// What to do about comments in the input.
    /// Default: [`CommentPolicy::TreatAsError`].
    pub comment_policy: CommentPolicy,

    /// Keep blank lines from the input. Only meaningful when comments are
    /// preserved or removed. Default: false.
    pub preserve_blank_lines: bool,

    /// Accept a trailing comma after the last element when parsing.
    /// Default: false.
    pub allow_trailing_commas: bool,

    /// Emit a comma after the last element of expanded and table-formatted
    /// containers. Independent of `allow_trailing_commas`; inline
    /// renderings never get one. Default: false.
    pub write_trailing_commas: bool,

    /// Padding style for numeric table columns.
    /// Default: [`NumberListAlignment::Decimal`].
    pub number_list_alignment: NumberListAlignment,

    /// Space after colons: `"key": 1` vs `"key":1`. Default: true.
    pub colon_padding: bool,

    /// Space after commas: `[1, 2]` vs `[1,2]`. Default: true.
    pub comma_padding: bool,

    /// Space between a value and its trailing comment. Default: true.
    pub comment_padding: bool,

    /// Space inside the brackets of containers holding only primitives:
    /// `[ 1, 2 ]` vs `[1, 2]`. Default: false.
    pub simple_bracket_padding: bool,

    /// Space inside the brackets of containers holding other containers:
    /// `[ [1, 2] ]` vs `[[1, 2]]`. Default: true.
    pub nested_bracket_padding: bool,

    /// Pad property names in expanded objects so the values line up.
    /// Default: false.
    pub align_expanded_property_names: bool,

    /// With property-name alignment, put the colon right after the name
    /// (`"a":   1`) instead of after the padding (`"a"  : 1`).
    /// Default: false.
    pub colon_before_prop_name_padding: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            eol_style: EolStyle::Lf,
            max_inline_length: 120,
            always_expand_depth: -1,
            max_table_row_complexity: 2,
            indent_spaces: 4,
            use_tab_to_indent: false,
            prefix_string: String::new(),
            comment_policy: CommentPolicy::TreatAsError,
            preserve_blank_lines: false,
            allow_trailing_commas: false,
            write_trailing_commas: false,
            number_list_alignment: NumberListAlignment::Decimal,
            colon_padding: true,
            comma_padding: true,
            comment_padding: true,
            simple_bracket_padding: false,
            nested_bracket_padding: true,
            align_expanded_property_names: false,
            colon_before_prop_name_padding: false,
        }
    }
}

impl LayoutOptions {
    /// Recommended settings. Currently identical to `Default::default()`,
    /// kept separate so future versions can improve defaults without a
    /// breaking change.
    pub fn recommended() -> Self {
        Self::default()
    }

    /// Rejects option combinations the engine cannot honor. Called by every
    /// engine entry point before any input is touched.
    pub fn validate(&self) -> Result<(), RefractError> {
        if self.max_inline_length == 0 {
            return Err(RefractError::Config(
                "max_inline_length must be at least 1".into(),
            ));
        }
        if self.prefix_string.chars().count() >= self.max_inline_length {
            return Err(RefractError::Config(
                "prefix_string leaves no room within max_inline_length".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutOptions::default().validate().is_ok());
    }

    #[test]
    fn zero_width_is_rejected() {
        let mut opts = LayoutOptions::default();
        opts.max_inline_length = 0;
        let err = opts.validate().unwrap_err();
        assert!(matches!(err, RefractError::Config(_)));
    }

    #[test]
    fn oversized_prefix_is_rejected() {
        let mut opts = LayoutOptions::default();
        opts.max_inline_length = 10;
        opts.prefix_string = "x".repeat(10);
        assert!(opts.validate().is_err());
    }
}
