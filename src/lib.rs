//! # refract-json
//!
//! A JSON formatter that produces human-readable output with smart line
//! breaks, table-like alignment, and optional comment support.
//!
//! Output stays fairly compact while remaining easy to scan:
//!
//! - Arrays and objects are written on single lines when they're short and simple enough
//! - When neighboring rows share a structure, their fields are aligned like a table
//! - Number columns line up on their decimal points
//! - Comments and blank lines (non-standard JSON) can be preserved if enabled
//!
//! ## Command-Line Tool
//!
//! This crate includes the `refract` CLI tool for formatting JSON from the
//! terminal:
//!
//! ```sh
//! # Format JSON from stdin
//! echo '{"a":1,"b":2}' | refract
//!
//! # Format a file
//! refract input.json -o output.json
//!
//! # Minify
//! refract --compact < input.json
//! ```
//!
//! Run `refract --help` for all options.
//!
//! ## Quick Start
//!
//! ```rust
//! use refract_json::Formatter;
//!
//! let input = r#"{"name":"Alice","scores":[95,87,92],"active":true}"#;
//!
//! let formatter = Formatter::new();
//! let output = formatter.reformat(input, 0).unwrap();
//!
//! println!("{}", output);
//! ```
//!
//! ## Serializing Rust Types
//!
//! Any type implementing [`serde::Serialize`] can be formatted directly:
//!
//! ```rust
//! use refract_json::Formatter;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Player {
//!     name: String,
//!     scores: Vec<i32>,
//! }
//!
//! let player = Player {
//!     name: "Alice".into(),
//!     scores: vec![95, 87, 92],
//! };
//!
//! let formatter = Formatter::new();
//! let output = formatter.serialize(&player, 0, 100).unwrap();
//! ```
//!
//! ## Configuration
//!
//! Customize formatting behavior through [`LayoutOptions`]:
//!
//! ```rust
//! use refract_json::{Formatter, EolStyle, NumberListAlignment};
//!
//! let mut formatter = Formatter::new();
//! formatter.options.max_inline_length = 80;
//! formatter.options.indent_spaces = 2;
//! formatter.options.eol_style = EolStyle::Lf;
//! formatter.options.number_list_alignment = NumberListAlignment::Decimal;
//!
//! let output = formatter.reformat(r#"{"values":[1,2,3]}"#, 0).unwrap();
//! ```
//!
//! ## Comment Support
//!
//! JSON with comments (non-standard) is handled when enabled:
//!
//! ```rust
//! use refract_json::{Formatter, CommentPolicy};
//!
//! let input = r#"{
//!     // This is a comment
//!     "name": "Alice"
//! }"#;
//!
//! let mut formatter = Formatter::new();
//! formatter.options.comment_policy = CommentPolicy::Preserve;
//!
//! let output = formatter.reformat(input, 0).unwrap();
//! ```
//!
//! ## Example Output
//!
//! Given appropriate input, the formatter produces output like:
//!
//! ```json
//! {
//!     "SimilarObjects": [
//!         { "type": "turret",    "hp": 400, "loc": {"x": 47, "y": -4} },
//!         { "type": "assassin",  "hp":  80, "loc": {"x": 12, "y": 6}  },
//!         { "type": "berserker", "hp": 150, "loc": {"x": 0, "y": 0}   }
//!     ]
//! }
//! ```
//!
//! Notice how:
//! - Similar objects are aligned in a table format
//! - Numbers line up on their decimal points within each column
//! - The structure remains compact while being highly readable

mod buffer;
mod convert;
mod document;
mod error;
mod formatter;
mod options;
mod parser;
mod planner;
mod table;
mod tokenizer;
mod width;
mod writer;

pub use crate::document::InputPosition;
pub use crate::error::RefractError;
pub use crate::formatter::Formatter;
pub use crate::options::{
    CommentPolicy, EolStyle, LayoutOptions, NumberListAlignment,
};
