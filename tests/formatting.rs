//! End-to-end formatting behavior through the public API.

use refract_json::{
    CommentPolicy, EolStyle, Formatter, LayoutOptions, NumberListAlignment, RefractError,
};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

fn formatter_with(adjust: impl FnOnce(&mut LayoutOptions)) -> Formatter {
    let mut formatter = Formatter::new();
    adjust(&mut formatter.options);
    formatter
}

#[test]
fn short_object_stays_on_one_line() {
    let out = Formatter::new().reformat(r#"{"a":1}"#, 0).unwrap();
    assert_eq!(out, "{\"a\": 1}\n");
}

#[test]
fn homogeneous_rows_align_as_a_table() {
    let formatter = formatter_with(|o| {
        o.max_inline_length = 10;
        o.indent_spaces = 2;
    });
    let out = formatter.reformat("[[1,2],[3,4]]", 0).unwrap();
    assert_eq!(out, "[\n  [1, 2],\n  [3, 4]\n]\n");
}

#[test]
fn decimal_alignment_lines_up_points() {
    let formatter = formatter_with(|o| o.max_inline_length = 20);
    let out = formatter.reformat("[[1.5,10],[22,3.25]]", 0).unwrap();
    assert_eq!(out, "[\n    [ 1.5, 10   ],\n    [22,    3.25]\n]\n");
}

#[test]
fn left_alignment_pads_after_numbers() {
    let formatter = formatter_with(|o| {
        o.max_inline_length = 20;
        o.number_list_alignment = NumberListAlignment::Left;
    });
    let out = formatter.reformat("[[1.5,10],[22,3.25]]", 0).unwrap();
    assert_eq!(out, "[\n    [1.5,  10   ],\n    [22,   3.25 ]\n]\n");
}

#[test]
fn comments_are_rejected_by_default() {
    let err = Formatter::new().reformat("[1, // one\n2]", 0).unwrap_err();
    assert!(matches!(err, RefractError::Comment { .. }));
}

#[test]
fn comments_can_be_stripped() {
    let formatter = formatter_with(|o| o.comment_policy = CommentPolicy::Remove);
    let out = formatter.reformat("[1, // one\n2]", 0).unwrap();
    assert_eq!(out, "[1, 2]\n");
}

#[test]
fn trailing_comment_stays_with_its_value() {
    let formatter = formatter_with(|o| o.comment_policy = CommentPolicy::Preserve);
    let out = formatter.reformat("[1, // one\n2]", 0).unwrap();
    assert_eq!(out, "[\n    1, // one\n    2\n]\n");
}

#[test]
fn trailing_comments_sit_one_space_out() {
    let formatter = formatter_with(|o| o.comment_policy = CommentPolicy::Preserve);
    let out = formatter
        .reformat("{\"a\": 1, // first\n\"b\": 2 // last\n}", 0)
        .unwrap();
    assert_eq!(out, "{\n    \"a\": 1, // first\n    \"b\": 2 // last\n}\n");
}

#[test]
fn standalone_comment_keeps_its_own_line() {
    let formatter = formatter_with(|o| o.comment_policy = CommentPolicy::Preserve);
    let out = formatter
        .reformat("{\n// note\n\"a\": 1\n}", 0)
        .unwrap();
    assert_eq!(out, "{\n    // note\n    \"a\": 1\n}\n");
}

#[test]
fn blank_lines_survive_when_asked() {
    let formatter = formatter_with(|o| o.preserve_blank_lines = true);
    let out = formatter.reformat("[1,\n\n2]", 0).unwrap();
    assert_eq!(out, "[\n    1,\n\n    2\n]\n");
}

#[test]
fn trailing_comma_needs_permission() {
    assert!(Formatter::new().reformat("[1,2,]", 0).is_err());
    let formatter = formatter_with(|o| o.allow_trailing_commas = true);
    assert_eq!(formatter.reformat("[1,2,]", 0).unwrap(), "[1, 2]\n");
}

#[test]
fn trailing_commas_can_be_written_back() {
    let formatter = formatter_with(|o| {
        o.max_inline_length = 4;
        o.write_trailing_commas = true;
    });
    let out = formatter.reformat("[1,2]", 0).unwrap();
    assert_eq!(out, "[\n    1,\n    2,\n]\n");
}

#[test]
fn formatting_is_idempotent() {
    let formatter = formatter_with(|o| {
        o.max_inline_length = 40;
        o.comment_policy = CommentPolicy::Preserve;
        o.preserve_blank_lines = true;
    });
    let input = concat!(
        "{\n",
        "// config\n",
        "\"points\": [[1.5, 10], [22, 3.25], [5, 6]],\n",
        "\n",
        "\"name\": \"demo\" // trailing\n",
        "}",
    );
    let once = formatter.reformat(input, 0).unwrap();
    let twice = formatter.reformat(&once, 0).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn no_line_exceeds_the_width_limit() {
    let formatter = formatter_with(|o| o.max_inline_length = 24);
    let inputs = [
        "[[100, 200, 300], [400, 500, 600], [700, 800, 900]]",
        r#"{"data": {"values": [1, 2, 3, 4, 5, 6, 7, 8]}}"#,
    ];
    for input in inputs {
        let out = formatter.reformat(input, 0).unwrap();
        for line in out.lines() {
            assert!(
                line.chars().count() <= 24,
                "line {:?} exceeds the width limit for input {:?}",
                line,
                input
            );
        }
    }
}

#[test]
fn always_expand_depth_overrides_fitting() {
    let formatter = formatter_with(|o| o.always_expand_depth = 1);
    let out = formatter.reformat(r#"{"a": 1}"#, 0).unwrap();
    assert_eq!(out, "{\n    \"a\": 1\n}\n");
}

#[test]
fn crlf_output() {
    let formatter = formatter_with(|o| o.eol_style = EolStyle::Crlf);
    assert_eq!(formatter.reformat("[1, 2]", 0).unwrap(), "[1, 2]\r\n");
    let formatter = formatter_with(|o| {
        o.eol_style = EolStyle::Crlf;
        o.max_inline_length = 2;
    });
    assert_eq!(
        formatter.reformat("[1]", 0).unwrap(),
        "[\r\n    1\r\n]\r\n"
    );
}

#[test]
fn prefix_string_leads_every_line() {
    let formatter = formatter_with(|o| {
        o.prefix_string = "\t".to_string();
        o.max_inline_length = 10;
    });
    let out = formatter.reformat("[1, 2, 3, 4]", 0).unwrap();
    for line in out.lines() {
        assert!(line.starts_with('\t'));
    }
}

#[test]
fn object_table_rows_respect_a_custom_length_function() {
    let mut formatter = formatter_with(|o| o.max_inline_length = 42);
    formatter.set_string_length_func(|s: &str| 2 * s.chars().count());
    let out = formatter
        .reformat(r#"[{"aa":1,"bb":2},{"aa":3,"bb":4}]"#, 0)
        .unwrap();
    for line in out.lines() {
        assert!(
            2 * line.chars().count() <= 42,
            "line {:?} exceeds the width limit under the configured function",
            line
        );
    }
}

#[test]
fn wide_characters_can_count_double() {
    let input = r#"["あいう", "えおか"]"#;
    let narrow = formatter_with(|o| o.max_inline_length = 14);
    assert_eq!(narrow.reformat(input, 0).unwrap().lines().count(), 1);

    let mut wide = formatter_with(|o| o.max_inline_length = 14);
    wide.set_string_length_func(|s: &str| UnicodeWidthStr::width(s));
    assert_eq!(wide.reformat(input, 0).unwrap().lines().count(), 4);
}

#[test]
fn property_names_can_be_aligned() {
    let formatter = formatter_with(|o| {
        o.max_inline_length = 10;
        o.align_expanded_property_names = true;
    });
    let out = formatter.reformat(r#"{"id": 1, "name": 2}"#, 0).unwrap();
    assert_eq!(out, "{\n    \"id\"  : 1,\n    \"name\": 2\n}\n");

    let formatter = formatter_with(|o| {
        o.max_inline_length = 10;
        o.align_expanded_property_names = true;
        o.colon_before_prop_name_padding = true;
    });
    let out = formatter.reformat(r#"{"id": 1, "name": 2}"#, 0).unwrap();
    assert_eq!(out, "{\n    \"id\":   1,\n    \"name\": 2\n}\n");
}

#[test]
fn minify_drops_layout_but_not_meaning() {
    let formatter = formatter_with(|o| o.comment_policy = CommentPolicy::Remove);
    let out = formatter
        .minify("{\n  \"a\": [1, 2], // x\n  \"b\": null\n}")
        .unwrap();
    assert_eq!(out, r#"{"a":[1,2],"b":null}"#);
}

#[test]
fn serialize_formats_rust_values() {
    #[derive(Serialize)]
    struct Player {
        name: String,
        scores: Vec<i32>,
    }

    let player = Player {
        name: "Alice".into(),
        scores: vec![95, 87, 92],
    };
    let out = Formatter::new().serialize(&player, 0, 100).unwrap();
    assert_eq!(out, "{ \"name\": \"Alice\", \"scores\": [95, 87, 92] }\n");
}

#[test]
fn syntax_errors_carry_positions() {
    let err = Formatter::new().reformat("[1 2]", 0).unwrap_err();
    match err {
        RefractError::Syntax { position, .. } => {
            assert_eq!(position.row, 0);
            assert_eq!(position.column, 3);
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn error_positions_count_characters_not_bytes() {
    // The accented char is two bytes; a byte-counting position would be 7.
    let err = Formatter::new().reformat("[\"é\", @]", 0).unwrap_err();
    let position = err.position().unwrap();
    assert_eq!(position.index, 6);
    assert_eq!(position.column, 6);
}

#[test]
fn empty_input_is_an_error() {
    assert!(Formatter::new().reformat("", 0).is_err());
    assert!(Formatter::new().reformat("   \n  ", 0).is_err());

    let formatter = formatter_with(|o| o.comment_policy = CommentPolicy::Preserve);
    assert!(formatter.reformat("// nothing here\n", 0).is_err());
}

#[test]
fn number_text_is_passed_through_unchanged() {
    let out = Formatter::new()
        .reformat(r#"[1.50, 1e3, -0.25, 100000000000000000001]"#, 0)
        .unwrap();
    assert_eq!(out, "[1.50, 1e3, -0.25, 100000000000000000001]\n");
}
