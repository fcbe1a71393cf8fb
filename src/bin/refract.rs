use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use is_terminal::IsTerminal;
use refract_json::{CommentPolicy, EolStyle, Formatter, LayoutOptions, NumberListAlignment};

/// A human-friendly JSON formatter with smart line breaks and table alignment.
///
/// refract reads JSON (or JSONC) from stdin or files and writes it back
/// formatted: short containers inline, similar rows aligned as tables,
/// everything else expanded one element per line.
#[derive(Parser, Debug)]
#[command(name = "refract")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file(s). If not specified, reads from stdin.
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Output file(s). Repeat once per input file; with none, everything
    /// goes to stdout.
    #[arg(short, long, value_name = "FILE")]
    output: Vec<PathBuf>,

    /// Minify output (remove all whitespace).
    #[arg(short, long)]
    compact: bool,

    /// Maximum line length before wrapping.
    #[arg(short = 'w', long, default_value = "120")]
    max_width: usize,

    /// Number of spaces per indentation level.
    #[arg(short, long, default_value = "4")]
    indent: usize,

    /// Use tabs instead of spaces for indentation.
    #[arg(short = 't', long)]
    tabs: bool,

    /// Line ending style.
    #[arg(long, value_enum, default_value = "lf")]
    eol: EolStyleArg,

    /// How to handle comments in input.
    #[arg(long, value_enum, default_value = "error")]
    comments: CommentPolicyArg,

    /// Allow trailing commas in input.
    #[arg(long)]
    trailing_commas: bool,

    /// Write a comma after the last element of expanded containers.
    #[arg(long)]
    write_trailing_commas: bool,

    /// Preserve blank lines from input.
    #[arg(long)]
    preserve_blanks: bool,

    /// Number alignment style in table columns.
    #[arg(long, value_enum, default_value = "decimal")]
    number_align: NumberAlignArg,

    /// Always expand containers shallower than this depth (-1 to disable).
    #[arg(long, default_value = "-1")]
    always_expand_depth: isize,

    /// Maximum nesting depth for table formatting (-1 to disable).
    #[arg(long, default_value = "2")]
    max_table_complexity: isize,

    /// Add padding inside brackets for simple arrays/objects.
    #[arg(long)]
    simple_bracket_padding: bool,

    /// Disable padding inside brackets for nested arrays/objects.
    #[arg(long)]
    no_nested_bracket_padding: bool,

    /// Pad property names in expanded objects so values line up.
    #[arg(long)]
    align_prop_names: bool,

    /// String prepended to every output line.
    #[arg(long, default_value = "")]
    prefix: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EolStyleArg {
    Lf,
    Crlf,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CommentPolicyArg {
    Error,
    Remove,
    Preserve,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NumberAlignArg {
    Left,
    Right,
    Decimal,
}

fn main() {
    let args = Args::parse();

    match run(args) {
        Ok(()) => {}
        Err(e) => {
            eprintln!("refract: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if !args.output.is_empty() && args.output.len() != args.files.len() {
        bail!(
            "got {} input file(s) but {} --output option(s)",
            args.files.len(),
            args.output.len()
        );
    }

    let mut formatter = Formatter::new();
    configure_options(&mut formatter.options, &args);

    if args.files.is_empty() {
        if io::stdin().is_terminal() {
            bail!("no input files and stdin is a terminal (try --help)");
        }
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("cannot read stdin")?;
        let output = format_one(&formatter, &input, args.compact)?;
        io::stdout().write_all(output.as_bytes())?;
        return Ok(());
    }

    // Each file is formatted independently; one bad file doesn't stop the
    // rest, but any failure makes the exit status non-zero.
    let mut failed = false;
    for (idx, path) in args.files.iter().enumerate() {
        let result = fs::read_to_string(path)
            .with_context(|| format!("cannot read '{}'", path.display()))
            .and_then(|input| {
                format_one(&formatter, &input, args.compact)
                    .with_context(|| format!("in '{}'", path.display()))
            });
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                eprintln!("refract: {:#}", e);
                failed = true;
                continue;
            }
        };
        match args.output.get(idx) {
            Some(out_path) => fs::write(out_path, &output)
                .with_context(|| format!("cannot write '{}'", out_path.display()))?,
            None => io::stdout().write_all(output.as_bytes())?,
        }
    }
    if failed {
        bail!("some files could not be formatted");
    }
    Ok(())
}

fn format_one(formatter: &Formatter, input: &str, compact: bool) -> anyhow::Result<String> {
    let output = if compact {
        formatter.minify(input)?
    } else {
        formatter.reformat(input, 0)?
    };
    Ok(output)
}

fn configure_options(opts: &mut LayoutOptions, args: &Args) {
    opts.max_inline_length = args.max_width;
    opts.indent_spaces = args.indent;
    opts.use_tab_to_indent = args.tabs;
    opts.prefix_string = args.prefix.clone();

    opts.eol_style = match args.eol {
        EolStyleArg::Lf => EolStyle::Lf,
        EolStyleArg::Crlf => EolStyle::Crlf,
    };

    opts.comment_policy = match args.comments {
        CommentPolicyArg::Error => CommentPolicy::TreatAsError,
        CommentPolicyArg::Remove => CommentPolicy::Remove,
        CommentPolicyArg::Preserve => CommentPolicy::Preserve,
    };

    opts.number_list_alignment = match args.number_align {
        NumberAlignArg::Left => NumberListAlignment::Left,
        NumberAlignArg::Right => NumberListAlignment::Right,
        NumberAlignArg::Decimal => NumberListAlignment::Decimal,
    };

    opts.allow_trailing_commas = args.trailing_commas;
    opts.write_trailing_commas = args.write_trailing_commas;
    opts.preserve_blank_lines = args.preserve_blanks;
    opts.always_expand_depth = args.always_expand_depth;
    opts.max_table_row_complexity = args.max_table_complexity;
    opts.simple_bracket_padding = args.simple_bracket_padding;
    opts.nested_bracket_padding = !args.no_nested_bracket_padding;
    opts.align_expanded_property_names = args.align_prop_names;
}
