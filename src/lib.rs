//! # json5_tree
//!
//! A reader, writer and query engine for JSON5, the relaxed superset of JSON
//! meant for hand-written configuration.
//!
//! ## What does it accept?
//!
//! Everything JSON accepts, plus:
//!
//! - `// line` and `/* block */` comments
//! - Unquoted identifier keys (`{name: 1}`) and single-quoted strings
//! - Trailing commas in arrays and objects
//! - `Infinity`, `NaN`, hexadecimal integers and leading or trailing decimal points
//! - `\xHH` escapes and backslash-newline line continuations in strings
//!
//! ## Key Features
//!
//! - **Value tree**: documents parse into a [`Value`] enum with an
//!   insertion-ordered [`Map`] for objects
//! - **Canonical printer**: one element per line, 15 significant digits,
//!   optional `\uXXXX` escaping of all non-ASCII text
//! - **Path queries**: `['key'][0]` style lookups with distinct errors for
//!   malformed paths and missing nodes
//! - **Serde bridge**: [`from_value`] / [`to_value`] convert between trees
//!   and your own `#[derive(Serialize, Deserialize)]` types
//! - **Fail fast**: the first error stops parsing and carries its line and
//!   column; allocation failures surface as [`Error::OutOfMemory`]
//! - **No Unsafe Code**
//!
//! ## Quick Start
//!
//! ```rust
//! use json5_tree::{parse_str, to_string, Value};
//!
//! let doc = parse_str(r#"
//!     // service settings
//!     {
//!         name: 'gateway',
//!         ports: [80, 443,],
//!         timeout: 2.5e1,
//!     }
//! "#).unwrap();
//!
//! assert_eq!(doc.at("[ports][1]").unwrap(), &Value::from(443));
//! assert_eq!(doc.at("['timeout']").unwrap().as_f64(), Some(25.0));
//!
//! let text = to_string(&doc);
//! assert!(text.starts_with("{\n\t\"name\": \"gateway\""));
//! ```
//!
//! ### Typed data
//!
//! ```rust
//! use json5_tree::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Limits { burst: u32, rate: f64 }
//!
//! let limits: Limits = from_str("{burst: 0x10, rate: .5}").unwrap();
//! assert_eq!(limits, Limits { burst: 16, rate: 0.5 });
//! ```
//!
//! ### Building trees in code
//!
//! ```rust
//! use json5_tree::{json5, to_string};
//!
//! let value = json5!({ "ok": true, "items": [] });
//! assert_eq!(to_string(&value), "{\n\t\"ok\": true,\n\t\"items\": []\n}");
//! ```
//!
//! ## Logging
//!
//! Whole-document parses, prints and path lookups emit `tracing` events at
//! `debug` level, and the tokenizer emits one `trace` event per token. No
//! subscriber is installed by this crate.
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Nesting depth is bounded by [`ParseOptions::max_depth`], so hostile
//!   input cannot exhaust the stack
//! - A built [`Value`] is `Send + Sync`; mutation needs `&mut`

pub mod de;
pub mod error;
pub mod lexer;
pub mod macros;
pub mod map;
pub mod options;
pub mod path;
pub mod ser;
pub mod value;

pub use de::{from_value, Parser};
pub use error::{Error, ErrorCode, Result};
pub use lexer::{Lexeme, Lexer};
pub use map::Map;
pub use options::{ParseOptions, PrintOptions};
pub use path::{index, index_mut, Path, Selector};
pub use ser::{to_value, Printer};
pub use value::Value;

use serde::de::DeserializeOwned;
use std::fs::File;
use std::io;
use tracing::debug;

/// Parses a JSON5 document with default options.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{parse_str, Value};
///
/// let value = parse_str("[1, 'two', {three: 3}]").unwrap();
/// assert_eq!(value.at("[2][three]").unwrap(), &Value::from(3));
/// ```
///
/// # Errors
///
/// Returns the first syntax, malformed-character, depth or allocation error
/// encountered. Error messages include line and column information.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str(input: &str) -> Result<Value> {
    parse_str_with_options(input, ParseOptions::default())
}

/// Parses a JSON5 document with custom options.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{parse_str_with_options, ErrorCode, ParseOptions};
///
/// let options = ParseOptions::new().with_max_depth(2);
/// let err = parse_str_with_options("[[[]]]", options).unwrap_err();
/// assert_eq!(err.code(), ErrorCode::Syntax);
/// ```
///
/// # Errors
///
/// See [`parse_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_str_with_options(input: &str, options: ParseOptions) -> Result<Value> {
    debug!(bytes = input.len(), max_depth = options.max_depth, "parsing document");
    let result = Parser::with_options(input, &options)
        .and_then(|parser| parser.parse_document(options.allow_trailing_content));
    match &result {
        Ok(value) => debug!(kind = value.kind(), "parsed document"),
        Err(err) => debug!(error = %err, "parse failed"),
    }
    result
}

/// Parses a JSON5 document from bytes.
///
/// # Errors
///
/// Bytes that are not valid UTF-8 give [`ErrorCode::MalformedCharacter`];
/// otherwise see [`parse_str`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice(bytes: &[u8]) -> Result<Value> {
    parse_slice_with_options(bytes, ParseOptions::default())
}

/// Parses a JSON5 document from bytes with custom options.
///
/// # Errors
///
/// See [`parse_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_slice_with_options(bytes: &[u8], options: ParseOptions) -> Result<Value> {
    let input = std::str::from_utf8(bytes).map_err(|e| {
        let valid = std::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default();
        let (line, col) = error::line_col(valid, valid.len());
        Error::malformed(line, col, "input is not valid UTF-8")
    })?;
    parse_str_with_options(input, options)
}

/// Reads a stream to its end and parses it as one JSON5 document.
///
/// # Examples
///
/// ```rust
/// use json5_tree::parse_reader;
/// use std::io::Cursor;
///
/// let value = parse_reader(Cursor::new(b"{a: [true]}")).unwrap();
/// assert_eq!(value.at("[a][0]").unwrap().as_bool(), Some(true));
/// ```
///
/// # Errors
///
/// Read failures give [`ErrorCode::Io`]; otherwise see [`parse_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader<R>(reader: R) -> Result<Value>
where
    R: io::Read,
{
    parse_reader_with_options(reader, ParseOptions::default())
}

/// Reads a stream to its end and parses it with custom options.
///
/// # Errors
///
/// See [`parse_reader`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_reader_with_options<R>(mut reader: R, options: ParseOptions) -> Result<Value>
where
    R: io::Read,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    parse_slice_with_options(&bytes, options)
}

/// Reads and parses the JSON5 file at `path`.
///
/// The file is closed before this returns, on success and on error.
///
/// # Errors
///
/// Open and read failures give [`ErrorCode::Io`]; otherwise see
/// [`parse_slice`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file<P>(path: P) -> Result<Value>
where
    P: AsRef<std::path::Path>,
{
    parse_file_with_options(path, ParseOptions::default())
}

/// Reads and parses the JSON5 file at `path` with custom options.
///
/// # Errors
///
/// See [`parse_file`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn parse_file_with_options<P>(path: P, options: ParseOptions) -> Result<Value>
where
    P: AsRef<std::path::Path>,
{
    let path = path.as_ref();
    debug!(path = %path.display(), "opening document");
    let file = File::open(path)?;
    parse_reader_with_options(file, options)
}

/// Prints a tree as JSON5 text, passing non-ASCII characters through.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{to_string, Value};
///
/// assert_eq!(to_string(&Value::Number(f64::NAN)), "NaN");
/// assert_eq!(to_string(&Value::from("é")), "\"é\"");
/// ```
#[must_use]
pub fn to_string(value: &Value) -> String {
    to_string_with_options(value, &PrintOptions::default())
}

/// Prints a tree as JSON5 text with every non-ASCII character escaped.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{to_string_escaped, Value};
///
/// assert_eq!(to_string_escaped(&Value::from("é")), "\"\\u00e9\"");
/// ```
#[must_use]
pub fn to_string_escaped(value: &Value) -> String {
    to_string_with_options(value, &PrintOptions::escaped())
}

/// Prints a tree as JSON5 text with custom options.
#[must_use]
pub fn to_string_with_options(value: &Value, options: &PrintOptions) -> String {
    let mut printer = Printer::new(options);
    printer.print(value);
    let text = printer.into_inner();
    debug!(
        kind = value.kind(),
        bytes = text.len(),
        escape_unicode = options.escape_unicode,
        "printed value"
    );
    text
}

/// Prints a tree to a writer.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{to_writer, Value};
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Value::from(vec![Value::Null])).unwrap();
/// assert_eq!(buffer, b"[\n\tnull\n]");
/// ```
///
/// # Errors
///
/// Returns [`ErrorCode::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W>(writer: W, value: &Value) -> Result<()>
where
    W: io::Write,
{
    to_writer_with_options(writer, value, &PrintOptions::default())
}

/// Prints a tree to a writer with custom options.
///
/// # Errors
///
/// Returns [`ErrorCode::Io`] if writing fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W>(mut writer: W, value: &Value, options: &PrintOptions) -> Result<()>
where
    W: io::Write,
{
    let text = to_string_with_options(value, options);
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Parses JSON5 text straight into a type `T`.
///
/// # Examples
///
/// ```rust
/// use json5_tree::from_str;
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("{x: 1, y: -2}").unwrap();
/// assert_eq!(point, Point { x: 1, y: -2 });
/// ```
///
/// # Errors
///
/// Returns parse errors as [`parse_str`] does, and [`Error::Custom`] if the
/// document does not match the shape of `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    from_value(parse_str(s)?)
}
