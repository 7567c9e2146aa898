//! Bracket-path queries over a [`Value`] tree.
//!
//! A path is one or more `[selector]` groups with nothing between them:
//!
//! - `['key']`, `["key"]` or `[key]` selects a field of an object
//! - `[0]` selects an element of an array
//!
//! The path text is scanned with the same [`Lexer`] that reads documents, so
//! quoting and escapes work exactly as they do in JSON5 strings.
//!
//! Failures are split so callers can tell a malformed path from a path that
//! simply does not exist in this document:
//!
//! - [`ErrorCode::Syntax`](crate::ErrorCode::Syntax): bad grammar, an empty
//!   selector, a negative or fractional index, or a selector of the wrong
//!   kind for the node it is applied to
//! - [`ErrorCode::BadParameter`](crate::ErrorCode::BadParameter): a missing
//!   key, an index past the end, or a selector applied to a scalar
//! - [`ErrorCode::TokenizerInit`](crate::ErrorCode::TokenizerInit): the path
//!   is empty
//!
//! ```rust
//! use json5_tree::{index, parse_str, ErrorCode, Value};
//!
//! let doc = parse_str("{users: [{name: 'ada'}]}").unwrap();
//! assert_eq!(index(&doc, "[users][0]['name']").unwrap(), &Value::from("ada"));
//! assert_eq!(index(&doc, "[users][1]").unwrap_err().code(), ErrorCode::BadParameter);
//! assert_eq!(index(&doc, "[users]['0']").unwrap_err().code(), ErrorCode::Syntax);
//! ```

use crate::lexer::{Lexeme, Lexer};
use crate::{Error, Result, Value};
use std::str::FromStr;
use tracing::debug;

/// One `[...]` group of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Segment {
    selector: Selector,
    line: usize,
    col: usize,
}

/// A parsed path, reusable across lookups.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{parse_str, Path, Selector, Value};
///
/// let path: Path = "[rows][2]".parse().unwrap();
/// assert_eq!(
///     path.selectors().collect::<Vec<_>>(),
///     vec![&Selector::Key("rows".into()), &Selector::Index(2)]
/// );
///
/// let doc = parse_str("{rows: [10, 20, 30]}").unwrap();
/// assert_eq!(path.resolve(&doc).unwrap(), &Value::from(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    /// Scans a path expression.
    ///
    /// # Errors
    ///
    /// Returns a syntax error for malformed groups and a tokenizer init error
    /// for an empty path.
    pub fn parse(path: &str) -> Result<Self> {
        let mut lexer = Lexer::new(path)?;
        let mut segments = Vec::new();

        loop {
            if lexer.lexeme() != Lexeme::LBracket {
                let msg = format!("expected '[', found {}", lexer.lexeme().describe());
                return Err(lexer.syntax_here(&msg));
            }
            advance(&mut lexer)?;

            let (line, col) = lexer.position();
            let selector = match lexer.lexeme() {
                Lexeme::Str | Lexeme::Ident { .. } => {
                    Selector::Key(lexer.key().unwrap_or_default().to_string())
                }
                Lexeme::Number(n) => {
                    if n < 0.0 || n.fract() != 0.0 {
                        let msg = format!("index must be a non-negative integer, found {}", n);
                        return Err(lexer.syntax_here(&msg));
                    }
                    Selector::Index(n as usize)
                }
                Lexeme::RBracket => return Err(lexer.syntax_here("empty selector")),
                other => {
                    let msg = format!("unexpected {} in selector", other.describe());
                    return Err(lexer.syntax_here(&msg));
                }
            };
            segments.push(Segment {
                selector,
                line,
                col,
            });

            advance(&mut lexer)?;
            if lexer.lexeme() != Lexeme::RBracket {
                let msg = format!("expected ']', found {}", lexer.lexeme().describe());
                return Err(lexer.syntax_here(&msg));
            }
            advance(&mut lexer)?;
            if lexer.lexeme() == Lexeme::Eof {
                break;
            }
        }

        Ok(Path { segments })
    }

    /// The selectors of this path, in order.
    pub fn selectors(&self) -> impl Iterator<Item = &Selector> {
        self.segments.iter().map(|seg| &seg.selector)
    }

    /// Number of `[...]` groups. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Walks `root` left to right and returns the selected node.
    pub fn resolve<'v>(&self, root: &'v Value) -> Result<&'v Value> {
        let mut node = root;
        for seg in &self.segments {
            node = match (node, &seg.selector) {
                (Value::Object(map), Selector::Key(key)) => {
                    map.get(key).ok_or_else(|| missing_key(key))?
                }
                (Value::Array(elems), Selector::Index(i)) => {
                    elems.get(*i).ok_or_else(|| out_of_range(*i, elems.len()))?
                }
                (other, _) => return Err(mismatch(other, seg)),
            };
        }
        Ok(node)
    }

    /// Like [`Path::resolve`], but returns a mutable reference.
    pub fn resolve_mut<'v>(&self, root: &'v mut Value) -> Result<&'v mut Value> {
        let mut node = root;
        for seg in &self.segments {
            node = match (node, &seg.selector) {
                (Value::Object(map), Selector::Key(key)) => {
                    map.get_mut(key).ok_or_else(|| missing_key(key))?
                }
                (Value::Array(elems), Selector::Index(i)) => {
                    let len = elems.len();
                    elems.get_mut(*i).ok_or_else(|| out_of_range(*i, len))?
                }
                (other, _) => return Err(mismatch(other, seg)),
            };
        }
        Ok(node)
    }
}

impl FromStr for Path {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}

fn advance(lexer: &mut Lexer<'_>) -> Result<()> {
    if lexer.step() || lexer.lexeme() == Lexeme::Eof {
        Ok(())
    } else {
        Err(lexer.take_error())
    }
}

fn missing_key(key: &str) -> Error {
    Error::bad_parameter(format!("key `{}` not found", key))
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::bad_parameter(format!(
        "index {} out of range for array of length {}",
        index, len
    ))
}

fn mismatch(node: &Value, seg: &Segment) -> Error {
    match (node, &seg.selector) {
        (Value::Object(_), Selector::Index(i)) => Error::syntax(
            seg.line,
            seg.col,
            &format!("expected a key to select from an object, found index {}", i),
        ),
        (Value::Array(_), Selector::Key(key)) => Error::syntax(
            seg.line,
            seg.col,
            &format!("expected an index to select from an array, found key `{}`", key),
        ),
        (other, _) => Error::bad_parameter(format!("cannot select into a {}", other.kind())),
    }
}

/// Resolves `path` against `root`.
///
/// See the [module documentation](self) for the grammar and error rules.
pub fn index<'v>(root: &'v Value, path: &str) -> Result<&'v Value> {
    debug!(path, "resolving path");
    let result = Path::parse(path).and_then(|p| p.resolve(root));
    if let Err(err) = &result {
        debug!(path, error = %err, "path lookup failed");
    }
    result
}

/// Resolves `path` against `root`, returning a mutable reference.
pub fn index_mut<'v>(root: &'v mut Value, path: &str) -> Result<&'v mut Value> {
    debug!(path, "resolving path for update");
    let parsed = Path::parse(path)?;
    parsed.resolve_mut(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_str, ErrorCode};

    fn doc() -> Value {
        parse_str("{foo: 1, bar: [true, null], 'odd key': {x: [[0, 1], [2, 3]]}}").unwrap()
    }

    #[test]
    fn test_parse_selectors() {
        let path = Path::parse("[a]['b c'][\"d\"][0][12]").unwrap();
        assert_eq!(path.len(), 5);
        let selectors: Vec<_> = path.selectors().cloned().collect();
        assert_eq!(
            selectors,
            vec![
                Selector::Key("a".into()),
                Selector::Key("b c".into()),
                Selector::Key("d".into()),
                Selector::Index(0),
                Selector::Index(12),
            ]
        );
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let path = Path::parse(" [ 'a' ] [ 1 ] ").unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn test_resolve() {
        let doc = doc();
        assert_eq!(index(&doc, "[foo]").unwrap(), &Value::from(1));
        assert_eq!(index(&doc, "[bar][0]").unwrap(), &Value::from(true));
        assert_eq!(index(&doc, "[bar][1]").unwrap(), &Value::Null);
        assert_eq!(index(&doc, "['odd key'][x][1][0]").unwrap(), &Value::from(2));
    }

    #[test]
    fn test_grammar_errors_are_syntax() {
        let doc = doc();
        for path in ["[bar][]", "[bar", "bar", "[bar]0", "[[0]]", "[-1]", "[1.5]", "[null]", "[:]"] {
            let err = index(&doc, path).unwrap_err();
            assert_eq!(err.code(), ErrorCode::Syntax, "path {:?}", path);
        }
    }

    #[test]
    fn test_wrong_selector_kind_is_syntax() {
        let doc = doc();
        assert_eq!(index(&doc, "[0]").unwrap_err().code(), ErrorCode::Syntax);
        assert_eq!(index(&doc, "[bar][foo]").unwrap_err().code(), ErrorCode::Syntax);
    }

    #[test]
    fn test_lookup_failures_are_bad_parameter() {
        let doc = doc();
        assert_eq!(index(&doc, "[missing]").unwrap_err().code(), ErrorCode::BadParameter);
        assert_eq!(index(&doc, "[bar][2]").unwrap_err().code(), ErrorCode::BadParameter);
        assert_eq!(index(&doc, "[foo][0]").unwrap_err().code(), ErrorCode::BadParameter);
        // Keys match exactly, never by prefix
        assert_eq!(index(&doc, "[fo]").unwrap_err().code(), ErrorCode::BadParameter);
        assert_eq!(index(&doc, "[fooo]").unwrap_err().code(), ErrorCode::BadParameter);
    }

    #[test]
    fn test_empty_path() {
        let doc = doc();
        assert_eq!(index(&doc, "").unwrap_err().code(), ErrorCode::TokenizerInit);
        assert_eq!(index(&doc, "  ").unwrap_err().code(), ErrorCode::TokenizerInit);
    }

    #[test]
    fn test_malformed_escape_in_path() {
        let doc = doc();
        let err = index(&doc, "['\\u12']").unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedCharacter);
    }

    #[test]
    fn test_index_mut() {
        let mut doc = doc();
        *index_mut(&mut doc, "[bar][1]").unwrap() = Value::from("set");
        assert_eq!(index(&doc, "[bar][1]").unwrap(), &Value::from("set"));

        let err = index_mut(&mut doc, "[bar][9]").unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadParameter);
    }

    #[test]
    fn test_path_reuse() {
        let path: Path = "[k]".parse().unwrap();
        let a = parse_str("{k: 'a'}").unwrap();
        let b = parse_str("{k: 'b'}").unwrap();
        assert_eq!(path.resolve(&a).unwrap().as_str(), Some("a"));
        assert_eq!(path.resolve(&b).unwrap().as_str(), Some("b"));
    }
}
