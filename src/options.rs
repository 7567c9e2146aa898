//! Configuration options for parsing and printing.
//!
//! - [`ParseOptions`]: nesting limit, scratch buffer sizing, trailing content
//! - [`PrintOptions`]: Unicode escaping and indentation
//!
//! ## Examples
//!
//! ```rust
//! use json5_tree::{parse_str_with_options, to_string_with_options, ParseOptions, PrintOptions};
//!
//! let options = ParseOptions::new().with_max_depth(8);
//! let value = parse_str_with_options("{name: 'Zoë'}", options).unwrap();
//!
//! let text = to_string_with_options(&value, &PrintOptions::escaped());
//! assert!(text.contains("\\u00eb"));
//! ```

/// Default nesting limit for arrays and objects.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Default initial size of the tokenizer's string scratch buffer.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1024;

/// Configuration options for reading JSON5 text into a tree.
///
/// # Examples
///
/// ```rust
/// use json5_tree::ParseOptions;
///
/// let options = ParseOptions::new()
///     .with_max_depth(16)
///     .with_trailing_content(true);
/// assert_eq!(options.max_depth, 16);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum nesting of arrays and objects before parsing fails.
    pub max_depth: usize,
    /// Bytes reserved up front for decoded string contents.
    pub scratch_capacity: usize,
    /// Accept (and ignore) tokens after the root value.
    pub allow_trailing_content: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            max_depth: DEFAULT_MAX_DEPTH,
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            allow_trailing_content: false,
        }
    }
}

impl ParseOptions {
    /// Creates default options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use json5_tree::ParseOptions;
    ///
    /// let options = ParseOptions::new();
    /// assert_eq!(options.max_depth, 128);
    /// assert!(!options.allow_trailing_content);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the initial scratch buffer size used for decoding strings.
    #[must_use]
    pub fn with_scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    /// Allows tokens after the root value instead of rejecting them.
    #[must_use]
    pub fn with_trailing_content(mut self, allow: bool) -> Self {
        self.allow_trailing_content = allow;
        self
    }
}

/// Configuration options for printing a tree back to text.
///
/// # Examples
///
/// ```rust
/// use json5_tree::PrintOptions;
///
/// // Raw UTF-8 passthrough, tab indentation
/// let options = PrintOptions::new();
/// assert!(!options.escape_unicode);
///
/// // Everything outside ASCII as \u escapes, two-space indentation
/// let options = PrintOptions::escaped().with_indent("  ");
/// assert_eq!(options.indent, "  ");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintOptions {
    /// Re-encode every non-ASCII character as `\uXXXX` escapes.
    pub escape_unicode: bool,
    /// Text emitted once per nesting level.
    pub indent: String,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            escape_unicode: false,
            indent: "\t".to_string(),
        }
    }
}

impl PrintOptions {
    /// Creates default options (raw UTF-8, tab indentation).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates options that escape all non-ASCII characters.
    #[must_use]
    pub fn escaped() -> Self {
        PrintOptions {
            escape_unicode: true,
            ..Default::default()
        }
    }

    /// Turns `\u` re-encoding of non-ASCII characters on or off.
    #[must_use]
    pub fn with_escape_unicode(mut self, escape_unicode: bool) -> Self {
        self.escape_unicode = escape_unicode;
        self
    }

    /// Sets the per-level indentation text.
    #[must_use]
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}
