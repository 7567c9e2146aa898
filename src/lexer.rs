//! Tokenizer for relaxed JSON5 text.
//!
//! The [`Lexer`] walks a borrowed input buffer one [`Lexeme`] at a time.
//! Whitespace and comments are skipped at every token boundary (never inside
//! quoted text). Strings are decoded into a scratch buffer owned by the
//! lexer; the decoded text is available through [`Lexer::string_value`]
//! until the next call to [`Lexer::step`]. The borrow checker enforces that
//! lifetime: `step` takes `&mut self`, so no `&str` obtained from the
//! previous token can survive it.
//!
//! ```rust
//! use json5_tree::lexer::{Lexeme, Lexer};
//!
//! let mut lexer = Lexer::new("{key: 'v\\x41l'} // done").unwrap();
//! assert_eq!(lexer.lexeme(), Lexeme::LBrace);
//!
//! lexer.step();
//! assert_eq!(lexer.ident(), Some("key"));
//!
//! lexer.step();
//! lexer.step();
//! assert_eq!(lexer.string_value(), Some("vAl"));
//!
//! lexer.step();
//! assert_eq!(lexer.lexeme(), Lexeme::RBrace);
//! assert!(!lexer.step());
//! assert_eq!(lexer.lexeme(), Lexeme::Eof);
//! ```

use crate::error::line_col;
use crate::options::DEFAULT_SCRATCH_CAPACITY;
use crate::{Error, Result};

/// One classified token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lexeme {
    /// End of input.
    Eof,
    /// The last step failed; see [`Lexer::error`].
    Error,
    /// An unquoted identifier, as a byte range into the input.
    Ident { start: usize, len: usize },
    Null,
    Bool(bool),
    Number(f64),
    /// A quoted string; the decoded text is in [`Lexer::string_value`].
    Str,
    Colon,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

impl Lexeme {
    /// Short human-readable description, used in error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Lexeme::Eof => "end of input",
            Lexeme::Error => "invalid token",
            Lexeme::Ident { .. } => "identifier",
            Lexeme::Null => "null",
            Lexeme::Bool(_) => "boolean",
            Lexeme::Number(_) => "number",
            Lexeme::Str => "string",
            Lexeme::Colon => "':'",
            Lexeme::Comma => "','",
            Lexeme::LBrace => "'{'",
            Lexeme::RBrace => "'}'",
            Lexeme::LBracket => "'['",
            Lexeme::RBracket => "']'",
        }
    }
}

/// Cursor over a JSON5 input buffer.
pub struct Lexer<'a> {
    input: &'a str,
    offset: usize,
    token_start: usize,
    lexeme: Lexeme,
    scratch: String,
    error: Option<Error>,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned on the first token of `input`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TokenizerInit`] if the input is empty or holds only
    /// whitespace and comments, or the error that made the first token
    /// unreadable.
    pub fn new(input: &'a str) -> Result<Self> {
        Self::with_capacity(input, DEFAULT_SCRATCH_CAPACITY)
    }

    /// Like [`Lexer::new`], reserving `scratch_capacity` bytes for decoded strings.
    pub fn with_capacity(input: &'a str, scratch_capacity: usize) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::tokenizer_init("empty input"));
        }

        let mut scratch = String::new();
        scratch.try_reserve(scratch_capacity)?;

        let mut lexer = Lexer {
            input,
            offset: 0,
            token_start: 0,
            lexeme: Lexeme::Eof,
            scratch,
            error: None,
        };

        if !lexer.step() {
            return Err(match lexer.error.take() {
                Some(err) => err,
                None => Error::tokenizer_init("input contains no tokens"),
            });
        }
        Ok(lexer)
    }

    /// Advances to the next token.
    ///
    /// Returns `false` at end of input or on a tokenizer error; the two are
    /// told apart by [`Lexer::lexeme`] being [`Lexeme::Eof`] or
    /// [`Lexeme::Error`].
    pub fn step(&mut self) -> bool {
        self.error = None;
        self.skip_trivia();
        self.token_start = self.offset;

        let Some(&b) = self.input.as_bytes().get(self.offset) else {
            self.lexeme = Lexeme::Eof;
            return false;
        };

        let result = match b {
            b':' => Ok(self.punct(Lexeme::Colon)),
            b',' => Ok(self.punct(Lexeme::Comma)),
            b'{' => Ok(self.punct(Lexeme::LBrace)),
            b'}' => Ok(self.punct(Lexeme::RBrace)),
            b'[' => Ok(self.punct(Lexeme::LBracket)),
            b']' => Ok(self.punct(Lexeme::RBracket)),
            b'"' | b'\'' => self.lex_string(b),
            b if is_ident_start(b) => Ok(self.lex_ident()),
            b if b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-') => self.lex_number(),
            _ => {
                let ch = self.input[self.offset..].chars().next().unwrap_or('?');
                Err(self.syntax_at(
                    self.offset,
                    &format!("unexpected character `{}`", ch.escape_debug()),
                ))
            }
        };

        match result {
            Ok(lexeme) => {
                tracing::trace!(?lexeme, offset = self.token_start, "lexeme");
                self.lexeme = lexeme;
                true
            }
            Err(err) => {
                tracing::trace!(%err, offset = self.token_start, "lexer error");
                self.lexeme = Lexeme::Error;
                self.error = Some(err);
                false
            }
        }
    }

    /// The current token.
    #[must_use]
    pub fn lexeme(&self) -> Lexeme {
        self.lexeme
    }

    /// Decoded text of the current string token.
    ///
    /// The returned slice lives in the lexer's scratch buffer and is
    /// overwritten by the next [`Lexer::step`].
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match self.lexeme {
            Lexeme::Str => Some(&self.scratch),
            _ => None,
        }
    }

    /// Text of the current identifier token, borrowed from the input.
    #[must_use]
    pub fn ident(&self) -> Option<&'a str> {
        match self.lexeme {
            Lexeme::Ident { start, len } => Some(&self.input[start..start + len]),
            _ => None,
        }
    }

    /// Text of the current token if it can name an object key.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.string_value().or_else(|| self.ident())
    }

    /// The error that produced the current [`Lexeme::Error`], if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Takes the stored tokenizer error, or builds a syntax error describing
    /// the current token.
    pub fn take_error(&mut self) -> Error {
        match self.error.take() {
            Some(err) => err,
            None => {
                let msg = format!("unexpected {}", self.lexeme.describe());
                self.syntax_here(&msg)
            }
        }
    }

    /// Byte offset just past the current token.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// 1-based line and column where the current token starts.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        line_col(self.input, self.token_start)
    }

    /// Builds a syntax error located at the current token.
    pub fn syntax_here(&self, msg: &str) -> Error {
        self.syntax_at(self.token_start, msg)
    }

    fn syntax_at(&self, offset: usize, msg: &str) -> Error {
        let (line, col) = line_col(self.input, offset);
        Error::syntax(line, col, msg)
    }

    fn malformed_at(&self, offset: usize, msg: &str) -> Error {
        let (line, col) = line_col(self.input, offset);
        Error::malformed(line, col, msg)
    }

    fn punct(&mut self, lexeme: Lexeme) -> Lexeme {
        self.offset += 1;
        lexeme
    }

    /// Skips whitespace, `// line` and `/* block */` comments until neither
    /// follows. An unterminated block comment stops the skip on its `/`.
    fn skip_trivia(&mut self) {
        let bytes = self.input.as_bytes();
        loop {
            while bytes.get(self.offset).copied().is_some_and(is_space) {
                self.offset += 1;
            }

            let rest = &bytes[self.offset..];
            if rest.starts_with(b"//") {
                self.offset = match rest[2..].iter().position(|&b| b == b'\n') {
                    Some(newline) => self.offset + 2 + newline,
                    None => bytes.len(),
                };
            } else if rest.starts_with(b"/*") {
                match rest[2..].windows(2).position(|w| w == b"*/") {
                    Some(close) => self.offset += 2 + close + 2,
                    None => return,
                }
            } else {
                return;
            }
        }
    }

    fn lex_ident(&mut self) -> Lexeme {
        let start = self.offset;
        let bytes = self.input.as_bytes();
        while bytes.get(self.offset).copied().is_some_and(is_ident_continue) {
            self.offset += 1;
        }

        match &self.input[start..self.offset] {
            "Infinity" => Lexeme::Number(f64::INFINITY),
            "NaN" => Lexeme::Number(f64::NAN),
            "true" => Lexeme::Bool(true),
            "false" => Lexeme::Bool(false),
            "null" => Lexeme::Null,
            _ => Lexeme::Ident {
                start,
                len: self.offset - start,
            },
        }
    }

    /// Scans the widest valid number prefix: decimal with optional fraction
    /// and exponent, `0x` hex integers, or signed `Infinity` / `NaN`.
    fn lex_number(&mut self) -> Result<Lexeme> {
        let bytes = self.input.as_bytes();
        let start = self.offset;
        let mut pos = start;

        let negative = match bytes[pos] {
            b'-' => {
                pos += 1;
                true
            }
            b'+' => {
                pos += 1;
                false
            }
            _ => false,
        };
        let signed = |n: f64| if negative { -n } else { n };

        let rest = &self.input[pos..];
        for (word, special) in [("Infinity", f64::INFINITY), ("NaN", f64::NAN)] {
            let after = rest.as_bytes().get(word.len()).copied();
            if rest.starts_with(word) && !after.is_some_and(is_ident_continue) {
                self.offset = pos + word.len();
                return Ok(Lexeme::Number(signed(special)));
            }
        }

        if matches!(rest.as_bytes(), [b'0', b'x' | b'X', h, ..] if h.is_ascii_hexdigit()) {
            pos += 2;
            let mut n = 0.0_f64;
            while let Some(digit) = bytes.get(pos).and_then(|&b| char::from(b).to_digit(16)) {
                n = n * 16.0 + f64::from(digit);
                pos += 1;
            }
            self.offset = pos;
            return Ok(Lexeme::Number(signed(n)));
        }

        let digits_start = pos;
        let int_digits = count_digits(&bytes[pos..]);
        pos += int_digits;

        let mut frac_digits = 0;
        if bytes.get(pos) == Some(&b'.') {
            frac_digits = count_digits(&bytes[pos + 1..]);
            if int_digits > 0 || frac_digits > 0 {
                pos += 1 + frac_digits;
            }
        }

        if int_digits == 0 && frac_digits == 0 {
            return Err(self.syntax_at(start, "expected digits in number"));
        }

        if matches!(bytes.get(pos), Some(b'e' | b'E')) {
            let mut exp = pos + 1;
            if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            let exp_digits = count_digits(&bytes[exp..]);
            if exp_digits > 0 {
                pos = exp + exp_digits;
            }
        }

        let n: f64 = self.input[digits_start..pos]
            .parse()
            .map_err(|_| self.syntax_at(start, "invalid number"))?;
        self.offset = pos;
        Ok(Lexeme::Number(signed(n)))
    }

    fn lex_string(&mut self, quote: u8) -> Result<Lexeme> {
        let open = self.offset;
        self.offset += 1;
        self.scratch.clear();

        loop {
            let rest = &self.input.as_bytes()[self.offset..];
            let Some(run) = rest.iter().position(|&b| b == quote || b == b'\\') else {
                return Err(self.syntax_at(open, "unterminated string"));
            };

            let text = &self.input[self.offset..self.offset + run];
            self.scratch.try_reserve(text.len())?;
            self.scratch.push_str(text);
            self.offset += run;

            if self.input.as_bytes()[self.offset] == quote {
                self.offset += 1;
                return Ok(Lexeme::Str);
            }
            self.lex_escape()?;
        }
    }

    /// Decodes one backslash escape into the scratch buffer.
    fn lex_escape(&mut self) -> Result<()> {
        let esc_start = self.offset;
        let Some(ch) = self.input[esc_start + 1..].chars().next() else {
            return Err(self.syntax_at(esc_start, "unterminated string"));
        };
        self.offset += 1 + ch.len_utf8();

        let decoded = match ch {
            '\n' | '\r' => {
                let bytes = self.input.as_bytes();
                while bytes.get(self.offset).copied().is_some_and(is_space) {
                    self.offset += 1;
                }
                return Ok(());
            }
            '\\' | '\'' | '"' | '/' => ch,
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            '0' => '\0',
            'x' => self
                .hex_digits(2)
                .and_then(char::from_u32)
                .ok_or_else(|| self.malformed_at(esc_start, "expected two hex digits after \\x"))?,
            'u' => self.unicode_escape(esc_start)?,
            other => other,
        };

        self.scratch.try_reserve(decoded.len_utf8())?;
        self.scratch.push(decoded);
        Ok(())
    }

    /// Decodes the four hex digits of a `\u` escape, pairing a high
    /// surrogate with an immediately following low surrogate escape.
    fn unicode_escape(&mut self, esc_start: usize) -> Result<char> {
        let unit = self
            .hex_digits(4)
            .ok_or_else(|| self.malformed_at(esc_start, "expected four hex digits after \\u"))?;

        let mut code = unit;
        if (0xD800..=0xDBFF).contains(&unit) && self.input[self.offset..].starts_with("\\u") {
            let resume = self.offset;
            self.offset += 2;
            match self.hex_digits(4) {
                Some(lo) if (0xDC00..=0xDFFF).contains(&lo) => {
                    code = 0x10000 + ((unit - 0xD800) << 10) + (lo - 0xDC00);
                }
                // Not a pair; the lookahead is re-read as its own escape.
                _ => self.offset = resume,
            }
        }

        char::from_u32(code).ok_or_else(|| {
            self.malformed_at(
                esc_start,
                &format!("unpaired surrogate \\u{:04x} in string", code),
            )
        })
    }

    /// Reads exactly `count` hex digits, advancing only on success.
    fn hex_digits(&mut self, count: usize) -> Option<u32> {
        let digits = self
            .input
            .as_bytes()
            .get(self.offset..self.offset + count)?;
        let mut value = 0;
        for &b in digits {
            value = value * 16 + char::from(b).to_digit(16)?;
        }
        self.offset += count;
        Some(value)
    }
}

fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace() || b == 0x0b
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    fn lexemes(input: &str) -> Vec<Lexeme> {
        let mut lexer = Lexer::new(input).unwrap();
        let mut out = vec![lexer.lexeme()];
        while lexer.step() {
            out.push(lexer.lexeme());
        }
        out.push(lexer.lexeme());
        out
    }

    fn single_string(input: &str) -> String {
        let lexer = Lexer::new(input).unwrap();
        lexer.string_value().unwrap().to_string()
    }

    fn first_error(input: &str) -> Error {
        match Lexer::new(input) {
            Ok(_) => panic!("expected an error for {:?}", input),
            Err(err) => err,
        }
    }

    fn number(input: &str) -> f64 {
        match Lexer::new(input).unwrap().lexeme() {
            Lexeme::Number(n) => n,
            other => panic!("expected number, got {:?}", other),
        }
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(
            lexemes("{}[]:,"),
            vec![
                Lexeme::LBrace,
                Lexeme::RBrace,
                Lexeme::LBracket,
                Lexeme::RBracket,
                Lexeme::Colon,
                Lexeme::Comma,
                Lexeme::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let mut lexer = Lexer::new("true false null Infinity NaN $id _x1 nullable").unwrap();
        assert_eq!(lexer.lexeme(), Lexeme::Bool(true));
        lexer.step();
        assert_eq!(lexer.lexeme(), Lexeme::Bool(false));
        lexer.step();
        assert_eq!(lexer.lexeme(), Lexeme::Null);
        lexer.step();
        assert_eq!(lexer.lexeme(), Lexeme::Number(f64::INFINITY));
        lexer.step();
        assert!(matches!(lexer.lexeme(), Lexeme::Number(n) if n.is_nan()));
        lexer.step();
        assert_eq!(lexer.ident(), Some("$id"));
        lexer.step();
        assert_eq!(lexer.ident(), Some("_x1"));
        lexer.step();
        // Reserved words only match whole identifiers
        assert_eq!(lexer.ident(), Some("nullable"));
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        let lexer = Lexer::new("Inf").unwrap();
        assert_eq!(lexer.ident(), Some("Inf"));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(number("42"), 42.0);
        assert_eq!(number("-1.5e3"), -1500.0);
        assert_eq!(number("+7"), 7.0);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("5."), 5.0);
        assert_eq!(number("1E-2"), 0.01);
        assert_eq!(number("0x1F"), 31.0);
        assert_eq!(number("-0xff"), -255.0);
        assert_eq!(number("-Infinity"), f64::NEG_INFINITY);
        assert!(number("-0").is_sign_negative());

        let nan = number("-NaN");
        assert!(nan.is_nan());
        assert!(nan.is_sign_negative());
    }

    #[test]
    fn test_number_widest_prefix() {
        // "1e" is the number 1 followed by the identifier "e"
        let mut lexer = Lexer::new("1e").unwrap();
        assert_eq!(lexer.lexeme(), Lexeme::Number(1.0));
        lexer.step();
        assert_eq!(lexer.ident(), Some("e"));
    }

    #[test]
    fn test_number_without_digits() {
        assert_eq!(first_error("-").code(), ErrorCode::Syntax);
        assert_eq!(first_error(".").code(), ErrorCode::Syntax);
        assert_eq!(first_error("+x").code(), ErrorCode::Syntax);
    }

    #[test]
    fn test_strings_and_quotes() {
        assert_eq!(single_string(r#""hello""#), "hello");
        assert_eq!(single_string("'it\"s'"), "it\"s");
        assert_eq!(single_string(r#""it's""#), "it's");
        assert_eq!(single_string("''"), "");
    }

    #[test]
    fn test_simple_escapes() {
        assert_eq!(
            single_string(r#""\\ \' \" \/ \b \f \n \r \t \v \0""#),
            "\\ ' \" / \u{8} \u{c} \n \r \t \u{b} \0"
        );
        // Unknown escapes pass the character through
        assert_eq!(single_string(r#""\q\é""#), "qé");
    }

    #[test]
    fn test_hex_escapes() {
        assert_eq!(single_string(r#""\x41\x7f""#), "A\u{7f}");
        assert_eq!(single_string(r#""\xe9""#), "é");
        assert_eq!(first_error(r#""\x4""#).code(), ErrorCode::MalformedCharacter);
        assert_eq!(first_error(r#""\xZZ""#).code(), ErrorCode::MalformedCharacter);
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(single_string(r#""\u0041\u00e9\u20ac""#), "Aé€");
        assert_eq!(single_string(r#""\ud83d\ude00""#), "😀");
        assert_eq!(single_string(r#""\uD834\uDD1E""#), "𝄞");
    }

    #[test]
    fn test_malformed_unicode_escapes() {
        assert_eq!(first_error(r#""\u12""#).code(), ErrorCode::MalformedCharacter);
        assert_eq!(first_error(r#""\u12G4""#).code(), ErrorCode::MalformedCharacter);
        // Lone surrogates cannot be represented
        assert_eq!(first_error(r#""\ud83d""#).code(), ErrorCode::MalformedCharacter);
        assert_eq!(first_error(r#""\ude00""#).code(), ErrorCode::MalformedCharacter);
        assert_eq!(
            first_error(r#""\ud83d\u0041""#).code(),
            ErrorCode::MalformedCharacter
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(single_string("'one \\\n    two'"), "one two");
        assert_eq!(single_string("'a\\\r\n\tb'"), "ab");
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lexemes("// line\n /* block */ /**/[ // trailing\n]"),
            vec![Lexeme::LBracket, Lexeme::RBracket, Lexeme::Eof]
        );
        assert_eq!(lexemes("1 // to end of input"), vec![Lexeme::Number(1.0), Lexeme::Eof]);
    }

    #[test]
    fn test_comment_markers_inside_strings() {
        assert_eq!(single_string("'// not a comment'"), "// not a comment");
        assert_eq!(single_string("\"/* nor this */\""), "/* nor this */");
    }

    #[test]
    fn test_unterminated_comment_is_syntax_error() {
        let mut lexer = Lexer::new("[ /* never closed").unwrap();
        assert!(!lexer.step());
        assert_eq!(lexer.lexeme(), Lexeme::Error);
        assert_eq!(lexer.take_error().code(), ErrorCode::Syntax);
    }

    #[test]
    fn test_unterminated_string() {
        let err = first_error("'abc");
        assert_eq!(err.code(), ErrorCode::Syntax);
        assert_eq!(first_error("'abc\\").code(), ErrorCode::Syntax);
    }

    #[test]
    fn test_unexpected_character() {
        let err = first_error("#");
        assert!(err.to_string().contains("unexpected character"));
    }

    #[test]
    fn test_init_failures() {
        assert_eq!(first_error("").code(), ErrorCode::TokenizerInit);
        assert_eq!(first_error("  // nothing\n").code(), ErrorCode::TokenizerInit);
    }

    #[test]
    fn test_scratch_is_overwritten_per_token() {
        let mut lexer = Lexer::new("'first' 'second'").unwrap();
        let first = lexer.string_value().unwrap().to_string();
        lexer.step();
        assert_eq!(first, "first");
        assert_eq!(lexer.string_value(), Some("second"));
    }

    #[test]
    fn test_key_accepts_string_or_ident() {
        let mut lexer = Lexer::new("name 'quoted key' 3").unwrap();
        assert_eq!(lexer.key(), Some("name"));
        lexer.step();
        assert_eq!(lexer.key(), Some("quoted key"));
        lexer.step();
        assert_eq!(lexer.key(), None);
    }

    #[test]
    fn test_error_position() {
        let err = first_error("\n\n   \"\\u00\"");
        match err {
            Error::MalformedCharacter { line, col, .. } => {
                assert_eq!(line, 3);
                assert_eq!(col, 5);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
