//! Reading JSON5 text into a [`Value`] tree.
//!
//! The [`Parser`] is a recursive-descent consumer of the [`Lexer`]'s token
//! stream: one stack frame per open array or object, dispatching purely on
//! the current [`Lexeme`]. Every scalar production consumes exactly one
//! token. Errors are fail-fast: the first problem found is returned and no
//! recovery is attempted.
//!
//! ```rust
//! use json5_tree::de::Parser;
//!
//! let mut parser = Parser::new("[1, 'two', {three: 3}]").unwrap();
//! let value = parser.parse_value().unwrap();
//! assert_eq!(value.as_array().map(Vec::len), Some(3));
//! ```
//!
//! This module also bridges trees into typed Rust data through serde:
//!
//! ```rust
//! use json5_tree::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let point: Point = from_str("{x: 1, y: 2, /* z: 3 */}").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::lexer::{Lexeme, Lexer};
use crate::value::push_doubling;
use crate::{Error, Map, ParseOptions, Result, Value};
use serde::de::IntoDeserializer;
use serde::{de, forward_to_deserialize_any};

/// Recursive-descent parser building a [`Value`] tree.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser with default [`ParseOptions`].
    ///
    /// # Errors
    ///
    /// Fails if the tokenizer cannot be positioned on a first token.
    pub fn new(input: &'a str) -> Result<Self> {
        Self::with_options(input, &ParseOptions::default())
    }

    /// Creates a parser with the given options.
    pub fn with_options(input: &'a str, options: &ParseOptions) -> Result<Self> {
        let lexer = Lexer::with_capacity(input, options.scratch_capacity)?;
        Ok(Self::from_lexer(lexer, options.max_depth))
    }

    /// Wraps an existing lexer positioned on the first token of a value.
    pub fn from_lexer(lexer: Lexer<'a>, max_depth: usize) -> Self {
        Parser {
            lexer,
            depth: 0,
            max_depth,
        }
    }

    /// Parses one value starting at the current token.
    ///
    /// On success the lexer is left on the token following the value.
    pub fn parse_value(&mut self) -> Result<Value> {
        match self.lexer.lexeme() {
            Lexeme::Null => {
                self.advance()?;
                Ok(Value::Null)
            }
            Lexeme::Bool(b) => {
                self.advance()?;
                Ok(Value::Bool(b))
            }
            Lexeme::Number(n) => {
                self.advance()?;
                Ok(Value::Number(n))
            }
            Lexeme::Str => self.parse_string(),
            Lexeme::LBracket => self.parse_array(),
            Lexeme::LBrace => self.parse_object(),
            _ => Err(self.lexer.take_error()),
        }
    }

    /// Parses a whole document: one root value and, unless
    /// `allow_trailing_content` is set, nothing after it.
    pub fn parse_document(mut self, allow_trailing_content: bool) -> Result<Value> {
        let value = self.parse_value()?;
        if !allow_trailing_content && self.lexer.lexeme() != Lexeme::Eof {
            let msg = format!(
                "unexpected {} after the root value",
                self.lexer.lexeme().describe()
            );
            return Err(self.lexer.syntax_here(&msg));
        }
        Ok(value)
    }

    /// Steps the lexer; end of input is fine here, a tokenizer error is not.
    fn advance(&mut self) -> Result<()> {
        if self.lexer.step() || self.lexer.lexeme() == Lexeme::Eof {
            Ok(())
        } else {
            Err(self.lexer.take_error())
        }
    }

    fn expected(&self, what: &str) -> Error {
        let msg = format!("expected {}, found {}", what, self.lexer.lexeme().describe());
        self.lexer.syntax_here(&msg)
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            let (line, col) = self.lexer.position();
            return Err(Error::DepthLimitExceeded {
                line,
                col,
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn parse_string(&mut self) -> Result<Value> {
        // The scratch text dies with the next step, so copy it out first.
        let text = copy_str(self.lexer.string_value().unwrap_or_default())?;
        self.advance()?;
        Ok(Value::String(text))
    }

    fn parse_array(&mut self) -> Result<Value> {
        self.enter()?;
        let mut elems = Vec::new();

        loop {
            self.advance()?;
            if self.lexer.lexeme() == Lexeme::RBracket {
                break;
            }
            let elem = self.parse_value()?;
            push_doubling(&mut elems, elem)?;
            if self.lexer.lexeme() != Lexeme::Comma {
                break;
            }
        }

        if self.lexer.lexeme() != Lexeme::RBracket {
            return Err(self.expected("',' or ']'"));
        }
        self.advance()?;
        self.depth -= 1;
        Ok(Value::Array(elems))
    }

    fn parse_object(&mut self) -> Result<Value> {
        self.enter()?;
        let mut map = Map::new();

        loop {
            self.advance()?;
            if self.lexer.lexeme() == Lexeme::RBrace {
                break;
            }

            let key = match self.lexer.key() {
                Some(key) => copy_str(key)?,
                None => return Err(self.expected("a string or identifier key")),
            };

            self.advance()?;
            if self.lexer.lexeme() != Lexeme::Colon {
                return Err(self.expected("':'"));
            }
            self.advance()?;

            let value = self.parse_value()?;
            map.insert(key, value)?;
            if self.lexer.lexeme() != Lexeme::Comma {
                break;
            }
        }

        if self.lexer.lexeme() != Lexeme::RBrace {
            return Err(self.expected("',' or '}'"));
        }
        self.advance()?;
        self.depth -= 1;
        Ok(Value::Object(map))
    }
}

fn copy_str(s: &str) -> Result<String> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}

/// Interprets a [`Value`] tree as an instance of type `T`.
///
/// Whole numbers are offered to serde as integers, so integer fields accept
/// them; other numbers are offered as `f64`.
///
/// # Errors
///
/// Returns [`Error::Custom`] when the tree does not match the shape of `T`.
pub fn from_value<T>(value: Value) -> Result<T>
where
    T: de::DeserializeOwned,
{
    T::deserialize(ValueDeserializer::new(value))
}

struct SeqDeserializer {
    iter: std::vec::IntoIter<Value>,
}

impl SeqDeserializer {
    fn new(vec: Vec<Value>) -> Self {
        SeqDeserializer {
            iter: vec.into_iter(),
        }
    }
}

impl<'de> de::SeqAccess<'de> for SeqDeserializer {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct MapDeserializer {
    iter: indexmap::map::IntoIter<String, Value>,
    value: Option<Value>,
}

impl MapDeserializer {
    fn new(map: Map) -> Self {
        MapDeserializer {
            iter: map.into_iter(),
            value: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapDeserializer {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        match self.value.take() {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("next_value_seed called before next_key_seed")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        match self.iter.size_hint() {
            (lower, Some(upper)) if lower == upper => Some(upper),
            _ => None,
        }
    }
}

struct EnumDeserializer {
    variant: String,
    value: Option<Value>,
}

impl<'de> de::EnumAccess<'de> for EnumDeserializer {
    type Error = Error;
    type Variant = VariantDeserializer;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let variant =
            seed.deserialize(IntoDeserializer::<Error>::into_deserializer(self.variant))?;
        Ok((variant, VariantDeserializer { value: self.value }))
    }
}

struct VariantDeserializer {
    value: Option<Value>,
}

impl<'de> de::VariantAccess<'de> for VariantDeserializer {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.value {
            Some(Value::Null) | None => Ok(()),
            _ => Err(Error::custom("expected unit variant")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.value {
            Some(value) => seed.deserialize(ValueDeserializer::new(value)),
            None => Err(Error::custom("expected newtype variant")),
        }
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Array(arr)) => visitor.visit_seq(SeqDeserializer::new(arr)),
            _ => Err(Error::custom("expected tuple variant")),
        }
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Some(Value::Object(obj)) => visitor.visit_map(MapDeserializer::new(obj)),
            _ => Err(Error::custom("expected struct variant")),
        }
    }
}

struct ValueDeserializer {
    value: Value,
}

impl ValueDeserializer {
    fn new(value: Value) -> Self {
        ValueDeserializer { value }
    }
}

impl<'de> de::Deserializer<'de> for ValueDeserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => {
                if n.fract() == 0.0 && n >= 0.0 && n < u64::MAX as f64 {
                    visitor.visit_u64(n as u64)
                } else if n.fract() == 0.0 && n >= i64::MIN as f64 && n < 0.0 {
                    visitor.visit_i64(n as i64)
                } else {
                    visitor.visit_f64(n)
                }
            }
            Value::String(s) => visitor.visit_string(s),
            Value::Array(arr) => visitor.visit_seq(SeqDeserializer::new(arr)),
            Value::Object(obj) => visitor.visit_map(MapDeserializer::new(obj)),
            Value::Error(code) => Err(Error::custom(format!(
                "cannot deserialize an in-tree error ({})",
                code
            ))),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match self.value {
            Value::String(variant) => visitor.visit_enum(EnumDeserializer {
                variant,
                value: None,
            }),
            Value::Object(obj) if obj.len() == 1 => match obj.into_iter().next() {
                Some((variant, value)) => visitor.visit_enum(EnumDeserializer {
                    variant,
                    value: Some(value),
                }),
                None => Err(Error::custom("expected enum variant")),
            },
            other => Err(Error::custom(format!(
                "expected enum, found {}",
                other.kind()
            ))),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}
