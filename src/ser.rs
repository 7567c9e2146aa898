//! Writing [`Value`] trees back out as JSON5 text.
//!
//! The [`Printer`] walks a tree without mutating it and produces canonical
//! text:
//!
//! - **Scalars**: `null`, `true`/`false`, and numbers with up to 15
//!   significant digits. `Infinity` and `NaN` are spelled out, and the sign
//!   comes from the sign bit, so `-0`, `-Infinity` and `-NaN` keep their `-`
//! - **Strings**: always double-quoted, with C-style escapes for common
//!   control characters and `\u00XX` for any other control byte
//! - **Containers**: one element per line, indented by nesting depth
//!
//! With [`PrintOptions::escape_unicode`] set, every non-ASCII character is
//! written as a `\uXXXX` escape, using a UTF-16 surrogate pair above U+FFFF.
//!
//! ```rust
//! use json5_tree::{parse_str, to_string, to_string_escaped};
//!
//! let value = parse_str("{clef: '𝄞', n: -0}").unwrap();
//! assert_eq!(to_string(&value), "{\n\t\"clef\": \"𝄞\",\n\t\"n\": -0\n}");
//! assert_eq!(
//!     to_string_escaped(&value),
//!     "{\n\t\"clef\": \"\\ud834\\udd1e\",\n\t\"n\": -0\n}"
//! );
//! ```
//!
//! This module also converts any `serde::Serialize` type into a tree with
//! [`to_value`].

use crate::value::push_doubling;
use crate::{Error, Map, PrintOptions, Result, Value};
use serde::{ser, Serialize};
use std::fmt::Write as _;

/// Significant digits used when printing numbers.
pub const NUMBER_PRECISION: usize = 15;

/// Tree-to-text printer.
///
/// Output is produced recursively. Nesting depth is bounded only for trees
/// that came from the parser ([`ParseOptions::max_depth`](crate::ParseOptions));
/// trees assembled with `append` or `set` are printed, and dropped, without a
/// depth limit.
pub struct Printer<'o> {
    output: String,
    options: &'o PrintOptions,
}

impl<'o> Printer<'o> {
    pub fn new(options: &'o PrintOptions) -> Self {
        Printer {
            output: String::with_capacity(256),
            options,
        }
    }

    /// Appends the text of `value` to the output.
    pub fn print(&mut self, value: &Value) {
        self.write_value(value, 0);
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    fn write_value(&mut self, value: &Value, depth: usize) {
        match value {
            Value::Null | Value::Error(_) => self.output.push_str("null"),
            Value::Bool(true) => self.output.push_str("true"),
            Value::Bool(false) => self.output.push_str("false"),
            Value::Number(n) => write_number(&mut self.output, *n),
            Value::String(s) => self.write_string(s),
            Value::Array(elems) => {
                if elems.is_empty() {
                    self.output.push_str("[]");
                    return;
                }
                self.output.push('[');
                for (i, elem) in elems.iter().enumerate() {
                    self.open_line(i, depth + 1);
                    self.write_value(elem, depth + 1);
                }
                self.close_line(depth);
                self.output.push(']');
            }
            Value::Object(map) => {
                if map.is_empty() {
                    self.output.push_str("{}");
                    return;
                }
                self.output.push('{');
                for (i, (key, field)) in map.iter().enumerate() {
                    self.open_line(i, depth + 1);
                    self.write_string(key);
                    self.output.push_str(": ");
                    self.write_value(field, depth + 1);
                }
                self.close_line(depth);
                self.output.push('}');
            }
        }
    }

    fn open_line(&mut self, index: usize, depth: usize) {
        if index > 0 {
            self.output.push(',');
        }
        self.close_line(depth);
    }

    fn close_line(&mut self, depth: usize) {
        self.output.push('\n');
        for _ in 0..depth {
            self.output.push_str(&self.options.indent);
        }
    }

    fn write_string(&mut self, s: &str) {
        self.output.push('"');
        for ch in s.chars() {
            match ch {
                '\n' => self.output.push_str("\\n"),
                '\\' => self.output.push_str("\\\\"),
                '\'' => self.output.push_str("\\'"),
                '"' => self.output.push_str("\\\""),
                '/' => self.output.push_str("\\/"),
                '\u{0008}' => self.output.push_str("\\b"),
                '\u{000C}' => self.output.push_str("\\f"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\u{000B}' => self.output.push_str("\\v"),
                c if c.is_ascii_control() => self.write_unit(c as u16),
                c if !c.is_ascii() && self.options.escape_unicode => {
                    let mut units = [0u16; 2];
                    for &unit in c.encode_utf16(&mut units).iter() {
                        self.write_unit(unit);
                    }
                }
                c => self.output.push(c),
            }
        }
        self.output.push('"');
    }

    fn write_unit(&mut self, unit: u16) {
        // Writing into a String cannot fail.
        let _ = write!(self.output, "\\u{:04x}", unit);
    }
}

/// Formats a number the way the printer does.
///
/// # Examples
///
/// ```rust
/// use json5_tree::ser::format_number;
///
/// assert_eq!(format_number(0.1 + 0.2), "0.3");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(-f64::INFINITY), "-Infinity");
/// ```
#[must_use]
pub fn format_number(n: f64) -> String {
    let mut out = String::new();
    write_number(&mut out, n);
    out
}

fn write_number(out: &mut String, n: f64) {
    let sign = if n.is_sign_negative() { "-" } else { "" };
    if n.is_nan() {
        out.push_str(sign);
        out.push_str("NaN");
        return;
    }
    if n.is_infinite() {
        out.push_str(sign);
        out.push_str("Infinity");
        return;
    }
    if n == 0.0 {
        out.push_str(sign);
        out.push('0');
        return;
    }

    // Round to the printed precision first; the exponent of the rounded
    // value picks between fixed and scientific notation.
    let sci = format!("{:.*e}", NUMBER_PRECISION - 1, n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= NUMBER_PRECISION as i32 {
        out.push_str(trim_fraction(mantissa));
        let _ = write!(out, "e{}{:02}", if exp < 0 { '-' } else { '+' }, exp.abs());
    } else {
        let precision = (NUMBER_PRECISION as i32 - 1 - exp) as usize;
        let fixed = format!("{:.*}", precision, n);
        out.push_str(trim_fraction(&fixed));
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Converts any `Serialize` type into a [`Value`] tree.
///
/// Integers become numbers (and so are subject to `f64` precision), unit
/// and `None` become `null`, and enum variants with data are wrapped in a
/// single-field object named after the variant.
///
/// # Examples
///
/// ```rust
/// use json5_tree::{to_value, Value};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { id: u32, name: String }
///
/// let value = to_value(&User { id: 7, name: "Ada".into() }).unwrap();
/// assert_eq!(value.at("['id']").unwrap(), &Value::from(7));
/// ```
///
/// # Errors
///
/// Fails when a map key does not serialize to a string, or when storage
/// cannot be reserved.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

struct ValueSerializer;

struct SerializeVec {
    vec: Vec<Value>,
    variant: Option<&'static str>,
}

struct SerializeMap {
    map: Map,
    current_key: Option<String>,
    variant: Option<&'static str>,
}

fn wrap_variant(variant: Option<&'static str>, value: Value) -> Result<Value> {
    match variant {
        Some(name) => {
            let mut outer = Map::new();
            outer.insert(name.to_string(), value)?;
            Ok(Value::Object(outer))
        }
        None => Ok(value),
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::Number(v as f64))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        let mut vec = Vec::new();
        for &b in v {
            push_doubling(&mut vec, Value::Number(f64::from(b)))?;
        }
        Ok(Value::Array(vec))
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        wrap_variant(Some(variant), to_value(value)?)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new(None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Ok(SerializeVec::new(Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new(None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Ok(SerializeMap::new(Some(variant)))
    }
}

impl SerializeVec {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeVec {
            vec: Vec::new(),
            variant,
        }
    }

    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        push_doubling(&mut self.vec, to_value(value)?)
    }

    fn finish(self) -> Result<Value> {
        wrap_variant(self.variant, Value::Array(self.vec))
    }
}

impl SerializeMap {
    fn new(variant: Option<&'static str>) -> Self {
        SerializeMap {
            map: Map::new(),
            current_key: None,
            variant,
        }
    }

    fn field<T: ?Sized + Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        self.map.insert(key.to_string(), to_value(value)?)?;
        Ok(())
    }

    fn finish(self) -> Result<Value> {
        wrap_variant(self.variant, Value::Object(self.map))
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_value(key)? {
            Value::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => Err(Error::bad_parameter(format!(
                "object keys must be strings, found {}",
                other.kind()
            ))),
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?)?;
        Ok(())
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.field(key, value)
    }

    fn end(self) -> Result<Value> {
        self.finish()
    }
}
