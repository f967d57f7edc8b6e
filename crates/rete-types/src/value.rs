//! Runtime representation of fact values
//!
//! `FactValue` is what accessors hand to evaluators: either a scalar read out
//! of a fact field, or a whole fact (`FactValue::Object`) when the accessor
//! is a self reference.

use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ValueType;

/// A value held by (or extracted from) a fact in working memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum FactValue {
    /// Missing / null value
    #[default]
    Null,
    Boolean(bool),
    Char(char),
    /// 8-bit signed integer
    Byte(i8),
    /// 16-bit signed integer
    Short(i16),
    /// 32-bit signed integer
    Integer(i32),
    /// 64-bit signed integer
    Long(i64),
    Float(f32),
    Double(f64),
    /// Wide integer
    BigInteger(i128),
    /// Arbitrary precision decimal
    BigDecimal(Decimal),
    String(String),
    /// Structured fact
    Object(FactObject),
}

impl FactValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::String(s.into())
    }

    /// Create an object value
    pub fn object(object: FactObject) -> Self {
        Self::Object(object)
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Get the value type of this value
    pub fn value_type(&self) -> ValueType {
        ValueType::of(self)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&FactObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Convert any numeric value to i64, truncating the way a narrowing
    /// primitive conversion does
    pub fn to_long(&self) -> Option<i64> {
        match self {
            Self::Byte(v) => Some(i64::from(*v)),
            Self::Short(v) => Some(i64::from(*v)),
            Self::Integer(v) => Some(i64::from(*v)),
            Self::Long(v) => Some(*v),
            Self::Float(v) => Some(*v as i64),
            Self::Double(v) => Some(*v as i64),
            Self::BigInteger(v) => Some(*v as i64),
            Self::BigDecimal(d) => d.trunc().to_i128().map(|v| v as i64),
            _ => None,
        }
    }

    /// Convert any numeric value to f64
    pub fn to_double(&self) -> Option<f64> {
        match self {
            Self::Byte(v) => Some(f64::from(*v)),
            Self::Short(v) => Some(f64::from(*v)),
            Self::Integer(v) => Some(f64::from(*v)),
            Self::Long(v) => Some(*v as f64),
            Self::Float(v) => Some(f64::from(*v)),
            Self::Double(v) => Some(*v),
            Self::BigInteger(v) => Some(*v as f64),
            Self::BigDecimal(d) => d.to_f64(),
            _ => None,
        }
    }

    /// Convert any numeric value to a wide integer
    pub fn to_big_integer(&self) -> Option<i128> {
        match self {
            Self::BigInteger(v) => Some(*v),
            Self::Float(v) => Some(*v as i128),
            Self::Double(v) => Some(*v as i128),
            Self::BigDecimal(d) => d.trunc().to_i128(),
            other => other.to_long().map(i128::from),
        }
    }

    /// Convert any numeric value to a decimal
    ///
    /// Returns `None` for non-finite floats and for integers outside the
    /// decimal range.
    pub fn to_big_decimal(&self) -> Option<Decimal> {
        match self {
            Self::BigDecimal(d) => Some(*d),
            Self::Float(v) => Decimal::from_f32(*v),
            Self::Double(v) => Decimal::from_f64(*v),
            Self::BigInteger(v) => Decimal::from_i128(*v),
            other => other.to_long().map(Decimal::from),
        }
    }
}

// Floats compare by normalized bits so equality stays reflexive: NaN equals
// NaN, and +0.0 equals -0.0.
fn float_bits(v: f32) -> u32 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f32::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

fn double_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for FactValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => float_bits(*a) == float_bits(*b),
            (Self::Double(a), Self::Double(b)) => double_bits(*a) == double_bits(*b),
            (Self::BigInteger(a), Self::BigInteger(b)) => a == b,
            (Self::BigDecimal(a), Self::BigDecimal(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for FactValue {}

impl Hash for FactValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Boolean(b) => b.hash(state),
            Self::Char(c) => c.hash(state),
            Self::Byte(v) => v.hash(state),
            Self::Short(v) => v.hash(state),
            Self::Integer(v) => v.hash(state),
            Self::Long(v) => v.hash(state),
            Self::Float(v) => float_bits(*v).hash(state),
            Self::Double(v) => double_bits(*v).hash(state),
            Self::BigInteger(v) => v.hash(state),
            Self::BigDecimal(d) => d.hash(state),
            Self::String(s) => s.hash(state),
            Self::Object(o) => o.hash(state),
        }
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Char(c) => write!(f, "'{c}'"),
            Self::Byte(v) => write!(f, "{v}"),
            Self::Short(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}L"),
            Self::Float(v) => write!(f, "{v}f"),
            Self::Double(v) => write!(f, "{v}"),
            Self::BigInteger(v) => write!(f, "{v}I"),
            Self::BigDecimal(d) => write!(f, "{d}B"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Object(o) => write!(f, "{o}"),
        }
    }
}

impl From<&str> for FactValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FactValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for FactValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i32> for FactValue {
    fn from(v: i32) -> Self {
        Self::Integer(v)
    }
}

impl From<i64> for FactValue {
    fn from(v: i64) -> Self {
        Self::Long(v)
    }
}

impl From<f64> for FactValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<Decimal> for FactValue {
    fn from(d: Decimal) -> Self {
        Self::BigDecimal(d)
    }
}

impl From<FactObject> for FactValue {
    fn from(o: FactObject) -> Self {
        Self::Object(o)
    }
}

impl<T: Into<FactValue>> From<Option<T>> for FactValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// A structured fact: a declared class name plus ordered named fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FactObject {
    /// Declared class of the fact
    pub class: String,
    /// Field values, in declaration order
    pub fields: IndexMap<String, FactValue>,
}

impl FactObject {
    /// Create an object of the given class with no fields
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder style)
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Set a field value, returning the previous one
    pub fn set_field(&mut self, name: impl Into<String>, value: impl Into<FactValue>) -> Option<FactValue> {
        self.fields.insert(name.into(), value.into())
    }

    /// Get a field value
    pub fn field(&self, name: &str) -> Option<&FactValue> {
        self.fields.get(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Hash for FactObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class.hash(state);
        for (name, value) in &self.fields {
            name.hash(state);
            value.hash(state);
        }
    }
}

impl fmt::Display for FactObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.class)?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, " {name}: {value}")?;
        }
        write!(f, " }}")
    }
}
