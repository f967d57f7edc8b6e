//! Declared value types used for evaluator dispatch

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FactValue;

/// Logical domain type of a fact field (or of a whole fact)
///
/// Evaluators are registered per `(ValueType, Operator)` pair, so this tag is
/// the first half of every dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueType {
    /// The null literal
    Null,
    /// Single UTF-16-compatible character
    Char,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Integer,
    /// 64-bit signed integer
    Long,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    /// Arbitrary-width integer (backed by i128)
    BigInteger,
    /// Arbitrary precision decimal
    BigDecimal,
    /// Any numeric value whose concrete width is not known up front
    Number,
    /// Boolean
    Boolean,
    /// String
    String,
    /// Opaque object (the top type)
    Object,
}

impl ValueType {
    /// All value types, in declaration order
    pub const ALL: [ValueType; 14] = [
        Self::Null,
        Self::Char,
        Self::Byte,
        Self::Short,
        Self::Integer,
        Self::Long,
        Self::Float,
        Self::Double,
        Self::BigInteger,
        Self::BigDecimal,
        Self::Number,
        Self::Boolean,
        Self::String,
        Self::Object,
    ];

    /// Get the simple name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Null => "Null",
            Self::Char => "Char",
            Self::Byte => "Byte",
            Self::Short => "Short",
            Self::Integer => "Integer",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::BigInteger => "BigInteger",
            Self::BigDecimal => "BigDecimal",
            Self::Number => "Number",
            Self::Boolean => "Boolean",
            Self::String => "String",
            Self::Object => "Object",
        }
    }

    /// Check if this type is numeric
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Byte
                | Self::Short
                | Self::Integer
                | Self::Long
                | Self::Float
                | Self::Double
                | Self::BigInteger
                | Self::BigDecimal
                | Self::Number
        )
    }

    /// Check if this type is an integral number
    pub const fn is_integer_number(&self) -> bool {
        matches!(
            self,
            Self::Byte | Self::Short | Self::Integer | Self::Long | Self::BigInteger
        )
    }

    /// Check if this type is a fractional number
    pub const fn is_decimal_number(&self) -> bool {
        matches!(self, Self::Float | Self::Double | Self::BigDecimal)
    }

    /// The value type that best describes a runtime value
    pub fn of(value: &FactValue) -> Self {
        match value {
            FactValue::Null => Self::Null,
            FactValue::Boolean(_) => Self::Boolean,
            FactValue::Char(_) => Self::Char,
            FactValue::Byte(_) => Self::Byte,
            FactValue::Short(_) => Self::Short,
            FactValue::Integer(_) => Self::Integer,
            FactValue::Long(_) => Self::Long,
            FactValue::Float(_) => Self::Float,
            FactValue::Double(_) => Self::Double,
            FactValue::BigInteger(_) => Self::BigInteger,
            FactValue::BigDecimal(_) => Self::BigDecimal,
            FactValue::String(_) => Self::String,
            FactValue::Object(_) => Self::Object,
        }
    }

    /// Check whether a runtime value may be stored in a field of this type
    ///
    /// Null fits every type; `Object` accepts anything; `Number` accepts any
    /// numeric value.
    pub fn accepts(&self, value: &FactValue) -> bool {
        let actual = Self::of(value);
        match self {
            _ if actual == Self::Null => true,
            Self::Object => true,
            Self::Number => actual.is_numeric(),
            other => *other == actual,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
