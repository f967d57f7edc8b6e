//! Field accessors
//!
//! An accessor knows how to read one value out of a fact of a known declared
//! class. Evaluators only ever see facts through accessors, so the typed
//! getters here are the whole extraction contract the engine relies on.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rete_types::{FactValue, ValueType};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::context::ReteContext;
use crate::error::{EvalError, EvalResult};

static NULL: FactValue = FactValue::Null;

/// Identity of an accessor, used to share compiled condition nodes
///
/// Two accessors reading the same logical field with the same declared type
/// have equal keys. A key is also the persisted form of an accessor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessorKey {
    /// A named field of a declared class
    Field {
        class: String,
        field: String,
        value_type: ValueType,
    },
    /// The fact itself
    SelfReference { class: String, value_type: ValueType },
    /// A session global
    Global { name: String, value_type: ValueType },
}

impl AccessorKey {
    /// Rebuild the accessor this key identifies
    pub fn accessor(&self) -> Arc<dyn FieldAccessor> {
        match self {
            Self::Field {
                class,
                field,
                value_type,
            } => Arc::new(ClassFieldAccessor::new(class.as_str(), field.as_str(), *value_type)),
            Self::SelfReference { class, value_type } => Arc::new(SelfAccessor::new(class.as_str(), *value_type)),
            Self::Global { name, value_type } => Arc::new(GlobalAccessor::new(name.as_str(), *value_type)),
        }
    }
}

/// Reads typed values out of facts
pub trait FieldAccessor: Send + Sync + fmt::Debug {
    /// Identity used for equality and hashing
    fn key(&self) -> AccessorKey;

    /// Declared type of the extracted value
    fn value_type(&self) -> ValueType;

    /// Name of the class the extracted value belongs to
    fn extract_to_class(&self) -> &str;

    /// Read the value; missing fields read as null
    fn get_value<'a>(&self, ctx: &'a ReteContext, object: &'a FactValue) -> &'a FactValue;

    /// The value comes from session-global state rather than the fact
    fn is_global(&self) -> bool {
        false
    }

    /// The accessor returns the fact itself
    fn is_self_reference(&self) -> bool {
        false
    }

    fn is_null_value(&self, ctx: &ReteContext, object: &FactValue) -> bool {
        self.get_value(ctx, object).is_null()
    }

    /// Hash of the extracted value, consistent with value equality
    ///
    /// Null hashes to zero.
    fn get_hash_code(&self, ctx: &ReteContext, object: &FactValue) -> u64 {
        let value = self.get_value(ctx, object);
        if value.is_null() {
            return 0;
        }
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn get_boolean_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<bool> {
        let value = self.get_value(ctx, object);
        value
            .as_boolean()
            .ok_or_else(|| mismatch(ValueType::Boolean, value))
    }

    fn get_char_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<char> {
        let value = self.get_value(ctx, object);
        value.as_char().ok_or_else(|| mismatch(ValueType::Char, value))
    }

    fn get_byte_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<i8> {
        integral(self.get_value(ctx, object), ValueType::Byte).map(|v| v as i8)
    }

    fn get_short_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<i16> {
        integral(self.get_value(ctx, object), ValueType::Short).map(|v| v as i16)
    }

    fn get_int_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<i32> {
        integral(self.get_value(ctx, object), ValueType::Integer).map(|v| v as i32)
    }

    fn get_long_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<i64> {
        integral(self.get_value(ctx, object), ValueType::Long)
    }

    fn get_float_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<f32> {
        fractional(self.get_value(ctx, object), ValueType::Float).map(|v| v as f32)
    }

    fn get_double_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<f64> {
        fractional(self.get_value(ctx, object), ValueType::Double)
    }

    fn get_big_integer_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<i128> {
        let value = self.get_value(ctx, object);
        match value {
            FactValue::Char(c) => Ok(i128::from(u32::from(*c))),
            other => other
                .to_big_integer()
                .ok_or_else(|| mismatch(ValueType::BigInteger, other)),
        }
    }

    fn get_big_decimal_value(&self, ctx: &ReteContext, object: &FactValue) -> EvalResult<Decimal> {
        let value = self.get_value(ctx, object);
        match value {
            FactValue::Char(c) => Ok(Decimal::from(u32::from(*c))),
            other => other
                .to_big_decimal()
                .ok_or_else(|| mismatch(ValueType::BigDecimal, other)),
        }
    }
}

impl PartialEq for dyn FieldAccessor {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for dyn FieldAccessor {}

impl Hash for dyn FieldAccessor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

fn mismatch(expected: ValueType, found: &FactValue) -> EvalError {
    EvalError::type_mismatch(expected.name(), found.value_type().name())
}

// Chars widen to their code point, like a primitive char read as a number
fn integral(value: &FactValue, expected: ValueType) -> EvalResult<i64> {
    match value {
        FactValue::Char(c) => Ok(i64::from(u32::from(*c))),
        other => other.to_long().ok_or_else(|| mismatch(expected, other)),
    }
}

fn fractional(value: &FactValue, expected: ValueType) -> EvalResult<f64> {
    match value {
        FactValue::Char(c) => Ok(f64::from(u32::from(*c))),
        other => other.to_double().ok_or_else(|| mismatch(expected, other)),
    }
}

/// Reads a named field of a structured fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassFieldAccessor {
    class: String,
    field: String,
    value_type: ValueType,
}

impl ClassFieldAccessor {
    pub fn new(class: impl Into<String>, field: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            class: class.into(),
            field: field.into(),
            value_type,
        }
    }

    pub fn field_name(&self) -> &str {
        &self.field
    }
}

impl FieldAccessor for ClassFieldAccessor {
    fn key(&self) -> AccessorKey {
        AccessorKey::Field {
            class: self.class.clone(),
            field: self.field.clone(),
            value_type: self.value_type,
        }
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn extract_to_class(&self) -> &str {
        &self.class
    }

    fn get_value<'a>(&self, _ctx: &'a ReteContext, object: &'a FactValue) -> &'a FactValue {
        object
            .as_object()
            .and_then(|o| o.field(&self.field))
            .unwrap_or(&NULL)
    }
}

/// Returns the fact itself
///
/// Used when a whole fact, typically a boxed number or string inserted
/// directly into working memory, is the comparison operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelfAccessor {
    class: String,
    value_type: ValueType,
}

impl SelfAccessor {
    pub fn new(class: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            class: class.into(),
            value_type,
        }
    }

    /// Self reference over a fact that is itself a number
    pub fn number(class: impl Into<String>) -> Self {
        Self::new(class, ValueType::Number)
    }
}

impl FieldAccessor for SelfAccessor {
    fn key(&self) -> AccessorKey {
        AccessorKey::SelfReference {
            class: self.class.clone(),
            value_type: self.value_type,
        }
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn extract_to_class(&self) -> &str {
        &self.class
    }

    fn get_value<'a>(&self, _ctx: &'a ReteContext, object: &'a FactValue) -> &'a FactValue {
        object
    }

    fn is_self_reference(&self) -> bool {
        true
    }
}

/// Reads a session global; the fact argument is ignored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalAccessor {
    name: String,
    value_type: ValueType,
}

impl GlobalAccessor {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }
}

impl FieldAccessor for GlobalAccessor {
    fn key(&self) -> AccessorKey {
        AccessorKey::Global {
            name: self.name.clone(),
            value_type: self.value_type,
        }
    }

    fn value_type(&self) -> ValueType {
        self.value_type
    }

    fn extract_to_class(&self) -> &str {
        self.value_type.name()
    }

    fn get_value<'a>(&self, ctx: &'a ReteContext, _object: &'a FactValue) -> &'a FactValue {
        ctx.get_global(&self.name).unwrap_or(&NULL)
    }

    fn is_global(&self) -> bool {
        true
    }
}
