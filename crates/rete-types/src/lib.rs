//! Value model for the rule engine
//!
//! This crate defines:
//! - `ValueType`, the declared type tag used to dispatch evaluators
//! - `FactValue`, the runtime representation of field values and facts
//! - `FactObject`, a structured fact with a declared class and ordered fields

pub mod value;
pub mod value_type;

pub use value::*;
pub use value_type::*;
