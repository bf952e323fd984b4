//! Representation tags.

use crate::value::Value;

/// How a value is represented in the target environment. Derived by
/// inspecting the value, never stored.
///
/// Variant order is the classification precedence and the dispatch table
/// index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Representation {
    Number,
    Boolean,
    String,
    Translated,
    Array,
    Function,
    OpaqueNative,
    Nullish,
}

impl Representation {
    pub const COUNT: usize = 8;

    pub fn of(value: &Value) -> Self {
        match value {
            Value::Number(_) => Representation::Number,
            Value::Boolean(_) => Representation::Boolean,
            Value::String(_) => Representation::String,
            Value::Object(_) => Representation::Translated,
            Value::Array(_) => Representation::Array,
            Value::Function(_) => Representation::Function,
            Value::Native(_) => Representation::OpaqueNative,
            Value::Null | Value::Undefined => Representation::Nullish,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether values with this tag are compared and hashed by reference.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            Representation::Translated
                | Representation::Array
                | Representation::Function
                | Representation::OpaqueNative
        )
    }
}
