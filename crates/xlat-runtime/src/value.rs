//! Runtime values as the target environment sees them.

use crate::registry::ClassDescriptor;
use std::fmt;
use std::sync::Arc;

/// An instance of a translated class.
///
/// `equals` and `hash_code` are only invoked when the registry reports that
/// [`TranslatedObject::class`] overrides them; otherwise the shim falls back
/// to reference identity and the identity hash.
pub trait TranslatedObject: Send + Sync + fmt::Debug {
    fn class(&self) -> ClassDescriptor;

    fn equals(&self, other: &Value) -> bool;

    fn hash_code(&self) -> i32;

    fn stringify(&self) -> String;
}

/// A native array. All element types share one representation; the leaf
/// class and rank are enough to name its class.
#[derive(Debug)]
pub struct ArrayValue {
    pub leaf: ClassDescriptor,
    pub rank: u32,
    pub elements: Vec<Value>,
}

/// A callable that originates from the target environment.
#[derive(Debug)]
pub struct NativeFunction {
    pub name: String,
}

/// Any other native object, identified only by its built-in tag
/// (`Object`, `Map`, `Promise`, ...).
#[derive(Debug)]
pub struct NativeObject {
    pub tag: String,
}

#[derive(Clone, Debug)]
pub enum Value {
    Undefined,
    Null,
    Number(f64),
    Boolean(bool),
    String(Arc<str>),
    Array(Arc<ArrayValue>),
    Function(Arc<NativeFunction>),
    Object(Arc<dyn TranslatedObject>),
    Native(Arc<NativeObject>),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn object(object: impl TranslatedObject + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    pub fn array(leaf: ClassDescriptor, rank: u32, elements: Vec<Value>) -> Self {
        Value::Array(Arc::new(ArrayValue {
            leaf,
            rank,
            elements,
        }))
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Function(Arc::new(NativeFunction { name: name.into() }))
    }

    pub fn native(tag: impl Into<String>) -> Self {
        Value::Native(Arc::new(NativeObject { tag: tag.into() }))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Address of the heap cell behind a reference value; `None` for
    /// primitives and nullish values.
    pub(crate) fn address(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(Arc::as_ptr(a) as *const () as usize),
            Value::Function(f) => Some(Arc::as_ptr(f) as *const () as usize),
            Value::Object(o) => Some(Arc::as_ptr(o) as *const () as usize),
            Value::Native(n) => Some(Arc::as_ptr(n) as *const () as usize),
            _ => None,
        }
    }
}
