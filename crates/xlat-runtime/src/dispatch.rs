//! The identity protocol entry points.
//!
//! Each value is classified once into a [`Representation`]; the tag indexes a
//! static table holding that representation's `equals`, `hashCode`,
//! `toString` and `getClass`.

use crate::context::RuntimeContext;
use crate::error::RuntimeError;
use crate::natives;
use crate::registry::{ClassDescriptor, IdentityOverrides, WellKnownClass};
use crate::representation::Representation;
use crate::value::Value;
use tracing::trace;

type EqualsFn = fn(&RuntimeContext, &Value, &Value) -> bool;
type HashCodeFn = fn(&RuntimeContext, &Value) -> i32;
type ToStringFn = fn(&RuntimeContext, &Value) -> String;
type GetClassFn = fn(&RuntimeContext, &Value) -> Result<ClassDescriptor, RuntimeError>;

struct IdentityOps {
    equals: EqualsFn,
    hash_code: HashCodeFn,
    to_string: ToStringFn,
    get_class: GetClassFn,
}

static DISPATCH: [IdentityOps; Representation::COUNT] = [
    // Number
    IdentityOps {
        equals: |_, a, b| match (a, b) {
            (Value::Number(a), Value::Number(b)) => natives::same_value(*a, *b),
            _ => false,
        },
        hash_code: |_, a| match a {
            Value::Number(n) => natives::number_hash(*n),
            _ => 0,
        },
        to_string: |_, a| match a {
            Value::Number(n) => natives::number_to_string(*n),
            _ => String::new(),
        },
        get_class: |cx, _| Ok(cx.registry().well_known(WellKnownClass::BoxedNumber)),
    },
    // Boolean
    IdentityOps {
        equals: |_, a, b| matches!((a, b), (Value::Boolean(a), Value::Boolean(b)) if a == b),
        hash_code: |_, a| match a {
            Value::Boolean(b) => natives::boolean_hash(*b),
            _ => 0,
        },
        to_string: |_, a| match a {
            Value::Boolean(b) => b.to_string(),
            _ => String::new(),
        },
        get_class: |cx, _| Ok(cx.registry().well_known(WellKnownClass::BoxedBoolean)),
    },
    // String
    IdentityOps {
        equals: |_, a, b| matches!((a, b), (Value::String(a), Value::String(b)) if a == b),
        hash_code: |_, a| match a {
            Value::String(s) => natives::string_hash(s),
            _ => 0,
        },
        to_string: |_, a| match a {
            Value::String(s) => s.to_string(),
            _ => String::new(),
        },
        get_class: |cx, _| Ok(cx.registry().well_known(WellKnownClass::NativeString)),
    },
    // Translated
    IdentityOps {
        equals: |cx, a, b| match a {
            Value::Object(object)
                if overrides(cx, object.class()).contains(IdentityOverrides::EQUALS) =>
            {
                object.equals(b)
            }
            _ => same_reference(a, b),
        },
        hash_code: |cx, a| match a {
            Value::Object(object)
                if overrides(cx, object.class()).contains(IdentityOverrides::HASH_CODE) =>
            {
                object.hash_code()
            }
            _ => identity_hash(cx, a),
        },
        to_string: |_, a| match a {
            Value::Object(object) => object.stringify(),
            _ => String::new(),
        },
        get_class: |_, a| match a {
            Value::Object(object) => Ok(object.class()),
            _ => Err(RuntimeError::NullReference { value: "null" }),
        },
    },
    // Array
    IdentityOps {
        equals: |_, a, b| same_reference(a, b),
        hash_code: identity_hash,
        to_string: |cx, a| match a {
            Value::Array(array) => array
                .elements
                .iter()
                .map(|element| {
                    if element.is_nullish() {
                        String::new()
                    } else {
                        identity_to_string(cx, element)
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        },
        get_class: |cx, a| match a {
            Value::Array(array) => Ok(cx.registry().array_class(array.leaf, array.rank)),
            _ => Err(RuntimeError::NullReference { value: "null" }),
        },
    },
    // Function
    IdentityOps {
        equals: |_, a, b| same_reference(a, b),
        hash_code: identity_hash,
        to_string: |_, a| match a {
            Value::Function(function) => {
                format!("function {}() {{ [native code] }}", function.name)
            }
            _ => String::new(),
        },
        get_class: |cx, _| Ok(cx.registry().well_known(WellKnownClass::NativeFunction)),
    },
    // OpaqueNative
    IdentityOps {
        equals: |_, a, b| same_reference(a, b),
        hash_code: identity_hash,
        to_string: |_, a| match a {
            Value::Native(native) => format!("[object {}]", native.tag),
            _ => String::new(),
        },
        get_class: |cx, _| Ok(cx.registry().well_known(WellKnownClass::OpaqueNativeObject)),
    },
    // Nullish
    IdentityOps {
        equals: |_, a, b| {
            matches!(
                (a, b),
                (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined)
            )
        },
        hash_code: |_, _| 0,
        to_string: |_, a| match a {
            Value::Undefined => "undefined".to_string(),
            _ => "null".to_string(),
        },
        get_class: |_, a| {
            let value = if matches!(a, Value::Undefined) {
                "undefined"
            } else {
                "null"
            };
            trace!(value, "getClass on nullish value");
            Err(RuntimeError::NullReference { value })
        },
    },
];

#[inline]
fn ops(value: &Value) -> &'static IdentityOps {
    &DISPATCH[Representation::of(value).index()]
}

fn overrides(cx: &RuntimeContext, class: ClassDescriptor) -> IdentityOverrides {
    cx.registry().identity_overrides(class)
}

fn same_reference(a: &Value, b: &Value) -> bool {
    match (a.address(), b.address()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn identity_hash(cx: &RuntimeContext, a: &Value) -> i32 {
    cx.identity_hashes().hash_of(a).unwrap_or(0)
}

/// `a.equals(b)` for a receiver of unknown representation. `a` must not be
/// nullish.
pub fn identity_equals(cx: &RuntimeContext, a: &Value, b: &Value) -> bool {
    debug_assert!(!a.is_nullish(), "identity equals on a nullish receiver");
    (ops(a).equals)(cx, a, b)
}

/// `a.hashCode()` for a receiver of unknown representation. `a` must not be
/// nullish.
pub fn identity_hash_code(cx: &RuntimeContext, a: &Value) -> i32 {
    debug_assert!(!a.is_nullish(), "identity hashCode on a nullish receiver");
    (ops(a).hash_code)(cx, a)
}

pub fn identity_to_string(cx: &RuntimeContext, a: &Value) -> String {
    (ops(a).to_string)(cx, a)
}

/// `a.getClass()`. Nullish receivers fail with
/// [`RuntimeError::NullReference`].
pub fn identity_get_class(cx: &RuntimeContext, a: &Value) -> Result<ClassDescriptor, RuntimeError> {
    (ops(a).get_class)(cx, a)
}

#[cfg(test)]
#[path = "tests/dispatch_tests.rs"]
mod tests;
