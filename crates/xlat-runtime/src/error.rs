use thiserror::Error;

/// Failures raised by the identity shim. Only `getClass` reports null; the
/// other operations take a non-null receiver by precondition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("TypeError: cannot read class of {value}")]
    NullReference { value: &'static str },
}
