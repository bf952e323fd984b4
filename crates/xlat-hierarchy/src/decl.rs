//! Declaration schema handed over by the front end.
//!
//! This is the serialized form of the hierarchy (camelCase JSON). Type
//! references are written as type expressions (`C1<String>`, `T`, `int[]`).
//! The chained constructors make hand-written hierarchies in tests readable:
//!
//! ```rust
//! use xlat_hierarchy::{MethodDecl, TypeDecl};
//!
//! let c1 = TypeDecl::class("C1")
//!     .type_params(["T"])
//!     .method(MethodDecl::new("get", ["T"], "String"));
//! let c2 = TypeDecl::class("C2").extends("C1<String>");
//! assert_eq!(c2.superclass.as_deref(), Some("C1<String>"));
//! assert_eq!(c1.methods.len(), 1);
//! ```

use crate::types::TypeKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDecl {
    pub name: String,
    #[serde(default)]
    pub kind: TypeKind,
    /// `T` or `T extends Bound`.
    #[serde(default)]
    pub type_params: Vec<String>,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub native_backed: bool,
    #[serde(default)]
    pub declares_equals: bool,
    #[serde(default)]
    pub declares_hash_code: bool,
    #[serde(default)]
    pub native_protocol: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn class(name: impl Into<String>) -> Self {
        TypeDecl {
            name: name.into(),
            kind: TypeKind::Class,
            ..TypeDecl::default()
        }
    }

    pub fn interface(name: impl Into<String>) -> Self {
        TypeDecl {
            name: name.into(),
            kind: TypeKind::Interface,
            ..TypeDecl::default()
        }
    }

    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn native_backed<I, S>(mut self, protocol: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.native_backed = true;
        self.native_protocol = protocol.into_iter().map(Into::into).collect();
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

fn void_type() -> String {
    "void".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDecl {
    pub name: String,
    /// Method-level type parameters; they are compared by erasure.
    #[serde(default)]
    pub type_params: Vec<String>,
    /// Generic parameter types.
    #[serde(default)]
    pub params: Vec<String>,
    /// Erased parameter types when the front end already computed them.
    #[serde(default)]
    pub erased_params: Option<Vec<String>>,
    #[serde(default = "void_type")]
    pub returns: String,
    #[serde(default)]
    pub erased_return: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub default: bool,
}

impl MethodDecl {
    pub fn new<I, S>(name: impl Into<String>, params: I, returns: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MethodDecl {
            name: name.into(),
            type_params: Vec::new(),
            params: params.into_iter().map(Into::into).collect(),
            erased_params: None,
            returns: returns.into(),
            erased_return: None,
            is_abstract: false,
            default: false,
        }
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn default_body(mut self) -> Self {
        self.default = true;
        self
    }

    pub fn type_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = params.into_iter().map(Into::into).collect();
        self
    }
}
