//! Class descriptors and the registry that hands them out.

use bitflags::bitflags;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::trace;

/// Opaque handle naming a class at run time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassDescriptor(pub u32);

/// Classes the shim hands out for values that carry no class of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownClass {
    BoxedNumber,
    BoxedBoolean,
    NativeString,
    NativeFunction,
    OpaqueNativeObject,
}

impl WellKnownClass {
    pub const ALL: [WellKnownClass; 5] = [
        WellKnownClass::BoxedNumber,
        WellKnownClass::BoxedBoolean,
        WellKnownClass::NativeString,
        WellKnownClass::NativeFunction,
        WellKnownClass::OpaqueNativeObject,
    ];

    pub fn default_name(self) -> &'static str {
        match self {
            WellKnownClass::BoxedNumber => "java.lang.Double",
            WellKnownClass::BoxedBoolean => "java.lang.Boolean",
            WellKnownClass::NativeString => "java.lang.String",
            WellKnownClass::NativeFunction => "JavaScriptFunction",
            WellKnownClass::OpaqueNativeObject => "JavaScriptObject",
        }
    }

    /// Boxed values and strings override both identity methods.
    fn overrides(self) -> IdentityOverrides {
        match self {
            WellKnownClass::BoxedNumber
            | WellKnownClass::BoxedBoolean
            | WellKnownClass::NativeString => IdentityOverrides::all(),
            WellKnownClass::NativeFunction | WellKnownClass::OpaqueNativeObject => {
                IdentityOverrides::empty()
            }
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

bitflags! {
    /// Identity methods a class overrides, declared or inherited.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct IdentityOverrides: u8 {
        const EQUALS = 1 << 0;
        const HASH_CODE = 1 << 1;
    }
}

/// The type-registry collaborator the shim asks for descriptors.
pub trait ClassRegistry: Send + Sync {
    fn well_known(&self, class: WellKnownClass) -> ClassDescriptor;

    /// Class of an array with the given leaf class and rank (`rank >= 1`).
    fn array_class(&self, leaf: ClassDescriptor, rank: u32) -> ClassDescriptor;

    fn identity_overrides(&self, class: ClassDescriptor) -> IdentityOverrides;
}

#[derive(Clone, Debug)]
struct ClassInfo {
    name: Arc<str>,
    overrides: IdentityOverrides,
}

/// Registry interning one descriptor per class name.
///
/// Array classes are named after their leaf with one `[]` per dimension and
/// created on first request.
pub struct InternedClassRegistry {
    by_name: DashMap<Arc<str>, ClassDescriptor>,
    classes: DashMap<ClassDescriptor, ClassInfo>,
    next_id: AtomicU32,
    well_known: [ClassDescriptor; 5],
}

impl Default for InternedClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InternedClassRegistry {
    pub fn new() -> Self {
        let mut registry = InternedClassRegistry {
            by_name: DashMap::new(),
            classes: DashMap::new(),
            next_id: AtomicU32::new(0),
            well_known: [ClassDescriptor(0); 5],
        };
        for class in WellKnownClass::ALL {
            let descriptor = registry.register(class.default_name(), class.overrides());
            registry.well_known[class.index()] = descriptor;
        }
        registry
    }

    /// Descriptor for `name`, registering it on first use. A repeated
    /// registration keeps the first descriptor and widens its overrides.
    pub fn register(&self, name: &str, overrides: IdentityOverrides) -> ClassDescriptor {
        match self.by_name.entry(Arc::from(name)) {
            Entry::Occupied(entry) => {
                let descriptor = *entry.get();
                if let Some(mut info) = self.classes.get_mut(&descriptor) {
                    info.overrides |= overrides;
                }
                descriptor
            }
            Entry::Vacant(entry) => {
                let descriptor = ClassDescriptor(self.next_id.fetch_add(1, Ordering::SeqCst));
                trace!(class = name, descriptor = descriptor.0, "registering class");
                self.classes.insert(
                    descriptor,
                    ClassInfo {
                        name: entry.key().clone(),
                        overrides,
                    },
                );
                entry.insert(descriptor);
                descriptor
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<ClassDescriptor> {
        self.by_name.get(name).map(|r| *r)
    }

    pub fn name(&self, class: ClassDescriptor) -> Option<Arc<str>> {
        self.classes.get(&class).map(|r| r.name.clone())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassRegistry for InternedClassRegistry {
    fn well_known(&self, class: WellKnownClass) -> ClassDescriptor {
        self.well_known[class.index()]
    }

    fn array_class(&self, leaf: ClassDescriptor, rank: u32) -> ClassDescriptor {
        let leaf_name = self.name(leaf).unwrap_or_else(|| Arc::from("?"));
        let mut name = String::with_capacity(leaf_name.len() + 2 * rank as usize);
        name.push_str(&leaf_name);
        for _ in 0..rank {
            name.push_str("[]");
        }
        self.register(&name, IdentityOverrides::empty())
    }

    fn identity_overrides(&self, class: ClassDescriptor) -> IdentityOverrides {
        self.classes
            .get(&class)
            .map(|r| r.overrides)
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
