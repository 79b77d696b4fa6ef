/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Reified type identities used to look up converters.
//!
//! A [`TypeDescriptor`] is a raw type plus the descriptors of its type parameters, so
//! `HashMap<String, Vec<i32>>` is `Map<String, List<i32>>`. Two descriptors built
//! independently for the same logical type compare equal and hash the same, which is
//! what makes them usable as cache keys.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// How the resolver treats a raw type structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawKind {
    /// A type without type parameters: scalars and user-defined documents.
    Opaque,
    /// An ordered sequence of one element type.
    Sequence,
    /// An unordered collection of unique elements of one element type.
    Set,
    /// A mapping from a key type to a value type.
    Mapping,
    /// A value that may be absent.
    Optional,
}

impl RawKind {
    /// Number of type parameters a raw type of this kind declares.
    pub fn arity(&self) -> usize {
        match self {
            RawKind::Opaque => 0,
            RawKind::Sequence | RawKind::Set | RawKind::Optional => 1,
            RawKind::Mapping => 2,
        }
    }
}

/// The identity of a type with its type parameters erased.
///
/// Raw types are named with Smithy-style shape IDs (`namespace#Name`) or plain Rust type
/// names; the name is only an identity and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawType {
    name: Cow<'static, str>,
    kind: RawKind,
}

impl RawType {
    /// The built-in sequence raw type.
    pub const LIST: RawType = RawType::from_static("List", RawKind::Sequence);
    /// The built-in set raw type.
    pub const SET: RawType = RawType::from_static("Set", RawKind::Set);
    /// The built-in mapping raw type.
    pub const MAP: RawType = RawType::from_static("Map", RawKind::Mapping);
    /// The built-in optional raw type.
    pub const OPTIONAL: RawType = RawType::from_static("Option", RawKind::Optional);

    /// Creates an opaque raw type, e.g. for a user-defined document.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            kind: RawKind::Opaque,
        }
    }

    /// Creates a raw type of the given kind.
    ///
    /// Use this to declare additional sequence, set or mapping types; the resolver
    /// builds composite converters for them the same way it does for the built-ins.
    pub fn with_kind(name: impl Into<Cow<'static, str>>, kind: RawKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Creates a raw type from a static name.
    pub const fn from_static(name: &'static str, kind: RawKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind,
        }
    }

    /// Returns the name of this raw type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the structural kind of this raw type.
    pub fn kind(&self) -> RawKind {
        self.kind
    }
}

impl fmt::Display for RawType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Raw types of the Smithy prelude.
///
/// Leaf converters register under these identities as well as under their Rust type,
/// so a descriptor derived from a Smithy model resolves to the same converter.
pub mod prelude {
    use super::{RawKind, RawType};

    /// `smithy.api#String`
    pub const STRING: RawType = RawType::from_static("smithy.api#String", RawKind::Opaque);
    /// `smithy.api#Boolean`
    pub const BOOLEAN: RawType = RawType::from_static("smithy.api#Boolean", RawKind::Opaque);
    /// `smithy.api#Byte`
    pub const BYTE: RawType = RawType::from_static("smithy.api#Byte", RawKind::Opaque);
    /// `smithy.api#Short`
    pub const SHORT: RawType = RawType::from_static("smithy.api#Short", RawKind::Opaque);
    /// `smithy.api#Integer`
    pub const INTEGER: RawType = RawType::from_static("smithy.api#Integer", RawKind::Opaque);
    /// `smithy.api#Long`
    pub const LONG: RawType = RawType::from_static("smithy.api#Long", RawKind::Opaque);
    /// `smithy.api#Float`
    pub const FLOAT: RawType = RawType::from_static("smithy.api#Float", RawKind::Opaque);
    /// `smithy.api#Double`
    pub const DOUBLE: RawType = RawType::from_static("smithy.api#Double", RawKind::Opaque);
    /// `smithy.api#BigInteger`
    pub const BIG_INTEGER: RawType =
        RawType::from_static("smithy.api#BigInteger", RawKind::Opaque);
    /// `smithy.api#BigDecimal`
    pub const BIG_DECIMAL: RawType =
        RawType::from_static("smithy.api#BigDecimal", RawKind::Opaque);
    /// `smithy.api#Blob`
    pub const BLOB: RawType = RawType::from_static("smithy.api#Blob", RawKind::Opaque);
    /// `smithy.api#Timestamp`
    pub const TIMESTAMP: RawType = RawType::from_static("smithy.api#Timestamp", RawKind::Opaque);
}

/// A type descriptor had the wrong number of type parameters for its raw type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{raw} takes {expected} type parameter(s) but {actual} were given")]
pub struct InvalidTypeDescriptor {
    raw: RawType,
    expected: usize,
    actual: usize,
}

/// A raw type together with the descriptors of its type parameters.
///
/// Equality and hashing are structural and ignore the cacheable flag.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    raw: RawType,
    parameters: Vec<TypeDescriptor>,
    cacheable: bool,
}

impl TypeDescriptor {
    /// Creates a descriptor for a raw type without type parameters.
    pub fn of(raw: RawType) -> Self {
        Self {
            raw,
            parameters: Vec::new(),
            cacheable: true,
        }
    }

    /// Creates a descriptor for a parameterized raw type.
    ///
    /// Fails if the number of parameters does not match the raw type's kind.
    pub fn with_parameters(
        raw: RawType,
        parameters: impl IntoIterator<Item = TypeDescriptor>,
    ) -> Result<Self, InvalidTypeDescriptor> {
        let parameters: Vec<_> = parameters.into_iter().collect();
        let expected = raw.kind().arity();
        if parameters.len() != expected {
            return Err(InvalidTypeDescriptor {
                raw,
                expected,
                actual: parameters.len(),
            });
        }
        Ok(Self {
            raw,
            parameters,
            cacheable: true,
        })
    }

    /// `List<element>`
    pub fn list_of(element: TypeDescriptor) -> Self {
        Self::parameterized(RawType::LIST, vec![element])
    }

    /// `Set<element>`
    pub fn set_of(element: TypeDescriptor) -> Self {
        Self::parameterized(RawType::SET, vec![element])
    }

    /// `Map<key, value>`
    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::parameterized(RawType::MAP, vec![key, value])
    }

    /// `Option<inner>`
    pub fn optional_of(inner: TypeDescriptor) -> Self {
        Self::parameterized(RawType::OPTIONAL, vec![inner])
    }

    fn parameterized(raw: RawType, parameters: Vec<TypeDescriptor>) -> Self {
        Self {
            raw,
            parameters,
            cacheable: true,
        }
    }

    /// Marks this descriptor as one whose converter must never be cached.
    ///
    /// Use this for dynamically synthesized types, so that the registry cache does not
    /// grow with every new type.
    pub fn uncacheable(mut self) -> Self {
        self.cacheable = false;
        self
    }

    /// Returns the raw type.
    pub fn raw_type(&self) -> &RawType {
        &self.raw
    }

    /// Returns the type parameters, in declaration order.
    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.parameters
    }

    /// Returns the type parameter at `index`, if present.
    pub fn parameter(&self, index: usize) -> Option<&TypeDescriptor> {
        self.parameters.get(index)
    }

    /// Returns true if this descriptor and all of its parameters may be cached.
    pub fn is_cacheable(&self) -> bool {
        self.cacheable && self.parameters.iter().all(TypeDescriptor::is_cacheable)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.parameters == other.parameters
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
        self.parameters.hash(state);
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if let Some((first, rest)) = self.parameters.split_first() {
            write!(f, "<{}", first)?;
            for parameter in rest {
                write!(f, ", {}", parameter)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl From<RawType> for TypeDescriptor {
    fn from(raw: RawType) -> Self {
        TypeDescriptor::of(raw)
    }
}
