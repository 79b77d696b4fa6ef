/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Type-erased domain values and the [`AttributeType`] trait that maps Rust types onto them.
//!
//! Resolved converters are shared as `Arc<dyn ConvertAttribute>`, so they cannot be
//! generic over the Rust type they convert. Values cross that boundary as a
//! [`DomainValue`] tree: containers stay visible to the composite converters, and
//! everything else (scalars, documents) travels as a boxed [`DomainObject`].
//!
//! [`ConvertAttribute`]: crate::ConvertAttribute

use crate::error::{ConversionError, PathSegment};
use crate::number::{BigDecimal, BigInteger};
use crate::type_descriptor::{prelude, RawKind, RawType, TypeDescriptor};
use aws_smithy_types::{Blob, DateTime};
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

/// A value that can travel inside a [`DomainValue::Scalar`].
///
/// Implemented for every `Clone + Debug + Send + Sync + 'static` type.
pub trait DomainObject: Any + Send + Sync + fmt::Debug {
    /// Returns `self` as [`Any`] for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as mutable [`Any`] for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Converts the box into a `Box<dyn Any>` for downcasting by value.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clones the object behind the box.
    fn clone_object(&self) -> Box<dyn DomainObject>;

    /// The Rust type name of the object, for diagnostics.
    fn type_name(&self) -> &'static str;
}

impl<T> DomainObject for T
where
    T: Any + Send + Sync + fmt::Debug + Clone,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_object(&self) -> Box<dyn DomainObject> {
        Box::new(self.clone())
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

/// A domain value with its container structure exposed.
#[derive(Debug)]
pub enum DomainValue {
    /// An empty optional.
    Absent,
    /// A leaf value or a document instance.
    Scalar(Box<dyn DomainObject>),
    /// Elements of a sequence, in order.
    List(Vec<DomainValue>),
    /// Elements of a set, in iteration order.
    Set(Vec<DomainValue>),
    /// Entries of a mapping, in iteration order.
    Map(Vec<(DomainValue, DomainValue)>),
}

impl Clone for DomainValue {
    fn clone(&self) -> Self {
        match self {
            DomainValue::Absent => DomainValue::Absent,
            DomainValue::Scalar(object) => DomainValue::Scalar((**object).clone_object()),
            DomainValue::List(elements) => DomainValue::List(elements.clone()),
            DomainValue::Set(elements) => DomainValue::Set(elements.clone()),
            DomainValue::Map(entries) => DomainValue::Map(entries.clone()),
        }
    }
}

impl DomainValue {
    /// Wraps a leaf value or document instance.
    pub fn scalar<T>(value: T) -> Self
    where
        T: Any + Send + Sync + fmt::Debug + Clone,
    {
        DomainValue::Scalar(Box::new(value))
    }

    /// Returns the scalar as a `T`, if it is one.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            DomainValue::Scalar(object) => (**object).as_any().downcast_ref(),
            _ => None,
        }
    }

    /// Takes the scalar out as a `T`, or gives the value back unchanged.
    pub fn downcast<T: Any>(self) -> Result<T, DomainValue> {
        match self {
            DomainValue::Scalar(object) if (*object).as_any().is::<T>() => {
                match object.into_any().downcast::<T>() {
                    Ok(value) => Ok(*value),
                    Err(_) => unreachable!("type was checked with `is`"),
                }
            }
            other => Err(other),
        }
    }

    /// Short description of the value's shape, for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            DomainValue::Absent => "an absent value".to_string(),
            DomainValue::Scalar(object) => format!("a value of type {}", (**object).type_name()),
            DomainValue::List(elements) => format!("a list of {} element(s)", elements.len()),
            DomainValue::Set(elements) => format!("a set of {} element(s)", elements.len()),
            DomainValue::Map(entries) => format!("a map of {} entry(ies)", entries.len()),
        }
    }
}

/// A Rust type that has a [`TypeDescriptor`] and a [`DomainValue`] representation.
///
/// Leaf types and document types use the provided methods, which box the value as a
/// [`DomainValue::Scalar`]. A document type only needs to name itself:
///
/// ```
/// use dynamodb_converter::{AttributeType, RawType, TypeDescriptor};
///
/// #[derive(Debug, Clone, Default)]
/// struct Order {
///     id: i32,
/// }
///
/// impl AttributeType for Order {
///     fn type_descriptor() -> TypeDescriptor {
///         TypeDescriptor::of(RawType::new("example#Order"))
///     }
/// }
/// ```
pub trait AttributeType: Clone + fmt::Debug + Send + Sync + 'static {
    /// Returns the descriptor the registry resolves converters for this type by.
    fn type_descriptor() -> TypeDescriptor;

    /// Returns the Smithy prelude identity of this type, if it has one.
    fn prelude_type() -> Option<TypeDescriptor> {
        None
    }

    /// Converts a reference to this value into its domain value.
    fn to_domain_value(&self) -> DomainValue {
        DomainValue::scalar(self.clone())
    }

    /// Recovers this type from a domain value produced by a converter for it.
    fn from_domain_value(value: DomainValue) -> Result<Self, ConversionError> {
        value.downcast::<Self>().map_err(|other| {
            ConversionError::unexpected_domain_value(Self::type_descriptor(), other.describe())
        })
    }
}

macro_rules! leaf_type {
    ($ty:ty, $name:literal) => {
        impl AttributeType for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::of(RawType::from_static($name, RawKind::Opaque))
            }
        }
    };
    ($ty:ty, $name:literal, $prelude:expr) => {
        impl AttributeType for $ty {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::of(RawType::from_static($name, RawKind::Opaque))
            }

            fn prelude_type() -> Option<TypeDescriptor> {
                Some(TypeDescriptor::of($prelude))
            }
        }
    };
}

leaf_type!(String, "String", prelude::STRING);
leaf_type!(char, "char");
leaf_type!(bool, "bool", prelude::BOOLEAN);
leaf_type!(i8, "i8", prelude::BYTE);
leaf_type!(i16, "i16", prelude::SHORT);
leaf_type!(i32, "i32", prelude::INTEGER);
leaf_type!(i64, "i64", prelude::LONG);
leaf_type!(i128, "i128");
leaf_type!(u8, "u8");
leaf_type!(u16, "u16");
leaf_type!(u32, "u32");
leaf_type!(u64, "u64");
leaf_type!(u128, "u128");
leaf_type!(f32, "f32", prelude::FLOAT);
leaf_type!(f64, "f64", prelude::DOUBLE);
leaf_type!(BigInteger, "BigInteger", prelude::BIG_INTEGER);
leaf_type!(BigDecimal, "BigDecimal", prelude::BIG_DECIMAL);
leaf_type!(Blob, "Blob", prelude::BLOB);
leaf_type!(DateTime, "DateTime", prelude::TIMESTAMP);
leaf_type!(time::Date, "time::Date");
leaf_type!(time::Time, "time::Time");
leaf_type!(time::PrimitiveDateTime, "time::PrimitiveDateTime");
leaf_type!(time::OffsetDateTime, "time::OffsetDateTime");
leaf_type!(time::UtcOffset, "time::UtcOffset");
leaf_type!(time::Duration, "time::Duration");
leaf_type!(std::time::Duration, "std::time::Duration");
leaf_type!(uuid::Uuid, "Uuid");
leaf_type!(http::Uri, "Uri");

fn elements_from<T: AttributeType>(
    elements: Vec<DomainValue>,
) -> impl Iterator<Item = Result<T, ConversionError>> {
    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            T::from_domain_value(element).map_err(|err| err.at(PathSegment::Index(index)))
        })
}

impl<T: AttributeType> AttributeType for Vec<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::list_of(T::type_descriptor())
    }

    fn to_domain_value(&self) -> DomainValue {
        DomainValue::List(self.iter().map(T::to_domain_value).collect())
    }

    fn from_domain_value(value: DomainValue) -> Result<Self, ConversionError> {
        match value {
            DomainValue::List(elements) => elements_from(elements).collect(),
            other => Err(ConversionError::unexpected_domain_value(
                Self::type_descriptor(),
                other.describe(),
            )),
        }
    }
}

macro_rules! set_type {
    ($set:ident, $($bound:tt)+) => {
        impl<T: AttributeType + $($bound)+> AttributeType for $set<T> {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::set_of(T::type_descriptor())
            }

            fn to_domain_value(&self) -> DomainValue {
                DomainValue::Set(self.iter().map(T::to_domain_value).collect())
            }

            fn from_domain_value(value: DomainValue) -> Result<Self, ConversionError> {
                match value {
                    DomainValue::Set(elements) | DomainValue::List(elements) => {
                        elements_from(elements).collect()
                    }
                    other => Err(ConversionError::unexpected_domain_value(
                        Self::type_descriptor(),
                        other.describe(),
                    )),
                }
            }
        }
    };
}

set_type!(HashSet, Eq + Hash);
set_type!(BTreeSet, Ord);

macro_rules! map_type {
    ($map:ident, $($bound:tt)+) => {
        impl<K, V> AttributeType for $map<K, V>
        where
            K: AttributeType + $($bound)+,
            V: AttributeType,
        {
            fn type_descriptor() -> TypeDescriptor {
                TypeDescriptor::map_of(K::type_descriptor(), V::type_descriptor())
            }

            fn to_domain_value(&self) -> DomainValue {
                DomainValue::Map(
                    self.iter()
                        .map(|(k, v)| (k.to_domain_value(), v.to_domain_value()))
                        .collect(),
                )
            }

            fn from_domain_value(value: DomainValue) -> Result<Self, ConversionError> {
                match value {
                    DomainValue::Map(entries) => entries
                        .into_iter()
                        .map(|(k, v)| {
                            Ok((K::from_domain_value(k)?, V::from_domain_value(v)?))
                        })
                        .collect(),
                    other => Err(ConversionError::unexpected_domain_value(
                        Self::type_descriptor(),
                        other.describe(),
                    )),
                }
            }
        }
    };
}

map_type!(HashMap, Eq + Hash);
map_type!(BTreeMap, Ord);

impl<T: AttributeType> AttributeType for Option<T> {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::optional_of(T::type_descriptor())
    }

    fn to_domain_value(&self) -> DomainValue {
        match self {
            Some(value) => value.to_domain_value(),
            None => DomainValue::Absent,
        }
    }

    fn from_domain_value(value: DomainValue) -> Result<Self, ConversionError> {
        match value {
            DomainValue::Absent => Ok(None),
            present => T::from_domain_value(present).map(Some),
        }
    }
}

/// A box is converted as the value it holds, so recursive documents can use
/// `Option<Box<Self>>` fields.
impl<T: AttributeType> AttributeType for Box<T> {
    fn type_descriptor() -> TypeDescriptor {
        T::type_descriptor()
    }

    fn prelude_type() -> Option<TypeDescriptor> {
        T::prelude_type()
    }

    fn to_domain_value(&self) -> DomainValue {
        (**self).to_domain_value()
    }

    fn from_domain_value(value: DomainValue) -> Result<Self, ConversionError> {
        T::from_domain_value(value).map(Box::new)
    }
}
