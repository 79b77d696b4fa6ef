/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Converter traits and the built-in converters.
//!
//! A converter is written against one Rust type with [`AttributeConverter`]. The
//! registry stores and composes converters through the object-safe
//! [`ConvertAttribute`] trait, which exchanges [`DomainValue`]s instead of typed
//! values; [`erase`] bridges the two and [`TypedConverter`] gives the typed view back.

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::error::ConversionError;
use crate::text::{StringConverter, TextStringConverter};
use crate::type_descriptor::TypeDescriptor;
use crate::value::{AttributeType, DomainValue};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

mod binary;
mod boolean;
mod document;
mod list;
mod map;
mod number;
mod optional;
pub(crate) mod recursive;
mod set;
mod string;

pub use binary::BlobAttributeConverter;
pub use boolean::BooleanAttributeConverter;
pub use document::DocumentAttributeConverter;
pub use list::ListAttributeConverter;
pub use map::MapAttributeConverter;
pub use number::NumberAttributeConverter;
pub use optional::OptionalAttributeConverter;
pub use set::SetAttributeConverter;
pub use string::StringAttributeConverter;

/// Converts one Rust type to and from an [`AttributeValue`].
///
/// Implementations must be stateless and safe to share between threads; the
/// registry hands out a single instance to every caller. For every value `x` the
/// converter accepts, `transform_to(transform_from(x)?)` must give back a value equal
/// to `x`.
pub trait AttributeConverter<T: AttributeType>: fmt::Debug + Send + Sync + 'static {
    /// The type this converter serves.
    fn type_descriptor(&self) -> TypeDescriptor {
        T::type_descriptor()
    }

    /// The variant [`transform_from`](Self::transform_from) produces.
    fn attribute_value_type(&self) -> AttributeValueType;

    /// A second identity the converter is registered under, usually a Smithy prelude type.
    fn primitive_type(&self) -> Option<TypeDescriptor> {
        T::prelude_type()
    }

    /// Converts a domain value into an attribute value.
    fn transform_from(&self, input: &T) -> Result<AttributeValue, ConversionError>;

    /// Converts an attribute value back into a domain value.
    fn transform_to(&self, input: AttributeValue) -> Result<T, ConversionError>;
}

/// The type-erased converter capability the registry resolves and composes.
pub trait ConvertAttribute: fmt::Debug + Send + Sync {
    /// The type this converter serves.
    fn type_descriptor(&self) -> &TypeDescriptor;

    /// The variant [`transform_from`](Self::transform_from) produces. Set converters
    /// use this to decide whether their elements can collapse into a native set.
    fn attribute_value_type(&self) -> AttributeValueType;

    /// A second identity the converter is registered under.
    fn primitive_type(&self) -> Option<&TypeDescriptor> {
        None
    }

    /// Converts a domain value into an attribute value.
    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError>;

    /// Converts an attribute value back into a domain value.
    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError>;
}

/// Wraps a typed converter for registration.
pub fn erase<T, C>(converter: C) -> Arc<dyn ConvertAttribute>
where
    T: AttributeType,
    C: AttributeConverter<T>,
{
    Arc::new(Erased {
        descriptor: converter.type_descriptor(),
        primitive: converter.primitive_type(),
        converter,
        _phantom: PhantomData::<fn() -> T>,
    })
}

struct Erased<C, T> {
    descriptor: TypeDescriptor,
    primitive: Option<TypeDescriptor>,
    converter: C,
    _phantom: PhantomData<fn() -> T>,
}

impl<C: fmt::Debug, T> fmt::Debug for Erased<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.converter, f)
    }
}

impl<C, T> ConvertAttribute for Erased<C, T>
where
    T: AttributeType,
    C: AttributeConverter<T>,
{
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        self.converter.attribute_value_type()
    }

    fn primitive_type(&self) -> Option<&TypeDescriptor> {
        self.primitive.as_ref()
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        match input.downcast_ref::<T>() {
            Some(value) => self.converter.transform_from(value),
            // containers reach typed converters when a user overrides e.g. `Vec<T>`
            None => self
                .converter
                .transform_from(&T::from_domain_value(input.clone())?),
        }
    }

    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError> {
        self.converter
            .transform_to(input)
            .map(|value| value.to_domain_value())
    }
}

/// A resolved converter, viewed as converting `T`.
pub struct TypedConverter<T> {
    inner: Arc<dyn ConvertAttribute>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for TypedConverter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> fmt::Debug for TypedConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypedConverter").field(&self.inner).finish()
    }
}

impl<T: AttributeType> TypedConverter<T> {
    pub(crate) fn new(inner: Arc<dyn ConvertAttribute>) -> Self {
        Self {
            inner,
            _phantom: PhantomData,
        }
    }

    /// The type this converter serves.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        self.inner.type_descriptor()
    }

    /// The variant [`transform_from`](Self::transform_from) produces.
    pub fn attribute_value_type(&self) -> AttributeValueType {
        self.inner.attribute_value_type()
    }

    /// Converts `value` into an attribute value.
    pub fn transform_from(&self, value: &T) -> Result<AttributeValue, ConversionError> {
        self.inner.transform_from(&value.to_domain_value())
    }

    /// Converts an attribute value into a `T`.
    pub fn transform_to(&self, value: AttributeValue) -> Result<T, ConversionError> {
        T::from_domain_value(self.inner.transform_to(value)?)
    }

    /// Converts `value` into a top-level item. Fails unless the converter produces `M`.
    pub fn transform_from_item(
        &self,
        value: &T,
    ) -> Result<HashMap<String, AttributeValue>, ConversionError> {
        match self.transform_from(value)? {
            AttributeValue::M(item) => Ok(item),
            other => Err(ConversionError::type_mismatch(
                self.type_descriptor().clone(),
                "TypedConverter",
                AttributeValueType::M,
                other.attribute_value_type(),
            )),
        }
    }

    /// Converts a top-level item into a `T`.
    pub fn transform_to_item(
        &self,
        item: HashMap<String, AttributeValue>,
    ) -> Result<T, ConversionError> {
        self.transform_to(AttributeValue::M(item))
    }

    /// Returns the type-erased converter.
    pub fn erased(&self) -> &Arc<dyn ConvertAttribute> {
        &self.inner
    }
}

fn string_converter<T: crate::text::TextForm>() -> Arc<dyn StringConverter> {
    Arc::new(TextStringConverter::<T>::new())
}

/// The converters every default registry starts with.
pub(crate) fn default_converters() -> Vec<Arc<dyn ConvertAttribute>> {
    use aws_smithy_types::DateTime;
    use crate::number::{BigDecimal, BigInteger};

    vec![
        erase(StringAttributeConverter::<String>::new()),
        erase(StringAttributeConverter::<char>::new()),
        erase(BooleanAttributeConverter::new()),
        erase(NumberAttributeConverter::<i8>::new()),
        erase(NumberAttributeConverter::<i16>::new()),
        erase(NumberAttributeConverter::<i32>::new()),
        erase(NumberAttributeConverter::<i64>::new()),
        erase(NumberAttributeConverter::<i128>::new()),
        erase(NumberAttributeConverter::<u8>::new()),
        erase(NumberAttributeConverter::<u16>::new()),
        erase(NumberAttributeConverter::<u32>::new()),
        erase(NumberAttributeConverter::<u64>::new()),
        erase(NumberAttributeConverter::<u128>::new()),
        erase(NumberAttributeConverter::<f32>::new()),
        erase(NumberAttributeConverter::<f64>::new()),
        erase(NumberAttributeConverter::<BigInteger>::new()),
        erase(NumberAttributeConverter::<BigDecimal>::new()),
        erase(BlobAttributeConverter::new()),
        erase(NumberAttributeConverter::<DateTime>::new()),
        erase(StringAttributeConverter::<time::Date>::new()),
        erase(StringAttributeConverter::<time::Time>::new()),
        erase(StringAttributeConverter::<time::PrimitiveDateTime>::new()),
        erase(StringAttributeConverter::<time::OffsetDateTime>::new()),
        erase(StringAttributeConverter::<time::UtcOffset>::new()),
        erase(NumberAttributeConverter::<time::Duration>::new()),
        erase(NumberAttributeConverter::<std::time::Duration>::new()),
        erase(StringAttributeConverter::<uuid::Uuid>::new()),
        erase(StringAttributeConverter::<http::Uri>::new()),
    ]
}

/// The map key codecs every default registry starts with.
pub(crate) fn default_string_converters() -> Vec<Arc<dyn StringConverter>> {
    use aws_smithy_types::DateTime;
    use crate::number::{BigDecimal, BigInteger};

    vec![
        string_converter::<String>(),
        string_converter::<char>(),
        string_converter::<bool>(),
        string_converter::<i8>(),
        string_converter::<i16>(),
        string_converter::<i32>(),
        string_converter::<i64>(),
        string_converter::<i128>(),
        string_converter::<u8>(),
        string_converter::<u16>(),
        string_converter::<u32>(),
        string_converter::<u64>(),
        string_converter::<u128>(),
        string_converter::<f32>(),
        string_converter::<f64>(),
        string_converter::<BigInteger>(),
        string_converter::<BigDecimal>(),
        string_converter::<DateTime>(),
        string_converter::<time::Date>(),
        string_converter::<time::Time>(),
        string_converter::<time::PrimitiveDateTime>(),
        string_converter::<time::OffsetDateTime>(),
        string_converter::<time::UtcOffset>(),
        string_converter::<time::Duration>(),
        string_converter::<std::time::Duration>(),
        string_converter::<uuid::Uuid>(),
        string_converter::<http::Uri>(),
    ]
}
