/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Dispatch from an [`AttributeValue`] variant to a domain type.

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::error::ConversionError;
use crate::type_descriptor::TypeDescriptor;
use aws_smithy_types::Blob;
use std::collections::HashMap;

/// Converts an [`AttributeValue`] into `Self::Output`, one method per variant.
///
/// Every `convert_*` method fails with a [`TypeMismatch`] naming the target type, the
/// converter and the variant that was found, unless the implementation overrides it.
/// Converters override only the variants they accept and get identical diagnostics
/// for everything else.
///
/// ```
/// use dynamodb_converter::{AttributeValue, AttributeValueType, AttributeValueVisitor};
/// use dynamodb_converter::{ConversionError, RawType, TypeDescriptor};
///
/// struct Length(TypeDescriptor);
///
/// impl AttributeValueVisitor for Length {
///     type Output = usize;
///
///     fn target_type(&self) -> &TypeDescriptor { &self.0 }
///     fn converter_name(&self) -> &'static str { "Length" }
///     fn expected_type(&self) -> AttributeValueType { AttributeValueType::S }
///
///     fn convert_string(&self, value: String) -> Result<usize, ConversionError> {
///         Ok(value.len())
///     }
/// }
///
/// let visitor = Length(TypeDescriptor::of(RawType::new("usize")));
/// assert_eq!(AttributeValue::from_string("abc").convert(&visitor).unwrap(), 3);
/// assert!(AttributeValue::from_bool(true).convert(&visitor).is_err());
/// ```
///
/// [`TypeMismatch`]: crate::ConversionErrorKind::TypeMismatch
pub trait AttributeValueVisitor {
    /// The domain value produced.
    type Output;

    /// The type being produced, for diagnostics.
    fn target_type(&self) -> &TypeDescriptor;

    /// The name of the converter driving this visitor, for diagnostics.
    fn converter_name(&self) -> &'static str;

    /// The variant the converter writes, reported as "expected" on a mismatch.
    fn expected_type(&self) -> AttributeValueType;

    /// Builds the mismatch error for a variant this visitor does not accept.
    fn mismatch(&self, actual: AttributeValueType) -> ConversionError {
        ConversionError::type_mismatch(
            self.target_type().clone(),
            self.converter_name(),
            self.expected_type(),
            actual,
        )
    }

    /// Converts `NULL`.
    fn convert_null(&self) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::Null))
    }

    /// Converts `S`.
    fn convert_string(&self, _value: String) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::S))
    }

    /// Converts `N`.
    fn convert_number(&self, _value: String) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::N))
    }

    /// Converts `BOOL`.
    fn convert_bool(&self, _value: bool) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::Bool))
    }

    /// Converts `B`.
    fn convert_bytes(&self, _value: Blob) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::B))
    }

    /// Converts `SS`.
    fn convert_string_set(&self, _value: Vec<String>) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::Ss))
    }

    /// Converts `NS`.
    fn convert_number_set(&self, _value: Vec<String>) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::Ns))
    }

    /// Converts `BS`.
    fn convert_bytes_set(&self, _value: Vec<Blob>) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::Bs))
    }

    /// Converts `L`.
    fn convert_list(&self, _value: Vec<AttributeValue>) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::L))
    }

    /// Converts `M`.
    fn convert_map(
        &self,
        _value: HashMap<String, AttributeValue>,
    ) -> Result<Self::Output, ConversionError> {
        Err(self.mismatch(AttributeValueType::M))
    }
}

impl AttributeValue {
    /// Dispatches this value to the `visitor` method for its variant.
    pub fn convert<V>(self, visitor: &V) -> Result<V::Output, ConversionError>
    where
        V: AttributeValueVisitor + ?Sized,
    {
        match self {
            AttributeValue::Null => visitor.convert_null(),
            AttributeValue::S(value) => visitor.convert_string(value),
            AttributeValue::N(value) => visitor.convert_number(value),
            AttributeValue::Bool(value) => visitor.convert_bool(value),
            AttributeValue::B(value) => visitor.convert_bytes(value),
            AttributeValue::Ss(value) => visitor.convert_string_set(value),
            AttributeValue::Ns(value) => visitor.convert_number_set(value),
            AttributeValue::Bs(value) => visitor.convert_bytes_set(value),
            AttributeValue::L(value) => visitor.convert_list(value),
            AttributeValue::M(value) => visitor.convert_map(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;
    use crate::type_descriptor::RawType;

    struct NumberOnly(TypeDescriptor);

    impl AttributeValueVisitor for NumberOnly {
        type Output = String;

        fn target_type(&self) -> &TypeDescriptor {
            &self.0
        }

        fn converter_name(&self) -> &'static str {
            "NumberOnly"
        }

        fn expected_type(&self) -> AttributeValueType {
            AttributeValueType::N
        }

        fn convert_number(&self, value: String) -> Result<String, ConversionError> {
            Ok(value)
        }
    }

    fn visitor() -> NumberOnly {
        NumberOnly(TypeDescriptor::of(RawType::new("i64")))
    }

    #[test]
    fn accepted_variant_is_dispatched() {
        assert_eq!(
            AttributeValue::from_number("12").convert(&visitor()).unwrap(),
            "12"
        );
    }

    #[test]
    fn every_other_variant_fails_uniformly() {
        let values = vec![
            AttributeValue::Null,
            AttributeValue::from_string("12"),
            AttributeValue::from_bool(true),
            AttributeValue::from_bytes(vec![1u8]),
            AttributeValue::from_string_set(["a"]),
            AttributeValue::from_number_set(["1"]),
            AttributeValue::from_bytes_set([vec![1u8]]),
            AttributeValue::from_list([]),
            AttributeValue::from_map::<String>([]),
        ];
        for value in values {
            let actual_type = value.attribute_value_type();
            let err = value.convert(&visitor()).unwrap_err();
            match err.kind() {
                ConversionErrorKind::TypeMismatch {
                    target,
                    converter,
                    expected,
                    actual,
                } => {
                    assert_eq!(target.to_string(), "i64");
                    assert_eq!(*converter, "NumberOnly");
                    assert_eq!(*expected, AttributeValueType::N);
                    assert_eq!(*actual, actual_type);
                }
                other => panic!("unexpected error kind: {:?}", other),
            }
        }
    }
}
