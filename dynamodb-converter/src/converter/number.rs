/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::AttributeConverter;
use crate::error::ConversionError;
use crate::number::{significant_digits, MAX_PRECISION};
use crate::text::TextForm;
use crate::type_descriptor::TypeDescriptor;
use crate::visitor::AttributeValueVisitor;
use std::fmt;
use std::marker::PhantomData;

/// Converts a number-like type to `N`.
///
/// Numeric text in an `S` is accepted as well, so attributes written by clients that
/// store numbers as strings still load. Values with more than 38 significant digits,
/// such as `u128::MAX`, are rejected since the store cannot hold them.
pub struct NumberAttributeConverter<T> {
    descriptor: TypeDescriptor,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: TextForm> NumberAttributeConverter<T> {
    /// Creates the converter for `T`.
    pub fn new() -> Self {
        Self {
            descriptor: T::type_descriptor(),
            _phantom: PhantomData,
        }
    }
}

impl<T: TextForm> Default for NumberAttributeConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for NumberAttributeConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NumberAttributeConverter<{}>", self.descriptor)
    }
}

impl<T: TextForm> AttributeValueVisitor for NumberAttributeConverter<T> {
    type Output = T;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "NumberAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::N
    }

    fn convert_number(&self, value: String) -> Result<T, ConversionError> {
        T::from_text(&value)
    }

    fn convert_string(&self, value: String) -> Result<T, ConversionError> {
        T::from_text(&value)
    }
}

impl<T: TextForm> AttributeConverter<T> for NumberAttributeConverter<T> {
    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::N
    }

    fn transform_from(&self, input: &T) -> Result<AttributeValue, ConversionError> {
        let text = input.to_text()?;
        match significant_digits(&text) {
            Some(digits) if digits > MAX_PRECISION => Err(ConversionError::invalid_value(
                self.descriptor.clone(),
                format!(
                    "{} has {} significant digits but number attributes hold at most {}",
                    text, digits, MAX_PRECISION
                ),
            )),
            _ => Ok(AttributeValue::N(text)),
        }
    }

    fn transform_to(&self, input: AttributeValue) -> Result<T, ConversionError> {
        input.convert(self)
    }
}
