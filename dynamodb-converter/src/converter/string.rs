/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::AttributeConverter;
use crate::error::ConversionError;
use crate::text::TextForm;
use crate::type_descriptor::TypeDescriptor;
use crate::visitor::AttributeValueVisitor;
use std::fmt;
use std::marker::PhantomData;

/// Converts a text-like type (strings, calendar types, identifiers) to `S`.
pub struct StringAttributeConverter<T> {
    descriptor: TypeDescriptor,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: TextForm> StringAttributeConverter<T> {
    /// Creates the converter for `T`.
    pub fn new() -> Self {
        Self {
            descriptor: T::type_descriptor(),
            _phantom: PhantomData,
        }
    }
}

impl<T: TextForm> Default for StringAttributeConverter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for StringAttributeConverter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringAttributeConverter<{}>", self.descriptor)
    }
}

impl<T: TextForm> AttributeValueVisitor for StringAttributeConverter<T> {
    type Output = T;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "StringAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }

    fn convert_string(&self, value: String) -> Result<T, ConversionError> {
        T::from_text(&value)
    }
}

impl<T: TextForm> AttributeConverter<T> for StringAttributeConverter<T> {
    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }

    fn transform_from(&self, input: &T) -> Result<AttributeValue, ConversionError> {
        input.to_text().map(AttributeValue::S)
    }

    fn transform_to(&self, input: AttributeValue) -> Result<T, ConversionError> {
        input.convert(self)
    }
}
