/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::AttributeConverter;
use crate::error::ConversionError;
use crate::type_descriptor::TypeDescriptor;
use crate::value::AttributeType;
use crate::visitor::AttributeValueVisitor;

/// Converts `bool` to `BOOL`.
///
/// Also reads `S` `"true"`/`"false"` and `N` `"1"`/`"0"`.
#[derive(Debug)]
pub struct BooleanAttributeConverter {
    descriptor: TypeDescriptor,
}

impl BooleanAttributeConverter {
    /// Creates the converter.
    pub fn new() -> Self {
        Self {
            descriptor: bool::type_descriptor(),
        }
    }

    fn invalid(&self, variant: AttributeValueType, value: &str) -> ConversionError {
        ConversionError::invalid_value(
            self.descriptor.clone(),
            format!("{} '{}' is not a boolean", variant, value),
        )
    }
}

impl Default for BooleanAttributeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeValueVisitor for BooleanAttributeConverter {
    type Output = bool;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "BooleanAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::Bool
    }

    fn convert_bool(&self, value: bool) -> Result<bool, ConversionError> {
        Ok(value)
    }

    fn convert_string(&self, value: String) -> Result<bool, ConversionError> {
        match value.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(self.invalid(AttributeValueType::S, &value)),
        }
    }

    fn convert_number(&self, value: String) -> Result<bool, ConversionError> {
        match value.as_str() {
            "1" => Ok(true),
            "0" => Ok(false),
            _ => Err(self.invalid(AttributeValueType::N, &value)),
        }
    }
}

impl AttributeConverter<bool> for BooleanAttributeConverter {
    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::Bool
    }

    fn transform_from(&self, input: &bool) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::Bool(*input))
    }

    fn transform_to(&self, input: AttributeValue) -> Result<bool, ConversionError> {
        input.convert(self)
    }
}
