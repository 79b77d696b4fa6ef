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
use aws_smithy_types::Blob;

/// Converts [`Blob`] to `B`.
#[derive(Debug)]
pub struct BlobAttributeConverter {
    descriptor: TypeDescriptor,
}

impl BlobAttributeConverter {
    /// Creates the converter.
    pub fn new() -> Self {
        Self {
            descriptor: Blob::type_descriptor(),
        }
    }
}

impl Default for BlobAttributeConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl AttributeValueVisitor for BlobAttributeConverter {
    type Output = Blob;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "BlobAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::B
    }

    fn convert_bytes(&self, value: Blob) -> Result<Blob, ConversionError> {
        Ok(value)
    }
}

impl AttributeConverter<Blob> for BlobAttributeConverter {
    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::B
    }

    fn transform_from(&self, input: &Blob) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::B(input.clone()))
    }

    fn transform_to(&self, input: AttributeValue) -> Result<Blob, ConversionError> {
        input.convert(self)
    }
}
