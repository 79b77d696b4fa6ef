/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::ConvertAttribute;
use crate::error::{ConversionError, PathSegment};
use crate::type_descriptor::TypeDescriptor;
use crate::value::DomainValue;
use crate::visitor::AttributeValueVisitor;
use std::sync::Arc;

/// Converts a sequence to `L`, element by element, preserving order.
#[derive(Debug)]
pub struct ListAttributeConverter {
    descriptor: TypeDescriptor,
    element: Arc<dyn ConvertAttribute>,
}

impl ListAttributeConverter {
    /// Creates a converter for `List<element>`.
    pub fn new(element: Arc<dyn ConvertAttribute>) -> Self {
        Self::with_descriptor(TypeDescriptor::list_of(element.type_descriptor().clone()), element)
    }

    /// Creates a converter for a custom sequence type whose elements `element` converts.
    pub fn with_descriptor(descriptor: TypeDescriptor, element: Arc<dyn ConvertAttribute>) -> Self {
        Self { descriptor, element }
    }
}

impl AttributeValueVisitor for ListAttributeConverter {
    type Output = DomainValue;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "ListAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::L
    }

    fn convert_list(&self, value: Vec<AttributeValue>) -> Result<DomainValue, ConversionError> {
        value
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                self.element
                    .transform_to(element)
                    .map_err(|err| err.at(PathSegment::Index(index)))
            })
            .collect::<Result<_, _>>()
            .map(DomainValue::List)
    }
}

impl ConvertAttribute for ListAttributeConverter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::L
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        match input {
            DomainValue::List(elements) => elements
                .iter()
                .enumerate()
                .map(|(index, element)| {
                    self.element
                        .transform_from(element)
                        .map_err(|err| err.at(PathSegment::Index(index)))
                })
                .collect::<Result<_, _>>()
                .map(AttributeValue::L),
            other => Err(ConversionError::unexpected_domain_value(
                self.descriptor.clone(),
                other.describe(),
            )),
        }
    }

    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError> {
        input.convert(self)
    }
}
