/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::ConvertAttribute;
use crate::error::{ConversionError, PathSegment};
use crate::number::canonical;
use crate::type_descriptor::TypeDescriptor;
use crate::value::DomainValue;
use crate::visitor::AttributeValueVisitor;
use aws_smithy_types::Blob;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Converts a set of unique elements.
///
/// A non-empty set whose elements all convert to `S`, `N` or `B` is written as the
/// matching `SS`, `NS` or `BS`. Anything else, including the empty set (the store
/// rejects empty native sets) and a set whose members convert to the same string, number
/// or bytes, is written as `L`. All four forms are read back.
#[derive(Debug)]
pub struct SetAttributeConverter {
    descriptor: TypeDescriptor,
    element: Arc<dyn ConvertAttribute>,
}

impl SetAttributeConverter {
    /// Creates a converter for `Set<element>`.
    pub fn new(element: Arc<dyn ConvertAttribute>) -> Self {
        Self::with_descriptor(TypeDescriptor::set_of(element.type_descriptor().clone()), element)
    }

    /// Creates a converter for a custom set type whose elements `element` converts.
    pub fn with_descriptor(descriptor: TypeDescriptor, element: Arc<dyn ConvertAttribute>) -> Self {
        Self { descriptor, element }
    }

    fn collapse(&self, elements: Vec<AttributeValue>) -> AttributeValue {
        let set_type = match self.element.attribute_value_type().set_type() {
            Some(set_type) if !elements.is_empty() => set_type,
            _ => return AttributeValue::L(elements),
        };
        let native = |value: &AttributeValue| {
            value.attribute_value_type().set_type() == Some(set_type)
        };
        if !elements.iter().all(native) {
            return AttributeValue::L(elements);
        }
        let mut strings = Vec::new();
        let mut blobs = Vec::new();
        for element in elements {
            match element {
                AttributeValue::S(s) | AttributeValue::N(s) => strings.push(s),
                AttributeValue::B(b) => blobs.push(b),
                _ => {}
            }
        }
        // the store rejects native sets with duplicate members
        match set_type {
            AttributeValueType::Ss if all_distinct(&strings) => AttributeValue::Ss(strings),
            AttributeValueType::Ns
                if all_distinct(
                    strings
                        .iter()
                        .map(|n| canonical(n).unwrap_or_else(|| n.clone())),
                ) =>
            {
                AttributeValue::Ns(strings)
            }
            AttributeValueType::Bs
                if all_distinct(blobs.iter().map(|blob| -> &[u8] { blob.as_ref() })) =>
            {
                AttributeValue::Bs(blobs)
            }
            AttributeValueType::Ss => {
                AttributeValue::L(strings.into_iter().map(AttributeValue::S).collect())
            }
            AttributeValueType::Ns => {
                AttributeValue::L(strings.into_iter().map(AttributeValue::N).collect())
            }
            _ => AttributeValue::L(blobs.into_iter().map(AttributeValue::B).collect()),
        }
    }

    fn elements_from(
        &self,
        elements: impl IntoIterator<Item = AttributeValue>,
    ) -> Result<DomainValue, ConversionError> {
        elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| {
                self.element
                    .transform_to(element)
                    .map_err(|err| err.at(PathSegment::Index(index)))
            })
            .collect::<Result<_, _>>()
            .map(DomainValue::Set)
    }
}

fn all_distinct<T: Eq + Hash>(members: impl IntoIterator<Item = T>) -> bool {
    let mut seen = HashSet::new();
    members.into_iter().all(|member| seen.insert(member))
}

impl AttributeValueVisitor for SetAttributeConverter {
    type Output = DomainValue;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "SetAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        self.element
            .attribute_value_type()
            .set_type()
            .unwrap_or(AttributeValueType::L)
    }

    fn convert_string_set(&self, value: Vec<String>) -> Result<DomainValue, ConversionError> {
        self.elements_from(value.into_iter().map(AttributeValue::S))
    }

    fn convert_number_set(&self, value: Vec<String>) -> Result<DomainValue, ConversionError> {
        self.elements_from(value.into_iter().map(AttributeValue::N))
    }

    fn convert_bytes_set(&self, value: Vec<Blob>) -> Result<DomainValue, ConversionError> {
        self.elements_from(value.into_iter().map(AttributeValue::B))
    }

    fn convert_list(&self, value: Vec<AttributeValue>) -> Result<DomainValue, ConversionError> {
        self.elements_from(value)
    }
}

impl ConvertAttribute for SetAttributeConverter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        self.expected_type()
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        match input {
            DomainValue::Set(elements) | DomainValue::List(elements) => {
                let converted = elements
                    .iter()
                    .enumerate()
                    .map(|(index, element)| {
                        self.element
                            .transform_from(element)
                            .map_err(|err| err.at(PathSegment::Index(index)))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.collapse(converted))
            }
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
