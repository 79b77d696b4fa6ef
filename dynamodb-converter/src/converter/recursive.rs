/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Back-references that close the loop in recursive document types.

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::ConvertAttribute;
use crate::error::ConversionError;
use crate::type_descriptor::TypeDescriptor;
use crate::value::DomainValue;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};

/// The slot a document converter is published into once it has been built.
pub(crate) type DocumentSlot = Arc<OnceLock<Weak<dyn ConvertAttribute>>>;

/// Stands in for a document converter that is still being built when one of its own
/// fields needs it.
///
/// The reference is weak, so the document converter does not keep itself alive.
pub(crate) struct RecursiveAttributeConverter {
    descriptor: TypeDescriptor,
    target: DocumentSlot,
}

impl RecursiveAttributeConverter {
    pub(crate) fn new(descriptor: TypeDescriptor, target: DocumentSlot) -> Self {
        Self { descriptor, target }
    }

    fn target(&self) -> Result<Arc<dyn ConvertAttribute>, ConversionError> {
        self.target
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| ConversionError::unavailable(self.descriptor.clone()))
    }
}

impl fmt::Debug for RecursiveAttributeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecursiveAttributeConverter<{}>", self.descriptor)
    }
}

impl ConvertAttribute for RecursiveAttributeConverter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        self.target()?.transform_from(input)
    }

    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError> {
        self.target()?.transform_to(input)
    }
}
