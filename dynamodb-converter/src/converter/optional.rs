/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::ConvertAttribute;
use crate::error::ConversionError;
use crate::type_descriptor::TypeDescriptor;
use crate::value::DomainValue;
use std::sync::Arc;

/// Converts an optional value: absent is `NULL`, present values use the inner converter.
#[derive(Debug)]
pub struct OptionalAttributeConverter {
    descriptor: TypeDescriptor,
    inner: Arc<dyn ConvertAttribute>,
}

impl OptionalAttributeConverter {
    /// Creates a converter for `Option<inner>`.
    pub fn new(inner: Arc<dyn ConvertAttribute>) -> Self {
        Self::with_descriptor(TypeDescriptor::optional_of(inner.type_descriptor().clone()), inner)
    }

    /// Creates a converter for a custom optional type whose present values `inner` converts.
    pub fn with_descriptor(descriptor: TypeDescriptor, inner: Arc<dyn ConvertAttribute>) -> Self {
        Self { descriptor, inner }
    }
}

impl ConvertAttribute for OptionalAttributeConverter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        self.inner.attribute_value_type()
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        match input {
            DomainValue::Absent => Ok(AttributeValue::Null),
            present => self.inner.transform_from(present),
        }
    }

    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError> {
        match input {
            AttributeValue::Null => Ok(DomainValue::Absent),
            present => self.inner.transform_to(present),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{erase, StringAttributeConverter};
    use crate::value::AttributeType;

    #[test]
    fn absent_is_null() {
        let converter =
            OptionalAttributeConverter::new(erase(StringAttributeConverter::<String>::new()));
        assert_eq!(converter.type_descriptor(), &Option::<String>::type_descriptor());
        assert_eq!(converter.attribute_value_type(), AttributeValueType::S);

        let none: Option<String> = None;
        let av = converter.transform_from(&none.to_domain_value()).unwrap();
        assert_eq!(av, AttributeValue::Null);
        assert_eq!(
            Option::<String>::from_domain_value(converter.transform_to(av).unwrap()).unwrap(),
            None
        );

        let some = Some("x".to_string());
        let av = converter.transform_from(&some.to_domain_value()).unwrap();
        assert_eq!(av, AttributeValue::from_string("x"));
        assert_eq!(
            Option::<String>::from_domain_value(converter.transform_to(av).unwrap()).unwrap(),
            some
        );
    }
}
