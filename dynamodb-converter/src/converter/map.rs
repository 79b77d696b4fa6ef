/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::ConvertAttribute;
use crate::error::{ConversionError, PathSegment};
use crate::text::StringConverter;
use crate::type_descriptor::TypeDescriptor;
use crate::value::DomainValue;
use crate::visitor::AttributeValueVisitor;
use std::collections::HashMap;
use std::sync::Arc;

/// Converts a mapping to `M`, encoding keys with a [`StringConverter`].
#[derive(Debug)]
pub struct MapAttributeConverter {
    descriptor: TypeDescriptor,
    key: Arc<dyn StringConverter>,
    value: Arc<dyn ConvertAttribute>,
}

impl MapAttributeConverter {
    /// Creates a converter for `Map<key, value>`.
    pub fn new(key: Arc<dyn StringConverter>, value: Arc<dyn ConvertAttribute>) -> Self {
        let descriptor = TypeDescriptor::map_of(
            key.type_descriptor().clone(),
            value.type_descriptor().clone(),
        );
        Self::with_descriptor(descriptor, key, value)
    }

    /// Creates a converter for a custom mapping type.
    pub fn with_descriptor(
        descriptor: TypeDescriptor,
        key: Arc<dyn StringConverter>,
        value: Arc<dyn ConvertAttribute>,
    ) -> Self {
        Self {
            descriptor,
            key,
            value,
        }
    }
}

impl AttributeValueVisitor for MapAttributeConverter {
    type Output = DomainValue;

    fn target_type(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn converter_name(&self) -> &'static str {
        "MapAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }

    fn convert_map(
        &self,
        value: HashMap<String, AttributeValue>,
    ) -> Result<DomainValue, ConversionError> {
        value
            .into_iter()
            .map(|(key, value)| {
                let at_key = |err: ConversionError| err.at(PathSegment::Key(key.clone()));
                let domain_key = self.key.decode(&key).map_err(at_key)?;
                let domain_value = self.value.transform_to(value).map_err(at_key)?;
                Ok((domain_key, domain_value))
            })
            .collect::<Result<_, _>>()
            .map(DomainValue::Map)
    }
}

impl ConvertAttribute for MapAttributeConverter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        let entries = match input {
            DomainValue::Map(entries) => entries,
            other => {
                return Err(ConversionError::unexpected_domain_value(
                    self.descriptor.clone(),
                    other.describe(),
                ))
            }
        };
        let mut map = HashMap::with_capacity(entries.len());
        for (key, value) in entries {
            let key = self.key.encode(key)?;
            let value = self
                .value
                .transform_from(value)
                .map_err(|err| err.at(PathSegment::Key(key.clone())))?;
            if map.contains_key(&key) {
                return Err(ConversionError::invalid_value(
                    self.descriptor.clone(),
                    format!("more than one key encodes to '{}'", key),
                ));
            }
            map.insert(key, value);
        }
        Ok(AttributeValue::M(map))
    }

    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError> {
        input.convert(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{erase, NumberAttributeConverter};
    use crate::error::ConversionErrorKind;
    use crate::text::TextStringConverter;
    use crate::value::AttributeType;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn converter<K: crate::text::TextForm>() -> MapAttributeConverter {
        MapAttributeConverter::new(
            Arc::new(TextStringConverter::<K>::new()),
            erase(NumberAttributeConverter::<i32>::new()),
        )
    }

    #[test]
    fn keys_are_encoded_as_text() {
        let original = BTreeMap::from([(1u16, 10), (2u16, 20)]);
        let converter = converter::<u16>();
        assert_eq!(
            converter.type_descriptor(),
            &BTreeMap::<u16, i32>::type_descriptor()
        );
        let av = converter.transform_from(&original.to_domain_value()).unwrap();
        assert_eq!(
            av,
            AttributeValue::from_map([
                ("1", AttributeValue::from_number("10")),
                ("2", AttributeValue::from_number("20")),
            ])
        );
        let back = BTreeMap::<u16, i32>::from_domain_value(converter.transform_to(av).unwrap());
        assert_eq!(back.unwrap(), original);
    }

    #[test]
    fn errors_carry_the_key() {
        let av = AttributeValue::from_map([("a", AttributeValue::from_string("x"))]);
        let err = converter::<String>().transform_to(av).unwrap_err();
        assert_eq!(err.path(), &[PathSegment::Key("a".into())]);

        let av = AttributeValue::from_map([("one", AttributeValue::from_number("1"))]);
        let err = converter::<u16>().transform_to(av).unwrap_err();
        assert_eq!(err.path(), &[PathSegment::Key("one".into())]);
        assert!(matches!(err.kind(), ConversionErrorKind::InvalidValue { .. }));
    }

    #[test]
    fn colliding_keys_are_rejected() {
        let value = DomainValue::Map(vec![
            (DomainValue::scalar(1.0f64), DomainValue::scalar(1i32)),
            (DomainValue::scalar(1.0f64), DomainValue::scalar(2i32)),
        ]);
        let err = converter::<f64>().transform_from(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for Map<f64, i32>: more than one key encodes to '1'"
        );
    }
}
