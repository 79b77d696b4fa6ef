/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::attribute_value::{AttributeValue, AttributeValueType};
use crate::converter::ConvertAttribute;
use crate::error::{ConversionError, PathSegment};
use crate::schema::DocumentSchema;
use crate::type_descriptor::TypeDescriptor;
use crate::value::DomainValue;
use crate::visitor::AttributeValueVisitor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Converts a document to `M` field by field, as described by its [`DocumentSchema`].
///
/// The registry builds one of these when a document type has no registered converter
/// and a schema for it is supplied. Field converters are resolved up front through the
/// same registry, so documents nest inside lists, maps and other documents.
pub struct DocumentAttributeConverter {
    schema: Arc<DocumentSchema>,
    fields: Vec<Arc<dyn ConvertAttribute>>,
}

impl DocumentAttributeConverter {
    /// `fields` holds one converter per schema field, in schema order.
    pub(crate) fn new(schema: Arc<DocumentSchema>, fields: Vec<Arc<dyn ConvertAttribute>>) -> Self {
        debug_assert_eq!(schema.fields().len(), fields.len());
        Self { schema, fields }
    }

    /// The schema this converter follows.
    pub fn schema(&self) -> &Arc<DocumentSchema> {
        &self.schema
    }
}

impl fmt::Debug for DocumentAttributeConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<_> = self.schema.fields().iter().map(|f| f.name()).collect();
        f.debug_struct("DocumentAttributeConverter")
            .field("descriptor", self.schema.type_descriptor())
            .field("fields", &fields)
            .finish()
    }
}

impl AttributeValueVisitor for DocumentAttributeConverter {
    type Output = DomainValue;

    fn target_type(&self) -> &TypeDescriptor {
        self.schema.type_descriptor()
    }

    fn converter_name(&self) -> &'static str {
        "DocumentAttributeConverter"
    }

    fn expected_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }

    fn convert_map(
        &self,
        mut value: HashMap<String, AttributeValue>,
    ) -> Result<DomainValue, ConversionError> {
        let mut document = self.schema.new_instance();
        for (field, converter) in self.schema.fields().iter().zip(&self.fields) {
            let at_field = |err: ConversionError| err.at(PathSegment::Field(field.name().into()));
            if let Some(attribute) = value.remove(field.name()) {
                let field_value = converter.transform_to(attribute).map_err(at_field)?;
                field
                    .set((*document).as_any_mut(), field_value)
                    .map_err(at_field)?;
            }
        }
        Ok(DomainValue::Scalar(document))
    }
}

impl ConvertAttribute for DocumentAttributeConverter {
    fn type_descriptor(&self) -> &TypeDescriptor {
        self.schema.type_descriptor()
    }

    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::M
    }

    fn transform_from(&self, input: &DomainValue) -> Result<AttributeValue, ConversionError> {
        let unexpected = || {
            ConversionError::unexpected_domain_value(
                self.schema.type_descriptor().clone(),
                input.describe(),
            )
        };
        let document = match input {
            DomainValue::Scalar(document) => (**document).as_any(),
            _ => return Err(unexpected()),
        };
        let mut item = HashMap::with_capacity(self.fields.len());
        for (field, converter) in self.schema.fields().iter().zip(&self.fields) {
            let field_value = field.get(document).ok_or_else(unexpected)?;
            let attribute = converter
                .transform_from(&field_value)
                .map_err(|err| err.at(PathSegment::Field(field.name().into())))?;
            if self.schema.ignore_nulls() && attribute.is_null() {
                continue;
            }
            item.insert(field.name().to_string(), attribute);
        }
        Ok(AttributeValue::M(item))
    }

    fn transform_to(&self, input: AttributeValue) -> Result<DomainValue, ConversionError> {
        input.convert(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{erase, NumberAttributeConverter, OptionalAttributeConverter};
    use crate::converter::StringAttributeConverter;
    use crate::error::ConversionErrorKind;
    use crate::type_descriptor::RawType;
    use crate::value::AttributeType;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Account {
        id: u32,
        nickname: Option<String>,
    }

    impl AttributeType for Account {
        fn type_descriptor() -> TypeDescriptor {
            TypeDescriptor::of(RawType::new("test#Account"))
        }
    }

    fn converter(ignore_nulls: bool) -> DocumentAttributeConverter {
        let schema = DocumentSchema::builder::<Account>()
            .field("id", |a| &a.id, |a, v| a.id = v)
            .field("nickname", |a| &a.nickname, |a, v| a.nickname = v)
            .ignore_nulls(ignore_nulls)
            .build();
        DocumentAttributeConverter::new(
            schema,
            vec![
                erase(NumberAttributeConverter::<u32>::new()),
                Arc::new(OptionalAttributeConverter::new(erase(
                    StringAttributeConverter::<String>::new(),
                ))),
            ],
        )
    }

    #[test]
    fn documents_round_trip() {
        let account = Account {
            id: 7,
            nickname: None,
        };
        let converter = converter(false);
        let av = converter.transform_from(&account.to_domain_value()).unwrap();
        assert_eq!(
            av,
            AttributeValue::from_map([
                ("id", AttributeValue::from_number("7")),
                ("nickname", AttributeValue::Null),
            ])
        );
        let back = Account::from_domain_value(converter.transform_to(av).unwrap()).unwrap();
        assert_eq!(back, account);
    }

    #[test]
    fn nulls_can_be_left_out() {
        let av = converter(true)
            .transform_from(&Account::default().to_domain_value())
            .unwrap();
        assert_eq!(
            av,
            AttributeValue::from_map([("id", AttributeValue::from_number("0"))])
        );
    }

    #[test]
    fn missing_fields_keep_their_defaults() {
        let av = AttributeValue::from_map([
            ("nickname", AttributeValue::from_string("kit")),
            ("unknown", AttributeValue::from_bool(true)),
        ]);
        let back = Account::from_domain_value(converter(false).transform_to(av).unwrap()).unwrap();
        assert_eq!(
            back,
            Account {
                id: 0,
                nickname: Some("kit".into())
            }
        );
    }

    #[test]
    fn field_errors_name_the_field() {
        let av = AttributeValue::from_map([("id", AttributeValue::from_number("-1"))]);
        let err = converter(false).transform_to(av).unwrap_err();
        assert_eq!(err.path(), &[PathSegment::Field("id".into())]);
        assert!(err.to_string().starts_with("invalid value for u32 at 'id'"));
    }

    #[test]
    fn other_types_are_rejected() {
        let err = converter(false)
            .transform_from(&DomainValue::scalar(1u32))
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ConversionErrorKind::UnexpectedDomainValue { .. }
        ));
    }
}
