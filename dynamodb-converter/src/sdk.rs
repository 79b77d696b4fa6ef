/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Conversions to and from the AWS SDK's attribute value.

use crate::attribute_value::AttributeValue;
use aws_sdk_dynamodb::types::AttributeValue as SdkAttributeValue;

/// Error returned when an SDK attribute value has no equivalent [`AttributeValue`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported attribute value: {description}")]
pub struct UnsupportedAttributeValue {
    description: String,
}

impl UnsupportedAttributeValue {
    fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl From<AttributeValue> for SdkAttributeValue {
    fn from(value: AttributeValue) -> Self {
        match value {
            AttributeValue::Null => SdkAttributeValue::Null(true),
            AttributeValue::S(value) => SdkAttributeValue::S(value),
            AttributeValue::N(value) => SdkAttributeValue::N(value),
            AttributeValue::Bool(value) => SdkAttributeValue::Bool(value),
            AttributeValue::B(value) => SdkAttributeValue::B(value),
            AttributeValue::Ss(values) => SdkAttributeValue::Ss(values),
            AttributeValue::Ns(values) => SdkAttributeValue::Ns(values),
            AttributeValue::Bs(values) => SdkAttributeValue::Bs(values),
            AttributeValue::L(values) => {
                SdkAttributeValue::L(values.into_iter().map(Into::into).collect())
            }
            AttributeValue::M(values) => SdkAttributeValue::M(
                values
                    .into_iter()
                    .map(|(key, value)| (key, value.into()))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<SdkAttributeValue> for AttributeValue {
    type Error = UnsupportedAttributeValue;

    fn try_from(value: SdkAttributeValue) -> Result<Self, Self::Error> {
        Ok(match value {
            SdkAttributeValue::Null(true) => AttributeValue::Null,
            SdkAttributeValue::Null(false) => {
                return Err(UnsupportedAttributeValue::new("NULL set to false"))
            }
            SdkAttributeValue::S(value) => AttributeValue::S(value),
            SdkAttributeValue::N(value) => AttributeValue::N(value),
            SdkAttributeValue::Bool(value) => AttributeValue::Bool(value),
            SdkAttributeValue::B(value) => AttributeValue::B(value),
            SdkAttributeValue::Ss(values) => AttributeValue::Ss(values),
            SdkAttributeValue::Ns(values) => AttributeValue::Ns(values),
            SdkAttributeValue::Bs(values) => AttributeValue::Bs(values),
            SdkAttributeValue::L(values) => AttributeValue::L(
                values
                    .into_iter()
                    .map(AttributeValue::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            SdkAttributeValue::M(values) => AttributeValue::M(
                values
                    .into_iter()
                    .map(|(key, value)| Ok((key, AttributeValue::try_from(value)?)))
                    .collect::<Result<_, UnsupportedAttributeValue>>()?,
            ),
            other => {
                return Err(UnsupportedAttributeValue::new(format!(
                    "unknown variant {:?}",
                    other
                )))
            }
        })
    }
}
