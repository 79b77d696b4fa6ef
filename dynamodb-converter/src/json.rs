/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! DynamoDB JSON for [`AttributeValue`].
//!
//! Each value is an object with exactly one type key, as in the store's wire protocol:
//! `{"S":"x"}`, `{"N":"1"}`, `{"B":"AQI="}`, `{"NULL":true}`, `{"L":[{"BOOL":true}]}`.

use crate::attribute_value::AttributeValue;
use aws_smithy_types::{base64, Blob};
use serde::de::{self, MapAccess, Unexpected, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

const TYPE_KEYS: &[&str] = &["NULL", "S", "N", "BOOL", "B", "SS", "NS", "BS", "L", "M"];

struct Base64<'a>(&'a Blob);

impl Serialize for Base64<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&base64::encode(self.0.as_ref()))
    }
}

struct Base64Set<'a>(&'a [Blob]);

impl Serialize for Base64Set<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for blob in self.0 {
            seq.serialize_element(&Base64(blob))?;
        }
        seq.end()
    }
}

impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let key = self.attribute_value_type().as_str();
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            AttributeValue::Null => map.serialize_entry(key, &true)?,
            AttributeValue::S(value) | AttributeValue::N(value) => {
                map.serialize_entry(key, value)?
            }
            AttributeValue::Bool(value) => map.serialize_entry(key, value)?,
            AttributeValue::B(value) => map.serialize_entry(key, &Base64(value))?,
            AttributeValue::Ss(values) | AttributeValue::Ns(values) => {
                map.serialize_entry(key, values)?
            }
            AttributeValue::Bs(values) => map.serialize_entry(key, &Base64Set(values))?,
            AttributeValue::L(values) => map.serialize_entry(key, values)?,
            AttributeValue::M(values) => map.serialize_entry(key, values)?,
        }
        map.end()
    }
}

fn decode<E: de::Error>(encoded: &str) -> Result<Blob, E> {
    base64::decode(encoded)
        .map(Blob::new)
        .map_err(|_| E::invalid_value(Unexpected::Str(encoded), &"standard base64"))
}

struct JsonVisitor;

impl<'de> Visitor<'de> for JsonVisitor {
    type Value = AttributeValue;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a DynamoDB attribute value object with exactly one type key")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let value = match key.as_str() {
            "NULL" => {
                if !map.next_value::<bool>()? {
                    return Err(de::Error::invalid_value(
                        Unexpected::Bool(false),
                        &"`true` for NULL",
                    ));
                }
                AttributeValue::Null
            }
            "S" => AttributeValue::S(map.next_value()?),
            "N" => AttributeValue::N(map.next_value()?),
            "BOOL" => AttributeValue::Bool(map.next_value()?),
            "B" => AttributeValue::B(decode::<A::Error>(&map.next_value::<String>()?)?),
            "SS" => AttributeValue::Ss(map.next_value()?),
            "NS" => AttributeValue::Ns(map.next_value()?),
            "BS" => AttributeValue::Bs(
                map.next_value::<Vec<String>>()?
                    .iter()
                    .map(|encoded| decode::<A::Error>(encoded))
                    .collect::<Result<_, _>>()?,
            ),
            "L" => AttributeValue::L(map.next_value()?),
            "M" => AttributeValue::M(map.next_value::<HashMap<String, AttributeValue>>()?),
            other => return Err(de::Error::unknown_field(other, TYPE_KEYS)),
        };
        if let Some(extra) = map.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "attribute value has more than one type key: {} and {}",
                key, extra
            )));
        }
        Ok(value)
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(JsonVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn values_use_the_store_shape() {
        let value = AttributeValue::from_map([
            ("id", AttributeValue::from_number("5")),
            ("tags", AttributeValue::from_string_set(["a", "b"])),
            ("data", AttributeValue::from_bytes(vec![1u8, 2, 3])),
            ("gone", AttributeValue::Null),
            (
                "list",
                AttributeValue::from_list([AttributeValue::from_bool(false)]),
            ),
        ]);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({
                "M": {
                    "id": { "N": "5" },
                    "tags": { "SS": ["a", "b"] },
                    "data": { "B": "AQID" },
                    "gone": { "NULL": true },
                    "list": { "L": [{ "BOOL": false }] }
                }
            })
        );
    }

    #[test]
    fn store_json_is_read_back() {
        let json = r#"{"L":[{"S":"x"},{"NS":["1","2.5"]},{"BS":["AQID","BA=="]},{"M":{}}]}"#;
        let value: AttributeValue = serde_json::from_str(json).unwrap();
        assert_eq!(
            value,
            AttributeValue::from_list([
                AttributeValue::from_string("x"),
                AttributeValue::from_number_set(["1", "2.5"]),
                AttributeValue::from_bytes_set([vec![1u8, 2, 3], vec![4u8]]),
                AttributeValue::M(HashMap::new()),
            ])
        );
        assert_eq!(serde_json::to_string(&value).unwrap(), json);
    }

    #[test]
    fn malformed_objects_are_rejected() {
        for json in [
            r#"{}"#,
            r#"{"S":"x","N":"1"}"#,
            r#"{"X":"x"}"#,
            r#"{"NULL":false}"#,
            r#"{"B":"not base64!"}"#,
            r#"{"N":1}"#,
            r#""S""#,
        ] {
            assert!(
                serde_json::from_str::<AttributeValue>(json).is_err(),
                "{json} should not parse"
            );
        }
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = serde_json::from_str::<AttributeValue>(r#"{"S":"x","N":"1"}"#).unwrap_err();
        assert!(err.to_string().contains("more than one type key: S and N"), "{err}");
        let err = serde_json::from_str::<AttributeValue>(r#"{"X":"x"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown field `X`"), "{err}");
    }
}
