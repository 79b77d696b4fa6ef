/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use dynamodb_converter::{
    erase, AttributeConverter, AttributeType, AttributeValue, AttributeValueType,
    ConversionError, ConversionErrorKind, ConverterRegistry, DomainValue, PathSegment, RawKind,
    RawType, ResolveError, StringConverter, TextForm, TextStringConverter, TypeDescriptor,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::thread;

#[test]
fn nested_collections_round_trip() {
    let registry = ConverterRegistry::new();
    let descriptor = TypeDescriptor::list_of(TypeDescriptor::set_of(TypeDescriptor::map_of(
        TypeDescriptor::of(dynamodb_converter::prelude::STRING),
        TypeDescriptor::of(dynamodb_converter::prelude::INTEGER),
    )));
    assert!(registry.resolve(&descriptor).is_ok());

    let converter = registry
        .converter_for::<Vec<BTreeSet<BTreeMap<String, i32>>>>()
        .unwrap();
    let value = vec![BTreeSet::from([
        BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 2)]),
        BTreeMap::new(),
    ])];
    let attribute = converter.transform_from(&value).unwrap();
    // maps have no native set type, so the set is written as a list
    assert_eq!(
        attribute,
        AttributeValue::from_list([AttributeValue::from_list([
            AttributeValue::M(HashMap::new()),
            AttributeValue::from_map([
                ("a", AttributeValue::from_number("1")),
                ("b", AttributeValue::from_number("2")),
            ]),
        ])])
    );
    assert_eq!(converter.transform_to(attribute).unwrap(), value);
}

#[test]
fn concurrent_resolution_converges() {
    let registry = Arc::new(ConverterRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                let converter = registry
                    .converter_for::<HashMap<String, Vec<Option<i64>>>>()
                    .unwrap();
                let value = HashMap::from([(format!("k{i}"), vec![Some(i), None])]);
                let attribute = converter.transform_from(&value).unwrap();
                assert_eq!(converter.transform_to(attribute.clone()).unwrap(), value);
                (converter.erased().clone(), attribute)
            })
        })
        .collect();
    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let first = &results[0].0;
    for (converter, _) in &results {
        assert!(Arc::ptr_eq(first, converter));
    }
    assert_eq!(
        results[3].1,
        AttributeValue::from_map([(
            "k3",
            AttributeValue::from_list([AttributeValue::from_number("3"), AttributeValue::Null]),
        )])
    );
}

#[derive(Debug)]
struct UpperCase;

impl AttributeConverter<String> for UpperCase {
    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }

    fn transform_from(&self, input: &String) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::from_string(input.to_uppercase()))
    }

    fn transform_to(&self, input: AttributeValue) -> Result<String, ConversionError> {
        match input {
            AttributeValue::S(value) => Ok(value.to_lowercase()),
            other => Err(ConversionError::type_mismatch(
                TypeDescriptor::of(dynamodb_converter::prelude::STRING),
                "UpperCase",
                AttributeValueType::S,
                other.attribute_value_type(),
            )),
        }
    }
}

#[derive(Debug)]
struct Reversed;

impl AttributeConverter<String> for Reversed {
    fn attribute_value_type(&self) -> AttributeValueType {
        AttributeValueType::S
    }

    fn transform_from(&self, input: &String) -> Result<AttributeValue, ConversionError> {
        Ok(AttributeValue::from_string(input.chars().rev().collect::<String>()))
    }

    fn transform_to(&self, input: AttributeValue) -> Result<String, ConversionError> {
        Ok(input.as_s().unwrap_or_default().chars().rev().collect())
    }
}

#[test]
fn later_registrations_win() {
    let registry = ConverterRegistry::builder()
        .add_default_converters()
        .add_converter(UpperCase)
        .add_converter(Reversed)
        .build();
    let converter = registry.converter_for::<Vec<String>>().unwrap();
    assert_eq!(
        converter.transform_from(&vec!["abc".to_string()]).unwrap(),
        AttributeValue::from_list([AttributeValue::from_string("cba")])
    );

    let registry = ConverterRegistry::builder()
        .add_default_converters()
        .add_converter(Reversed)
        .add_converter(UpperCase)
        .build();
    // also registered under the prelude alias
    let converter = registry
        .resolve(&TypeDescriptor::of(dynamodb_converter::prelude::STRING))
        .unwrap();
    assert_eq!(format!("{converter:?}"), "UpperCase");
}

#[test]
fn mismatched_variants_name_the_converter() {
    let registry = ConverterRegistry::new();
    let converter = registry.converter_for::<BTreeMap<String, i32>>().unwrap();
    let err = converter
        .transform_to(AttributeValue::from_map([("a", AttributeValue::from_bool(true))]))
        .unwrap_err();
    match err.kind() {
        ConversionErrorKind::TypeMismatch {
            converter,
            expected,
            actual,
            ..
        } => {
            assert_eq!(*converter, "NumberAttributeConverter");
            assert_eq!(*expected, AttributeValueType::N);
            assert_eq!(*actual, AttributeValueType::Bool);
        }
        other => panic!("unexpected error kind {other:?}"),
    }
    assert_eq!(err.path(), &[PathSegment::Key("a".into())]);
    assert_eq!(
        err.to_string(),
        r#"invalid type for i32 at '["a"]': NumberAttributeConverter expected N, got BOOL"#
    );
}

#[test]
fn optionals_are_null_when_absent() {
    let registry = ConverterRegistry::new();
    let converter = registry.converter_for::<Option<String>>().unwrap();
    assert_eq!(converter.attribute_value_type(), AttributeValueType::S);

    assert_eq!(converter.transform_from(&None).unwrap(), AttributeValue::Null);
    assert_eq!(
        converter.transform_from(&Some("x".into())).unwrap(),
        AttributeValue::from_string("x")
    );
    assert_eq!(converter.transform_to(AttributeValue::Null).unwrap(), None);
    assert_eq!(
        converter
            .transform_to(AttributeValue::from_string("x"))
            .unwrap(),
        Some("x".to_string())
    );
    assert!(converter
        .transform_to(AttributeValue::from_number("1"))
        .is_err());
}

#[test]
fn resolve_errors_name_the_innermost_type() {
    let registry = ConverterRegistry::new();
    let err = registry
        .converter_for::<Vec<HashMap<Vec<i32>, String>>>()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no string converter for key type List<i32> of Map<List<i32>, String>"
    );

    let registry = ConverterRegistry::builder()
        .add_default_converters()
        .max_depth(3)
        .build();
    let err = registry
        .converter_for::<Vec<Vec<Vec<String>>>>()
        .unwrap_err();
    assert!(matches!(err, ResolveError::DepthExceeded { max_depth: 3, .. }));
    assert_eq!(err.descriptor(), &TypeDescriptor::of(dynamodb_converter::RawType::new("String")));
}

#[test]
fn warm_and_cold_caches_agree_on_depth() {
    let build = || {
        ConverterRegistry::builder()
            .add_default_converters()
            .max_depth(3)
            .build()
    };
    let cold = build()
        .converter_for::<Vec<Vec<Vec<i32>>>>()
        .map(|_| ());

    let warm = build();
    warm.converter_for::<Vec<Vec<i32>>>().unwrap();
    warm.converter_for::<Vec<i32>>().unwrap();
    assert_eq!(warm.converter_for::<Vec<Vec<Vec<i32>>>>().map(|_| ()), cold);
    assert!(cold.is_err());
}

#[test]
fn later_registrations_win_through_add_converters() {
    let registry = ConverterRegistry::builder()
        .add_default_converters()
        .add_converters([erase::<String, _>(UpperCase), erase::<String, _>(Reversed)])
        .build();
    let converter = registry.converter_for::<String>().unwrap();
    assert_eq!(format!("{:?}", converter.erased()), "Reversed");
    assert_eq!(
        converter.transform_from(&"abc".to_string()).unwrap(),
        AttributeValue::from_string("cba")
    );

    let registry = ConverterRegistry::builder()
        .add_converters([erase::<String, _>(UpperCase)])
        .build();
    assert!(registry.converter_for::<String>().is_ok());
    assert_eq!(
        registry.converter_for::<i32>().unwrap_err(),
        ResolveError::ConverterNotFound(i32::type_descriptor())
    );
}

/// Writes `u32` map keys in hexadecimal.
#[derive(Debug)]
struct HexKeys(TypeDescriptor);

impl StringConverter for HexKeys {
    fn type_descriptor(&self) -> &TypeDescriptor {
        &self.0
    }

    fn encode(&self, value: &DomainValue) -> Result<String, ConversionError> {
        match value.downcast_ref::<u32>() {
            Some(key) => Ok(format!("{key:x}")),
            None => Err(ConversionError::unexpected_domain_value(
                self.0.clone(),
                value.describe(),
            )),
        }
    }

    fn decode(&self, text: &str) -> Result<DomainValue, ConversionError> {
        u32::from_str_radix(text, 16)
            .map(DomainValue::scalar)
            .map_err(|err| ConversionError::invalid_value(self.0.clone(), err.to_string()))
    }
}

#[test]
fn later_key_codecs_win() {
    let value = BTreeMap::from([(255u32, true)]);

    let registry = ConverterRegistry::builder()
        .add_default_converters()
        .add_string_converter(HexKeys(u32::type_descriptor()))
        .build();
    let converter = registry.converter_for::<BTreeMap<u32, bool>>().unwrap();
    let attribute = converter.transform_from(&value).unwrap();
    assert_eq!(
        attribute,
        AttributeValue::from_map([("ff", AttributeValue::from_bool(true))])
    );
    assert_eq!(converter.transform_to(attribute).unwrap(), value);

    let registry = ConverterRegistry::builder()
        .add_string_converter(HexKeys(u32::type_descriptor()))
        .add_default_converters()
        .build();
    let converter = registry.converter_for::<BTreeMap<u32, bool>>().unwrap();
    assert_eq!(
        converter.transform_from(&value).unwrap(),
        AttributeValue::from_map([("255", AttributeValue::from_bool(true))])
    );
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Sku(String);

impl AttributeType for Sku {
    fn type_descriptor() -> TypeDescriptor {
        TypeDescriptor::of(RawType::new("test#Sku"))
    }
}

impl TextForm for Sku {
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(format!("SKU-{}", self.0))
    }

    fn from_text(text: &str) -> Result<Self, ConversionError> {
        text.strip_prefix("SKU-")
            .map(|code| Sku(code.to_string()))
            .ok_or_else(|| {
                ConversionError::invalid_value(
                    Sku::type_descriptor(),
                    format!("'{text}' has no SKU- prefix"),
                )
            })
    }
}

#[test]
fn user_key_codecs_make_new_key_types_usable() {
    let registry = ConverterRegistry::new();
    assert_eq!(
        registry.converter_for::<HashMap<Sku, u32>>().unwrap_err(),
        ResolveError::KeyCodecNotFound {
            key: Sku::type_descriptor(),
            map: HashMap::<Sku, u32>::type_descriptor(),
        }
    );

    let registry = ConverterRegistry::builder()
        .add_default_converters()
        .add_string_converter(TextStringConverter::<Sku>::new())
        .build();
    assert!(registry.string_converter(&Sku::type_descriptor()).is_some());
    let converter = registry.converter_for::<HashMap<Sku, u32>>().unwrap();
    let value = HashMap::from([(Sku("a1".into()), 3)]);
    let attribute = converter.transform_from(&value).unwrap();
    assert_eq!(
        attribute,
        AttributeValue::from_map([("SKU-a1", AttributeValue::from_number("3"))])
    );
    assert_eq!(converter.transform_to(attribute).unwrap(), value);

    let err = converter
        .transform_to(AttributeValue::from_map([("a1", AttributeValue::from_number("3"))]))
        .unwrap_err();
    assert!(matches!(err.kind(), ConversionErrorKind::InvalidValue { .. }));
}

#[test]
fn custom_structural_kinds_are_resolved_like_the_built_ins() {
    let registry = ConverterRegistry::new();

    let deque = TypeDescriptor::with_parameters(
        RawType::with_kind("test#Deque", RawKind::Sequence),
        [i32::type_descriptor()],
    )
    .unwrap();
    let converter = registry.resolve(&deque).unwrap();
    assert_eq!(converter.type_descriptor(), &deque);
    assert_eq!(converter.attribute_value_type(), AttributeValueType::L);
    let attribute = converter
        .transform_from(&vec![1i32, 2].to_domain_value())
        .unwrap();
    assert_eq!(
        attribute,
        AttributeValue::from_list([
            AttributeValue::from_number("1"),
            AttributeValue::from_number("2"),
        ])
    );
    assert_eq!(
        Vec::<i32>::from_domain_value(converter.transform_to(attribute).unwrap()).unwrap(),
        vec![1, 2]
    );
    let list = registry.resolve(&Vec::<i32>::type_descriptor()).unwrap();
    assert!(!Arc::ptr_eq(&converter, &list));

    let bag = TypeDescriptor::with_parameters(
        RawType::with_kind("test#Bag", RawKind::Set),
        [String::type_descriptor()],
    )
    .unwrap();
    let converter = registry.resolve(&bag).unwrap();
    let value = BTreeSet::from(["x".to_string(), "y".to_string()]);
    let attribute = converter.transform_from(&value.to_domain_value()).unwrap();
    assert_eq!(attribute, AttributeValue::from_string_set(["x", "y"]));
    assert_eq!(
        BTreeSet::<String>::from_domain_value(converter.transform_to(attribute).unwrap()).unwrap(),
        value
    );

    let dict = TypeDescriptor::with_parameters(
        RawType::with_kind("test#Dict", RawKind::Mapping),
        [String::type_descriptor(), i64::type_descriptor()],
    )
    .unwrap();
    let converter = registry.resolve(&dict).unwrap();
    let value = BTreeMap::from([("n".to_string(), -4i64)]);
    let attribute = converter.transform_from(&value.to_domain_value()).unwrap();
    assert_eq!(attribute, AttributeValue::from_map([("n", AttributeValue::from_number("-4"))]));
    assert_eq!(
        BTreeMap::<String, i64>::from_domain_value(converter.transform_to(attribute).unwrap())
            .unwrap(),
        value
    );

    let keyed_by_list = TypeDescriptor::with_parameters(
        RawType::with_kind("test#Dict", RawKind::Mapping),
        [Vec::<i32>::type_descriptor(), i64::type_descriptor()],
    )
    .unwrap();
    assert!(matches!(
        registry.resolve(&keyed_by_list).unwrap_err(),
        ResolveError::KeyCodecNotFound { .. }
    ));
}

#[test]
fn uncacheable_types_are_resolved_every_time() {
    let registry = ConverterRegistry::new();
    let synthetic = TypeDescriptor::map_of(
        TypeDescriptor::of(dynamodb_converter::prelude::STRING),
        TypeDescriptor::of(dynamodb_converter::prelude::LONG),
    )
    .uncacheable();
    registry.resolve(&synthetic).unwrap();
    // the value converter is still cached
    assert_eq!(registry.cached_len(), 1);
    registry.resolve(&synthetic).unwrap();
    assert_eq!(registry.cached_len(), 1);
}

#[test]
fn uris_are_strings_and_map_keys() {
    let registry = ConverterRegistry::new();
    let converter = registry
        .converter_for::<HashMap<http::Uri, Vec<http::Uri>>>()
        .unwrap();
    let value = HashMap::from([(
        http::Uri::from_static("https://example.com/a"),
        vec![http::Uri::from_static("/b?c=d")],
    )]);
    let attribute = converter.transform_from(&value).unwrap();
    assert_eq!(
        attribute,
        AttributeValue::from_map([(
            "https://example.com/a",
            AttributeValue::from_list([AttributeValue::from_string("/b?c=d")]),
        )])
    );
    assert_eq!(converter.transform_to(attribute).unwrap(), value);
}

proptest! {
    #[test]
    fn maps_of_numbers_round_trip(value in prop::collection::btree_map(any::<i64>(), any::<u32>(), 0..8)) {
        let registry = ConverterRegistry::new();
        let converter = registry.converter_for::<BTreeMap<i64, u32>>().unwrap();
        let attribute = converter.transform_from(&value).unwrap();
        prop_assert_eq!(converter.transform_to(attribute).unwrap(), value);
    }

    #[test]
    fn string_sets_collapse_unless_empty(value in prop::collection::btree_set("[a-z]{0,6}", 0..6)) {
        let registry = ConverterRegistry::new();
        let converter = registry.converter_for::<BTreeSet<String>>().unwrap();
        let attribute = converter.transform_from(&value).unwrap();
        let expected = if value.is_empty() { AttributeValueType::L } else { AttributeValueType::Ss };
        prop_assert_eq!(attribute.attribute_value_type(), expected);
        prop_assert_eq!(converter.transform_to(attribute).unwrap(), value);
    }
}
