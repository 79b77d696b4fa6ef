/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Bidirectional conversion between Rust values and DynamoDB attribute values.
//!
//! The crate is organized around a [`ConverterRegistry`] that, given a [`TypeDescriptor`],
//! returns a converter able to turn values of that type into an [`AttributeValue`] and
//! back:
//!
//! - Leaf converters for strings, numbers, booleans, binary data, date/time types, UUIDs
//!   and URIs are registered by default, each under its Rust type and its Smithy prelude
//!   alias.
//! - Lists, sets, maps and optionals are built on demand from the converters of their
//!   type parameters.
//! - User-defined documents are converted field by field from a [`DocumentSchema`],
//!   including documents that contain themselves through a collection.
//!
//! Resolved converters are cached and safe to share between threads.
//!
//! # Example
//!
//! ```
//! use dynamodb_converter::{AttributeValue, ConverterRegistry};
//! use std::collections::BTreeSet;
//!
//! let registry = ConverterRegistry::new();
//! let converter = registry.converter_for::<Vec<BTreeSet<String>>>().unwrap();
//!
//! let value = vec![BTreeSet::from(["a".to_string(), "b".to_string()]), BTreeSet::new()];
//! let attribute = converter.transform_from(&value).unwrap();
//! assert_eq!(
//!     attribute,
//!     AttributeValue::from_list([
//!         AttributeValue::from_string_set(["a", "b"]),
//!         AttributeValue::L(vec![]),
//!     ])
//! );
//! assert_eq!(converter.transform_to(attribute).unwrap(), value);
//! ```
//!
//! # Crate Features
//!
//! - `sdk` (default): conversions to and from `aws_sdk_dynamodb::types::AttributeValue`.

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    unreachable_pub,
    rust_2018_idioms
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod attribute_value;
pub mod converter;
pub mod error;
mod json;
mod number;
mod registry;
mod schema;
#[cfg(feature = "sdk")]
mod sdk;
mod text;
mod type_descriptor;
mod value;
mod visitor;

pub use attribute_value::{AttributeValue, AttributeValueType};
pub use converter::{erase, AttributeConverter, ConvertAttribute, TypedConverter};
pub use error::{ConversionError, ConversionErrorKind, PathSegment, ResolveError};
pub use number::{BigDecimal, BigInteger, InvalidNumber};
pub use registry::{ConverterRegistry, ConverterRegistryBuilder};
pub use schema::{DocumentSchema, DocumentSchemaBuilder, FieldSchema};
#[cfg(feature = "sdk")]
#[cfg_attr(docsrs, doc(cfg(feature = "sdk")))]
pub use sdk::UnsupportedAttributeValue;
pub use text::{StringConverter, TextForm, TextStringConverter};
pub use type_descriptor::{prelude, InvalidTypeDescriptor, RawKind, RawType, TypeDescriptor};
pub use value::{AttributeType, DomainObject, DomainValue};
pub use visitor::AttributeValueVisitor;
