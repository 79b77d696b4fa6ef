/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! The tagged attribute value representation exchanged with the store.

use aws_smithy_types::Blob;
use std::collections::HashMap;
use std::fmt;

/// A single DynamoDB attribute value.
///
/// Exactly one variant is populated. Numbers are carried as decimal strings so that
/// no precision is lost between the store and the converter that parses them.
/// Sets must be non-empty when sent to the store; converters never emit empty sets.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// `NULL`
    Null,
    /// `S`: a string
    S(String),
    /// `N`: a number, as a decimal string
    N(String),
    /// `BOOL`
    Bool(bool),
    /// `B`: binary data
    B(Blob),
    /// `SS`: a string set
    Ss(Vec<String>),
    /// `NS`: a number set, as decimal strings
    Ns(Vec<String>),
    /// `BS`: a binary set
    Bs(Vec<Blob>),
    /// `L`: an ordered list of attribute values
    L(Vec<AttributeValue>),
    /// `M`: a string-keyed map of attribute values
    M(HashMap<String, AttributeValue>),
}

/// The variant of an [`AttributeValue`], used for diagnostics and set collapsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeValueType {
    /// `NULL`
    Null,
    /// `S`
    S,
    /// `N`
    N,
    /// `BOOL`
    Bool,
    /// `B`
    B,
    /// `SS`
    Ss,
    /// `NS`
    Ns,
    /// `BS`
    Bs,
    /// `L`
    L,
    /// `M`
    M,
}

impl AttributeValueType {
    /// Returns the DynamoDB type code, e.g. `"SS"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeValueType::Null => "NULL",
            AttributeValueType::S => "S",
            AttributeValueType::N => "N",
            AttributeValueType::Bool => "BOOL",
            AttributeValueType::B => "B",
            AttributeValueType::Ss => "SS",
            AttributeValueType::Ns => "NS",
            AttributeValueType::Bs => "BS",
            AttributeValueType::L => "L",
            AttributeValueType::M => "M",
        }
    }

    /// Returns the set type that collects values of this scalar type, if there is one.
    pub fn set_type(&self) -> Option<AttributeValueType> {
        match self {
            AttributeValueType::S => Some(AttributeValueType::Ss),
            AttributeValueType::N => Some(AttributeValueType::Ns),
            AttributeValueType::B => Some(AttributeValueType::Bs),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AttributeValue {
    /// Creates a `NULL` attribute value.
    pub fn null() -> Self {
        AttributeValue::Null
    }

    /// Creates an `S` attribute value.
    pub fn from_string(value: impl Into<String>) -> Self {
        AttributeValue::S(value.into())
    }

    /// Creates an `N` attribute value from its decimal string form.
    pub fn from_number(value: impl Into<String>) -> Self {
        AttributeValue::N(value.into())
    }

    /// Creates a `BOOL` attribute value.
    pub fn from_bool(value: bool) -> Self {
        AttributeValue::Bool(value)
    }

    /// Creates a `B` attribute value.
    pub fn from_bytes(value: impl Into<Vec<u8>>) -> Self {
        AttributeValue::B(Blob::new(value))
    }

    /// Creates an `SS` attribute value.
    pub fn from_string_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::Ss(values.into_iter().map(Into::into).collect())
    }

    /// Creates an `NS` attribute value.
    pub fn from_number_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributeValue::Ns(values.into_iter().map(Into::into).collect())
    }

    /// Creates a `BS` attribute value.
    pub fn from_bytes_set<I, B>(values: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Vec<u8>>,
    {
        AttributeValue::Bs(values.into_iter().map(Blob::new).collect())
    }

    /// Creates an `L` attribute value.
    pub fn from_list(values: impl IntoIterator<Item = AttributeValue>) -> Self {
        AttributeValue::L(values.into_iter().collect())
    }

    /// Creates an `M` attribute value.
    pub fn from_map<K: Into<String>>(
        entries: impl IntoIterator<Item = (K, AttributeValue)>,
    ) -> Self {
        AttributeValue::M(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns which variant this value is.
    pub fn attribute_value_type(&self) -> AttributeValueType {
        match self {
            AttributeValue::Null => AttributeValueType::Null,
            AttributeValue::S(_) => AttributeValueType::S,
            AttributeValue::N(_) => AttributeValueType::N,
            AttributeValue::Bool(_) => AttributeValueType::Bool,
            AttributeValue::B(_) => AttributeValueType::B,
            AttributeValue::Ss(_) => AttributeValueType::Ss,
            AttributeValue::Ns(_) => AttributeValueType::Ns,
            AttributeValue::Bs(_) => AttributeValueType::Bs,
            AttributeValue::L(_) => AttributeValueType::L,
            AttributeValue::M(_) => AttributeValueType::M,
        }
    }

    /// Returns true if this is `NULL`.
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Returns the string if this is an `S`.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the decimal string if this is an `N`.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            AttributeValue::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `BOOL`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the blob if this is a `B`.
    pub fn as_b(&self) -> Option<&Blob> {
        match self {
            AttributeValue::B(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the elements if this is an `SS`.
    pub fn as_ss(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Ss(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the elements if this is an `NS`.
    pub fn as_ns(&self) -> Option<&[String]> {
        match self {
            AttributeValue::Ns(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the elements if this is a `BS`.
    pub fn as_bs(&self) -> Option<&[Blob]> {
        match self {
            AttributeValue::Bs(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the elements if this is an `L`.
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::L(values) => Some(values),
            _ => None,
        }
    }

    /// Returns the entries if this is an `M`.
    pub fn as_m(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            AttributeValue::M(entries) => Some(entries),
            _ => None,
        }
    }
}
