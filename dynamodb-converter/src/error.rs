/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Error types for converter resolution and value conversion.

use crate::attribute_value::AttributeValueType;
use crate::type_descriptor::TypeDescriptor;
use std::fmt;

/// One step of the path from a top-level value to the element that failed to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A position in a list or set.
    Index(usize),
    /// A key of a map.
    Key(String),
    /// A field of a document.
    Field(String),
}

/// Error that occurs while converting between a domain value and an [`AttributeValue`].
///
/// [`AttributeValue`]: crate::AttributeValue
#[derive(Debug, Clone)]
pub struct ConversionError {
    kind: ConversionErrorKind,
    path: Vec<PathSegment>,
}

/// The kind of conversion error that occurred.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum ConversionErrorKind {
    /// The attribute value variant is not one the converter accepts.
    TypeMismatch {
        /// The domain type being produced.
        target: TypeDescriptor,
        /// The converter that rejected the value.
        converter: &'static str,
        /// The variant the converter writes.
        expected: AttributeValueType,
        /// The variant that was found.
        actual: AttributeValueType,
    },
    /// The attribute value had an accepted variant, but its content could not be parsed.
    InvalidValue {
        /// The domain type being produced.
        target: TypeDescriptor,
        /// Description of why the value was invalid.
        message: String,
    },
    /// The domain value handed to a converter was not of the type it serves.
    UnexpectedDomainValue {
        /// The type the converter serves.
        expected: TypeDescriptor,
        /// Description of the value that was found.
        actual: String,
    },
    /// A converter referenced by a recursive document is no longer alive.
    Unavailable {
        /// The document type whose converter is gone.
        target: TypeDescriptor,
    },
}

impl ConversionError {
    /// Creates an error for an unaccepted attribute value variant.
    pub fn type_mismatch(
        target: TypeDescriptor,
        converter: &'static str,
        expected: AttributeValueType,
        actual: AttributeValueType,
    ) -> Self {
        Self::new(ConversionErrorKind::TypeMismatch {
            target,
            converter,
            expected,
            actual,
        })
    }

    /// Creates an error for malformed content.
    pub fn invalid_value(target: TypeDescriptor, message: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::InvalidValue {
            target,
            message: message.into(),
        })
    }

    /// Creates an error for a domain value of the wrong type.
    pub fn unexpected_domain_value(expected: TypeDescriptor, actual: impl Into<String>) -> Self {
        Self::new(ConversionErrorKind::UnexpectedDomainValue {
            expected,
            actual: actual.into(),
        })
    }

    pub(crate) fn unavailable(target: TypeDescriptor) -> Self {
        Self::new(ConversionErrorKind::Unavailable { target })
    }

    fn new(kind: ConversionErrorKind) -> Self {
        Self {
            kind,
            path: Vec::new(),
        }
    }

    /// Prefixes the path with `segment`. Composite converters call this as errors
    /// bubble out of their elements, so the path reads outermost first.
    pub fn at(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> &ConversionErrorKind {
        &self.kind
    }

    /// Returns the path to the failing element, outermost first.
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Renders the path as `orders[1].tags["a"]`. Empty for top-level failures.
    pub fn path_string(&self) -> String {
        let mut rendered = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Index(index) => rendered.push_str(&format!("[{}]", index)),
                PathSegment::Key(key) => rendered.push_str(&format!("[{:?}]", key)),
                PathSegment::Field(name) if rendered.is_empty() => rendered.push_str(name),
                PathSegment::Field(name) => {
                    rendered.push('.');
                    rendered.push_str(name);
                }
            }
        }
        rendered
    }
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ConversionErrorKind::TypeMismatch { target, .. } => {
                write!(f, "invalid type for {}", target)?
            }
            ConversionErrorKind::InvalidValue { target, .. } => {
                write!(f, "invalid value for {}", target)?
            }
            ConversionErrorKind::UnexpectedDomainValue { expected, .. } => {
                write!(f, "unexpected domain value for {}", expected)?
            }
            ConversionErrorKind::Unavailable { target } => {
                write!(f, "converter for {} is no longer available", target)?
            }
        }
        if !self.path.is_empty() {
            write!(f, " at '{}'", self.path_string())?;
        }
        match &self.kind {
            ConversionErrorKind::TypeMismatch {
                converter,
                expected,
                actual,
                ..
            } => write!(f, ": {} expected {}, got {}", converter, expected, actual),
            ConversionErrorKind::InvalidValue { message, .. } => write!(f, ": {}", message),
            ConversionErrorKind::UnexpectedDomainValue { actual, .. } => {
                write!(f, ": got {}", actual)
            }
            ConversionErrorKind::Unavailable { .. } => Ok(()),
        }
    }
}

impl std::error::Error for ConversionError {}

/// Error returned when the registry cannot produce a converter for a type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// No static, structural or document-backed converter matches the type.
    #[error("converter not found for {0}")]
    ConverterNotFound(TypeDescriptor),
    /// A map key type has no registered string converter.
    #[error("no string converter for key type {key} of {map}")]
    KeyCodecNotFound {
        /// The key type.
        key: TypeDescriptor,
        /// The map type being resolved.
        map: TypeDescriptor,
    },
    /// A document type contains itself with no list, set, map or optional in between,
    /// so no finite value of it exists.
    #[error("document {0} contains itself directly")]
    RecursiveDocument(TypeDescriptor),
    /// The type nests deeper than the registry allows.
    #[error("{descriptor} nests deeper than the maximum depth of {max_depth}")]
    DepthExceeded {
        /// The type being resolved when the limit was hit.
        descriptor: TypeDescriptor,
        /// The configured limit.
        max_depth: usize,
    },
}

impl ResolveError {
    /// Returns the type descriptor the failure is about.
    pub fn descriptor(&self) -> &TypeDescriptor {
        match self {
            ResolveError::ConverterNotFound(descriptor)
            | ResolveError::RecursiveDocument(descriptor)
            | ResolveError::DepthExceeded { descriptor, .. } => descriptor,
            ResolveError::KeyCodecNotFound { key, .. } => key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::type_descriptor::RawType;

    fn i32_type() -> TypeDescriptor {
        TypeDescriptor::of(RawType::new("i32"))
    }

    #[test]
    fn type_mismatch_names_both_sides() {
        let err = ConversionError::type_mismatch(
            i32_type(),
            "NumberAttributeConverter",
            AttributeValueType::N,
            AttributeValueType::Bool,
        );
        assert_eq!(
            err.to_string(),
            "invalid type for i32: NumberAttributeConverter expected N, got BOOL"
        );
    }

    #[test]
    fn path_is_rendered_outermost_first() {
        let err = ConversionError::invalid_value(i32_type(), "cannot parse 'x'")
            .at(PathSegment::Index(1))
            .at(PathSegment::Key("a".into()))
            .at(PathSegment::Field("tags".into()))
            .at(PathSegment::Field("order".into()));
        assert_eq!(err.path_string(), r#"order.tags["a"][1]"#);
        assert_eq!(
            err.to_string(),
            r#"invalid value for i32 at 'order.tags["a"][1]': cannot parse 'x'"#
        );
    }

    #[test]
    fn resolve_errors_identify_the_descriptor() {
        let err = ResolveError::KeyCodecNotFound {
            key: i32_type(),
            map: TypeDescriptor::map_of(i32_type(), i32_type()),
        };
        assert_eq!(err.descriptor(), &i32_type());
        assert_eq!(
            err.to_string(),
            "no string converter for key type i32 of Map<i32, i32>"
        );
    }
}
