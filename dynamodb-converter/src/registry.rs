/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Converter resolution.
//!
//! A [`ConverterRegistry`] turns a [`TypeDescriptor`] into a converter. Registered
//! converters are looked up first; lists, sets, maps and optionals are then built
//! structurally from converters for their parameters; finally, a document type is
//! converted field by field if a [`DocumentSchema`] for it was supplied. Results are
//! cached, so each descriptor is normally resolved once per registry. Converters that
//! needed a schema are cached for that schema only, and a cached converter still counts
//! its full nesting against the depth limit, so a warm cache resolves exactly what a
//! cold one does.

use crate::converter::recursive::{DocumentSlot, RecursiveAttributeConverter};
use crate::converter::{
    default_converters, default_string_converters, erase, AttributeConverter, ConvertAttribute,
    DocumentAttributeConverter, ListAttributeConverter, MapAttributeConverter,
    OptionalAttributeConverter, SetAttributeConverter, TypedConverter,
};
use crate::error::ResolveError;
use crate::schema::{DocumentSchema, NestedSchema};
use crate::text::StringConverter;
use crate::type_descriptor::{RawKind, TypeDescriptor};
use crate::value::AttributeType;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

const DEFAULT_MAX_DEPTH: usize = 64;

/// Resolves and caches converters for type descriptors.
///
/// The registry is immutable once built; only its cache changes. It is `Send + Sync`
/// and meant to be shared, e.g. behind an `Arc` or in a `static`.
///
/// ```
/// use dynamodb_converter::{AttributeValue, ConverterRegistry};
/// use std::collections::BTreeMap;
///
/// let registry = ConverterRegistry::new();
/// let converter = registry.converter_for::<BTreeMap<String, Vec<i32>>>().unwrap();
/// let value = BTreeMap::from([("a".to_string(), vec![1, 2])]);
/// let attribute = converter.transform_from(&value).unwrap();
/// assert_eq!(
///     attribute,
///     AttributeValue::from_map([(
///         "a",
///         AttributeValue::from_list([AttributeValue::from_number("1"), AttributeValue::from_number("2")]),
///     )])
/// );
/// assert_eq!(converter.transform_to(attribute).unwrap(), value);
/// ```
pub struct ConverterRegistry {
    converters: HashMap<TypeDescriptor, Arc<dyn ConvertAttribute>>,
    string_converters: HashMap<TypeDescriptor, Arc<dyn StringConverter>>,
    cache: DashMap<CacheKey, Cached>,
    max_depth: usize,
}

impl ConverterRegistry {
    /// Creates a registry with the default converters.
    pub fn new() -> Self {
        Self::builder().add_default_converters().build()
    }

    /// Starts an empty registry configuration.
    pub fn builder() -> ConverterRegistryBuilder {
        ConverterRegistryBuilder::new()
    }

    /// Resolves the converter for `descriptor`.
    pub fn resolve(
        &self,
        descriptor: &TypeDescriptor,
    ) -> Result<Arc<dyn ConvertAttribute>, ResolveError> {
        self.resolve_in(descriptor, None, &mut ResolveContext::default())
            .map(|resolved| resolved.converter)
    }

    /// Resolves the converter for `descriptor`, converting documents of the type `schema`
    /// describes field by field if nothing else matches.
    ///
    /// `descriptor` may be the document type itself or any list, set, map or optional
    /// of it.
    pub fn resolve_with_schema(
        &self,
        descriptor: &TypeDescriptor,
        schema: &Arc<DocumentSchema>,
    ) -> Result<Arc<dyn ConvertAttribute>, ResolveError> {
        self.resolve_in(descriptor, Some(schema), &mut ResolveContext::default())
            .map(|resolved| resolved.converter)
    }

    /// Resolves the converter for `T`.
    pub fn converter_for<T: AttributeType>(&self) -> Result<TypedConverter<T>, ResolveError> {
        self.resolve(&T::type_descriptor()).map(TypedConverter::new)
    }

    /// Resolves the converter for `T`, whose documents `schema` describes.
    pub fn converter_for_document<T: AttributeType>(
        &self,
        schema: &Arc<DocumentSchema>,
    ) -> Result<TypedConverter<T>, ResolveError> {
        self.resolve_with_schema(&T::type_descriptor(), schema)
            .map(TypedConverter::new)
    }

    /// Returns the string converter registered for a map key type.
    pub fn string_converter(&self, descriptor: &TypeDescriptor) -> Option<Arc<dyn StringConverter>> {
        self.string_converters.get(descriptor).cloned()
    }

    /// Number of converters currently cached.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// The deepest type nesting this registry resolves.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn resolve_in(
        &self,
        descriptor: &TypeDescriptor,
        schema: Option<&Arc<DocumentSchema>>,
        cx: &mut ResolveContext,
    ) -> Result<Resolved, ResolveError> {
        if cx.depth >= self.max_depth {
            return Err(ResolveError::DepthExceeded {
                descriptor: descriptor.clone(),
                max_depth: self.max_depth,
            });
        }
        if let Some((cached, schema_backed)) = self.cached(descriptor, schema) {
            // a cached converter still counts the nesting below it
            if cx.depth + cached.height <= self.max_depth {
                tracing::trace!(descriptor = %descriptor, "converter cache hit");
                return Ok(Resolved::from_cache(cached, schema_backed));
            }
        }

        tracing::debug!(descriptor = %descriptor, "loading converter");
        cx.depth += 1;
        let loaded = self.load(descriptor, schema, cx);
        cx.depth -= 1;
        let mut resolved = loaded?;
        resolved.height += 1;

        if !descriptor.is_cacheable() {
            tracing::debug!(descriptor = %descriptor, "not caching converter for uncacheable type");
            Ok(resolved)
        } else if !resolved.open.is_empty() {
            tracing::debug!(
                descriptor = %descriptor,
                "not caching converter that refers back to a document under construction"
            );
            Ok(resolved)
        } else {
            let key = CacheKey {
                descriptor: descriptor.clone(),
                schema: schema
                    .filter(|_| resolved.schema_backed)
                    .map(|schema| SchemaKey(schema.clone())),
            };
            // concurrent resolutions of the same type all return whichever converter
            // was inserted first
            let cached = self
                .cache
                .entry(key)
                .or_insert(Cached {
                    converter: resolved.converter,
                    height: resolved.height,
                })
                .value()
                .clone();
            tracing::debug!(descriptor = %descriptor, "cached converter");
            Ok(Resolved::from_cache(cached, resolved.schema_backed))
        }
    }

    /// Looks up a cached converter. Converters built from a schema are only returned for
    /// that same schema.
    fn cached(
        &self,
        descriptor: &TypeDescriptor,
        schema: Option<&Arc<DocumentSchema>>,
    ) -> Option<(Cached, bool)> {
        let plain = CacheKey {
            descriptor: descriptor.clone(),
            schema: None,
        };
        if let Some(entry) = self.cache.get(&plain) {
            return Some((entry.value().clone(), false));
        }
        let key = CacheKey {
            descriptor: descriptor.clone(),
            schema: Some(SchemaKey(schema?.clone())),
        };
        self.cache.get(&key).map(|entry| (entry.value().clone(), true))
    }

    fn load(
        &self,
        descriptor: &TypeDescriptor,
        schema: Option<&Arc<DocumentSchema>>,
        cx: &mut ResolveContext,
    ) -> Result<Resolved, ResolveError> {
        if let Some(converter) = self.converters.get(descriptor) {
            return Ok(Resolved::closed(converter.clone()));
        }
        if let Some(resolved) = self.load_structural(descriptor, schema, cx)? {
            return Ok(resolved);
        }
        match schema {
            Some(schema) if schema.type_descriptor() == descriptor => {
                self.load_document(schema, cx)
            }
            _ => Err(ResolveError::ConverterNotFound(descriptor.clone())),
        }
    }

    fn load_structural(
        &self,
        descriptor: &TypeDescriptor,
        schema: Option<&Arc<DocumentSchema>>,
        cx: &mut ResolveContext,
    ) -> Result<Option<Resolved>, ResolveError> {
        let kind = descriptor.raw_type().kind();
        if kind == RawKind::Opaque {
            return Ok(None);
        }
        // `TypeDescriptor::of` does not check arity, so a bare `List` has no element
        let parameter = |index: usize| {
            descriptor
                .parameter(index)
                .ok_or_else(|| ResolveError::ConverterNotFound(descriptor.clone()))
        };
        let descriptor = descriptor.clone();
        let resolved = match kind {
            RawKind::Sequence => self
                .resolve_element(parameter(0)?, schema, cx)?
                .map(|element| ListAttributeConverter::with_descriptor(descriptor, element)),
            RawKind::Set => self
                .resolve_element(parameter(0)?, schema, cx)?
                .map(|element| SetAttributeConverter::with_descriptor(descriptor, element)),
            RawKind::Optional => self
                .resolve_element(parameter(0)?, schema, cx)?
                .map(|inner| OptionalAttributeConverter::with_descriptor(descriptor, inner)),
            RawKind::Mapping => {
                let key = parameter(0)?;
                let codec = self.string_converters.get(key).cloned().ok_or_else(|| {
                    ResolveError::KeyCodecNotFound {
                        key: key.clone(),
                        map: descriptor.clone(),
                    }
                })?;
                self.resolve_element(parameter(1)?, schema, cx)?
                    .map(|value| MapAttributeConverter::with_descriptor(descriptor, codec, value))
            }
            RawKind::Opaque => return Ok(None),
        };
        Ok(Some(resolved))
    }

    fn resolve_element(
        &self,
        element: &TypeDescriptor,
        schema: Option<&Arc<DocumentSchema>>,
        cx: &mut ResolveContext,
    ) -> Result<Resolved, ResolveError> {
        cx.frames.push(Frame::Container);
        let resolved = self.resolve_in(element, schema, cx);
        cx.frames.pop();
        resolved
    }

    fn load_document(
        &self,
        schema: &Arc<DocumentSchema>,
        cx: &mut ResolveContext,
    ) -> Result<Resolved, ResolveError> {
        let descriptor = schema.type_descriptor();
        if let Some(pending) = cx.pending.get(descriptor) {
            let contained = cx.frames[pending.frame..]
                .iter()
                .any(|frame| matches!(frame, Frame::Container));
            if !contained {
                return Err(ResolveError::RecursiveDocument(descriptor.clone()));
            }
            tracing::debug!(descriptor = %descriptor, "referring back to document under construction");
            let converter = RecursiveAttributeConverter::new(descriptor.clone(), pending.slot.clone());
            return Ok(Resolved {
                converter: Arc::new(converter),
                open: HashSet::from([descriptor.clone()]),
                height: 0,
                schema_backed: true,
            });
        }

        let slot = DocumentSlot::default();
        cx.pending.insert(
            descriptor.clone(),
            Pending {
                slot: slot.clone(),
                frame: cx.frames.len(),
            },
        );
        cx.frames.push(Frame::Document);
        let fields = self.resolve_fields(schema, cx);
        cx.frames.pop();
        cx.pending.remove(descriptor);

        let fields = fields?;
        let mut open = fields.open;
        open.remove(descriptor);
        let converter: Arc<dyn ConvertAttribute> =
            Arc::new(DocumentAttributeConverter::new(schema.clone(), fields.converters));
        // the slot is private to this call and filled exactly once
        let _ = slot.set(Arc::downgrade(&converter));
        Ok(Resolved {
            converter,
            open,
            height: fields.height,
            schema_backed: true,
        })
    }

    fn resolve_fields(
        &self,
        schema: &Arc<DocumentSchema>,
        cx: &mut ResolveContext,
    ) -> Result<Fields, ResolveError> {
        let mut fields = Fields {
            converters: Vec::with_capacity(schema.fields().len()),
            open: HashSet::new(),
            height: 0,
        };
        for field in schema.fields() {
            let nested = match field.nested() {
                None => None,
                Some(NestedSchema::Enclosing) => Some(schema),
                Some(NestedSchema::Other(nested)) => Some(nested),
            };
            let resolved = self.resolve_in(field.type_descriptor(), nested, cx)?;
            fields.open.extend(resolved.open);
            fields.height = fields.height.max(resolved.height);
            fields.converters.push(resolved.converter);
        }
        Ok(fields)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converters", &self.converters.len())
            .field("string_converters", &self.string_converters.len())
            .field("cached", &self.cache.len())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// A converter together with the documents under construction it refers back to.
struct Resolved {
    converter: Arc<dyn ConvertAttribute>,
    open: HashSet<TypeDescriptor>,
    /// Nesting depth of the resolution below and including this converter.
    height: usize,
    /// Whether a document schema was needed to build the converter.
    schema_backed: bool,
}

impl Resolved {
    fn closed(converter: Arc<dyn ConvertAttribute>) -> Self {
        Self {
            converter,
            open: HashSet::new(),
            height: 0,
            schema_backed: false,
        }
    }

    fn from_cache(cached: Cached, schema_backed: bool) -> Self {
        Self {
            converter: cached.converter,
            open: HashSet::new(),
            height: cached.height,
            schema_backed,
        }
    }

    fn map<C: ConvertAttribute + 'static>(
        self,
        wrap: impl FnOnce(Arc<dyn ConvertAttribute>) -> C,
    ) -> Self {
        Self {
            converter: Arc::new(wrap(self.converter)),
            open: self.open,
            height: self.height,
            schema_backed: self.schema_backed,
        }
    }
}

struct Fields {
    converters: Vec<Arc<dyn ConvertAttribute>>,
    open: HashSet<TypeDescriptor>,
    height: usize,
}

#[derive(Clone)]
struct Cached {
    converter: Arc<dyn ConvertAttribute>,
    height: usize,
}

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    descriptor: TypeDescriptor,
    schema: Option<SchemaKey>,
}

/// A schema compared by identity.
#[derive(Clone)]
struct SchemaKey(Arc<DocumentSchema>);

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state)
    }
}

#[derive(Default)]
struct ResolveContext {
    depth: usize,
    frames: Vec<Frame>,
    pending: HashMap<TypeDescriptor, Pending>,
}

enum Frame {
    Container,
    Document,
}

struct Pending {
    slot: DocumentSlot,
    frame: usize,
}

/// Builder for [`ConverterRegistry`].
///
/// Registrations are applied in order when the registry is built; when two converters
/// serve the same type, the one added last wins. This lets overrides be appended to the
/// default set:
///
/// ```
/// use dynamodb_converter::ConverterRegistry;
/// # use dynamodb_converter::{AttributeConverter, AttributeValue, AttributeValueType, ConversionError};
/// # #[derive(Debug)]
/// # struct Celsius;
/// # impl AttributeConverter<f64> for Celsius {
/// #     fn attribute_value_type(&self) -> AttributeValueType { AttributeValueType::S }
/// #     fn transform_from(&self, input: &f64) -> Result<AttributeValue, ConversionError> {
/// #         Ok(AttributeValue::from_string(format!("{input}C")))
/// #     }
/// #     fn transform_to(&self, _input: AttributeValue) -> Result<f64, ConversionError> { unimplemented!() }
/// # }
///
/// let registry = ConverterRegistry::builder()
///     .add_default_converters()
///     .add_converter(Celsius)
///     .build();
/// let converter = registry.converter_for::<f64>().unwrap();
/// assert_eq!(converter.transform_from(&21.5).unwrap().as_s(), Some("21.5C"));
/// ```
#[derive(Debug, Default)]
pub struct ConverterRegistryBuilder {
    converters: Vec<Arc<dyn ConvertAttribute>>,
    string_converters: Vec<Arc<dyn StringConverter>>,
    max_depth: Option<usize>,
}

impl ConverterRegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a typed converter.
    pub fn add_converter<T, C>(self, converter: C) -> Self
    where
        T: AttributeType,
        C: AttributeConverter<T>,
    {
        self.add_erased_converter(erase(converter))
    }

    /// Adds a type-erased converter.
    pub fn add_erased_converter(mut self, converter: Arc<dyn ConvertAttribute>) -> Self {
        self.converters.push(converter);
        self
    }

    /// Adds type-erased converters, in order.
    pub fn add_converters(
        mut self,
        converters: impl IntoIterator<Item = Arc<dyn ConvertAttribute>>,
    ) -> Self {
        self.converters.extend(converters);
        self
    }

    /// Adds a map key codec.
    pub fn add_string_converter(mut self, converter: impl StringConverter + 'static) -> Self {
        self.string_converters.push(Arc::new(converter));
        self
    }

    /// Removes every converter and string converter added so far.
    pub fn clear_converters(mut self) -> Self {
        self.converters.clear();
        self.string_converters.clear();
        self
    }

    /// Adds the default converters and string converters for the built-in leaf types.
    pub fn add_default_converters(mut self) -> Self {
        self.converters.extend(default_converters());
        self.string_converters.extend(default_string_converters());
        self
    }

    /// Sets the deepest type nesting the registry resolves. Defaults to 64.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.set_max_depth(Some(max_depth));
        self
    }

    /// Sets the deepest type nesting the registry resolves. Defaults to 64.
    pub fn set_max_depth(&mut self, max_depth: Option<usize>) -> &mut Self {
        self.max_depth = max_depth;
        self
    }

    /// Builds the registry.
    pub fn build(self) -> ConverterRegistry {
        let mut converters = HashMap::new();
        for converter in self.converters {
            if let Some(primitive) = converter.primitive_type() {
                converters.insert(primitive.clone(), converter.clone());
            }
            converters.insert(converter.type_descriptor().clone(), converter);
        }
        let mut string_converters = HashMap::new();
        for converter in self.string_converters {
            if let Some(primitive) = converter.primitive_type() {
                string_converters.insert(primitive.clone(), converter.clone());
            }
            string_converters.insert(converter.type_descriptor().clone(), converter);
        }
        tracing::debug!(
            converters = converters.len(),
            string_converters = string_converters.len(),
            "built converter registry"
        );
        ConverterRegistry {
            converters,
            string_converters,
            cache: DashMap::new(),
            max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
        }
    }
}
