/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

//! Field lists of user-defined document types.
//!
//! A [`DocumentSchema`] tells the registry how to take a document type apart and put it
//! back together when no converter is registered for it. Build one with
//! [`DocumentSchema::builder`]:
//!
//! ```
//! use dynamodb_converter::{AttributeType, DocumentSchema, RawType, TypeDescriptor};
//! use std::collections::BTreeSet;
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Order {
//!     id: i32,
//!     tags: BTreeSet<String>,
//! }
//!
//! impl AttributeType for Order {
//!     fn type_descriptor() -> TypeDescriptor {
//!         TypeDescriptor::of(RawType::new("example#Order"))
//!     }
//! }
//!
//! let schema = DocumentSchema::builder::<Order>()
//!     .field("id", |o| &o.id, |o, v| o.id = v)
//!     .field("tags", |o| &o.tags, |o, v| o.tags = v)
//!     .build();
//! assert_eq!(schema.fields().len(), 2);
//! ```

use crate::error::ConversionError;
use crate::type_descriptor::TypeDescriptor;
use crate::value::{AttributeType, DomainObject, DomainValue};
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type Getter = Box<dyn Fn(&dyn Any) -> Option<DomainValue> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Any, DomainValue) -> Result<(), ConversionError> + Send + Sync>;

/// The field list of a document type.
pub struct DocumentSchema {
    descriptor: TypeDescriptor,
    new_instance: Box<dyn Fn() -> Box<dyn DomainObject> + Send + Sync>,
    fields: Vec<FieldSchema>,
    ignore_nulls: bool,
}

impl DocumentSchema {
    /// Starts a schema for `T`. Converted documents start out as `T::default()`, so
    /// fields missing from an item keep their default values.
    pub fn builder<T: AttributeType + Default>() -> DocumentSchemaBuilder<T> {
        DocumentSchemaBuilder {
            descriptor: T::type_descriptor(),
            fields: Vec::new(),
            ignore_nulls: false,
            _phantom: PhantomData,
        }
    }

    /// The document type this schema describes.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// The fields, in declaration order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Whether fields that convert to `NULL` are left out of the written mapping.
    pub fn ignore_nulls(&self) -> bool {
        self.ignore_nulls
    }

    pub(crate) fn new_instance(&self) -> Box<dyn DomainObject> {
        (self.new_instance)()
    }
}

impl fmt::Debug for DocumentSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSchema")
            .field("descriptor", &self.descriptor)
            .field("fields", &self.fields)
            .field("ignore_nulls", &self.ignore_nulls)
            .finish()
    }
}

/// Where the schema of a field's nested documents comes from.
#[derive(Debug, Clone)]
pub(crate) enum NestedSchema {
    /// The schema the field belongs to.
    Enclosing,
    /// A schema of another document type.
    Other(Arc<DocumentSchema>),
}

/// One field of a [`DocumentSchema`].
pub struct FieldSchema {
    name: String,
    descriptor: TypeDescriptor,
    nested: Option<NestedSchema>,
    get: Getter,
    set: Setter,
}

impl FieldSchema {
    /// The attribute name the field is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type of the field.
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    pub(crate) fn nested(&self) -> Option<&NestedSchema> {
        self.nested.as_ref()
    }

    /// Reads the field from a document. `None` if `document` is of another type.
    pub(crate) fn get(&self, document: &dyn Any) -> Option<DomainValue> {
        (self.get)(document)
    }

    pub(crate) fn set(
        &self,
        document: &mut dyn Any,
        value: DomainValue,
    ) -> Result<(), ConversionError> {
        (self.set)(document, value)
    }
}

impl fmt::Debug for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nested = match &self.nested {
            None => None,
            Some(NestedSchema::Enclosing) => Some(String::from("<enclosing>")),
            Some(NestedSchema::Other(schema)) => Some(schema.descriptor.to_string()),
        };
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("nested", &nested)
            .finish()
    }
}

/// Builder for [`DocumentSchema`].
pub struct DocumentSchemaBuilder<T> {
    descriptor: TypeDescriptor,
    fields: Vec<FieldSchema>,
    ignore_nulls: bool,
    _phantom: PhantomData<fn() -> T>,
}

impl<T: AttributeType + Default> DocumentSchemaBuilder<T> {
    /// Adds a field converted by whatever the registry resolves for `F`.
    pub fn field<F, G, S>(self, name: impl Into<String>, get: G, set: S) -> Self
    where
        F: AttributeType,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.push_field(name.into(), None, get, set)
    }

    /// Adds a field whose type contains documents described by `schema`, e.g. an
    /// `Address`, a `Vec<Address>` or an `Option<HashMap<String, Address>>`.
    pub fn nested_field<F, G, S>(
        self,
        name: impl Into<String>,
        schema: Arc<DocumentSchema>,
        get: G,
        set: S,
    ) -> Self
    where
        F: AttributeType,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.push_field(name.into(), Some(NestedSchema::Other(schema)), get, set)
    }

    /// Adds a field whose type contains documents of the type being described, e.g.
    /// `children: Vec<Node>` on `Node`.
    ///
    /// Resolution fails with [`ResolveError::RecursiveDocument`] unless a list, set, map
    /// or optional sits between the document and itself.
    ///
    /// [`ResolveError::RecursiveDocument`]: crate::ResolveError::RecursiveDocument
    pub fn recursive_field<F, G, S>(self, name: impl Into<String>, get: G, set: S) -> Self
    where
        F: AttributeType,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        self.push_field(name.into(), Some(NestedSchema::Enclosing), get, set)
    }

    /// Leaves fields that convert to `NULL` out of the written mapping.
    pub fn ignore_nulls(mut self, ignore_nulls: bool) -> Self {
        self.ignore_nulls = ignore_nulls;
        self
    }

    /// Builds the schema.
    pub fn build(self) -> Arc<DocumentSchema> {
        Arc::new(DocumentSchema {
            descriptor: self.descriptor,
            new_instance: Box::new(|| -> Box<dyn DomainObject> { Box::new(T::default()) }),
            fields: self.fields,
            ignore_nulls: self.ignore_nulls,
        })
    }

    fn push_field<F, G, S>(
        mut self,
        name: String,
        nested: Option<NestedSchema>,
        get: G,
        set: S,
    ) -> Self
    where
        F: AttributeType,
        G: Fn(&T) -> &F + Send + Sync + 'static,
        S: Fn(&mut T, F) + Send + Sync + 'static,
    {
        let document = self.descriptor.clone();
        let setter: Setter = Box::new(move |target: &mut dyn Any, value: DomainValue| {
            let target = target.downcast_mut::<T>().ok_or_else(|| {
                ConversionError::unexpected_domain_value(document.clone(), "another document type")
            })?;
            set(target, F::from_domain_value(value)?);
            Ok(())
        });
        let getter: Getter = Box::new(move |source: &dyn Any| {
            source
                .downcast_ref::<T>()
                .map(|document| get(document).to_domain_value())
        });
        self.fields.push(FieldSchema {
            name,
            descriptor: F::type_descriptor(),
            nested,
            get: getter,
            set: setter,
        });
        self
    }
}
