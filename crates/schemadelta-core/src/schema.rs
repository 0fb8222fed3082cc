//! Schema container and identity

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::entity::{ItemRef, SchemaRef};
use crate::items::{SchemaItem, SchemaItemType};

static NEXT_SCHEMA_ID: AtomicU64 = AtomicU64::new(1);

/// Object identity of a [`Schema`]
///
/// Every constructed schema gets a fresh id, so two schemas loaded from the
/// same file are still two distinct objects. Ids never appear in output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaId(u64);

impl SchemaId {
    fn next() -> Self {
        Self(NEXT_SCHEMA_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Schema version (read.write.minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Read version (breaking changes)
    pub read: u32,

    /// Write version (additive changes)
    pub write: u32,

    /// Minor version
    pub minor: u32,
}

impl SchemaVersion {
    pub fn new(read: u32, write: u32, minor: u32) -> Self {
        Self { read, write, minor }
    }

    /// Parse `RR.WW.mm` or `RR.mm`
    pub fn parse(text: &str) -> Option<Self> {
        let parts: Vec<u32> = text
            .split('.')
            .map(|p| p.trim().parse::<u32>().ok())
            .collect::<Option<Vec<_>>>()?;

        match parts.as_slice() {
            [read, write, minor] => Some(Self::new(*read, *write, *minor)),
            [read, minor] => Some(Self::new(*read, 0, *minor)),
            _ => None,
        }
    }
}

impl std::fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}.{:02}", self.read, self.write, self.minor)
    }
}

/// Qualified `<SchemaName>.<ItemName>` name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FullName {
    pub schema: String,
    pub name: String,
}

impl FullName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }

    /// Split at the first `.`; both halves must be non-empty
    pub fn parse(text: &str) -> Option<Self> {
        let (schema, name) = text.split_once('.')?;
        if schema.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(schema, name))
    }
}

impl std::fmt::Display for FullName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// A schema listed in another schema's references
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaReference {
    pub name: String,
    pub version: SchemaVersion,
}

impl SchemaReference {
    pub fn new(name: impl Into<String>, version: SchemaVersion) -> Self {
        Self {
            name: name.into(),
            version,
        }
    }
}

/// A custom attribute attached to a schema, class, property or constraint.
/// Instances are identified by their class name only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomAttributeInstance {
    pub class_name: String,
}

impl CustomAttributeInstance {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
        }
    }
}

/// A named, versioned container of schema items
#[derive(Debug)]
pub struct Schema {
    id: SchemaId,

    /// Schema name (identity for pairing two states of the same schema)
    pub name: String,

    /// Short alias
    pub alias: String,

    pub version: SchemaVersion,

    pub label: Option<String>,

    pub description: Option<String>,

    /// Referenced schemas, in declaration order
    pub references: Vec<SchemaReference>,

    /// Custom attributes applied to the schema itself
    pub custom_attributes: Vec<CustomAttributeInstance>,

    items: Vec<SchemaItem>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>, alias: impl Into<String>, read: u32, write: u32, minor: u32) -> Self {
        Self {
            id: SchemaId::next(),
            name: name.into(),
            alias: alias.into(),
            version: SchemaVersion::new(read, write, minor),
            label: None,
            description: None,
            references: Vec::new(),
            custom_attributes: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Identity handle used by diagnostic targets
    pub fn handle(&self) -> SchemaRef {
        SchemaRef::new(self.id, self.name.clone())
    }

    /// Handle for an item of this schema. The item does not have to be added.
    pub fn item_handle(&self, item_type: SchemaItemType, name: impl Into<String>) -> ItemRef {
        ItemRef::new(self.handle(), item_type, name)
    }

    /// Add an item; names are unique per schema
    pub fn add_item(&mut self, item: SchemaItem) -> Result<ItemRef, ModelError> {
        if self.get_item(&item.name).is_some() {
            return Err(ModelError::DuplicateItem {
                schema: self.name.clone(),
                item: item.name,
            });
        }

        let handle = self.item_handle(item.item_type(), item.name.clone());
        self.items.push(item);
        Ok(handle)
    }

    pub fn add_reference(&mut self, reference: SchemaReference) {
        self.references.push(reference);
    }

    pub fn add_custom_attribute(&mut self, instance: CustomAttributeInstance) {
        self.custom_attributes.push(instance);
    }

    /// Items in insertion order
    pub fn items(&self) -> &[SchemaItem] {
        &self.items
    }

    pub fn get_item(&self, name: &str) -> Option<&SchemaItem> {
        self.items.iter().find(|i| i.name == name)
    }

    pub fn get_reference(&self, name: &str) -> Option<&SchemaReference> {
        self.references.iter().find(|r| r.name == name)
    }

    /// Qualified name of one of this schema's items
    pub fn full_name(&self, item: &str) -> FullName {
        FullName::new(self.name.clone(), item)
    }
}

/// Errors raised while building a schema in memory
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Schema '{schema}' already contains an item named '{item}'")]
    DuplicateItem { schema: String, item: String },
}
