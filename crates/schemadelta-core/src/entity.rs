//! Entity handles used as diagnostic targets
//!
//! A handle records the static containment chain of an entity. Walking up
//! any handle always ends at exactly one [`SchemaRef`].

use crate::items::{RelationshipEnd, SchemaItemType};
use crate::schema::{FullName, Schema, SchemaId};

/// Identity handle of a schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaRef {
    id: SchemaId,
    name: String,
}

impl SchemaRef {
    pub fn new(id: SchemaId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if this handle points at `schema` (object identity, not name)
    pub fn is(&self, schema: &Schema) -> bool {
        self.id == schema.id()
    }
}

/// Handle of a schema item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRef {
    schema: SchemaRef,
    item_type: SchemaItemType,
    name: String,
}

impl ItemRef {
    pub fn new(schema: SchemaRef, item_type: SchemaItemType, name: impl Into<String>) -> Self {
        Self {
            schema,
            item_type,
            name: name.into(),
        }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn item_type(&self) -> SchemaItemType {
        self.item_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> FullName {
        FullName::new(self.schema.name(), self.name.clone())
    }

    /// Handle of a property of this item
    pub fn property(&self, name: impl Into<String>) -> PropertyRef {
        PropertyRef {
            class: self.clone(),
            name: name.into(),
        }
    }

    /// Handle of one end of this (relationship) item
    pub fn constraint(&self, end: RelationshipEnd) -> ConstraintRef {
        ConstraintRef {
            relationship: self.clone(),
            end,
        }
    }
}

/// Handle of a property
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyRef {
    class: ItemRef,
    name: String,
}

impl PropertyRef {
    pub fn class(&self) -> &ItemRef {
        &self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Handle of a relationship constraint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstraintRef {
    relationship: ItemRef,
    end: RelationshipEnd,
}

impl ConstraintRef {
    pub fn relationship(&self) -> &ItemRef {
        &self.relationship
    }

    pub fn end(&self) -> RelationshipEnd {
        self.end
    }
}

/// The entity a diagnostic is about
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Target {
    Schema(SchemaRef),
    Item(ItemRef),
    Property(PropertyRef),
    Constraint(ConstraintRef),
}

impl Target {
    /// The schema reached by walking up the containment chain
    pub fn schema(&self) -> &SchemaRef {
        match self {
            Self::Schema(schema) => schema,
            Self::Item(item) => item.schema(),
            Self::Property(property) => property.class().schema(),
            Self::Constraint(constraint) => constraint.relationship().schema(),
        }
    }

    /// Number of containment hops from the schema, Source/Target included
    pub fn depth(&self) -> usize {
        match self {
            Self::Schema(_) => 0,
            Self::Item(_) => 2,
            Self::Property(_) => 4,
            Self::Constraint(_) => 3,
        }
    }
}

impl From<SchemaRef> for Target {
    fn from(schema: SchemaRef) -> Self {
        Self::Schema(schema)
    }
}

impl From<ItemRef> for Target {
    fn from(item: ItemRef) -> Self {
        Self::Item(item)
    }
}

impl From<PropertyRef> for Target {
    fn from(property: PropertyRef) -> Self {
        Self::Property(property)
    }
}

impl From<ConstraintRef> for Target {
    fn from(constraint: ConstraintRef) -> Self {
        Self::Constraint(constraint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_target_walks_up_to_its_schema() {
        let schema = Schema::new("TestSchema", "ts", 1, 0, 0);
        let rel = schema.item_handle(SchemaItemType::RelationshipClass, "Owns");

        let targets: Vec<Target> = vec![
            schema.handle().into(),
            rel.clone().into(),
            rel.property("Weight").into(),
            rel.constraint(RelationshipEnd::Target).into(),
        ];

        for target in &targets {
            assert!(target.schema().is(&schema));
        }
    }

    #[test]
    fn identity_is_not_name_equality() {
        let a = Schema::new("TestSchema", "ts", 1, 0, 0);
        let b = Schema::new("TestSchema", "ts", 1, 0, 0);

        assert!(a.handle().is(&a));
        assert!(!a.handle().is(&b));
    }

    #[test]
    fn item_full_name() {
        let schema = Schema::new("TestSchema", "ts", 1, 0, 0);
        let mixin = schema.item_handle(SchemaItemType::Mixin, "TestMixin");
        assert_eq!(mixin.full_name().to_string(), "TestSchema.TestMixin");
    }
}
