//! Containment path resolution
//!
//! Walks a diagnostic target's static containment chain from its schema down
//! to the target itself:
//!
//! ```text
//! Schema(S) -> <Category> -> <Type>(<Item>) [-> Source|Target] [-> Properties -> Property(P)]
//! ```

use schemadelta_core::{RelationshipEnd, SchemaItemType, Target};

/// Fixed container labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Classes,
    Enumerations,
    KindOfQuantities,
    Formats,
    PropertyCategories,
    Units,
    UnitSystems,
    InvertedUnits,
    Phenomenons,
    Constants,
    SchemaReferences,
    Properties,
    Mixins,
    CustomAttributes,
    ConstraintClasses,
    PresentationUnits,
    Enumerators,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Classes => "Classes",
            Self::Enumerations => "Enumerations",
            Self::KindOfQuantities => "KindOfQuantities",
            Self::Formats => "Formats",
            Self::PropertyCategories => "PropertyCategories",
            Self::Units => "Units",
            Self::UnitSystems => "UnitSystems",
            Self::InvertedUnits => "InvertedUnits",
            Self::Phenomenons => "Phenomenons",
            Self::Constants => "Constants",
            Self::SchemaReferences => "SchemaReferences",
            Self::Properties => "Properties",
            Self::Mixins => "Mixins",
            Self::CustomAttributes => "CustomAttributes",
            Self::ConstraintClasses => "ConstraintClasses",
            Self::PresentationUnits => "PresentationUnits",
            Self::Enumerators => "Enumerators",
        }
    }

    /// Container a schema item of `item_type` is listed under
    pub fn of_item(item_type: SchemaItemType) -> Self {
        match item_type {
            SchemaItemType::EntityClass
            | SchemaItemType::Mixin
            | SchemaItemType::StructClass
            | SchemaItemType::CustomAttributeClass
            | SchemaItemType::RelationshipClass => Self::Classes,
            SchemaItemType::Enumeration => Self::Enumerations,
            SchemaItemType::KindOfQuantity => Self::KindOfQuantities,
            SchemaItemType::PropertyCategory => Self::PropertyCategories,
            SchemaItemType::Unit => Self::Units,
            SchemaItemType::InvertedUnit => Self::InvertedUnits,
            SchemaItemType::Constant => Self::Constants,
            SchemaItemType::Phenomenon => Self::Phenomenons,
            SchemaItemType::UnitSystem => Self::UnitSystems,
            SchemaItemType::Format => Self::Formats,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Label used in `<Type>(<name>)` lines for a schema item
pub fn item_type_label(item_type: SchemaItemType) -> &'static str {
    if item_type.is_class() {
        return "Class";
    }

    match item_type {
        SchemaItemType::Enumeration => "Enumeration",
        SchemaItemType::KindOfQuantity => "KindOfQuantity",
        SchemaItemType::PropertyCategory => "PropertyCategory",
        SchemaItemType::Unit => "Unit",
        SchemaItemType::InvertedUnit => "InvertedUnit",
        SchemaItemType::Constant => "Constant",
        SchemaItemType::Phenomenon => "Phenomenon",
        SchemaItemType::UnitSystem => "UnitSystem",
        SchemaItemType::Format => "Format",
        _ => "Class",
    }
}

/// One level of a containment path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Category container, rendered as its label alone
    Category(Category),

    /// Named entity, rendered as `<type_label>(<name>)`
    Item { type_label: &'static str, name: String },

    /// Relationship end, rendered as `Source` / `Target`
    End(RelationshipEnd),
}

impl PathSegment {
    pub fn item(type_label: &'static str, name: impl Into<String>) -> Self {
        Self::Item {
            type_label,
            name: name.into(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Category(category) => category.label().to_string(),
            Self::Item { type_label, name } => format!("{}({})", type_label, name),
            Self::End(end) => end.to_string(),
        }
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

/// Resolve the containment path of `target`, from `Schema(...)` down to and
/// including the target itself
pub fn resolve(target: &Target) -> Vec<PathSegment> {
    let mut segments = Vec::with_capacity(target.depth() + 1);
    segments.push(PathSegment::item("Schema", target.schema().name()));

    match target {
        Target::Schema(_) => {}
        Target::Item(item) => {
            push_item(&mut segments, item.item_type(), item.name());
        }
        Target::Property(property) => {
            let class = property.class();
            push_item(&mut segments, class.item_type(), class.name());
            segments.push(PathSegment::Category(Category::Properties));
            segments.push(PathSegment::item("Property", property.name()));
        }
        Target::Constraint(constraint) => {
            let relationship = constraint.relationship();
            push_item(&mut segments, relationship.item_type(), relationship.name());
            segments.push(PathSegment::End(constraint.end()));
        }
    }

    segments
}

fn push_item(segments: &mut Vec<PathSegment>, item_type: SchemaItemType, name: &str) {
    segments.push(PathSegment::Category(Category::of_item(item_type)));
    segments.push(PathSegment::item(item_type_label(item_type), name));
}
