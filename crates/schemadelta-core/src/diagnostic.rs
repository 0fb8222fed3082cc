//! Diagnostic taxonomy
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

use crate::entity::{ConstraintRef, ItemRef, PropertyRef, SchemaRef, Target};
use crate::schema::FullName;

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // Value changes (item exists on both sides)
    /// Schema attribute differs
    SchemaDelta,

    /// Class attribute differs
    ClassDelta,

    /// Base class differs
    BaseClassDelta,

    /// Relationship constraint attribute differs
    RelationshipConstraintDelta,

    /// Property attribute differs
    PropertyDelta,

    /// Enumeration attribute differs
    EnumerationDelta,

    /// Enumerator attribute differs
    EnumeratorDelta,

    /// KindOfQuantity attribute differs
    KoqDelta,

    /// Format attribute differs
    FormatDelta,

    /// Label override of a composite format unit differs
    UnitLabelOverrideDelta,

    /// PropertyCategory attribute differs
    PropertyCategoryDelta,

    /// Unit attribute differs
    UnitDelta,

    /// InvertedUnit attribute differs
    InvertedUnitDelta,

    /// Phenomenon attribute differs
    PhenomenonDelta,

    /// Constant attribute differs
    ConstantDelta,

    // Missing items (present on one side only)
    /// Schema item exists in one schema only
    SchemaItemMissing,

    /// Schema reference exists in one schema only
    SchemaReferenceMissing,

    /// Mixin applied on one side only
    EntityMixinMissing,

    /// Custom attribute instance applied on one side only
    CustomAttributeInstanceClassMissing,

    /// Constraint class listed on one side only
    RelationshipConstraintClassMissing,

    /// Property exists on one side only
    PropertyMissing,

    /// Enumerator exists on one side only
    EnumeratorMissing,

    /// KindOfQuantity presentation unit exists on one side only
    PresentationUnitMissing,

    /// Composite format unit exists on one side only
    FormatUnitMissing,
}

/// The two diagnostic families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticFamily {
    /// Value changed, entity present on both sides
    Delta,

    /// Entity present on exactly one side
    Missing,
}

impl DiagnosticCode {
    /// All codes, in registry order
    pub const ALL: [DiagnosticCode; 24] = [
        Self::SchemaDelta,
        Self::ClassDelta,
        Self::BaseClassDelta,
        Self::RelationshipConstraintDelta,
        Self::PropertyDelta,
        Self::EnumerationDelta,
        Self::EnumeratorDelta,
        Self::KoqDelta,
        Self::FormatDelta,
        Self::UnitLabelOverrideDelta,
        Self::PropertyCategoryDelta,
        Self::UnitDelta,
        Self::InvertedUnitDelta,
        Self::PhenomenonDelta,
        Self::ConstantDelta,
        Self::SchemaItemMissing,
        Self::SchemaReferenceMissing,
        Self::EntityMixinMissing,
        Self::CustomAttributeInstanceClassMissing,
        Self::RelationshipConstraintClassMissing,
        Self::PropertyMissing,
        Self::EnumeratorMissing,
        Self::PresentationUnitMissing,
        Self::FormatUnitMissing,
    ];

    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SchemaDelta => "SCHEMA_DELTA",
            Self::ClassDelta => "CLASS_DELTA",
            Self::BaseClassDelta => "BASE_CLASS_DELTA",
            Self::RelationshipConstraintDelta => "RELATIONSHIP_CONSTRAINT_DELTA",
            Self::PropertyDelta => "PROPERTY_DELTA",
            Self::EnumerationDelta => "ENUMERATION_DELTA",
            Self::EnumeratorDelta => "ENUMERATOR_DELTA",
            Self::KoqDelta => "KOQ_DELTA",
            Self::FormatDelta => "FORMAT_DELTA",
            Self::UnitLabelOverrideDelta => "UNIT_LABEL_OVERRIDE_DELTA",
            Self::PropertyCategoryDelta => "PROPERTY_CATEGORY_DELTA",
            Self::UnitDelta => "UNIT_DELTA",
            Self::InvertedUnitDelta => "INVERTED_UNIT_DELTA",
            Self::PhenomenonDelta => "PHENOMENON_DELTA",
            Self::ConstantDelta => "CONSTANT_DELTA",
            Self::SchemaItemMissing => "SCHEMA_ITEM_MISSING",
            Self::SchemaReferenceMissing => "SCHEMA_REFERENCE_MISSING",
            Self::EntityMixinMissing => "ENTITY_MIXIN_MISSING",
            Self::CustomAttributeInstanceClassMissing => "CUSTOM_ATTRIBUTE_INSTANCE_CLASS_MISSING",
            Self::RelationshipConstraintClassMissing => "RELATIONSHIP_CONSTRAINT_CLASS_MISSING",
            Self::PropertyMissing => "PROPERTY_MISSING",
            Self::EnumeratorMissing => "ENUMERATOR_MISSING",
            Self::PresentationUnitMissing => "PRESENTATION_UNIT_MISSING",
            Self::FormatUnitMissing => "FORMAT_UNIT_MISSING",
        }
    }

    pub fn family(&self) -> DiagnosticFamily {
        match self {
            Self::SchemaDelta
            | Self::ClassDelta
            | Self::BaseClassDelta
            | Self::RelationshipConstraintDelta
            | Self::PropertyDelta
            | Self::EnumerationDelta
            | Self::EnumeratorDelta
            | Self::KoqDelta
            | Self::FormatDelta
            | Self::UnitLabelOverrideDelta
            | Self::PropertyCategoryDelta
            | Self::UnitDelta
            | Self::InvertedUnitDelta
            | Self::PhenomenonDelta
            | Self::ConstantDelta => DiagnosticFamily::Delta,

            Self::SchemaItemMissing
            | Self::SchemaReferenceMissing
            | Self::EntityMixinMissing
            | Self::CustomAttributeInstanceClassMissing
            | Self::RelationshipConstraintClassMissing
            | Self::PropertyMissing
            | Self::EnumeratorMissing
            | Self::PresentationUnitMissing
            | Self::FormatUnitMissing => DiagnosticFamily::Missing,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scalar attribute value carried by a delta
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),

    /// Attribute not set on that side
    Undefined,
}

impl std::fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Bool(value) => write!(f, "{}", value),
            Self::Integer(value) => write!(f, "{}", value),
            Self::Float(value) => write!(f, "{}", value),
            Self::Undefined => f.write_str("undefined"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&FullName> for AttributeValue {
    fn from(value: &FullName) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Undefined)
    }
}

/// `(attributeName, oldValue, newValue)`
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange {
    pub attribute: String,
    pub old: AttributeValue,
    pub new: AttributeValue,
}

impl ValueChange {
    pub fn new(
        attribute: impl Into<String>,
        old: impl Into<AttributeValue>,
        new: impl Into<AttributeValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            old: old.into(),
            new: new.into(),
        }
    }
}

/// An object referenced by a missing-item diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem {
    /// Referenced schema, by name
    SchemaReference(String),

    /// Schema item (mixin, constraint class, unit, format)
    SchemaItem(FullName),

    /// Enumerator, by name
    Enumerator(String),

    /// Custom attribute instance, by class name
    CustomAttribute { class_name: String },
}

/// Kind-specific diagnostic payload
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The target itself is the changed entity
    None,

    Change(ValueChange),

    BaseClassChange {
        old: Option<FullName>,
        new: Option<FullName>,
    },

    /// Change of a member that has no handle of its own (enumerator, format unit)
    MemberChange {
        member: PayloadItem,
        change: ValueChange,
    },

    Items(Vec<PayloadItem>),
}

/// One detected difference between two schemas
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub target: Target,
    pub payload: Payload,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, target: impl Into<Target>, payload: Payload) -> Self {
        Self {
            code,
            target: target.into(),
            payload,
        }
    }

    /// A value-change diagnostic of any delta kind
    pub fn delta(code: DiagnosticCode, target: impl Into<Target>, change: ValueChange) -> Self {
        Self::new(code, target, Payload::Change(change))
    }

    /// A missing-item diagnostic carrying referenced objects
    pub fn missing(code: DiagnosticCode, target: impl Into<Target>, items: Vec<PayloadItem>) -> Self {
        Self::new(code, target, Payload::Items(items))
    }

    pub fn schema_item_missing(item: ItemRef) -> Self {
        Self::new(DiagnosticCode::SchemaItemMissing, item, Payload::None)
    }

    pub fn property_missing(property: PropertyRef) -> Self {
        Self::new(DiagnosticCode::PropertyMissing, property, Payload::None)
    }

    pub fn base_class_delta(class: ItemRef, old: Option<FullName>, new: Option<FullName>) -> Self {
        Self::new(DiagnosticCode::BaseClassDelta, class, Payload::BaseClassChange { old, new })
    }

    pub fn enumerator_delta(enumeration: ItemRef, enumerator: impl Into<String>, change: ValueChange) -> Self {
        Self::new(
            DiagnosticCode::EnumeratorDelta,
            enumeration,
            Payload::MemberChange {
                member: PayloadItem::Enumerator(enumerator.into()),
                change,
            },
        )
    }

    pub fn unit_label_override_delta(
        format: ItemRef,
        unit: FullName,
        old: impl Into<AttributeValue>,
        new: impl Into<AttributeValue>,
    ) -> Self {
        Self::new(
            DiagnosticCode::UnitLabelOverrideDelta,
            format,
            Payload::MemberChange {
                member: PayloadItem::SchemaItem(unit),
                change: ValueChange::new("label", old, new),
            },
        )
    }

    pub fn schema_reference_missing(schema: SchemaRef, reference: impl Into<String>) -> Self {
        Self::missing(
            DiagnosticCode::SchemaReferenceMissing,
            schema,
            vec![PayloadItem::SchemaReference(reference.into())],
        )
    }

    pub fn custom_attribute_missing(container: impl Into<Target>, class_name: impl Into<String>) -> Self {
        Self::missing(
            DiagnosticCode::CustomAttributeInstanceClassMissing,
            container,
            vec![PayloadItem::CustomAttribute { class_name: class_name.into() }],
        )
    }

    pub fn constraint_class_missing(constraint: ConstraintRef, class: FullName) -> Self {
        Self::missing(
            DiagnosticCode::RelationshipConstraintClassMissing,
            constraint,
            vec![PayloadItem::SchemaItem(class)],
        )
    }

    /// The schema that owns the target
    pub fn owner(&self) -> &SchemaRef {
        self.target.schema()
    }

    pub fn family(&self) -> DiagnosticFamily {
        self.code.family()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::SchemaItemType;
    use crate::schema::Schema;

    #[test]
    fn diagnostic_code_stability() {
        // Ensure codes are stable strings
        assert_eq!(DiagnosticCode::SchemaItemMissing.as_str(), "SCHEMA_ITEM_MISSING");
        assert_eq!(DiagnosticCode::KoqDelta.as_str(), "KOQ_DELTA");

        let json = serde_json::to_string(&DiagnosticCode::EntityMixinMissing).unwrap();
        assert_eq!(json, "\"ENTITY_MIXIN_MISSING\"");
    }

    #[test]
    fn registry_is_split_into_two_families() {
        let deltas = DiagnosticCode::ALL
            .iter()
            .filter(|c| c.family() == DiagnosticFamily::Delta)
            .count();
        let missing = DiagnosticCode::ALL
            .iter()
            .filter(|c| c.family() == DiagnosticFamily::Missing)
            .count();

        assert_eq!(deltas, 15);
        assert_eq!(missing, 9);
    }

    #[test]
    fn attribute_values_render_naturally() {
        assert_eq!(AttributeValue::from(true).to_string(), "true");
        assert_eq!(AttributeValue::from(42_i64).to_string(), "42");
        assert_eq!(AttributeValue::from(0.5_f64).to_string(), "0.5");
        assert_eq!(AttributeValue::from(2.0_f64).to_string(), "2");
        assert_eq!(AttributeValue::from(None::<String>).to_string(), "undefined");
        assert_eq!(AttributeValue::from("LabelA").to_string(), "LabelA");
    }

    #[test]
    fn owner_follows_target() {
        let schema = Schema::new("TestSchema", "ts", 1, 0, 0);
        let class = schema.item_handle(SchemaItemType::EntityClass, "TestClass");
        let diag = Diagnostic::delta(
            DiagnosticCode::PropertyDelta,
            class.property("TestProperty"),
            ValueChange::new("label", "LabelA", "LabelB"),
        );

        assert!(diag.owner().is(&schema));
        assert_eq!(diag.family(), DiagnosticFamily::Delta);
    }
}
