//! Schema items and their sub-entities

use serde::{Deserialize, Serialize};

use crate::diagnostic::AttributeValue;
use crate::schema::{CustomAttributeInstance, FullName};

/// Item type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaItemType {
    EntityClass,
    Mixin,
    StructClass,
    CustomAttributeClass,
    RelationshipClass,
    Enumeration,
    KindOfQuantity,
    PropertyCategory,
    Unit,
    InvertedUnit,
    Constant,
    Phenomenon,
    UnitSystem,
    Format,
}

impl SchemaItemType {
    /// Stable identifier, matches the `schemaItemType` key of schema files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EntityClass => "EntityClass",
            Self::Mixin => "Mixin",
            Self::StructClass => "StructClass",
            Self::CustomAttributeClass => "CustomAttributeClass",
            Self::RelationshipClass => "RelationshipClass",
            Self::Enumeration => "Enumeration",
            Self::KindOfQuantity => "KindOfQuantity",
            Self::PropertyCategory => "PropertyCategory",
            Self::Unit => "Unit",
            Self::InvertedUnit => "InvertedUnit",
            Self::Constant => "Constant",
            Self::Phenomenon => "Phenomenon",
            Self::UnitSystem => "UnitSystem",
            Self::Format => "Format",
        }
    }

    /// Class-like items can own properties and custom attributes
    pub fn is_class(&self) -> bool {
        matches!(
            self,
            Self::EntityClass
                | Self::Mixin
                | Self::StructClass
                | Self::CustomAttributeClass
                | Self::RelationshipClass
        )
    }
}

impl std::fmt::Display for SchemaItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relationship end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipEnd {
    Source,
    Target,
}

impl std::fmt::Display for RelationshipEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source => write!(f, "Source"),
            Self::Target => write!(f, "Target"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ClassModifier {
    #[default]
    None,
    Abstract,
    Sealed,
}

impl std::fmt::Display for ClassModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Abstract => write!(f, "Abstract"),
            Self::Sealed => write!(f, "Sealed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Primitive,
    PrimitiveArray,
    Struct,
    StructArray,
    Navigation,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "PrimitiveProperty",
            Self::PrimitiveArray => "PrimitiveArrayProperty",
            Self::Struct => "StructProperty",
            Self::StructArray => "StructArrayProperty",
            Self::Navigation => "NavigationProperty",
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A property of a class-like item
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: String,
    pub property_type: PropertyType,

    /// Primitive type name or qualified struct/enumeration/relationship name
    pub type_name: String,

    pub label: Option<String>,
    pub description: Option<String>,
    pub is_read_only: bool,
    pub priority: i64,
    pub category: Option<FullName>,
    pub kind_of_quantity: Option<FullName>,
    pub custom_attributes: Vec<CustomAttributeInstance>,
}

impl Property {
    pub fn new(name: impl Into<String>, property_type: PropertyType, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            property_type,
            type_name: type_name.into(),
            label: None,
            description: None,
            is_read_only: false,
            priority: 0,
            category: None,
            kind_of_quantity: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Convenience for a primitive property
    pub fn primitive(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Primitive, type_name)
    }
}

/// Shared data of all class-like items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassData {
    pub modifier: ClassModifier,
    pub base_class: Option<FullName>,

    /// Mixins applied to an entity class
    pub mixins: Vec<FullName>,

    /// Entity class a mixin applies to
    pub applies_to: Option<FullName>,

    pub properties: Vec<Property>,
    pub custom_attributes: Vec<CustomAttributeInstance>,
}

impl ClassData {
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// One end of a relationship class
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipConstraint {
    pub end: RelationshipEnd,
    pub polymorphic: bool,
    pub multiplicity: String,
    pub role_label: Option<String>,
    pub abstract_constraint: Option<FullName>,
    pub constraint_classes: Vec<FullName>,
    pub custom_attributes: Vec<CustomAttributeInstance>,
}

impl RelationshipConstraint {
    pub fn new(end: RelationshipEnd) -> Self {
        Self {
            end,
            polymorphic: false,
            multiplicity: "(0..*)".to_string(),
            role_label: None,
            abstract_constraint: None,
            constraint_classes: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipClassData {
    pub class: ClassData,
    pub strength: String,
    pub strength_direction: String,
    pub source: RelationshipConstraint,
    pub target: RelationshipConstraint,
}

impl RelationshipClassData {
    pub fn new() -> Self {
        Self {
            class: ClassData::default(),
            strength: "Referencing".to_string(),
            strength_direction: "Forward".to_string(),
            source: RelationshipConstraint::new(RelationshipEnd::Source),
            target: RelationshipConstraint::new(RelationshipEnd::Target),
        }
    }

    pub fn constraint(&self, end: RelationshipEnd) -> &RelationshipConstraint {
        match end {
            RelationshipEnd::Source => &self.source,
            RelationshipEnd::Target => &self.target,
        }
    }
}

impl Default for RelationshipClassData {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enumerator {
    pub name: String,
    pub value: AttributeValue,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl Enumerator {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            label: None,
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationData {
    /// Backing primitive type (`int` or `string`)
    pub backing_type: String,
    pub is_strict: bool,
    pub enumerators: Vec<Enumerator>,
}

impl EnumerationData {
    pub fn get_enumerator(&self, name: &str) -> Option<&Enumerator> {
        self.enumerators.iter().find(|e| e.name == name)
    }
}

/// Unit override of a presentation format: `[Schema.Unit|label]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitOverride {
    pub unit: FullName,

    /// `Some("")` for an explicit empty label (`[Schema.Unit|]`)
    pub label: Option<String>,
}

/// A kind of quantity presentation format with its overrides, written
/// `Schema.Format(precision)[Schema.Unit|label]...`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PresentationFormat {
    pub format: FullName,
    pub precision: Option<u32>,
    pub unit_overrides: Vec<UnitOverride>,
}

impl PresentationFormat {
    pub fn new(format: FullName) -> Self {
        Self {
            format,
            precision: None,
            unit_overrides: Vec::new(),
        }
    }

    /// Parse an override string whose names are all qualified
    pub fn parse(text: &str) -> Option<Self> {
        Self::parse_with(text, FullName::parse)
    }

    /// Parse an override string, resolving every format and unit name
    /// through `qualify`
    pub fn parse_with(text: &str, qualify: impl Fn(&str) -> Option<FullName>) -> Option<Self> {
        let (head, mut overrides) = match text.find('[') {
            Some(i) => (&text[..i], &text[i..]),
            None => (text, ""),
        };

        let (name, precision) = match head.find('(') {
            Some(i) => {
                let digits = head[i + 1..].strip_suffix(')')?;
                (&head[..i], Some(digits.trim().parse::<u32>().ok()?))
            }
            None => (head, None),
        };

        let mut unit_overrides = Vec::new();
        while !overrides.is_empty() {
            let inner = overrides.strip_prefix('[')?;
            let end = inner.find(']')?;
            let (unit, label) = match inner[..end].split_once('|') {
                Some((unit, label)) => (unit, Some(label.to_string())),
                None => (&inner[..end], None),
            };

            unit_overrides.push(UnitOverride {
                unit: qualify(unit.trim())?,
                label,
            });
            overrides = &inner[end + 1..];
        }

        Some(Self {
            format: qualify(name.trim())?,
            precision,
            unit_overrides,
        })
    }

    /// Copy with `f` applied to the format and every override unit
    pub fn map_names(&self, f: impl Fn(&FullName) -> FullName) -> Self {
        Self {
            format: f(&self.format),
            precision: self.precision,
            unit_overrides: self
                .unit_overrides
                .iter()
                .map(|o| UnitOverride {
                    unit: f(&o.unit),
                    label: o.label.clone(),
                })
                .collect(),
        }
    }

    /// The format's schema with the whole override string as item name
    pub fn full_name(&self) -> FullName {
        let text = self.to_string();
        let name = text
            .strip_prefix(&format!("{}.", self.format.schema))
            .unwrap_or(&text)
            .to_string();
        FullName::new(self.format.schema.clone(), name)
    }
}

impl std::fmt::Display for PresentationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format)?;
        if let Some(precision) = self.precision {
            write!(f, "({})", precision)?;
        }
        for o in &self.unit_overrides {
            match &o.label {
                Some(label) => write!(f, "[{}|{}]", o.unit, label)?,
                None => write!(f, "[{}]", o.unit)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KindOfQuantityData {
    pub relative_error: f64,
    pub persistence_unit: Option<FullName>,
    pub presentation_formats: Vec<PresentationFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyCategoryData {
    pub priority: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitData {
    pub phenomenon: Option<FullName>,
    pub unit_system: Option<FullName>,
    pub definition: String,
    pub numerator: f64,
    pub denominator: f64,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvertedUnitData {
    pub inverts_unit: Option<FullName>,
    pub unit_system: Option<FullName>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantData {
    pub phenomenon: Option<FullName>,
    pub definition: String,
    pub numerator: f64,
    pub denominator: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhenomenonData {
    pub definition: String,
}

/// A unit of a composite format, with an optional label override
#[derive(Debug, Clone, PartialEq)]
pub struct FormatUnit {
    pub unit: FullName,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompositeFormat {
    pub spacer: Option<String>,
    pub include_zero: Option<bool>,
    pub units: Vec<FormatUnit>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatData {
    pub format_type: String,
    pub precision: Option<i64>,
    pub round_factor: Option<f64>,
    pub show_sign_option: Option<String>,
    pub decimal_separator: Option<String>,
    pub thousand_separator: Option<String>,
    pub uom_separator: Option<String>,
    pub format_traits: Vec<String>,
    pub composite: Option<CompositeFormat>,
}

impl FormatData {
    pub fn units(&self) -> &[FormatUnit] {
        self.composite.as_ref().map(|c| c.units.as_slice()).unwrap_or(&[])
    }
}

/// Kind-specific item data
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaItemKind {
    EntityClass(ClassData),
    Mixin(ClassData),
    StructClass(ClassData),
    CustomAttributeClass(ClassData),
    RelationshipClass(RelationshipClassData),
    Enumeration(EnumerationData),
    KindOfQuantity(KindOfQuantityData),
    PropertyCategory(PropertyCategoryData),
    Unit(UnitData),
    InvertedUnit(InvertedUnitData),
    Constant(ConstantData),
    Phenomenon(PhenomenonData),
    UnitSystem,
    Format(FormatData),
}

impl SchemaItemKind {
    pub fn item_type(&self) -> SchemaItemType {
        match self {
            Self::EntityClass(_) => SchemaItemType::EntityClass,
            Self::Mixin(_) => SchemaItemType::Mixin,
            Self::StructClass(_) => SchemaItemType::StructClass,
            Self::CustomAttributeClass(_) => SchemaItemType::CustomAttributeClass,
            Self::RelationshipClass(_) => SchemaItemType::RelationshipClass,
            Self::Enumeration(_) => SchemaItemType::Enumeration,
            Self::KindOfQuantity(_) => SchemaItemType::KindOfQuantity,
            Self::PropertyCategory(_) => SchemaItemType::PropertyCategory,
            Self::Unit(_) => SchemaItemType::Unit,
            Self::InvertedUnit(_) => SchemaItemType::InvertedUnit,
            Self::Constant(_) => SchemaItemType::Constant,
            Self::Phenomenon(_) => SchemaItemType::Phenomenon,
            Self::UnitSystem => SchemaItemType::UnitSystem,
            Self::Format(_) => SchemaItemType::Format,
        }
    }
}

/// A named entity owned by a schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaItem {
    pub name: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub kind: SchemaItemKind,
}

impl SchemaItem {
    pub fn new(name: impl Into<String>, kind: SchemaItemKind) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
            kind,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn item_type(&self) -> SchemaItemType {
        self.kind.item_type()
    }

    /// Class data of any class-like item, including relationship classes
    pub fn class_data(&self) -> Option<&ClassData> {
        match &self.kind {
            SchemaItemKind::EntityClass(c)
            | SchemaItemKind::Mixin(c)
            | SchemaItemKind::StructClass(c)
            | SchemaItemKind::CustomAttributeClass(c) => Some(c),
            SchemaItemKind::RelationshipClass(r) => Some(&r.class),
            _ => None,
        }
    }
}
