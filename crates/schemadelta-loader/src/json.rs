//! ECJson-style schema files
//!
//! Raw serde structures mirroring the on-disk layout, converted into the
//! core model by [`RawSchema::into_schema`]. Item names inside a file may be
//! bare (`Pipe`) or qualified (`Plant.Pipe`); bare names belong to the file's
//! own schema.

use indexmap::IndexMap;
use serde::Deserialize;

use schemadelta_core::{
    AttributeValue, ClassData, ClassModifier, CompositeFormat, ConstantData, CustomAttributeInstance,
    EnumerationData, Enumerator, FormatData, FormatUnit, FullName, InvertedUnitData, KindOfQuantityData,
    PhenomenonData, PresentationFormat, Property, PropertyCategoryData, PropertyType, RelationshipClassData,
    RelationshipConstraint, RelationshipEnd, Schema, SchemaItem, SchemaItemKind, SchemaReference,
    SchemaVersion, UnitData,
};

use crate::error::LoadError;

/// Top-level schema document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    pub name: String,

    /// `RR.WW.mm` or `RR.mm`
    pub version: String,

    #[serde(default)]
    pub alias: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub references: Vec<RawReference>,

    #[serde(default)]
    pub custom_attributes: Vec<RawCustomAttribute>,

    /// Items keyed by name, in document order
    #[serde(default)]
    pub items: IndexMap<String, RawItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawReference {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCustomAttribute {
    pub class_name: String,
}

/// One schema item, tagged by `schemaItemType`
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "schemaItemType")]
pub enum RawItem {
    EntityClass(RawClass),
    Mixin(RawClass),
    StructClass(RawClass),
    CustomAttributeClass(RawClass),
    RelationshipClass(RawRelationship),
    Enumeration(RawEnumeration),
    KindOfQuantity(RawKindOfQuantity),
    PropertyCategory(RawPropertyCategory),
    Unit(RawUnit),
    InvertedUnit(RawInvertedUnit),
    Constant(RawConstant),
    Phenomenon(RawPhenomenon),
    UnitSystem(RawCommon),
    Format(RawFormat),
}

/// Attributes every item carries
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCommon {
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawClass {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub modifier: Option<String>,

    #[serde(default)]
    pub base_class: Option<String>,

    #[serde(default)]
    pub mixins: Vec<String>,

    #[serde(default)]
    pub applies_to: Option<String>,

    #[serde(default)]
    pub properties: Vec<RawProperty>,

    #[serde(default)]
    pub custom_attributes: Vec<RawCustomAttribute>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub enum RawPropertyType {
    #[serde(rename = "PrimitiveProperty")]
    Primitive,
    #[serde(rename = "PrimitiveArrayProperty")]
    PrimitiveArray,
    #[serde(rename = "StructProperty")]
    Struct,
    #[serde(rename = "StructArrayProperty")]
    StructArray,
    #[serde(rename = "NavigationProperty")]
    Navigation,
}

impl From<RawPropertyType> for PropertyType {
    fn from(raw: RawPropertyType) -> Self {
        match raw {
            RawPropertyType::Primitive => PropertyType::Primitive,
            RawPropertyType::PrimitiveArray => PropertyType::PrimitiveArray,
            RawPropertyType::Struct => PropertyType::Struct,
            RawPropertyType::StructArray => PropertyType::StructArray,
            RawPropertyType::Navigation => PropertyType::Navigation,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProperty {
    pub name: String,

    #[serde(rename = "type")]
    pub property_type: RawPropertyType,

    pub type_name: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_read_only: bool,

    #[serde(default)]
    pub priority: i64,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub kind_of_quantity: Option<String>,

    #[serde(default)]
    pub custom_attributes: Vec<RawCustomAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelationship {
    #[serde(flatten)]
    pub class: RawClass,

    #[serde(default)]
    pub strength: Option<String>,

    #[serde(default)]
    pub strength_direction: Option<String>,

    pub source: RawConstraint,
    pub target: RawConstraint,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConstraint {
    #[serde(default)]
    pub polymorphic: bool,

    #[serde(default)]
    pub multiplicity: Option<String>,

    #[serde(default)]
    pub role_label: Option<String>,

    #[serde(default)]
    pub abstract_constraint: Option<String>,

    #[serde(default)]
    pub constraint_classes: Vec<String>,

    #[serde(default)]
    pub custom_attributes: Vec<RawCustomAttribute>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnumeration {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(rename = "type")]
    pub backing_type: String,

    #[serde(default = "default_true")]
    pub is_strict: bool,

    #[serde(default)]
    pub enumerators: Vec<RawEnumerator>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEnumerator {
    pub name: String,
    pub value: serde_json::Value,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawKindOfQuantity {
    #[serde(flatten)]
    pub common: RawCommon,

    pub relative_error: f64,

    #[serde(default)]
    pub persistence_unit: Option<String>,

    #[serde(default)]
    pub presentation_units: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPropertyCategory {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub priority: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUnit {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub phenomenon: Option<String>,

    #[serde(default)]
    pub unit_system: Option<String>,

    pub definition: String,

    #[serde(default = "default_one")]
    pub numerator: f64,

    #[serde(default = "default_one")]
    pub denominator: f64,

    #[serde(default)]
    pub offset: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInvertedUnit {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub inverts_unit: Option<String>,

    #[serde(default)]
    pub unit_system: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawConstant {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(default)]
    pub phenomenon: Option<String>,

    pub definition: String,

    #[serde(default = "default_one")]
    pub numerator: f64,

    #[serde(default = "default_one")]
    pub denominator: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPhenomenon {
    #[serde(flatten)]
    pub common: RawCommon,

    pub definition: String,
}

/// `formatTraits` is either a list or a `|` / `,` separated string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFormatTraits {
    List(Vec<String>),
    Joined(String),
}

impl RawFormatTraits {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(traits) => traits,
            Self::Joined(text) => text
                .split(['|', ',', ';'])
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFormat {
    #[serde(flatten)]
    pub common: RawCommon,

    #[serde(rename = "type")]
    pub format_type: String,

    #[serde(default)]
    pub precision: Option<i64>,

    #[serde(default)]
    pub round_factor: Option<f64>,

    #[serde(default)]
    pub show_sign_option: Option<String>,

    #[serde(default)]
    pub decimal_separator: Option<String>,

    #[serde(default)]
    pub thousand_separator: Option<String>,

    #[serde(default)]
    pub uom_separator: Option<String>,

    #[serde(default)]
    pub format_traits: Option<RawFormatTraits>,

    #[serde(default)]
    pub composite: Option<RawComposite>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComposite {
    #[serde(default)]
    pub spacer: Option<String>,

    #[serde(default)]
    pub include_zero: Option<bool>,

    #[serde(default)]
    pub units: Vec<RawFormatUnit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawFormatUnit {
    pub name: String,

    #[serde(default)]
    pub label: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

impl std::str::FromStr for RawSchema {
    type Err = LoadError;

    fn from_str(json: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(json).map_err(|e| LoadError::InvalidFormat(e.to_string()))
    }
}

impl RawSchema {
    /// Build the in-memory schema. References are recorded, not resolved.
    pub fn into_schema(self) -> Result<Schema, LoadError> {
        let version = parse_version(&self.version)?;
        let alias = self.alias.unwrap_or_else(|| self.name.to_lowercase());

        let mut schema = Schema::new(self.name, alias, version.read, version.write, version.minor);
        schema.label = self.label;
        schema.description = self.description;

        for reference in self.references {
            let version = parse_version(&reference.version)?;
            schema.add_reference(SchemaReference::new(reference.name, version));
        }
        for instance in self.custom_attributes {
            schema.add_custom_attribute(CustomAttributeInstance::new(instance.class_name));
        }

        let names = Names { schema: schema.name.clone() };
        for (name, raw) in self.items {
            let item = names.item(name, raw)?;
            schema
                .add_item(item)
                .map_err(|e| LoadError::InvalidFormat(e.to_string()))?;
        }

        Ok(schema)
    }
}

fn parse_version(text: &str) -> Result<SchemaVersion, LoadError> {
    SchemaVersion::parse(text)
        .ok_or_else(|| LoadError::InvalidFormat(format!("Invalid schema version '{}'", text)))
}

fn custom_attributes(raw: Vec<RawCustomAttribute>) -> Vec<CustomAttributeInstance> {
    raw.into_iter()
        .map(|ca| CustomAttributeInstance::new(ca.class_name))
        .collect()
}

fn enumerator_value(name: &str, value: serde_json::Value) -> Result<AttributeValue, LoadError> {
    match value {
        serde_json::Value::String(text) => Ok(AttributeValue::Text(text)),
        serde_json::Value::Bool(flag) => Ok(AttributeValue::Bool(flag)),
        serde_json::Value::Number(number) => number
            .as_i64()
            .map(AttributeValue::Integer)
            .or_else(|| number.as_f64().map(AttributeValue::Float))
            .ok_or_else(|| LoadError::InvalidFormat(format!("Enumerator '{}' has an invalid value", name))),
        other => Err(LoadError::InvalidFormat(format!(
            "Enumerator '{}' has an unsupported value: {}",
            name, other
        ))),
    }
}

/// Qualifies names relative to the schema being loaded
struct Names {
    schema: String,
}

impl Names {
    fn qualify(&self, text: &str) -> Result<FullName, LoadError> {
        if !text.contains('.') {
            if text.is_empty() {
                return Err(LoadError::InvalidFormat("Empty item name".to_string()));
            }
            return Ok(FullName::new(self.schema.clone(), text));
        }

        FullName::parse(text)
            .ok_or_else(|| LoadError::InvalidFormat(format!("Invalid qualified name '{}'", text)))
    }

    fn qualify_opt(&self, text: Option<String>) -> Result<Option<FullName>, LoadError> {
        text.map(|t| self.qualify(&t)).transpose()
    }

    fn qualify_all(&self, texts: Vec<String>) -> Result<Vec<FullName>, LoadError> {
        texts.iter().map(|t| self.qualify(t)).collect()
    }

    /// `Format(precision)[Unit|label]...`, each name bare or qualified
    fn presentation_format(&self, text: &str) -> Result<PresentationFormat, LoadError> {
        PresentationFormat::parse_with(text, |name| self.qualify(name).ok())
            .ok_or_else(|| LoadError::InvalidFormat(format!("Invalid presentation format '{}'", text)))
    }

    fn item(&self, name: String, raw: RawItem) -> Result<SchemaItem, LoadError> {
        let (common, kind) = match raw {
            RawItem::EntityClass(class) => {
                let (common, data) = self.class(class)?;
                (common, SchemaItemKind::EntityClass(data))
            }
            RawItem::Mixin(class) => {
                let (common, data) = self.class(class)?;
                (common, SchemaItemKind::Mixin(data))
            }
            RawItem::StructClass(class) => {
                let (common, data) = self.class(class)?;
                (common, SchemaItemKind::StructClass(data))
            }
            RawItem::CustomAttributeClass(class) => {
                let (common, data) = self.class(class)?;
                (common, SchemaItemKind::CustomAttributeClass(data))
            }
            RawItem::RelationshipClass(rel) => {
                let (common, data) = self.relationship(rel)?;
                (common, SchemaItemKind::RelationshipClass(data))
            }
            RawItem::Enumeration(raw) => {
                let enumerators = raw
                    .enumerators
                    .into_iter()
                    .map(|e| {
                        let value = enumerator_value(&e.name, e.value)?;
                        Ok(Enumerator {
                            name: e.name,
                            value,
                            label: e.label,
                            description: e.description,
                        })
                    })
                    .collect::<Result<Vec<_>, LoadError>>()?;

                let data = EnumerationData {
                    backing_type: raw.backing_type,
                    is_strict: raw.is_strict,
                    enumerators,
                };
                (raw.common, SchemaItemKind::Enumeration(data))
            }
            RawItem::KindOfQuantity(raw) => {
                let data = KindOfQuantityData {
                    relative_error: raw.relative_error,
                    persistence_unit: self.qualify_opt(raw.persistence_unit)?,
                    presentation_formats: raw
                        .presentation_units
                        .iter()
                        .map(|text| self.presentation_format(text))
                        .collect::<Result<Vec<_>, LoadError>>()?,
                };
                (raw.common, SchemaItemKind::KindOfQuantity(data))
            }
            RawItem::PropertyCategory(raw) => (
                raw.common,
                SchemaItemKind::PropertyCategory(PropertyCategoryData { priority: raw.priority }),
            ),
            RawItem::Unit(raw) => {
                let data = UnitData {
                    phenomenon: self.qualify_opt(raw.phenomenon)?,
                    unit_system: self.qualify_opt(raw.unit_system)?,
                    definition: raw.definition,
                    numerator: raw.numerator,
                    denominator: raw.denominator,
                    offset: raw.offset,
                };
                (raw.common, SchemaItemKind::Unit(data))
            }
            RawItem::InvertedUnit(raw) => {
                let data = InvertedUnitData {
                    inverts_unit: self.qualify_opt(raw.inverts_unit)?,
                    unit_system: self.qualify_opt(raw.unit_system)?,
                };
                (raw.common, SchemaItemKind::InvertedUnit(data))
            }
            RawItem::Constant(raw) => {
                let data = ConstantData {
                    phenomenon: self.qualify_opt(raw.phenomenon)?,
                    definition: raw.definition,
                    numerator: raw.numerator,
                    denominator: raw.denominator,
                };
                (raw.common, SchemaItemKind::Constant(data))
            }
            RawItem::Phenomenon(raw) => (
                raw.common,
                SchemaItemKind::Phenomenon(PhenomenonData { definition: raw.definition }),
            ),
            RawItem::UnitSystem(common) => (common, SchemaItemKind::UnitSystem),
            RawItem::Format(raw) => {
                let (common, data) = self.format(raw)?;
                (common, SchemaItemKind::Format(data))
            }
        };

        Ok(SchemaItem {
            name,
            label: common.label,
            description: common.description,
            kind,
        })
    }

    fn class(&self, raw: RawClass) -> Result<(RawCommon, ClassData), LoadError> {
        let modifier = match raw.modifier.as_deref() {
            None | Some("None") => ClassModifier::None,
            Some("Abstract") => ClassModifier::Abstract,
            Some("Sealed") => ClassModifier::Sealed,
            Some(other) => {
                return Err(LoadError::InvalidFormat(format!("Unknown class modifier '{}'", other)));
            }
        };

        let properties = raw
            .properties
            .into_iter()
            .map(|p| self.property(p))
            .collect::<Result<Vec<_>, LoadError>>()?;

        let data = ClassData {
            modifier,
            base_class: self.qualify_opt(raw.base_class)?,
            mixins: self.qualify_all(raw.mixins)?,
            applies_to: self.qualify_opt(raw.applies_to)?,
            properties,
            custom_attributes: custom_attributes(raw.custom_attributes),
        };

        Ok((raw.common, data))
    }

    fn property(&self, raw: RawProperty) -> Result<Property, LoadError> {
        let mut property = Property::new(raw.name, raw.property_type.into(), raw.type_name);
        property.label = raw.label;
        property.description = raw.description;
        property.is_read_only = raw.is_read_only;
        property.priority = raw.priority;
        property.category = self.qualify_opt(raw.category)?;
        property.kind_of_quantity = self.qualify_opt(raw.kind_of_quantity)?;
        property.custom_attributes = custom_attributes(raw.custom_attributes);
        Ok(property)
    }

    fn relationship(&self, raw: RawRelationship) -> Result<(RawCommon, RelationshipClassData), LoadError> {
        let (common, class) = self.class(raw.class)?;
        let mut data = RelationshipClassData::new();
        data.class = class;

        if let Some(strength) = raw.strength {
            data.strength = strength;
        }
        if let Some(direction) = raw.strength_direction {
            data.strength_direction = direction;
        }
        data.source = self.constraint(RelationshipEnd::Source, raw.source)?;
        data.target = self.constraint(RelationshipEnd::Target, raw.target)?;

        Ok((common, data))
    }

    fn constraint(&self, end: RelationshipEnd, raw: RawConstraint) -> Result<RelationshipConstraint, LoadError> {
        let mut constraint = RelationshipConstraint::new(end);
        constraint.polymorphic = raw.polymorphic;
        if let Some(multiplicity) = raw.multiplicity {
            constraint.multiplicity = multiplicity;
        }
        constraint.role_label = raw.role_label;
        constraint.abstract_constraint = self.qualify_opt(raw.abstract_constraint)?;
        constraint.constraint_classes = self.qualify_all(raw.constraint_classes)?;
        constraint.custom_attributes = custom_attributes(raw.custom_attributes);
        Ok(constraint)
    }

    fn format(&self, raw: RawFormat) -> Result<(RawCommon, FormatData), LoadError> {
        let composite = raw
            .composite
            .map(|c| {
                let units = c
                    .units
                    .into_iter()
                    .map(|u| {
                        Ok(FormatUnit {
                            unit: self.qualify(&u.name)?,
                            label: u.label,
                        })
                    })
                    .collect::<Result<Vec<_>, LoadError>>()?;

                Ok::<_, LoadError>(CompositeFormat {
                    spacer: c.spacer,
                    include_zero: c.include_zero,
                    units,
                })
            })
            .transpose()?;

        let data = FormatData {
            format_type: raw.format_type,
            precision: raw.precision,
            round_factor: raw.round_factor,
            show_sign_option: raw.show_sign_option,
            decimal_separator: raw.decimal_separator,
            thousand_separator: raw.thousand_separator,
            uom_separator: raw.uom_separator,
            format_traits: raw.format_traits.map(RawFormatTraits::into_vec).unwrap_or_default(),
            composite,
        };

        Ok((raw.common, data))
    }
}
