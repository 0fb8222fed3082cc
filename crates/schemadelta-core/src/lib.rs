//! SchemaDelta Core
//!
//! Core domain model shared by the loader, the comparison engine and the CLI.
//! Never rename diagnostic codes - they are part of the public API.

pub mod schema;
pub mod items;
pub mod entity;
pub mod diagnostic;
pub mod changes;
pub mod report;
pub mod config;

pub use schema::{Schema, SchemaId, SchemaVersion, SchemaReference, FullName, CustomAttributeInstance, ModelError};
pub use items::{
    SchemaItem, SchemaItemKind, SchemaItemType, ClassData, ClassModifier, RelationshipClassData,
    RelationshipConstraint, RelationshipEnd, Property, PropertyType, EnumerationData, Enumerator,
    KindOfQuantityData, PresentationFormat, UnitOverride, PropertyCategoryData, UnitData, InvertedUnitData, ConstantData, PhenomenonData,
    FormatData, CompositeFormat, FormatUnit,
};
pub use entity::{SchemaRef, ItemRef, PropertyRef, ConstraintRef, Target};
pub use diagnostic::{Diagnostic, DiagnosticCode, DiagnosticFamily, AttributeValue, ValueChange, Payload, PayloadItem};
pub use changes::SchemaChanges;
pub use report::{ComparisonReport, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, OutputConfig};
