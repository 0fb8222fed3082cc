//! Line formatting
//!
//! Turns a classified diagnostic into its report lines: one line per path
//! segment, followed by the leaf line(s) whose shape depends on the code.

use schemadelta_core::{
    Diagnostic, DiagnosticCode, FullName, Payload, PayloadItem, SchemaItemType, Target, ValueChange,
};

use crate::error::ReportError;
use crate::path::{self, Category, PathSegment};
use crate::symbol::{ChangeSymbol, Classification};

/// One formatted report line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub symbol: ChangeSymbol,

    /// Indentation level, one tab per level
    pub depth: usize,

    pub text: String,
}

impl ReportLine {
    pub fn new(symbol: ChangeSymbol, depth: usize, text: impl Into<String>) -> Self {
        Self {
            symbol,
            depth,
            text: text.into(),
        }
    }
}

impl std::fmt::Display for ReportLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.symbol, "\t".repeat(self.depth), self.text)
    }
}

/// Kind of target a code accepts
#[derive(Debug, Clone, Copy)]
enum Expect {
    Schema,
    ClassLike,
    ItemType(SchemaItemType),
    AnyItem,
    Property,
    Constraint,
    AnyContainer,
}

fn expected_target(code: DiagnosticCode) -> Expect {
    use DiagnosticCode::*;

    match code {
        SchemaDelta | SchemaReferenceMissing => Expect::Schema,
        ClassDelta | BaseClassDelta => Expect::ClassLike,
        RelationshipConstraintDelta | RelationshipConstraintClassMissing => Expect::Constraint,
        PropertyDelta | PropertyMissing => Expect::Property,
        EnumerationDelta | EnumeratorDelta | EnumeratorMissing => {
            Expect::ItemType(SchemaItemType::Enumeration)
        }
        KoqDelta | PresentationUnitMissing => Expect::ItemType(SchemaItemType::KindOfQuantity),
        FormatDelta | UnitLabelOverrideDelta | FormatUnitMissing => {
            Expect::ItemType(SchemaItemType::Format)
        }
        PropertyCategoryDelta => Expect::ItemType(SchemaItemType::PropertyCategory),
        UnitDelta => Expect::ItemType(SchemaItemType::Unit),
        InvertedUnitDelta => Expect::ItemType(SchemaItemType::InvertedUnit),
        PhenomenonDelta => Expect::ItemType(SchemaItemType::Phenomenon),
        ConstantDelta => Expect::ItemType(SchemaItemType::Constant),
        EntityMixinMissing => Expect::ItemType(SchemaItemType::EntityClass),
        SchemaItemMissing => Expect::AnyItem,
        CustomAttributeInstanceClassMissing => Expect::AnyContainer,
    }
}

fn target_fits(expect: Expect, target: &Target) -> bool {
    match (expect, target) {
        (Expect::AnyContainer, _) => true,
        (Expect::Schema, Target::Schema(_)) => true,
        (Expect::AnyItem, Target::Item(_)) => true,
        (Expect::ClassLike, Target::Item(item)) => item.item_type().is_class(),
        (Expect::ItemType(expected), Target::Item(item)) => item.item_type() == expected,
        (Expect::Property, Target::Property(property)) => property.class().item_type().is_class(),
        (Expect::Constraint, Target::Constraint(constraint)) => {
            constraint.relationship().item_type() == SchemaItemType::RelationshipClass
        }
        _ => false,
    }
}

fn describe(target: &Target) -> String {
    match target {
        Target::Schema(schema) => format!("schema '{}'", schema.name()),
        Target::Item(item) => format!("{} '{}'", item.item_type(), item.full_name()),
        Target::Property(property) => {
            format!("property '{}.{}'", property.class().full_name(), property.name())
        }
        Target::Constraint(constraint) => format!(
            "{} constraint of {} '{}'",
            constraint.end(),
            constraint.relationship().item_type(),
            constraint.relationship().full_name()
        ),
    }
}

/// `<Attr>: <old> -> <new>` with the attribute name's first character upper-cased
fn change_text(code: DiagnosticCode, change: &ValueChange) -> Result<String, ReportError> {
    if change.attribute.is_empty() {
        return Err(ReportError::malformed(code, "empty attribute name"));
    }

    Ok(format!(
        "{}: {} -> {}",
        capitalize(&change.attribute),
        change.old,
        change.new
    ))
}

fn capitalize(attribute: &str) -> String {
    let mut chars = attribute.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn full_name_or_undefined(name: &Option<FullName>) -> String {
    match name {
        Some(name) => name.to_string(),
        None => "undefined".to_string(),
    }
}

fn shape_error(code: DiagnosticCode, expected: &str) -> ReportError {
    ReportError::malformed(code, format!("expected {} payload", expected))
}

/// Renders classified diagnostics into report lines
#[derive(Debug, Default, Clone, Copy)]
pub struct LineFormatter;

impl LineFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Format `diagnostic` into its lines, root to leaf.
    ///
    /// Fails without producing any line if the target or payload does not fit
    /// the diagnostic code.
    pub fn format(
        &self,
        diagnostic: &Diagnostic,
        classification: Classification,
    ) -> Result<Vec<ReportLine>, ReportError> {
        let code = diagnostic.code;
        if !target_fits(expected_target(code), &diagnostic.target) {
            return Err(ReportError::malformed(
                code,
                format!("{} is not a valid target", describe(&diagnostic.target)),
            ));
        }

        let mut segments = path::resolve(&diagnostic.target);
        let leaves = self.leaves(diagnostic, &mut segments)?;

        let mut lines = Vec::with_capacity(segments.len() + leaves.len());
        for (depth, segment) in segments.iter().enumerate() {
            lines.push(ReportLine::new(classification.path, depth, segment.label()));
        }

        let leaf_depth = segments.len();
        for leaf in leaves {
            lines.push(ReportLine::new(classification.leaf, leaf_depth, leaf));
        }

        Ok(lines)
    }

    /// Leaf texts for `diagnostic`; extends `segments` with member containers
    /// or pops the target segment when the target itself is the leaf
    fn leaves(
        &self,
        diagnostic: &Diagnostic,
        segments: &mut Vec<PathSegment>,
    ) -> Result<Vec<String>, ReportError> {
        use DiagnosticCode::*;

        let code = diagnostic.code;
        let payload = &diagnostic.payload;

        match code {
            SchemaDelta
            | ClassDelta
            | RelationshipConstraintDelta
            | PropertyDelta
            | EnumerationDelta
            | KoqDelta
            | FormatDelta
            | PropertyCategoryDelta
            | UnitDelta
            | InvertedUnitDelta
            | PhenomenonDelta
            | ConstantDelta => match payload {
                Payload::Change(change) => Ok(vec![change_text(code, change)?]),
                _ => Err(shape_error(code, "value change")),
            },

            BaseClassDelta => match payload {
                Payload::BaseClassChange { old, new } => Ok(vec![format!(
                    "BaseClass: {} -> {}",
                    full_name_or_undefined(old),
                    full_name_or_undefined(new)
                )]),
                _ => Err(shape_error(code, "base class change")),
            },

            EnumeratorDelta => match payload {
                Payload::MemberChange {
                    member: PayloadItem::Enumerator(name),
                    change,
                } => {
                    segments.push(PathSegment::Category(Category::Enumerators));
                    segments.push(PathSegment::item("Enumerator", name.as_str()));
                    Ok(vec![change_text(code, change)?])
                }
                _ => Err(shape_error(code, "enumerator change")),
            },

            UnitLabelOverrideDelta => match payload {
                Payload::MemberChange {
                    member: PayloadItem::SchemaItem(unit),
                    change,
                } => {
                    segments.push(PathSegment::Category(Category::Units));
                    segments.push(PathSegment::item("Unit", unit.to_string()));
                    Ok(vec![change_text(code, change)?])
                }
                _ => Err(shape_error(code, "format unit change")),
            },

            SchemaItemMissing | PropertyMissing => match payload {
                Payload::None => self.target_as_leaf(code, segments),
                Payload::Items(items) if items.is_empty() => self.target_as_leaf(code, segments),
                _ => Err(shape_error(code, "empty")),
            },

            SchemaReferenceMissing => member_leaves(code, payload, segments, Category::SchemaReferences, |item| {
                match item {
                    PayloadItem::SchemaReference(name) => Some(format!("Schema({})", name)),
                    _ => None,
                }
            }),

            EntityMixinMissing => member_leaves(code, payload, segments, Category::Mixins, |item| {
                qualified(item).map(|name| format!("Mixin: {}", name))
            }),

            CustomAttributeInstanceClassMissing => {
                member_leaves(code, payload, segments, Category::CustomAttributes, |item| match item {
                    PayloadItem::CustomAttribute { class_name } => {
                        Some(format!("CustomAttribute: {}", class_name))
                    }
                    _ => None,
                })
            }

            RelationshipConstraintClassMissing => {
                member_leaves(code, payload, segments, Category::ConstraintClasses, |item| {
                    qualified(item).map(|name| format!("ConstraintClass: {}", name))
                })
            }

            EnumeratorMissing => member_leaves(code, payload, segments, Category::Enumerators, |item| {
                match item {
                    PayloadItem::Enumerator(name) => Some(format!("Enumerator({})", name)),
                    _ => None,
                }
            }),

            PresentationUnitMissing => {
                member_leaves(code, payload, segments, Category::PresentationUnits, |item| {
                    qualified(item).map(|name| format!("Unit: {}", name))
                })
            }

            FormatUnitMissing => member_leaves(code, payload, segments, Category::Units, |item| {
                qualified(item).map(|name| format!("Unit: {}", name))
            }),
        }
    }

    fn target_as_leaf(
        &self,
        code: DiagnosticCode,
        segments: &mut Vec<PathSegment>,
    ) -> Result<Vec<String>, ReportError> {
        let target = segments
            .pop()
            .ok_or_else(|| ReportError::malformed(code, "empty containment path"))?;
        Ok(vec![target.label()])
    }
}

fn qualified(item: &PayloadItem) -> Option<String> {
    match item {
        PayloadItem::SchemaItem(name) => Some(name.to_string()),
        _ => None,
    }
}

/// Push the member container and render one leaf per payload item
fn member_leaves(
    code: DiagnosticCode,
    payload: &Payload,
    segments: &mut Vec<PathSegment>,
    container: Category,
    render: impl Fn(&PayloadItem) -> Option<String>,
) -> Result<Vec<String>, ReportError> {
    let items = match payload {
        Payload::Items(items) if !items.is_empty() => items,
        Payload::Items(_) => return Err(ReportError::malformed(code, "no payload items")),
        _ => return Err(shape_error(code, "item list")),
    };

    let leaves = items
        .iter()
        .map(|item| {
            render(item).ok_or_else(|| {
                ReportError::malformed(code, format!("unexpected payload item {:?}", item))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    segments.push(PathSegment::Category(container));
    Ok(leaves)
}
