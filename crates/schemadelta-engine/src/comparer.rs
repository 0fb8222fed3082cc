//! Schema comparer
//!
//! Walks two in-memory schemas and produces the ordered diagnostic set the
//! reporter consumes. Deltas target schema A's entity; missing diagnostics
//! target the side that has the entity.

use schemadelta_core::{
    AttributeValue, ClassData, CustomAttributeInstance, Diagnostic, DiagnosticCode, EnumerationData,
    FormatData, FullName, ItemRef, KindOfQuantityData, PayloadItem, PresentationFormat, Property,
    RelationshipClassData, RelationshipEnd, Schema, SchemaChanges, SchemaItem, SchemaItemKind,
    SchemaItemType, Target, ValueChange,
};

/// Delta code for attribute changes of an item type; `None` for types that
/// are compared for presence only
fn delta_code(item_type: SchemaItemType) -> Option<DiagnosticCode> {
    match item_type {
        SchemaItemType::EntityClass
        | SchemaItemType::Mixin
        | SchemaItemType::StructClass
        | SchemaItemType::CustomAttributeClass
        | SchemaItemType::RelationshipClass => Some(DiagnosticCode::ClassDelta),
        SchemaItemType::Enumeration => Some(DiagnosticCode::EnumerationDelta),
        SchemaItemType::KindOfQuantity => Some(DiagnosticCode::KoqDelta),
        SchemaItemType::PropertyCategory => Some(DiagnosticCode::PropertyCategoryDelta),
        SchemaItemType::Unit => Some(DiagnosticCode::UnitDelta),
        SchemaItemType::InvertedUnit => Some(DiagnosticCode::InvertedUnitDelta),
        SchemaItemType::Constant => Some(DiagnosticCode::ConstantDelta),
        SchemaItemType::Phenomenon => Some(DiagnosticCode::PhenomenonDelta),
        SchemaItemType::Format => Some(DiagnosticCode::FormatDelta),
        SchemaItemType::UnitSystem => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Computes the differences between two schemas
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaComparer;

impl SchemaComparer {
    pub fn new() -> Self {
        Self
    }

    /// Compare `schema_a` against `schema_b`; the result is anchored on A
    pub fn compare(&self, schema_a: &Schema, schema_b: &Schema) -> SchemaChanges {
        let mut comparison = Comparison {
            a: schema_a,
            b: schema_b,
            changes: SchemaChanges::new(schema_a),
        };

        comparison.compare_schema();
        comparison.compare_items();

        tracing::debug!(
            schema_a = %schema_a.name,
            schema_b = %schema_b.name,
            diagnostics = comparison.changes.len(),
            "Compared schemas"
        );

        comparison.changes
    }
}

/// State of one comparison run
struct Comparison<'s> {
    a: &'s Schema,
    b: &'s Schema,
    changes: SchemaChanges,
}

impl<'s> Comparison<'s> {
    // Name matching

    /// Names qualified by the compared schema itself lose their schema part,
    /// so self-references of a renamed schema still match
    fn neutral(&self, side: Side, name: &FullName) -> FullName {
        let own = match side {
            Side::A => &self.a.name,
            Side::B => &self.b.name,
        };

        if name.schema == *own {
            FullName::new("", name.name.clone())
        } else {
            name.clone()
        }
    }

    fn same_name(&self, a: &FullName, b: &FullName) -> bool {
        self.neutral(Side::A, a) == self.neutral(Side::B, b)
    }

    fn same_optional_name(&self, a: &Option<FullName>, b: &Option<FullName>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.same_name(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Same as [`Self::same_name`] for free-form names that may be qualified
    fn same_text_name(&self, a: &str, b: &str) -> bool {
        match (FullName::parse(a), FullName::parse(b)) {
            (Some(a), Some(b)) => self.same_name(&a, &b),
            _ => a == b,
        }
    }

    // Diagnostic helpers

    fn value_delta(
        &mut self,
        code: DiagnosticCode,
        target: &Target,
        attribute: &str,
        old: impl Into<AttributeValue>,
        new: impl Into<AttributeValue>,
    ) {
        let (old, new) = (old.into(), new.into());
        if old != new {
            self.changes.add_diagnostic(Diagnostic::delta(
                code,
                target.clone(),
                ValueChange::new(attribute, old, new),
            ));
        }
    }

    fn name_delta(
        &mut self,
        code: DiagnosticCode,
        target: &Target,
        attribute: &str,
        old: &Option<FullName>,
        new: &Option<FullName>,
    ) {
        if !self.same_optional_name(old, new) {
            self.changes.add_diagnostic(Diagnostic::delta(
                code,
                target.clone(),
                ValueChange::new(attribute, old.as_ref(), new.as_ref()),
            ));
        }
    }

    fn push_missing(&mut self, code: DiagnosticCode, target: Target, items: Vec<PayloadItem>) {
        if !items.is_empty() {
            self.changes.add_diagnostic(Diagnostic::missing(code, target, items));
        }
    }

    /// One missing diagnostic per side for names listed on that side only
    fn compare_name_lists(
        &mut self,
        code: DiagnosticCode,
        a_target: Target,
        b_target: Target,
        a: &[FullName],
        b: &[FullName],
    ) {
        let removed: Vec<PayloadItem> = a
            .iter()
            .filter(|x| !b.iter().any(|y| self.same_name(x, y)))
            .cloned()
            .map(PayloadItem::SchemaItem)
            .collect();
        let added: Vec<PayloadItem> = b
            .iter()
            .filter(|y| !a.iter().any(|x| self.same_name(x, y)))
            .cloned()
            .map(PayloadItem::SchemaItem)
            .collect();

        self.push_missing(code, a_target, removed);
        self.push_missing(code, b_target, added);
    }

    fn compare_custom_attributes(
        &mut self,
        a_target: Target,
        b_target: Target,
        a: &[CustomAttributeInstance],
        b: &[CustomAttributeInstance],
    ) {
        let as_item = |ca: &CustomAttributeInstance| PayloadItem::CustomAttribute {
            class_name: ca.class_name.clone(),
        };

        let removed: Vec<PayloadItem> = a
            .iter()
            .filter(|x| !b.iter().any(|y| self.same_text_name(&x.class_name, &y.class_name)))
            .map(as_item)
            .collect();
        let added: Vec<PayloadItem> = b
            .iter()
            .filter(|y| !a.iter().any(|x| self.same_text_name(&x.class_name, &y.class_name)))
            .map(as_item)
            .collect();

        let code = DiagnosticCode::CustomAttributeInstanceClassMissing;
        self.push_missing(code, a_target, removed);
        self.push_missing(code, b_target, added);
    }

    // Schema level

    fn compare_schema(&mut self) {
        let (a, b) = (self.a, self.b);
        let target: Target = a.handle().into();
        let code = DiagnosticCode::SchemaDelta;

        self.value_delta(code, &target, "alias", a.alias.as_str(), b.alias.as_str());
        self.value_delta(code, &target, "label", a.label.as_deref(), b.label.as_deref());
        self.value_delta(code, &target, "description", a.description.as_deref(), b.description.as_deref());
        self.value_delta(code, &target, "version", a.version.to_string(), b.version.to_string());

        for reference in &a.references {
            if b.get_reference(&reference.name).is_none() {
                self.changes
                    .add_diagnostic(Diagnostic::schema_reference_missing(a.handle(), reference.name.clone()));
            }
        }
        for reference in &b.references {
            if a.get_reference(&reference.name).is_none() {
                self.changes
                    .add_diagnostic(Diagnostic::schema_reference_missing(b.handle(), reference.name.clone()));
            }
        }

        self.compare_custom_attributes(
            a.handle().into(),
            b.handle().into(),
            &a.custom_attributes,
            &b.custom_attributes,
        );
    }

    // Items

    fn compare_items(&mut self) {
        let (a, b) = (self.a, self.b);

        for item_a in a.items() {
            match b.get_item(&item_a.name) {
                Some(item_b) => self.compare_item(item_a, item_b),
                None => self.changes.add_diagnostic(Diagnostic::schema_item_missing(
                    a.item_handle(item_a.item_type(), item_a.name.clone()),
                )),
            }
        }

        for item_b in b.items() {
            if a.get_item(&item_b.name).is_none() {
                self.changes.add_diagnostic(Diagnostic::schema_item_missing(
                    b.item_handle(item_b.item_type(), item_b.name.clone()),
                ));
            }
        }
    }

    fn compare_item(&mut self, item_a: &'s SchemaItem, item_b: &'s SchemaItem) {
        let handle_a = self.a.item_handle(item_a.item_type(), item_a.name.clone());
        let handle_b = self.b.item_handle(item_b.item_type(), item_b.name.clone());

        if item_a.item_type() != item_b.item_type() {
            self.changes.add_diagnostic(Diagnostic::schema_item_missing(handle_a));
            self.changes.add_diagnostic(Diagnostic::schema_item_missing(handle_b));
            return;
        }

        let Some(code) = delta_code(item_a.item_type()) else {
            return;
        };
        let target: Target = handle_a.clone().into();

        self.value_delta(code, &target, "label", item_a.label.as_deref(), item_b.label.as_deref());
        self.value_delta(
            code,
            &target,
            "description",
            item_a.description.as_deref(),
            item_b.description.as_deref(),
        );

        match (&item_a.kind, &item_b.kind) {
            (SchemaItemKind::EntityClass(a), SchemaItemKind::EntityClass(b))
            | (SchemaItemKind::Mixin(a), SchemaItemKind::Mixin(b))
            | (SchemaItemKind::StructClass(a), SchemaItemKind::StructClass(b))
            | (SchemaItemKind::CustomAttributeClass(a), SchemaItemKind::CustomAttributeClass(b)) => {
                self.compare_class(&handle_a, &handle_b, a, b);
            }
            (SchemaItemKind::RelationshipClass(a), SchemaItemKind::RelationshipClass(b)) => {
                self.compare_relationship(&handle_a, &handle_b, a, b);
            }
            (SchemaItemKind::Enumeration(a), SchemaItemKind::Enumeration(b)) => {
                self.compare_enumeration(&handle_a, &handle_b, a, b);
            }
            (SchemaItemKind::KindOfQuantity(a), SchemaItemKind::KindOfQuantity(b)) => {
                self.compare_koq(&handle_a, &handle_b, a, b);
            }
            (SchemaItemKind::Format(a), SchemaItemKind::Format(b)) => {
                self.compare_format(&handle_a, &handle_b, a, b);
            }
            (SchemaItemKind::PropertyCategory(a), SchemaItemKind::PropertyCategory(b)) => {
                self.value_delta(code, &target, "priority", a.priority, b.priority);
            }
            (SchemaItemKind::Unit(a), SchemaItemKind::Unit(b)) => {
                self.name_delta(code, &target, "phenomenon", &a.phenomenon, &b.phenomenon);
                self.name_delta(code, &target, "unitSystem", &a.unit_system, &b.unit_system);
                self.value_delta(code, &target, "definition", a.definition.as_str(), b.definition.as_str());
                self.value_delta(code, &target, "numerator", a.numerator, b.numerator);
                self.value_delta(code, &target, "denominator", a.denominator, b.denominator);
                self.value_delta(code, &target, "offset", a.offset, b.offset);
            }
            (SchemaItemKind::InvertedUnit(a), SchemaItemKind::InvertedUnit(b)) => {
                self.name_delta(code, &target, "invertsUnit", &a.inverts_unit, &b.inverts_unit);
                self.name_delta(code, &target, "unitSystem", &a.unit_system, &b.unit_system);
            }
            (SchemaItemKind::Constant(a), SchemaItemKind::Constant(b)) => {
                self.name_delta(code, &target, "phenomenon", &a.phenomenon, &b.phenomenon);
                self.value_delta(code, &target, "definition", a.definition.as_str(), b.definition.as_str());
                self.value_delta(code, &target, "numerator", a.numerator, b.numerator);
                self.value_delta(code, &target, "denominator", a.denominator, b.denominator);
            }
            (SchemaItemKind::Phenomenon(a), SchemaItemKind::Phenomenon(b)) => {
                self.value_delta(code, &target, "definition", a.definition.as_str(), b.definition.as_str());
            }
            _ => {}
        }
    }

    fn compare_class(&mut self, handle_a: &ItemRef, handle_b: &ItemRef, a: &ClassData, b: &ClassData) {
        let code = DiagnosticCode::ClassDelta;
        let target: Target = handle_a.clone().into();

        self.value_delta(code, &target, "modifier", a.modifier.to_string(), b.modifier.to_string());

        if !self.same_optional_name(&a.base_class, &b.base_class) {
            self.changes.add_diagnostic(Diagnostic::base_class_delta(
                handle_a.clone(),
                a.base_class.clone(),
                b.base_class.clone(),
            ));
        }

        if handle_a.item_type() == SchemaItemType::EntityClass {
            self.compare_name_lists(
                DiagnosticCode::EntityMixinMissing,
                handle_a.clone().into(),
                handle_b.clone().into(),
                &a.mixins,
                &b.mixins,
            );
        }

        if handle_a.item_type() == SchemaItemType::Mixin {
            self.name_delta(code, &target, "appliesTo", &a.applies_to, &b.applies_to);
        }

        self.compare_custom_attributes(
            handle_a.clone().into(),
            handle_b.clone().into(),
            &a.custom_attributes,
            &b.custom_attributes,
        );

        for property_a in &a.properties {
            match b.get_property(&property_a.name) {
                Some(property_b) => self.compare_property(handle_a, handle_b, property_a, property_b),
                None => self
                    .changes
                    .add_diagnostic(Diagnostic::property_missing(handle_a.property(property_a.name.clone()))),
            }
        }

        for property_b in &b.properties {
            if a.get_property(&property_b.name).is_none() {
                self.changes
                    .add_diagnostic(Diagnostic::property_missing(handle_b.property(property_b.name.clone())));
            }
        }
    }

    fn compare_property(&mut self, class_a: &ItemRef, class_b: &ItemRef, a: &Property, b: &Property) {
        let code = DiagnosticCode::PropertyDelta;
        let target: Target = class_a.property(a.name.clone()).into();

        self.value_delta(code, &target, "label", a.label.as_deref(), b.label.as_deref());
        self.value_delta(code, &target, "description", a.description.as_deref(), b.description.as_deref());
        self.value_delta(code, &target, "propertyType", a.property_type.as_str(), b.property_type.as_str());
        if !self.same_text_name(&a.type_name, &b.type_name) {
            self.value_delta(code, &target, "typeName", a.type_name.as_str(), b.type_name.as_str());
        }
        self.value_delta(code, &target, "isReadOnly", a.is_read_only, b.is_read_only);
        self.value_delta(code, &target, "priority", a.priority, b.priority);
        self.name_delta(code, &target, "category", &a.category, &b.category);
        self.name_delta(code, &target, "kindOfQuantity", &a.kind_of_quantity, &b.kind_of_quantity);

        self.compare_custom_attributes(
            target,
            class_b.property(b.name.clone()).into(),
            &a.custom_attributes,
            &b.custom_attributes,
        );
    }

    fn compare_relationship(
        &mut self,
        handle_a: &ItemRef,
        handle_b: &ItemRef,
        a: &RelationshipClassData,
        b: &RelationshipClassData,
    ) {
        let code = DiagnosticCode::ClassDelta;
        let target: Target = handle_a.clone().into();

        self.compare_class(handle_a, handle_b, &a.class, &b.class);
        self.value_delta(code, &target, "strength", a.strength.as_str(), b.strength.as_str());
        self.value_delta(
            code,
            &target,
            "strengthDirection",
            a.strength_direction.as_str(),
            b.strength_direction.as_str(),
        );

        for end in [RelationshipEnd::Source, RelationshipEnd::Target] {
            let (constraint_a, constraint_b) = (a.constraint(end), b.constraint(end));
            let code = DiagnosticCode::RelationshipConstraintDelta;
            let target: Target = handle_a.constraint(end).into();

            self.value_delta(code, &target, "polymorphic", constraint_a.polymorphic, constraint_b.polymorphic);
            self.value_delta(
                code,
                &target,
                "multiplicity",
                constraint_a.multiplicity.as_str(),
                constraint_b.multiplicity.as_str(),
            );
            self.value_delta(
                code,
                &target,
                "roleLabel",
                constraint_a.role_label.as_deref(),
                constraint_b.role_label.as_deref(),
            );
            self.name_delta(
                code,
                &target,
                "abstractConstraint",
                &constraint_a.abstract_constraint,
                &constraint_b.abstract_constraint,
            );

            self.compare_name_lists(
                DiagnosticCode::RelationshipConstraintClassMissing,
                target.clone(),
                handle_b.constraint(end).into(),
                &constraint_a.constraint_classes,
                &constraint_b.constraint_classes,
            );

            self.compare_custom_attributes(
                target,
                handle_b.constraint(end).into(),
                &constraint_a.custom_attributes,
                &constraint_b.custom_attributes,
            );
        }
    }

    fn compare_enumeration(
        &mut self,
        handle_a: &ItemRef,
        handle_b: &ItemRef,
        a: &EnumerationData,
        b: &EnumerationData,
    ) {
        let code = DiagnosticCode::EnumerationDelta;
        let target: Target = handle_a.clone().into();

        self.value_delta(code, &target, "type", a.backing_type.as_str(), b.backing_type.as_str());
        self.value_delta(code, &target, "isStrict", a.is_strict, b.is_strict);

        let mut removed = Vec::new();
        for enumerator_a in &a.enumerators {
            let Some(enumerator_b) = b.get_enumerator(&enumerator_a.name) else {
                removed.push(PayloadItem::Enumerator(enumerator_a.name.clone()));
                continue;
            };

            let changes = [
                ValueChange::new("value", enumerator_a.value.clone(), enumerator_b.value.clone()),
                ValueChange::new("label", enumerator_a.label.as_deref(), enumerator_b.label.as_deref()),
                ValueChange::new(
                    "description",
                    enumerator_a.description.as_deref(),
                    enumerator_b.description.as_deref(),
                ),
            ];

            for change in changes.into_iter().filter(|c| c.old != c.new) {
                self.changes.add_diagnostic(Diagnostic::enumerator_delta(
                    handle_a.clone(),
                    enumerator_a.name.clone(),
                    change,
                ));
            }
        }

        let added: Vec<PayloadItem> = b
            .enumerators
            .iter()
            .filter(|e| a.get_enumerator(&e.name).is_none())
            .map(|e| PayloadItem::Enumerator(e.name.clone()))
            .collect();

        self.push_missing(DiagnosticCode::EnumeratorMissing, target, removed);
        self.push_missing(DiagnosticCode::EnumeratorMissing, handle_b.clone().into(), added);
    }

    fn compare_koq(
        &mut self,
        handle_a: &ItemRef,
        handle_b: &ItemRef,
        a: &KindOfQuantityData,
        b: &KindOfQuantityData,
    ) {
        let code = DiagnosticCode::KoqDelta;
        let target: Target = handle_a.clone().into();

        self.value_delta(code, &target, "relativeError", a.relative_error, b.relative_error);
        self.name_delta(code, &target, "persistenceUnit", &a.persistence_unit, &b.persistence_unit);

        self.compare_presentation_formats(
            target,
            handle_b.clone().into(),
            &a.presentation_formats,
            &b.presentation_formats,
        );
    }

    /// Override strings match when format and override units match after
    /// neutralizing, with equal precision and labels
    fn compare_presentation_formats(
        &mut self,
        a_target: Target,
        b_target: Target,
        a: &[PresentationFormat],
        b: &[PresentationFormat],
    ) {
        let a_neutral: Vec<_> = a.iter().map(|f| f.map_names(|n| self.neutral(Side::A, n))).collect();
        let b_neutral: Vec<_> = b.iter().map(|f| f.map_names(|n| self.neutral(Side::B, n))).collect();

        let removed: Vec<PayloadItem> = a
            .iter()
            .zip(&a_neutral)
            .filter(|(_, x)| !b_neutral.contains(x))
            .map(|(f, _)| PayloadItem::SchemaItem(f.full_name()))
            .collect();
        let added: Vec<PayloadItem> = b
            .iter()
            .zip(&b_neutral)
            .filter(|(_, y)| !a_neutral.contains(y))
            .map(|(f, _)| PayloadItem::SchemaItem(f.full_name()))
            .collect();

        let code = DiagnosticCode::PresentationUnitMissing;
        self.push_missing(code, a_target, removed);
        self.push_missing(code, b_target, added);
    }

    fn compare_format(&mut self, handle_a: &ItemRef, handle_b: &ItemRef, a: &FormatData, b: &FormatData) {
        let code = DiagnosticCode::FormatDelta;
        let target: Target = handle_a.clone().into();

        self.value_delta(code, &target, "type", a.format_type.as_str(), b.format_type.as_str());
        self.value_delta(code, &target, "precision", a.precision, b.precision);
        self.value_delta(code, &target, "roundFactor", a.round_factor, b.round_factor);
        self.value_delta(
            code,
            &target,
            "showSignOption",
            a.show_sign_option.as_deref(),
            b.show_sign_option.as_deref(),
        );
        self.value_delta(
            code,
            &target,
            "decimalSeparator",
            a.decimal_separator.as_deref(),
            b.decimal_separator.as_deref(),
        );
        self.value_delta(
            code,
            &target,
            "thousandSeparator",
            a.thousand_separator.as_deref(),
            b.thousand_separator.as_deref(),
        );
        self.value_delta(code, &target, "uomSeparator", a.uom_separator.as_deref(), b.uom_separator.as_deref());
        self.value_delta(code, &target, "formatTraits", a.format_traits.join("|"), b.format_traits.join("|"));

        let spacer = |f: &FormatData| f.composite.as_ref().and_then(|c| c.spacer.clone());
        let include_zero = |f: &FormatData| f.composite.as_ref().and_then(|c| c.include_zero);
        self.value_delta(code, &target, "spacer", spacer(a), spacer(b));
        self.value_delta(code, &target, "includeZero", include_zero(a), include_zero(b));

        let units_a: Vec<FullName> = a.units().iter().map(|u| u.unit.clone()).collect();
        let units_b: Vec<FullName> = b.units().iter().map(|u| u.unit.clone()).collect();
        self.compare_name_lists(
            DiagnosticCode::FormatUnitMissing,
            target,
            handle_b.clone().into(),
            &units_a,
            &units_b,
        );

        for unit_a in a.units() {
            let Some(unit_b) = b.units().iter().find(|u| self.same_name(&unit_a.unit, &u.unit)) else {
                continue;
            };

            if unit_a.label != unit_b.label {
                self.changes.add_diagnostic(Diagnostic::unit_label_override_delta(
                    handle_a.clone(),
                    unit_a.unit.clone(),
                    unit_a.label.as_deref(),
                    unit_b.label.as_deref(),
                ));
            }
        }
    }
}
