//! Integration tests for the schema comparison reporter

use pretty_assertions::assert_eq;

use schemadelta_core::{
    ClassData, Diagnostic, DiagnosticCode, FullName, PayloadItem, Property, RelationshipClassData,
    RelationshipEnd, Schema, SchemaChanges, SchemaItem, SchemaItemKind, SchemaItemType, ValueChange,
};
use schemadelta_engine::{ReportError, SchemaComparer, SchemaCompareReporter};

fn same_named() -> (Schema, Schema) {
    (
        Schema::new("TestSchema", "ts", 1, 0, 0),
        Schema::new("TestSchema", "ts", 1, 0, 0),
    )
}

fn renamed() -> (Schema, Schema) {
    (
        Schema::new("TestSchema", "ts", 1, 0, 0),
        Schema::new("TestSchemaB", "b", 1, 0, 0),
    )
}

/// Report a single diagnostic and collect the emitted lines
fn report_one(schema_a: &Schema, schema_b: &Schema, diagnostic: Diagnostic) -> Vec<String> {
    let mut changes = SchemaChanges::new(schema_a);
    changes.add_diagnostic(diagnostic);

    let mut lines = Vec::new();
    SchemaCompareReporter::new(schema_a, schema_b)
        .report(&changes, &mut |line: &str| lines.push(line.to_string()))
        .unwrap();
    lines
}

fn label_change() -> ValueChange {
    ValueChange::new("label", "LabelA", "LabelB")
}

fn ca_missing_payload() -> Vec<PayloadItem> {
    vec![PayloadItem::CustomAttribute {
        class_name: "TestSchema.TestCustomAttribute".to_string(),
    }]
}

// Schema level

#[test]
fn test_schema_delta_renamed_schemas() {
    let (a, b) = renamed();
    let diag = Diagnostic::delta(DiagnosticCode::SchemaDelta, a.handle(), label_change());

    assert_eq!(
        report_one(&a, &b, diag),
        vec!["-Schema(TestSchema)", "-\tLabel: LabelA -> LabelB"]
    );
}

#[test]
fn test_schema_delta() {
    let (a, b) = same_named();
    let diag = Diagnostic::delta(DiagnosticCode::SchemaDelta, a.handle(), label_change());

    assert_eq!(
        report_one(&a, &b, diag),
        vec!["!Schema(TestSchema)", "!\tLabel: LabelA -> LabelB"]
    );
}

#[test]
fn test_class_added() {
    let (a, b) = same_named();
    let diag = Diagnostic::schema_item_missing(b.item_handle(SchemaItemType::EntityClass, "TestClass"));

    assert_eq!(
        report_one(&a, &b, diag),
        vec!["!Schema(TestSchema)", "!\tClasses", "+\t\tClass(TestClass)"]
    );
}

#[test]
fn test_schema_custom_attribute_removed_and_added() {
    let (a, b) = same_named();

    let removed = Diagnostic::missing(
        DiagnosticCode::CustomAttributeInstanceClassMissing,
        a.handle(),
        ca_missing_payload(),
    );
    assert_eq!(
        report_one(&a, &b, removed),
        vec![
            "!Schema(TestSchema)",
            "!\tCustomAttributes",
            "-\t\tCustomAttribute: TestSchema.TestCustomAttribute",
        ]
    );

    let added = Diagnostic::missing(
        DiagnosticCode::CustomAttributeInstanceClassMissing,
        b.handle(),
        ca_missing_payload(),
    );
    assert_eq!(
        report_one(&a, &b, added),
        vec![
            "!Schema(TestSchema)",
            "!\tCustomAttributes",
            "+\t\tCustomAttribute: TestSchema.TestCustomAttribute",
        ]
    );
}

#[test]
fn test_schema_custom_attribute_removed_renamed_schemas() {
    let (a, b) = renamed();
    let diag = Diagnostic::missing(
        DiagnosticCode::CustomAttributeInstanceClassMissing,
        a.handle(),
        ca_missing_payload(),
    );

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "-Schema(TestSchema)",
            "-\tCustomAttributes",
            "-\t\tCustomAttribute: TestSchema.TestCustomAttribute",
        ]
    );
}

#[test]
fn test_schema_reference_removed_and_added() {
    let (a, b) = same_named();

    assert_eq!(
        report_one(&a, &b, Diagnostic::schema_reference_missing(a.handle(), "ReferenceSchema")),
        vec!["!Schema(TestSchema)", "!\tSchemaReferences", "-\t\tSchema(ReferenceSchema)"]
    );
    assert_eq!(
        report_one(&a, &b, Diagnostic::schema_reference_missing(b.handle(), "ReferenceSchema")),
        vec!["!Schema(TestSchema)", "!\tSchemaReferences", "+\t\tSchema(ReferenceSchema)"]
    );
}

// Classes

#[test]
fn test_class_delta_renamed_schemas() {
    let (a, b) = renamed();

    let from_a = Diagnostic::delta(
        DiagnosticCode::ClassDelta,
        a.item_handle(SchemaItemType::EntityClass, "TestClass"),
        label_change(),
    );
    assert_eq!(
        report_one(&a, &b, from_a),
        vec![
            "-Schema(TestSchema)",
            "-\tClasses",
            "-\t\tClass(TestClass)",
            "-\t\t\tLabel: LabelA -> LabelB",
        ]
    );

    let from_b = Diagnostic::delta(
        DiagnosticCode::ClassDelta,
        b.item_handle(SchemaItemType::EntityClass, "TestClass"),
        label_change(),
    );
    assert_eq!(
        report_one(&a, &b, from_b),
        vec![
            "+Schema(TestSchemaB)",
            "+\tClasses",
            "+\t\tClass(TestClass)",
            "+\t\t\tLabel: LabelA -> LabelB",
        ]
    );
}

#[test]
fn test_class_delta() {
    let (a, b) = same_named();
    let diag = Diagnostic::delta(
        DiagnosticCode::ClassDelta,
        a.item_handle(SchemaItemType::EntityClass, "TestClass"),
        label_change(),
    );

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "!Schema(TestSchema)",
            "!\tClasses",
            "!\t\tClass(TestClass)",
            "!\t\t\tLabel: LabelA -> LabelB",
        ]
    );
}

#[test]
fn test_base_class_delta() {
    let (a, b) = same_named();
    let diag = Diagnostic::base_class_delta(
        a.item_handle(SchemaItemType::EntityClass, "TestClass"),
        Some(FullName::new("TestSchema", "BaseClassA")),
        Some(FullName::new("TestSchema", "BaseClassB")),
    );

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "!Schema(TestSchema)",
            "!\tClasses",
            "!\t\tClass(TestClass)",
            "!\t\t\tBaseClass: TestSchema.BaseClassA -> TestSchema.BaseClassB",
        ]
    );
}

#[test]
fn test_class_custom_attribute_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let diag = Diagnostic::missing(
            DiagnosticCode::CustomAttributeInstanceClassMissing,
            owner.item_handle(SchemaItemType::EntityClass, "TestClass"),
            ca_missing_payload(),
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tClasses".to_string(),
                "!\t\tClass(TestClass)".to_string(),
                "!\t\t\tCustomAttributes".to_string(),
                format!("{}\t\t\t\tCustomAttribute: TestSchema.TestCustomAttribute", symbol),
            ]
        );
    }
}

#[test]
fn test_entity_mixin_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let diag = Diagnostic::missing(
            DiagnosticCode::EntityMixinMissing,
            owner.item_handle(SchemaItemType::EntityClass, "TestClass"),
            vec![PayloadItem::SchemaItem(FullName::new("TestSchema", "TestMixin"))],
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tClasses".to_string(),
                "!\t\tClass(TestClass)".to_string(),
                "!\t\t\tMixins".to_string(),
                format!("{}\t\t\t\tMixin: TestSchema.TestMixin", symbol),
            ]
        );
    }
}

// Relationship constraints

#[test]
fn test_relationship_constraint_delta() {
    let (a, b) = same_named();
    let relationship = a.item_handle(SchemaItemType::RelationshipClass, "TestClass");

    for end in [RelationshipEnd::Source, RelationshipEnd::Target] {
        let diag = Diagnostic::delta(
            DiagnosticCode::RelationshipConstraintDelta,
            relationship.constraint(end),
            ValueChange::new("polymorphic", true, false),
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tClasses".to_string(),
                "!\t\tClass(TestClass)".to_string(),
                format!("!\t\t\t{}", end),
                "!\t\t\t\tPolymorphic: true -> false".to_string(),
            ]
        );
    }
}

#[test]
fn test_relationship_constraint_class_removed_and_added() {
    let (a, b) = same_named();

    for end in [RelationshipEnd::Source, RelationshipEnd::Target] {
        for (owner, symbol) in [(&a, '-'), (&b, '+')] {
            let relationship = owner.item_handle(SchemaItemType::RelationshipClass, "TestClass");
            let diag = Diagnostic::constraint_class_missing(
                relationship.constraint(end),
                FullName::new("TestSchema", "TestConstraintClass"),
            );

            assert_eq!(
                report_one(&a, &b, diag),
                vec![
                    "!Schema(TestSchema)".to_string(),
                    "!\tClasses".to_string(),
                    "!\t\tClass(TestClass)".to_string(),
                    format!("!\t\t\t{}", end),
                    "!\t\t\t\tConstraintClasses".to_string(),
                    format!("{}\t\t\t\t\tConstraintClass: TestSchema.TestConstraintClass", symbol),
                ]
            );
        }
    }
}

#[test]
fn test_relationship_constraint_custom_attribute_removed_and_added() {
    let (a, b) = same_named();

    for end in [RelationshipEnd::Source, RelationshipEnd::Target] {
        for (owner, symbol) in [(&a, '-'), (&b, '+')] {
            let relationship = owner.item_handle(SchemaItemType::RelationshipClass, "TestClass");
            let diag = Diagnostic::custom_attribute_missing(
                relationship.constraint(end),
                "TestSchema.TestCustomAttribute",
            );

            assert_eq!(
                report_one(&a, &b, diag),
                vec![
                    "!Schema(TestSchema)".to_string(),
                    "!\tClasses".to_string(),
                    "!\t\tClass(TestClass)".to_string(),
                    format!("!\t\t\t{}", end),
                    "!\t\t\t\tCustomAttributes".to_string(),
                    format!("{}\t\t\t\t\tCustomAttribute: TestSchema.TestCustomAttribute", symbol),
                ]
            );
        }
    }
}

// Properties

#[test]
fn test_property_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let class = owner.item_handle(SchemaItemType::EntityClass, "TestClass");
        let diag = Diagnostic::property_missing(class.property("TestProperty"));

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tClasses".to_string(),
                "!\t\tClass(TestClass)".to_string(),
                "!\t\t\tProperties".to_string(),
                format!("{}\t\t\t\tProperty(TestProperty)", symbol),
            ]
        );
    }
}

#[test]
fn test_property_delta() {
    let (a, b) = same_named();
    let class = a.item_handle(SchemaItemType::EntityClass, "TestClass");
    let diag = Diagnostic::delta(DiagnosticCode::PropertyDelta, class.property("TestProperty"), label_change());

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "!Schema(TestSchema)",
            "!\tClasses",
            "!\t\tClass(TestClass)",
            "!\t\t\tProperties",
            "!\t\t\t\tProperty(TestProperty)",
            "!\t\t\t\t\tLabel: LabelA -> LabelB",
        ]
    );
}

#[test]
fn test_property_custom_attribute_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let class = owner.item_handle(SchemaItemType::EntityClass, "TestClass");
        let diag = Diagnostic::missing(
            DiagnosticCode::CustomAttributeInstanceClassMissing,
            class.property("TestProperty"),
            ca_missing_payload(),
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tClasses".to_string(),
                "!\t\tClass(TestClass)".to_string(),
                "!\t\t\tProperties".to_string(),
                "!\t\t\t\tProperty(TestProperty)".to_string(),
                "!\t\t\t\t\tCustomAttributes".to_string(),
                format!("{}\t\t\t\t\t\tCustomAttribute: TestSchema.TestCustomAttribute", symbol),
            ]
        );
    }
}

#[test]
fn test_property_custom_attribute_added_renamed_schemas() {
    let (a, b) = renamed();
    let class = b.item_handle(SchemaItemType::EntityClass, "TestClass");
    let diag = Diagnostic::custom_attribute_missing(class.property("TestProperty"), "TestSchema.TestCustomAttribute");

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "+Schema(TestSchemaB)",
            "+\tClasses",
            "+\t\tClass(TestClass)",
            "+\t\t\tProperties",
            "+\t\t\t\tProperty(TestProperty)",
            "+\t\t\t\t\tCustomAttributes",
            "+\t\t\t\t\t\tCustomAttribute: TestSchema.TestCustomAttribute",
        ]
    );
}

// Enumerations

#[test]
fn test_enumeration_delta_renamed_schemas() {
    let (a, b) = renamed();
    let diag = Diagnostic::delta(
        DiagnosticCode::EnumerationDelta,
        a.item_handle(SchemaItemType::Enumeration, "TestItem"),
        label_change(),
    );

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "-Schema(TestSchema)",
            "-\tEnumerations",
            "-\t\tEnumeration(TestItem)",
            "-\t\t\tLabel: LabelA -> LabelB",
        ]
    );
}

#[test]
fn test_enumerator_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let diag = Diagnostic::missing(
            DiagnosticCode::EnumeratorMissing,
            owner.item_handle(SchemaItemType::Enumeration, "TestItem"),
            vec![PayloadItem::Enumerator("A".to_string())],
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tEnumerations".to_string(),
                "!\t\tEnumeration(TestItem)".to_string(),
                "!\t\t\tEnumerators".to_string(),
                format!("{}\t\t\t\tEnumerator(A)", symbol),
            ]
        );
    }
}

#[test]
fn test_enumerator_delta() {
    let (a, b) = same_named();
    let diag = Diagnostic::enumerator_delta(
        a.item_handle(SchemaItemType::Enumeration, "TestItem"),
        "A",
        label_change(),
    );

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "!Schema(TestSchema)",
            "!\tEnumerations",
            "!\t\tEnumeration(TestItem)",
            "!\t\t\tEnumerators",
            "!\t\t\t\tEnumerator(A)",
            "!\t\t\t\t\tLabel: LabelA -> LabelB",
        ]
    );
}

// Schema items added/removed, one scenario per item type

#[test]
fn test_schema_item_removed_and_added_for_every_type() {
    let (a, b) = same_named();
    let cases = [
        (SchemaItemType::Enumeration, "Enumerations", "Enumeration"),
        (SchemaItemType::KindOfQuantity, "KindOfQuantities", "KindOfQuantity"),
        (SchemaItemType::Format, "Formats", "Format"),
        (SchemaItemType::PropertyCategory, "PropertyCategories", "PropertyCategory"),
        (SchemaItemType::Unit, "Units", "Unit"),
        (SchemaItemType::UnitSystem, "UnitSystems", "UnitSystem"),
        (SchemaItemType::InvertedUnit, "InvertedUnits", "InvertedUnit"),
        (SchemaItemType::Phenomenon, "Phenomenons", "Phenomenon"),
        (SchemaItemType::Constant, "Constants", "Constant"),
        (SchemaItemType::Mixin, "Classes", "Class"),
        (SchemaItemType::RelationshipClass, "Classes", "Class"),
    ];

    for (item_type, category, type_label) in cases {
        for (owner, symbol) in [(&a, '-'), (&b, '+')] {
            let diag = Diagnostic::schema_item_missing(owner.item_handle(item_type, "TestItem"));

            assert_eq!(
                report_one(&a, &b, diag),
                vec![
                    "!Schema(TestSchema)".to_string(),
                    format!("!\t{}", category),
                    format!("{}\t\t{}(TestItem)", symbol, type_label),
                ]
            );
        }
    }
}

// Item deltas

#[test]
fn test_item_deltas() {
    let (a, b) = same_named();
    let cases = [
        (
            DiagnosticCode::KoqDelta,
            SchemaItemType::KindOfQuantity,
            "KindOfQuantities",
            "KindOfQuantity",
            label_change(),
            "Label: LabelA -> LabelB",
        ),
        (
            DiagnosticCode::FormatDelta,
            SchemaItemType::Format,
            "Formats",
            "Format",
            label_change(),
            "Label: LabelA -> LabelB",
        ),
        (
            DiagnosticCode::PropertyCategoryDelta,
            SchemaItemType::PropertyCategory,
            "PropertyCategories",
            "PropertyCategory",
            label_change(),
            "Label: LabelA -> LabelB",
        ),
        (
            DiagnosticCode::UnitDelta,
            SchemaItemType::Unit,
            "Units",
            "Unit",
            ValueChange::new("unitSystem", "TestSchema.UnitSystemA", "TestSchema.UnitSystemB"),
            "UnitSystem: TestSchema.UnitSystemA -> TestSchema.UnitSystemB",
        ),
        (
            DiagnosticCode::InvertedUnitDelta,
            SchemaItemType::InvertedUnit,
            "InvertedUnits",
            "InvertedUnit",
            ValueChange::new(
                "InvertedUnitSystem",
                "TestSchema.InvertedUnitSystemA",
                "TestSchema.InvertedUnitSystemB",
            ),
            "InvertedUnitSystem: TestSchema.InvertedUnitSystemA -> TestSchema.InvertedUnitSystemB",
        ),
        (
            DiagnosticCode::PhenomenonDelta,
            SchemaItemType::Phenomenon,
            "Phenomenons",
            "Phenomenon",
            ValueChange::new("definition", "DefinitionA", "DefinitionB"),
            "Definition: DefinitionA -> DefinitionB",
        ),
        (
            DiagnosticCode::ConstantDelta,
            SchemaItemType::Constant,
            "Constants",
            "Constant",
            ValueChange::new("phenomenon", "TestSchema.PhenomenonA", "TestSchema.PhenomenonB"),
            "Phenomenon: TestSchema.PhenomenonA -> TestSchema.PhenomenonB",
        ),
    ];

    for (code, item_type, category, type_label, change, leaf) in cases {
        let diag = Diagnostic::delta(code, a.item_handle(item_type, "TestItem"), change);

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                format!("!\t{}", category),
                format!("!\t\t{}(TestItem)", type_label),
                format!("!\t\t\t{}", leaf),
            ]
        );
    }
}

// Kind of quantity and format members

#[test]
fn test_presentation_unit_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let diag = Diagnostic::missing(
            DiagnosticCode::PresentationUnitMissing,
            owner.item_handle(SchemaItemType::KindOfQuantity, "TestItem"),
            vec![PayloadItem::SchemaItem(FullName::new("TestSchema", "TestFormat"))],
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tKindOfQuantities".to_string(),
                "!\t\tKindOfQuantity(TestItem)".to_string(),
                "!\t\t\tPresentationUnits".to_string(),
                format!("{}\t\t\t\tUnit: TestSchema.TestFormat", symbol),
            ]
        );
    }
}

#[test]
fn test_format_unit_removed_and_added() {
    let (a, b) = same_named();

    for (owner, symbol) in [(&a, '-'), (&b, '+')] {
        let diag = Diagnostic::missing(
            DiagnosticCode::FormatUnitMissing,
            owner.item_handle(SchemaItemType::Format, "TestItem"),
            vec![PayloadItem::SchemaItem(FullName::new("TestSchema", "TestUnit"))],
        );

        assert_eq!(
            report_one(&a, &b, diag),
            vec![
                "!Schema(TestSchema)".to_string(),
                "!\tFormats".to_string(),
                "!\t\tFormat(TestItem)".to_string(),
                "!\t\t\tUnits".to_string(),
                format!("{}\t\t\t\tUnit: TestSchema.TestUnit", symbol),
            ]
        );
    }
}

#[test]
fn test_unit_label_override_delta() {
    let (a, b) = same_named();
    let diag = Diagnostic::unit_label_override_delta(
        a.item_handle(SchemaItemType::Format, "TestItem"),
        FullName::new("TestSchema", "TestUnit"),
        "LabelA",
        "LabelB",
    );

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "!Schema(TestSchema)",
            "!\tFormats",
            "!\t\tFormat(TestItem)",
            "!\t\t\tUnits",
            "!\t\t\t\tUnit(TestSchema.TestUnit)",
            "!\t\t\t\t\tLabel: LabelA -> LabelB",
        ]
    );
}

// Collection-level behavior

#[test]
fn test_full_path_is_emitted_per_diagnostic() {
    let (a, b) = same_named();
    let class = a.item_handle(SchemaItemType::EntityClass, "TestClass");

    let mut changes = SchemaChanges::new(&a);
    changes.add_diagnostic(Diagnostic::delta(DiagnosticCode::ClassDelta, class.clone(), label_change()));
    changes.add_diagnostic(Diagnostic::property_missing(class.property("TestProperty")));

    let mut lines: Vec<String> = Vec::new();
    let stats = SchemaCompareReporter::new(&a, &b).report(&changes, &mut lines).unwrap();

    assert_eq!(
        lines,
        vec![
            "!Schema(TestSchema)",
            "!\tClasses",
            "!\t\tClass(TestClass)",
            "!\t\t\tLabel: LabelA -> LabelB",
            "!Schema(TestSchema)",
            "!\tClasses",
            "!\t\tClass(TestClass)",
            "!\t\t\tProperties",
            "-\t\t\t\tProperty(TestProperty)",
        ]
    );
    assert_eq!(stats.modified, 1);
    assert_eq!(stats.removed, 1);
}

#[test]
fn test_report_is_idempotent() {
    let (a, b) = same_named();
    let mut changes = SchemaChanges::new(&a);
    changes.add_diagnostic(Diagnostic::schema_reference_missing(b.handle(), "ReferenceSchema"));
    changes.add_diagnostic(Diagnostic::delta(DiagnosticCode::SchemaDelta, a.handle(), label_change()));

    let reporter = SchemaCompareReporter::new(&a, &b);
    let mut first: Vec<String> = Vec::new();
    let mut second: Vec<String> = Vec::new();
    reporter.report(&changes, &mut first).unwrap();
    reporter.report(&changes, &mut second).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_malformed_diagnostic_aborts_report() {
    let (a, b) = same_named();
    let mut changes = SchemaChanges::new(&a);
    changes.add_diagnostic(Diagnostic::delta(DiagnosticCode::SchemaDelta, a.handle(), label_change()));
    changes.add_diagnostic(Diagnostic::missing(
        DiagnosticCode::FormatUnitMissing,
        a.item_handle(SchemaItemType::Format, "TestItem"),
        Vec::new(),
    ));

    let mut lines: Vec<String> = Vec::new();
    let err = SchemaCompareReporter::new(&a, &b)
        .report(&changes, &mut lines)
        .unwrap_err();

    assert!(matches!(
        err,
        ReportError::MalformedDiagnostic { code: DiagnosticCode::FormatUnitMissing, .. }
    ));
    assert!(lines.is_empty());
}

#[test]
fn test_multi_item_payload_takes_owner_from_target() {
    let (a, b) = renamed();
    let payload = ["TestSchema.First", "TestSchema.Second", "Other.Third"]
        .iter()
        .map(|name| PayloadItem::CustomAttribute {
            class_name: name.to_string(),
        })
        .collect();

    let diag = Diagnostic::missing(DiagnosticCode::CustomAttributeInstanceClassMissing, b.handle(), payload);

    assert_eq!(
        report_one(&a, &b, diag),
        vec![
            "+Schema(TestSchemaB)",
            "+\tCustomAttributes",
            "+\t\tCustomAttribute: TestSchema.First",
            "+\t\tCustomAttribute: TestSchema.Second",
            "+\t\tCustomAttribute: Other.Third",
        ]
    );
}

// Comparer feeding the reporter

#[test]
fn test_compare_and_report() {
    let (mut a, mut b) = same_named();

    let mut class_a = ClassData::default();
    let mut property = Property::primitive("TestProperty", "string");
    property.label = Some("LabelA".to_string());
    class_a.properties.push(property);

    let mut class_b = class_a.clone();
    class_b.properties[0].label = Some("LabelB".to_string());

    a.add_item(SchemaItem::new("TestClass", SchemaItemKind::EntityClass(class_a))).unwrap();
    b.add_item(SchemaItem::new("TestClass", SchemaItemKind::EntityClass(class_b))).unwrap();

    let mut relationship = RelationshipClassData::new();
    relationship.source.polymorphic = true;
    b.add_item(SchemaItem::new("TestRelationship", SchemaItemKind::RelationshipClass(relationship)))
        .unwrap();

    let changes = SchemaComparer::new().compare(&a, &b);
    let mut lines: Vec<String> = Vec::new();
    SchemaCompareReporter::new(&a, &b).report(&changes, &mut lines).unwrap();

    assert_eq!(
        lines,
        vec![
            "!Schema(TestSchema)",
            "!\tClasses",
            "!\t\tClass(TestClass)",
            "!\t\t\tProperties",
            "!\t\t\t\tProperty(TestProperty)",
            "!\t\t\t\t\tLabel: LabelA -> LabelB",
            "!Schema(TestSchema)",
            "!\tClasses",
            "+\t\tClass(TestRelationship)",
        ]
    );
}
