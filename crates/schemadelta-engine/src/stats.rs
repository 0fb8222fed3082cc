//! Per-class property statistics

use std::collections::HashSet;

use schemadelta_core::{ClassData, Schema, SchemaItem};

/// Property count of one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMetadata {
    pub schema_name: String,
    pub class_name: String,

    /// Own properties plus those inherited through base classes of the same schema
    pub property_count: usize,
}

/// Min/max/average over a set of [`ClassMetadata`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PropertyCountSummary {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

pub struct SchemaStatistics;

impl SchemaStatistics {
    /// Metadata for every class-like item, in item order
    pub fn class_metadata(schema: &Schema) -> Vec<ClassMetadata> {
        schema
            .items()
            .iter()
            .filter_map(|item| {
                item.class_data().map(|class| ClassMetadata {
                    schema_name: schema.name.clone(),
                    class_name: item.name.clone(),
                    property_count: Self::property_count(schema, item, class),
                })
            })
            .collect()
    }

    pub fn property_count_summary(metadata: &[ClassMetadata]) -> PropertyCountSummary {
        if metadata.is_empty() {
            return PropertyCountSummary::default();
        }

        let counts = metadata.iter().map(|m| m.property_count);
        let total: usize = counts.clone().sum();

        PropertyCountSummary {
            min: counts.clone().min().unwrap_or_default(),
            max: counts.max().unwrap_or_default(),
            avg: total as f64 / metadata.len() as f64,
        }
    }

    /// Sorted by property count, largest first; ties by class name
    pub fn sort_by_property_count(metadata: &[ClassMetadata]) -> Vec<ClassMetadata> {
        let mut sorted = metadata.to_vec();
        sorted.sort_by(|a, b| {
            b.property_count
                .cmp(&a.property_count)
                .then_with(|| a.class_name.cmp(&b.class_name))
        });
        sorted
    }

    /// Distinct property names along the base class chain
    fn property_count(schema: &Schema, item: &SchemaItem, class: &ClassData) -> usize {
        let mut names: HashSet<&str> = HashSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(item.name.as_str());

        let mut current = Some(class);
        while let Some(class) = current {
            names.extend(class.properties.iter().map(|p| p.name.as_str()));

            current = class
                .base_class
                .as_ref()
                .filter(|base| base.schema == schema.name)
                .filter(|base| visited.insert(base.name.as_str()))
                .and_then(|base| schema.get_item(&base.name))
                .and_then(SchemaItem::class_data);
        }

        names.len()
    }
}
