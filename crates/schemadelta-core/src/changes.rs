//! Ordered diagnostic collection produced by one comparison run

use crate::diagnostic::Diagnostic;
use crate::entity::SchemaRef;
use crate::schema::Schema;

/// Append-only, ordered set of diagnostics anchored on one schema
#[derive(Debug, Clone)]
pub struct SchemaChanges {
    schema: SchemaRef,
    diagnostics: Vec<Diagnostic>,
}

impl SchemaChanges {
    /// Create an empty collection anchored on `schema`
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.handle(),
            diagnostics: Vec::new(),
        }
    }

    /// The anchor schema
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// A new collection with only the diagnostics `keep` accepts, order preserved
    pub fn filtered(&self, keep: impl Fn(&Diagnostic) -> bool) -> Self {
        Self {
            schema: self.schema.clone(),
            diagnostics: self.diagnostics.iter().filter(|d| keep(d)).cloned().collect(),
        }
    }
}

impl Extend<Diagnostic> for SchemaChanges {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.diagnostics.extend(iter);
    }
}

impl<'a> IntoIterator for &'a SchemaChanges {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{DiagnosticCode, ValueChange};

    #[test]
    fn preserves_insertion_order() {
        let schema = Schema::new("TestSchema", "ts", 1, 0, 0);
        let mut changes = SchemaChanges::new(&schema);

        changes.add_diagnostic(Diagnostic::delta(
            DiagnosticCode::SchemaDelta,
            schema.handle(),
            ValueChange::new("label", "A", "B"),
        ));
        changes.add_diagnostic(Diagnostic::schema_reference_missing(schema.handle(), "Ref"));

        let codes: Vec<_> = changes.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![DiagnosticCode::SchemaDelta, DiagnosticCode::SchemaReferenceMissing]);
        assert!(changes.schema().is(&schema));
    }

    #[test]
    fn filtering_keeps_anchor_and_order() {
        let schema = Schema::new("TestSchema", "ts", 1, 0, 0);
        let mut changes = SchemaChanges::new(&schema);
        changes.add_diagnostic(Diagnostic::schema_reference_missing(schema.handle(), "A"));
        changes.add_diagnostic(Diagnostic::delta(
            DiagnosticCode::SchemaDelta,
            schema.handle(),
            ValueChange::new("label", "A", "B"),
        ));
        changes.add_diagnostic(Diagnostic::schema_reference_missing(schema.handle(), "B"));

        let kept = changes.filtered(|d| d.code != DiagnosticCode::SchemaDelta);
        assert_eq!(kept.len(), 2);
        assert_eq!(changes.len(), 3);
        assert!(kept.schema().is(&schema));
    }
}
