//! Schema comparison reporter
//!
//! Drives classification and formatting over an ordered diagnostic
//! collection and hands every line to a caller-supplied sink.

use schemadelta_core::{Diagnostic, ReportSummary, Schema, SchemaChanges};

use crate::error::ReportError;
use crate::format::{LineFormatter, ReportLine};
use crate::symbol::{ChangeSymbol, SymbolClassifier};

/// Receives formatted report lines, one call per line, in emission order
pub trait LineSink {
    fn emit(&mut self, line: &str);
}

impl<F> LineSink for F
where
    F: FnMut(&str),
{
    fn emit(&mut self, line: &str) {
        self(line)
    }
}

impl LineSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Counters collected during one `report` call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportStats {
    /// Diagnostics reported
    pub diagnostics: usize,

    /// Lines emitted, path lines included
    pub lines: usize,

    /// Leaf lines marked `+`
    pub added: usize,

    /// Leaf lines marked `-`
    pub removed: usize,

    /// Leaf lines marked `!`
    pub modified: usize,
}

impl ReportStats {
    fn count_leaf(&mut self, symbol: ChangeSymbol) {
        match symbol {
            ChangeSymbol::Added => self.added += 1,
            ChangeSymbol::Removed => self.removed += 1,
            ChangeSymbol::Modified => self.modified += 1,
        }
    }
}

impl From<ReportStats> for ReportSummary {
    fn from(stats: ReportStats) -> Self {
        ReportSummary {
            total: stats.diagnostics,
            added: stats.added,
            removed: stats.removed,
            modified: stats.modified,
        }
    }
}

/// Renders the differences between schema A and schema B
#[derive(Debug, Clone, Copy)]
pub struct SchemaCompareReporter<'s> {
    classifier: SymbolClassifier<'s>,
    formatter: LineFormatter,
}

impl<'s> SchemaCompareReporter<'s> {
    pub fn new(schema_a: &'s Schema, schema_b: &'s Schema) -> Self {
        Self {
            classifier: SymbolClassifier::new(schema_a, schema_b),
            formatter: LineFormatter::new(),
        }
    }

    /// Classify and format one diagnostic
    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> Result<Vec<ReportLine>, ReportError> {
        let classification = self.classifier.classify(diagnostic)?;
        self.formatter.format(diagnostic, classification)
    }

    /// Format every diagnostic of `changes`, in collection order
    pub fn format_changes(&self, changes: &SchemaChanges) -> Result<Vec<Vec<ReportLine>>, ReportError> {
        changes
            .iter()
            .map(|diagnostic| self.format_diagnostic(diagnostic))
            .collect()
    }

    /// Emit the report for `changes` through `sink`.
    ///
    /// Every diagnostic is formatted before the first line is emitted, so a
    /// malformed diagnostic leaves the sink untouched.
    pub fn report<S>(&self, changes: &SchemaChanges, sink: &mut S) -> Result<ReportStats, ReportError>
    where
        S: LineSink + ?Sized,
    {
        tracing::debug!(
            anchor = changes.schema().name(),
            diagnostics = changes.len(),
            "Formatting schema changes"
        );

        let formatted = self.format_changes(changes).map_err(|e| {
            tracing::warn!(error = %e, "Aborting report");
            e
        })?;

        let mut stats = ReportStats::default();
        for lines in &formatted {
            stats.diagnostics += 1;

            let leaf_depth = lines.iter().map(|line| line.depth).max().unwrap_or_default();
            for line in lines {
                if line.depth == leaf_depth {
                    stats.count_leaf(line.symbol);
                }
                sink.emit(&line.to_string());
                stats.lines += 1;
            }
        }

        tracing::info!(
            diagnostics = stats.diagnostics,
            lines = stats.lines,
            added = stats.added,
            removed = stats.removed,
            modified = stats.modified,
            "Report complete"
        );

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemadelta_core::{DiagnosticCode, SchemaItemType, ValueChange};

    #[test]
    fn closures_and_vectors_are_sinks() {
        let schema_a = Schema::new("TestSchema", "ts", 1, 0, 0);
        let schema_b = Schema::new("TestSchema", "ts", 1, 0, 0);
        let mut changes = SchemaChanges::new(&schema_a);
        changes.add_diagnostic(Diagnostic::schema_reference_missing(schema_a.handle(), "Ref"));

        let reporter = SchemaCompareReporter::new(&schema_a, &schema_b);

        let mut captured = Vec::new();
        reporter
            .report(&changes, &mut |line: &str| captured.push(line.to_string()))
            .unwrap();

        let mut collected: Vec<String> = Vec::new();
        reporter.report(&changes, &mut collected).unwrap();

        assert_eq!(captured, collected);
        assert_eq!(collected, vec!["!Schema(TestSchema)", "!\tSchemaReferences", "-\t\tSchema(Ref)"]);
    }

    #[test]
    fn stats_count_leaf_lines_per_symbol() {
        let schema_a = Schema::new("TestSchema", "ts", 1, 0, 0);
        let schema_b = Schema::new("TestSchema", "ts", 1, 0, 0);
        let class = schema_a.item_handle(SchemaItemType::EntityClass, "TestClass");

        let mut changes = SchemaChanges::new(&schema_a);
        changes.add_diagnostic(Diagnostic::delta(
            DiagnosticCode::ClassDelta,
            class,
            ValueChange::new("label", "A", "B"),
        ));
        changes.add_diagnostic(Diagnostic::schema_item_missing(
            schema_b.item_handle(SchemaItemType::Unit, "M"),
        ));

        let mut lines: Vec<String> = Vec::new();
        let stats = SchemaCompareReporter::new(&schema_a, &schema_b)
            .report(&changes, &mut lines)
            .unwrap();

        assert_eq!(stats.diagnostics, 2);
        assert_eq!(stats.lines, 7);
        assert_eq!(stats.modified, 1);
        assert_eq!(stats.added, 1);
        assert_eq!(stats.removed, 0);

        let summary = ReportSummary::from(stats);
        assert_eq!(summary.total, 2);
    }

    #[test]
    fn malformed_diagnostic_emits_nothing() {
        let schema_a = Schema::new("TestSchema", "ts", 1, 0, 0);
        let schema_b = Schema::new("TestSchema", "ts", 1, 0, 0);
        let stranger = Schema::new("Other", "o", 1, 0, 0);

        let mut changes = SchemaChanges::new(&schema_a);
        changes.add_diagnostic(Diagnostic::schema_reference_missing(schema_a.handle(), "Ref"));
        changes.add_diagnostic(Diagnostic::schema_reference_missing(stranger.handle(), "Ref"));

        let mut lines: Vec<String> = Vec::new();
        let result = SchemaCompareReporter::new(&schema_a, &schema_b).report(&changes, &mut lines);

        assert!(result.is_err());
        assert!(lines.is_empty());
    }
}
