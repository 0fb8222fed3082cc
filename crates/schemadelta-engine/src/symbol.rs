//! Side/symbol classification
//!
//! Decides which change symbol marks the path lines and the leaf line of a
//! diagnostic, given the schema pair being compared.

use schemadelta_core::{Diagnostic, DiagnosticFamily, Schema};

use crate::error::ReportError;

/// Change direction of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeSymbol {
    /// Present in schema A only (`-`)
    Removed,

    /// Present in schema B only (`+`)
    Added,

    /// Present on both sides and differing (`!`)
    Modified,
}

impl ChangeSymbol {
    pub fn as_char(&self) -> char {
        match self {
            Self::Removed => '-',
            Self::Added => '+',
            Self::Modified => '!',
        }
    }
}

impl std::fmt::Display for ChangeSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Symbols assigned to one diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Symbol of the schema line and every intermediate line
    pub path: ChangeSymbol,

    /// Symbol of the leaf line(s)
    pub leaf: ChangeSymbol,
}

/// Which side of the pair owns a diagnostic's target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    A,
    B,
}

impl Side {
    fn one_sided(self) -> ChangeSymbol {
        match self {
            Side::A => ChangeSymbol::Removed,
            Side::B => ChangeSymbol::Added,
        }
    }
}

/// Classifies diagnostics against a fixed schema pair
#[derive(Debug, Clone, Copy)]
pub struct SymbolClassifier<'s> {
    schema_a: &'s Schema,
    schema_b: &'s Schema,
}

impl<'s> SymbolClassifier<'s> {
    pub fn new(schema_a: &'s Schema, schema_b: &'s Schema) -> Self {
        Self { schema_a, schema_b }
    }

    /// Classify a diagnostic.
    ///
    /// Ownership is decided by schema identity. If the owning schema and the
    /// other schema of the pair have different names, every line of the
    /// diagnostic is one-sided. Otherwise the path is `Modified` and only the
    /// leaf depends on the diagnostic family.
    pub fn classify(&self, diagnostic: &Diagnostic) -> Result<Classification, ReportError> {
        let side = self.owning_side(diagnostic)?;
        let (owner, other) = match side {
            Side::A => (self.schema_a, self.schema_b),
            Side::B => (self.schema_b, self.schema_a),
        };

        if owner.name != other.name {
            let symbol = side.one_sided();
            return Ok(Classification {
                path: symbol,
                leaf: symbol,
            });
        }

        let leaf = match diagnostic.family() {
            DiagnosticFamily::Delta => ChangeSymbol::Modified,
            DiagnosticFamily::Missing => side.one_sided(),
        };

        Ok(Classification {
            path: ChangeSymbol::Modified,
            leaf,
        })
    }

    fn owning_side(&self, diagnostic: &Diagnostic) -> Result<Side, ReportError> {
        let owner = diagnostic.owner();

        if owner.is(self.schema_a) {
            Ok(Side::A)
        } else if owner.is(self.schema_b) {
            Ok(Side::B)
        } else {
            Err(ReportError::malformed(
                diagnostic.code,
                format!("target schema '{}' is neither side of the comparison", owner.name()),
            ))
        }
    }
}
