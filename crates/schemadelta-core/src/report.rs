//! Comparison report document (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Leaf-line counts per change symbol
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of diagnostics reported
    pub total: usize,

    pub added: usize,

    pub removed: usize,

    pub modified: usize,
}

/// Comparison report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Name of schema A
    pub schema_a: String,

    /// Name of schema B
    pub schema_b: String,

    pub summary: ReportSummary,

    /// Formatted report lines, in emission order
    pub lines: Vec<String>,

    /// Hex SHA-256 of the newline-joined lines
    pub fingerprint: String,
}

impl ComparisonReport {
    pub fn new(
        schema_a: impl Into<String>,
        schema_b: impl Into<String>,
        summary: ReportSummary,
        lines: Vec<String>,
    ) -> Self {
        let fingerprint = Self::fingerprint_of(&lines);

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            schema_a: schema_a.into(),
            schema_b: schema_b.into(),
            summary,
            lines,
            fingerprint,
        }
    }

    /// Digest of a line sequence; identical output gives an identical digest
    pub fn fingerprint_of(lines: &[String]) -> String {
        let mut hasher = Sha256::new();
        for line in lines {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }

    pub fn has_changes(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Lines joined the way they are printed
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}
