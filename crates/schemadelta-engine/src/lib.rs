//! SchemaDelta engine - Core business logic
//!
//! This crate implements the main business logic for SchemaDelta:
//! - Containment path resolution
//! - Change symbol classification
//! - Line formatting and reporting
//! - Schema comparison (diagnostic production)
//! - Schema statistics

pub mod error;
pub mod path;
pub mod symbol;
pub mod format;
pub mod reporter;
pub mod comparer;
pub mod stats;

pub use error::ReportError;
pub use path::{Category, PathSegment};
pub use symbol::{ChangeSymbol, Classification, SymbolClassifier};
pub use format::{LineFormatter, ReportLine};
pub use reporter::{LineSink, ReportStats, SchemaCompareReporter};
pub use comparer::SchemaComparer;
pub use stats::{ClassMetadata, PropertyCountSummary, SchemaStatistics};
