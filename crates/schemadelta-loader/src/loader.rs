//! Schema file loading and reference resolution

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemadelta_core::{Schema, SchemaVersion};

use crate::context::SchemaContext;
use crate::error::LoadError;
use crate::json::RawSchema;

const VERSION_PATTERN: &str = r"^\d+\.\d+(\.\d+)?$";
const NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Loads schema documents into a [`SchemaContext`]
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load a schema file and, recursively, every schema it references.
    ///
    /// References are searched in the context first, then in
    /// `reference_paths`, the file's own directory and the context's search
    /// paths.
    pub fn load_file(
        path: &Path,
        context: &mut SchemaContext,
        reference_paths: &[PathBuf],
    ) -> Result<Arc<Schema>, LoadError> {
        tracing::debug!(path = %path.display(), "Loading schema file");

        let mut search = reference_paths.to_vec();
        search.push(parent_dir(path));

        let contents = read_schema_file(path)?;
        Self::load_document(&contents, context, &search)
    }

    /// Load a schema from an in-memory document. References resolve against
    /// the context and its search paths only.
    pub fn load_str(json: &str, context: &mut SchemaContext) -> Result<Arc<Schema>, LoadError> {
        Self::load_document(json, context, &[])
    }

    fn load_document(
        json: &str,
        context: &mut SchemaContext,
        search: &[PathBuf],
    ) -> Result<Arc<Schema>, LoadError> {
        let raw: RawSchema = json.parse()?;
        validate(&raw)?;

        if context.contains(&raw.name) {
            return Err(LoadError::DuplicateSchema(raw.name));
        }

        // A failed load leaves the context as it was before the call
        let checkpoint = context.len();
        let loaded = Self::load_resolved(raw, context, search);
        if loaded.is_err() {
            context.truncate(checkpoint);
        }
        let schema = loaded?;

        tracing::debug!(
            schema = %schema.name,
            version = %schema.version,
            items = schema.items().len(),
            "Schema loaded"
        );

        Ok(schema)
    }

    fn load_resolved(
        raw: RawSchema,
        context: &mut SchemaContext,
        search: &[PathBuf],
    ) -> Result<Arc<Schema>, LoadError> {
        context.begin_loading(&raw.name)?;
        let resolved = Self::resolve_references(&raw, context, search);
        context.finish_loading(&raw.name);
        resolved?;

        let schema = Arc::new(raw.into_schema()?);
        context.add_schema(Arc::clone(&schema))?;
        Ok(schema)
    }

    fn resolve_references(
        raw: &RawSchema,
        context: &mut SchemaContext,
        search: &[PathBuf],
    ) -> Result<(), LoadError> {
        for reference in &raw.references {
            if let Some(loaded) = context.get(&reference.name) {
                warn_on_version_mismatch(&raw.name, &reference.version, &loaded);
                continue;
            }

            let path = context.locate(&reference.name, search).ok_or_else(|| {
                LoadError::SchemaNotFound(format!(
                    "{} (referenced by {})",
                    reference.name, raw.name
                ))
            })?;

            tracing::debug!(
                schema = %raw.name,
                reference = %reference.name,
                path = %path.display(),
                "Resolving schema reference"
            );

            let contents = read_schema_file(&path)?;
            let mut nested = search.to_vec();
            nested.push(parent_dir(&path));

            let loaded = Self::load_document(&contents, context, &nested)?;
            warn_on_version_mismatch(&raw.name, &reference.version, &loaded);
        }

        Ok(())
    }
}

fn validate(raw: &RawSchema) -> Result<(), LoadError> {
    let name_pattern = Regex::new(NAME_PATTERN).map_err(|e| LoadError::InvalidFormat(e.to_string()))?;
    let version_pattern =
        Regex::new(VERSION_PATTERN).map_err(|e| LoadError::InvalidFormat(e.to_string()))?;

    if !name_pattern.is_match(&raw.name) {
        return Err(LoadError::InvalidFormat(format!("Invalid schema name '{}'", raw.name)));
    }
    if !version_pattern.is_match(&raw.version) {
        return Err(LoadError::InvalidFormat(format!(
            "Invalid version '{}' for schema '{}'",
            raw.version, raw.name
        )));
    }

    for reference in &raw.references {
        if !name_pattern.is_match(&reference.name) || !version_pattern.is_match(&reference.version) {
            return Err(LoadError::InvalidFormat(format!(
                "Invalid reference '{} {}' in schema '{}'",
                reference.name, reference.version, raw.name
            )));
        }
    }

    Ok(())
}

fn read_schema_file(path: &Path) -> Result<String, LoadError> {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if file_name.ends_with(".xml") {
        return Err(LoadError::InvalidFormat(format!(
            "{}: ECXml schemas are not supported, convert to .ecschema.json",
            path.display()
        )));
    }

    if !path.is_file() {
        return Err(LoadError::SchemaNotFound(path.display().to_string()));
    }

    std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// A reference only pins read and write versions; a newer minor is accepted
fn warn_on_version_mismatch(referrer: &str, wanted: &str, loaded: &Schema) {
    let Some(wanted) = SchemaVersion::parse(wanted) else {
        return;
    };

    if wanted.read != loaded.version.read || loaded.version < wanted {
        tracing::warn!(
            schema = referrer,
            reference = %loaded.name,
            wanted = %wanted,
            loaded = %loaded.version,
            "Referenced schema version does not satisfy the reference"
        );
    }
}
