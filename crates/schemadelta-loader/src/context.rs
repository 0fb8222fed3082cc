//! Schema context: loaded schemas plus reference search paths

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use schemadelta_core::Schema;

use crate::error::LoadError;

/// Cache of loaded schemas, keyed by schema name
#[derive(Debug, Default)]
pub struct SchemaContext {
    schemas: Vec<Arc<Schema>>,
    search_paths: Vec<PathBuf>,

    /// Names currently being loaded (reference cycle guard)
    loading: HashSet<String>,
}

impl SchemaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory searched for referenced schemas; duplicates are ignored
    pub fn add_search_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.search_paths.contains(&path) {
            self.search_paths.push(path);
        }
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn add_schema(&mut self, schema: Arc<Schema>) -> Result<(), LoadError> {
        if self.contains(&schema.name) {
            return Err(LoadError::DuplicateSchema(schema.name.clone()));
        }

        tracing::debug!(schema = %schema.name, "Added schema to context");
        self.schemas.push(schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.iter().find(|s| s.name == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.schemas.iter().any(|s| s.name == name)
    }

    /// Loaded schemas in load order (references before their referrers)
    pub fn schemas(&self) -> impl Iterator<Item = &Arc<Schema>> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Drop schemas added after the first `len`
    pub(crate) fn truncate(&mut self, len: usize) {
        for dropped in self.schemas.drain(len.min(self.schemas.len())..) {
            tracing::debug!(schema = %dropped.name, "Removed schema from context");
        }
    }

    /// Mark `name` as being loaded; fails if it already is
    pub(crate) fn begin_loading(&mut self, name: &str) -> Result<(), LoadError> {
        if !self.loading.insert(name.to_string()) {
            return Err(LoadError::InvalidFormat(format!(
                "Reference cycle detected while loading schema '{}'",
                name
            )));
        }
        Ok(())
    }

    pub(crate) fn finish_loading(&mut self, name: &str) {
        self.loading.remove(name);
    }

    /// Search the context's paths, then `extra`, for `<name>.ecschema.json`
    pub(crate) fn locate(&self, name: &str, extra: &[PathBuf]) -> Option<PathBuf> {
        let file_name = format!("{}.ecschema.json", name);

        extra
            .iter()
            .chain(self.search_paths.iter())
            .find_map(|dir| find_file(dir, &file_name))
    }
}

fn find_file(dir: &Path, file_name: &str) -> Option<PathBuf> {
    if !dir.is_dir() {
        return None;
    }

    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .map(|entry| entry.path().to_path_buf())
}
