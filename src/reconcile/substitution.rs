//! Target-id -> source-id substitution table.

use crate::model::{Dependency, Relationship, Table};
use std::collections::HashMap;

/// Ids discovered during table matching. Anything not recorded maps to
/// itself, so new entities keep their freshly generated ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Substitution {
    tables: HashMap<String, String>,
    fields: HashMap<String, String>,
}

impl Substitution {
    pub fn add_table(&mut self, target_id: &str, source_id: &str) {
        log::trace!("table {} -> {}", target_id, source_id);
        self.tables
            .insert(target_id.to_string(), source_id.to_string());
    }

    pub fn add_field(&mut self, target_id: &str, source_id: &str) {
        log::trace!("field {} -> {}", target_id, source_id);
        self.fields
            .insert(target_id.to_string(), source_id.to_string());
    }

    pub fn table<'a>(&'a self, id: &'a str) -> &'a str {
        self.tables.get(id).map_or(id, String::as_str)
    }

    pub fn field<'a>(&'a self, id: &'a str) -> &'a str {
        self.fields.get(id).map_or(id, String::as_str)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn field_ids(&self, ids: &[String]) -> Vec<String> {
        ids.iter().map(|id| self.field(id).to_string()).collect()
    }

    pub fn relationship(&self, rel: &Relationship) -> Relationship {
        Relationship {
            source_table_id: self.table(&rel.source_table_id).to_string(),
            target_table_id: self.table(&rel.target_table_id).to_string(),
            source_field_id: self.field(&rel.source_field_id).to_string(),
            target_field_id: self.field(&rel.target_field_id).to_string(),
            ..rel.clone()
        }
    }

    pub fn dependency(&self, dep: &Dependency) -> Dependency {
        Dependency {
            table_id: self.table(&dep.table_id).to_string(),
            dependent_table_id: self.table(&dep.dependent_table_id).to_string(),
            ..dep.clone()
        }
    }

    /// Point every index at substituted field ids. Indexes taken from the
    /// target still reference target-side fields until this runs.
    pub fn rewrite_index_fields(&self, tables: &mut [Table]) {
        for table in tables {
            for index in &mut table.indexes {
                index.field_ids = self.field_ids(&index.field_ids);
            }
        }
    }
}
