//! Structural validation run before a diagram reaches the engines.
//!
//! Only ownership invariants are enforced here. Dangling relationship,
//! dependency and area references are legal input; the consuming algorithm
//! drops them.

use super::Diagram;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{kind} has an empty id")]
    EmptyId { kind: &'static str },
    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("Index {index} references unknown field {field} in table {table}")]
    UnknownIndexField {
        table: String,
        index: String,
        field: String,
    },
}

impl Diagram {
    /// Check the ownership invariants every engine relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId { kind: "diagram" });
        }

        let mut tables = IdSet::new("table");
        // Field and index ids are unique across the diagram, not per table.
        let mut fields = IdSet::new("field");
        let mut indexes = IdSet::new("index");

        for table in &self.tables {
            tables.insert(&table.id)?;
            for field in &table.fields {
                fields.insert(&field.id)?;
            }
            for index in &table.indexes {
                indexes.insert(&index.id)?;
                if let Some(missing) = index.field_ids.iter().find(|id| !table.has_field(id)) {
                    return Err(ValidationError::UnknownIndexField {
                        table: table.name.clone(),
                        index: index.name.clone(),
                        field: missing.clone(),
                    });
                }
            }
        }

        let mut relationships = IdSet::new("relationship");
        for rel in &self.relationships {
            relationships.insert(&rel.id)?;
        }
        let mut dependencies = IdSet::new("dependency");
        for dep in &self.dependencies {
            dependencies.insert(&dep.id)?;
        }
        let mut areas = IdSet::new("area");
        for area in &self.areas {
            areas.insert(&area.id)?;
        }
        let mut notes = IdSet::new("note");
        for note in &self.notes {
            notes.insert(&note.id)?;
        }
        let mut custom_types = IdSet::new("custom type");
        for custom_type in &self.custom_types {
            custom_types.insert(&custom_type.id)?;
        }

        Ok(())
    }
}

struct IdSet<'a> {
    kind: &'static str,
    seen: HashSet<&'a str>,
}

impl<'a> IdSet<'a> {
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            seen: HashSet::new(),
        }
    }

    fn insert(&mut self, id: &'a str) -> Result<(), ValidationError> {
        if id.is_empty() {
            return Err(ValidationError::EmptyId { kind: self.kind });
        }
        if !self.seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
