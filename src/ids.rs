//! Id generation and cloning with fresh ids.

use crate::model::{Area, CustomType, Dependency, Diagram, Field, Index, Note, Relationship, Table};
use std::collections::HashMap;

pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUIDs, the default for new entities.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-1`, `prefix-2`, ... ids.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Copy `diagram` giving every entity a fresh id. References inside the
/// copy (index columns, relationship and dependency endpoints, parent areas)
/// are remapped consistently; references that were already dangling stay
/// as they are.
pub fn regenerate_ids(diagram: &Diagram, ids: &mut impl IdGenerator) -> Diagram {
    let mut remap: HashMap<&str, String> = HashMap::new();
    for table in &diagram.tables {
        remap.insert(&table.id, ids.next_id());
        for field in &table.fields {
            remap.insert(&field.id, ids.next_id());
        }
    }
    for area in &diagram.areas {
        remap.insert(&area.id, ids.next_id());
    }
    let lookup = |id: &str| remap.get(id).cloned().unwrap_or_else(|| id.to_string());

    let tables = diagram
        .tables
        .iter()
        .map(|t| Table {
            id: lookup(&t.id),
            fields: t
                .fields
                .iter()
                .map(|f| Field {
                    id: lookup(&f.id),
                    ..f.clone()
                })
                .collect(),
            indexes: t
                .indexes
                .iter()
                .map(|i| Index {
                    id: ids.next_id(),
                    field_ids: i.field_ids.iter().map(|id| lookup(id)).collect(),
                    ..i.clone()
                })
                .collect(),
            parent_area_id: t.parent_area_id.as_deref().map(lookup),
            ..t.clone()
        })
        .collect();

    let relationships = diagram
        .relationships
        .iter()
        .map(|r| Relationship {
            id: ids.next_id(),
            source_table_id: lookup(&r.source_table_id),
            target_table_id: lookup(&r.target_table_id),
            source_field_id: lookup(&r.source_field_id),
            target_field_id: lookup(&r.target_field_id),
            ..r.clone()
        })
        .collect();

    let dependencies = diagram
        .dependencies
        .iter()
        .map(|d| Dependency {
            id: ids.next_id(),
            table_id: lookup(&d.table_id),
            dependent_table_id: lookup(&d.dependent_table_id),
            ..d.clone()
        })
        .collect();

    let areas = diagram
        .areas
        .iter()
        .map(|a| Area {
            id: lookup(&a.id),
            ..a.clone()
        })
        .collect();

    let notes = diagram
        .notes
        .iter()
        .map(|n| Note {
            id: ids.next_id(),
            ..n.clone()
        })
        .collect();

    let custom_types = diagram
        .custom_types
        .iter()
        .map(|c| CustomType {
            id: ids.next_id(),
            ..c.clone()
        })
        .collect();

    Diagram {
        id: ids.next_id(),
        tables,
        relationships,
        dependencies,
        areas,
        custom_types,
        notes,
        ..diagram.clone()
    }
}
