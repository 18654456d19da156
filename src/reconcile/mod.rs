//! Merge a regenerated diagram into a live one.
//!
//! The result has the target's structure with the source's ids, timestamps
//! and layout wherever the two overlap. The pipeline runs in three passes:
//! match tables, build the id substitution table, then rewrite and overlay
//! every dependent collection through it.

mod custom_types;
mod dependencies;
mod relationships;
mod substitution;
mod tables;

pub use custom_types::reconcile_custom_types;
pub use dependencies::reconcile_dependencies;
pub use relationships::reconcile_relationships;
pub use substitution::Substitution;
pub use tables::{MatchStrategy, TableMatch, build_substitution, match_tables, overlay_tables};

use crate::mapping::SourceMappings;
use crate::model::{DatabaseType, Dependency, Diagram, Relationship, Table};
use crate::placement::Placement;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOptions {
    /// Schema assumed for tables that name none
    pub default_schema: Option<String>,
    /// Move new tables that overlap existing ones
    pub place_new_tables: bool,
}

impl ReconcileOptions {
    pub fn for_database(database_type: DatabaseType) -> Self {
        Self {
            default_schema: database_type.default_schema().map(str::to_string),
            place_new_tables: false,
        }
    }
}

/// Reconcile `target` onto `source`. Inputs are left untouched; unmatched
/// entities are treated as new or deleted, never as errors.
pub fn apply_changes(source: &Diagram, target: &Diagram, options: &ReconcileOptions) -> Diagram {
    let mappings = SourceMappings::build(source);

    let matches = match_tables(
        &source.tables,
        &target.tables,
        &mappings,
        options.default_schema.as_deref(),
    );
    let substitution = build_substitution(&source.tables, &target.tables, &matches);
    log::debug!(
        "{} of {} target tables matched",
        substitution.table_count(),
        target.tables.len()
    );

    let (mut tables, new_tables) =
        overlay_tables(&source.tables, &target.tables, &matches, &substitution);
    substitution.rewrite_index_fields(&mut tables);
    // Stable: tables without an order keep their relative position at the end.
    tables.sort_by_key(|t| t.order.unwrap_or(i64::MAX));

    let relationships = drop_dangling_relationships(
        reconcile_relationships(&source.relationships, &target.relationships, &substitution),
        &tables,
    );
    let dependencies = drop_dangling_dependencies(
        reconcile_dependencies(&source.dependencies, &target.dependencies, &substitution),
        &tables,
    );
    let custom_types = reconcile_custom_types(&source.custom_types, &target.custom_types);

    if options.place_new_tables && !new_tables.is_empty() {
        Placement::default().place(&mut tables, &new_tables);
    }

    Diagram {
        id: source.id.clone(),
        name: source.name.clone(),
        database_type: source.database_type,
        database_edition: source.database_edition.clone(),
        tables,
        relationships,
        dependencies,
        areas: target.areas.clone(),
        custom_types,
        notes: target.notes.clone(),
        created_at: source.created_at,
        updated_at: source.updated_at,
    }
}

fn drop_dangling_relationships(
    relationships: Vec<Relationship>,
    tables: &[Table],
) -> Vec<Relationship> {
    let by_id: HashMap<&str, &Table> = tables.iter().map(|t| (t.id.as_str(), t)).collect();
    relationships
        .into_iter()
        .filter(|rel| {
            let resolves = |table_id: &str, field_id: &str| {
                by_id.get(table_id).is_some_and(|t| t.has_field(field_id))
            };
            let ok = resolves(&rel.source_table_id, &rel.source_field_id)
                && resolves(&rel.target_table_id, &rel.target_field_id);
            if !ok {
                log::warn!("dropping relationship {} with dangling endpoints", rel.name);
            }
            ok
        })
        .collect()
}

fn drop_dangling_dependencies(dependencies: Vec<Dependency>, tables: &[Table]) -> Vec<Dependency> {
    let ids: HashMap<&str, ()> = tables.iter().map(|t| (t.id.as_str(), ())).collect();
    dependencies
        .into_iter()
        .filter(|dep| {
            let ok = ids.contains_key(dep.table_id.as_str())
                && ids.contains_key(dep.dependent_table_id.as_str());
            if !ok {
                log::warn!("dropping dependency {} with dangling tables", dep.id);
            }
            ok
        })
        .collect()
}
