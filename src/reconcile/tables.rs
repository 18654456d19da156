//! Table, field and index reconciliation.

use super::substitution::Substitution;
use crate::mapping::{SourceMappings, table_descriptor};
use crate::model::{Field, Index, Table};
use std::collections::{HashMap, HashSet};

/// How a target table found its source counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Same schema and name
    ExactKey,
    /// Same name, schema ignored
    WithoutSchema,
    /// Same name under the database's default schema
    DefaultSchema,
    /// Same schema and identical set of field names, at least one of them
    /// not a primary key
    Rename,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMatch {
    /// Index into the source diagram's tables
    pub source: usize,
    pub strategy: MatchStrategy,
}

type KeyLookup<'a> = Box<dyn Fn(&Table) -> Option<&'a str> + 'a>;

fn boxed<'a>(lookup: impl Fn(&Table) -> Option<&'a str> + 'a) -> KeyLookup<'a> {
    Box::new(lookup)
}

/// Key strategies in the order they are tried; the first hit wins.
fn key_strategies<'a>(
    mappings: &'a SourceMappings,
    default_schema: Option<&'a str>,
) -> Vec<(MatchStrategy, KeyLookup<'a>)> {
    let mut strategies = vec![
        (
            MatchStrategy::ExactKey,
            boxed(move |t| mappings.id_for(&table_descriptor(t, t.schema()))),
        ),
        (
            MatchStrategy::WithoutSchema,
            boxed(move |t| mappings.id_for(&table_descriptor(t, None))),
        ),
    ];
    if let Some(schema) = default_schema {
        strategies.push((
            MatchStrategy::DefaultSchema,
            boxed(move |t| mappings.id_for(&table_descriptor(t, Some(schema)))),
        ));
    }
    strategies
}

/// Find the source counterpart of every target table. The result is indexed
/// like `target`. Each source table is claimed at most once.
pub fn match_tables(
    source: &[Table],
    target: &[Table],
    mappings: &SourceMappings,
    default_schema: Option<&str>,
) -> Vec<Option<TableMatch>> {
    let source_index: HashMap<&str, usize> = source
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.as_str(), i))
        .collect();
    let strategies = key_strategies(mappings, default_schema);

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut matches: Vec<Option<TableMatch>> = vec![None; target.len()];

    for (i, table) in target.iter().enumerate() {
        for (strategy, lookup) in &strategies {
            let Some(&source_pos) = lookup(table).and_then(|id| source_index.get(id)) else {
                continue;
            };
            if claimed.insert(source_pos) {
                log::debug!(
                    "table {} matched {} by {:?}",
                    table.name,
                    source[source_pos].id,
                    strategy
                );
                matches[i] = Some(TableMatch {
                    source: source_pos,
                    strategy: *strategy,
                });
                break;
            }
        }
    }

    match_renamed(source, target, default_schema, &mut claimed, &mut matches);
    matches
}

/// Pair leftover tables whose schema and field-name set agree, provided the
/// pairing is unique on both sides. Tables with fewer than two fields or
/// only primary-key fields have no signature.
fn match_renamed(
    source: &[Table],
    target: &[Table],
    default_schema: Option<&str>,
    claimed: &mut HashSet<usize>,
    matches: &mut [Option<TableMatch>],
) {
    let signature = |t: &Table| -> Option<(Option<String>, Vec<String>)> {
        if t.fields.len() < 2 || t.fields.iter().all(|f| f.primary_key) {
            return None;
        }
        let mut names: Vec<String> = t.fields.iter().map(|f| f.name.clone()).collect();
        names.sort();
        let schema = t.schema().or(default_schema).map(str::to_string);
        Some((schema, names))
    };

    let mut source_groups: HashMap<(Option<String>, Vec<String>), Vec<usize>> = HashMap::new();
    for (i, table) in source.iter().enumerate() {
        if claimed.contains(&i) {
            continue;
        }
        if let Some(sig) = signature(table) {
            source_groups.entry(sig).or_default().push(i);
        }
    }

    let mut target_groups: HashMap<(Option<String>, Vec<String>), Vec<usize>> = HashMap::new();
    for (i, table) in target.iter().enumerate() {
        if matches[i].is_some() {
            continue;
        }
        if let Some(sig) = signature(table) {
            target_groups.entry(sig).or_default().push(i);
        }
    }

    for (sig, targets) in &target_groups {
        let (Some(sources), [target_pos]) = (source_groups.get(sig), targets.as_slice()) else {
            continue;
        };
        let [source_pos] = sources.as_slice() else {
            continue;
        };
        log::debug!(
            "table {} matched renamed {}",
            target[*target_pos].name,
            source[*source_pos].name
        );
        claimed.insert(*source_pos);
        matches[*target_pos] = Some(TableMatch {
            source: *source_pos,
            strategy: MatchStrategy::Rename,
        });
    }
}

/// Record table ids and name-matched field ids of every matched pair.
pub fn build_substitution(
    source: &[Table],
    target: &[Table],
    matches: &[Option<TableMatch>],
) -> Substitution {
    let mut substitution = Substitution::default();

    for (target_table, m) in target.iter().zip(matches) {
        let Some(m) = m else { continue };
        let source_table = &source[m.source];
        substitution.add_table(&target_table.id, &source_table.id);

        let paired = pair_fields(source_table, target_table);
        for (field, source_field) in target_table.fields.iter().zip(paired) {
            if let Some(source_field) = source_field {
                substitution.add_field(&field.id, &source_field.id);
            }
        }
    }

    substitution
}

/// Build result tables: matched tables keep the source's identity and
/// layout with the target's structure overlaid; unmatched ones are copied.
/// Returns the tables and the ids of the new ones.
pub fn overlay_tables(
    source: &[Table],
    target: &[Table],
    matches: &[Option<TableMatch>],
    substitution: &Substitution,
) -> (Vec<Table>, HashSet<String>) {
    let mut new_tables = HashSet::new();
    let tables = target
        .iter()
        .zip(matches)
        .map(|(target_table, m)| match m {
            Some(m) => merge_table(&source[m.source], target_table, substitution),
            None => {
                new_tables.insert(target_table.id.clone());
                target_table.clone()
            }
        })
        .collect();
    (tables, new_tables)
}

fn merge_table(source: &Table, target: &Table, substitution: &Substitution) -> Table {
    let fields = target
        .fields
        .iter()
        .zip(pair_fields(source, target))
        .map(|(f, paired)| match paired {
            Some(source_field) => merge_field(source_field, f),
            None => f.clone(),
        })
        .collect();

    Table {
        id: source.id.clone(),
        name: target.name.clone(),
        schema: target.schema.clone(),
        x: source.x,
        y: source.y,
        width: source.width,
        color: source.color.clone(),
        is_view: target.is_view,
        is_materialized_view: target.is_materialized_view,
        fields,
        indexes: merge_indexes(&source.indexes, &target.indexes, substitution),
        created_at: source.created_at,
        comments: target.comments.clone(),
        order: source.order,
        parent_area_id: source.parent_area_id.clone(),
    }
}

fn merge_field(source: &Field, target: &Field) -> Field {
    Field {
        id: source.id.clone(),
        name: target.name.clone(),
        data_type: target.data_type.clone(),
        primary_key: target.primary_key,
        unique: target.unique,
        nullable: target.nullable,
        increment: target.increment,
        is_array: target.is_array,
        character_maximum_length: target.character_maximum_length.clone(),
        precision: target.precision,
        scale: target.scale,
        default: target.default.clone(),
        collation: target.collation.clone(),
        comments: target.comments.clone().or_else(|| source.comments.clone()),
        created_at: source.created_at,
    }
}

/// Match target indexes by name first, then by translated column list plus
/// unique/primary-key flags among the indexes no name match claimed.
fn merge_indexes(source: &[Index], target: &[Index], substitution: &Substitution) -> Vec<Index> {
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut by_name: Vec<Option<usize>> = vec![None; target.len()];

    for (i, index) in target.iter().enumerate() {
        if index.name.is_empty() {
            continue;
        }
        let found = source
            .iter()
            .enumerate()
            .find(|(j, s)| s.name == index.name && !claimed.contains(j))
            .map(|(j, _)| j);
        if let Some(j) = found {
            claimed.insert(j);
            by_name[i] = Some(j);
        }
    }

    target
        .iter()
        .zip(by_name)
        .map(|(index, name_match)| {
            if let Some(j) = name_match {
                let s = &source[j];
                return Index {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    created_at: s.created_at,
                    ..index.clone()
                };
            }

            let field_ids = substitution.field_ids(&index.field_ids);
            let semantic = source.iter().enumerate().find(|(j, s)| {
                !claimed.contains(j)
                    && s.field_ids == field_ids
                    && s.unique == index.unique
                    && s.is_primary_key() == index.is_primary_key()
            });
            match semantic {
                Some((j, s)) => {
                    log::debug!("index {:?} matched {} by columns", index.name, s.id);
                    claimed.insert(j);
                    Index {
                        id: s.id.clone(),
                        created_at: s.created_at,
                        ..index.clone()
                    }
                }
                None => index.clone(),
            }
        })
        .collect()
}

/// Source counterpart of every target field, by name, indexed like
/// `target.fields`. Each source field is claimed at most once; a repeated
/// target name after the first counts as a new field.
fn pair_fields<'s>(source: &'s Table, target: &Table) -> Vec<Option<&'s Field>> {
    let mut claimed: HashSet<usize> = HashSet::new();
    target
        .fields
        .iter()
        .map(|field| {
            let (j, found) = source
                .fields
                .iter()
                .enumerate()
                .find(|(j, s)| s.name == field.name && !claimed.contains(j))?;
            claimed.insert(j);
            Some(found)
        })
        .collect()
}
