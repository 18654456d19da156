//! Structural diff between two diagrams.
//!
//! Produces a flat, addressable change set for review screens. Entities are
//! paired by id unless a custom matcher is configured for their kind; this
//! pairing is independent of the reconciler's identity-key matching.

mod canvas;
mod normalize;
mod options;
mod relationships;
mod tables;
mod types;

pub use normalize::{normalize_text, values_equal};
pub use options::{
    AttributeFilters, ChangeTypeFilters, DiffOptions, DiffOptionsJson, Filter, Matcher, Matchers,
};
pub use types::{AddedEntity, Attribute, Change, ChangeKind, DiffEntry, ObjectKind, diff_key};

use crate::model::Diagram;
use indexmap::{IndexMap, IndexSet};
use options::allows;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramDiff {
    pub diff_map: IndexMap<String, DiffEntry>,
    pub changed_tables: IndexSet<String>,
    pub changed_fields: IndexSet<String>,
    pub changed_indexes: IndexSet<String>,
    pub changed_relationships: IndexSet<String>,
    pub changed_areas: IndexSet<String>,
    pub changed_notes: IndexSet<String>,
    /// Old id <-> new id of relationships with changed attributes, both ways
    pub relationship_id_map: IndexMap<String, String>,
}

impl DiagramDiff {
    pub fn is_empty(&self) -> bool {
        self.diff_map.is_empty()
    }

    pub fn entries(&self, object: ObjectKind) -> impl Iterator<Item = (&String, &DiffEntry)> {
        self.diff_map.iter().filter(move |(_, e)| e.object == object)
    }
}

/// Compare `old` against `new`. Pure; both inputs are left untouched.
pub fn generate_diff(old: &Diagram, new: &Diagram, options: &DiffOptions) -> DiagramDiff {
    let mut builder = DiffBuilder {
        options,
        diff: DiagramDiff::default(),
    };
    builder.tables(&old.tables, &new.tables);
    builder.relationships(old, new);
    builder.areas(&old.areas, &new.areas);
    builder.notes(&old.notes, &new.notes);
    builder.diff
}

/// An entity the diff engine knows how to pair and compare.
pub(crate) trait Diffable: Clone {
    const KIND: ObjectKind;

    fn id(&self) -> &str;

    /// Value of an attribute listed in `KIND.default_attributes()`.
    fn attribute(&self, attribute: Attribute) -> Value;

    fn into_added(self) -> AddedEntity;
}

/// Where a collection lives and how it is filtered.
pub(crate) struct Scope<'s, T> {
    pub matcher: Option<&'s Matcher<T>>,
    pub checks: &'s Filter<ChangeKind>,
    pub attributes: &'s Filter<Attribute>,
    /// Owning table in the old and new diagram, for fields and indexes
    pub tables: Option<(&'s str, &'s str)>,
}

pub(crate) struct Outcome<'a, T> {
    pub pairs: Vec<(&'a T, &'a T)>,
    pub structural: bool,
    pub changed: Vec<(&'a T, &'a T)>,
}

struct Pool<'a, T> {
    items: &'a [T],
    by_id: HashMap<&'a str, &'a T>,
}

impl<'a, T: Diffable> Pool<'a, T> {
    fn new(items: &'a [T]) -> Self {
        let mut by_id = HashMap::new();
        for item in items {
            by_id.entry(item.id()).or_insert(item);
        }
        Self { items, by_id }
    }

    /// Counterpart of `probe` in this pool; `probe_is_old` orients the matcher.
    fn find(&self, probe: &T, probe_is_old: bool, matcher: Option<&Matcher<T>>) -> Option<&'a T> {
        match matcher {
            Some(matches) => self.items.iter().find(|candidate| {
                if probe_is_old {
                    matches(probe, candidate)
                } else {
                    matches(candidate, probe)
                }
            }),
            None => self.by_id.get(probe.id()).copied(),
        }
    }
}

pub(crate) struct DiffBuilder<'o> {
    options: &'o DiffOptions,
    diff: DiagramDiff,
}

impl DiffBuilder<'_> {
    /// Record added, removed and changed entries for one collection and
    /// return the matched pairs.
    pub(crate) fn collection<'a, T: Diffable>(
        &mut self,
        old: &'a [T],
        new: &'a [T],
        scope: Scope<'_, T>,
    ) -> Outcome<'a, T> {
        let old_pool = Pool::new(old);
        let new_pool = Pool::new(new);
        let (old_table, new_table) = match scope.tables {
            Some((o, n)) => (Some(o.to_string()), Some(n.to_string())),
            None => (None, None),
        };
        let mut outcome = Outcome {
            pairs: Vec::new(),
            structural: false,
            changed: Vec::new(),
        };

        if allows(scope.checks, &ChangeKind::Added) {
            for item in new {
                if old_pool.find(item, false, scope.matcher).is_none() {
                    let id = item.id().to_string();
                    self.mark(T::KIND, &id);
                    self.insert(
                        diff_key(T::KIND, None, &id),
                        T::KIND,
                        Change::Added {
                            table_id: new_table.clone(),
                            entity: item.clone().into_added(),
                        },
                    );
                    outcome.structural = true;
                }
            }
        }

        let check_removed = allows(scope.checks, &ChangeKind::Removed);
        let check_changed = allows(scope.checks, &ChangeKind::Changed);
        for item in old {
            match new_pool.find(item, true, scope.matcher) {
                None if check_removed => {
                    let id = item.id().to_string();
                    self.mark(T::KIND, &id);
                    self.insert(
                        diff_key(T::KIND, None, &id),
                        T::KIND,
                        Change::Removed {
                            id,
                            table_id: old_table.clone(),
                        },
                    );
                    outcome.structural = true;
                }
                None => {}
                Some(counterpart) => {
                    outcome.pairs.push((item, counterpart));
                    if check_changed
                        && self.compare(item, counterpart, scope.attributes, new_table.as_deref())
                    {
                        outcome.changed.push((item, counterpart));
                    }
                }
            }
        }

        outcome
    }

    /// Emit one entry per differing attribute. Returns whether any differed.
    fn compare<T: Diffable>(
        &mut self,
        old: &T,
        new: &T,
        attributes: &Filter<Attribute>,
        table_id: Option<&str>,
    ) -> bool {
        let mut differs = false;
        for &attribute in T::KIND.default_attributes() {
            if !allows(attributes, &attribute) {
                continue;
            }
            let (old_value, new_value) = (old.attribute(attribute), new.attribute(attribute));
            if values_equal(attribute, &old_value, &new_value) {
                continue;
            }
            differs = true;
            self.insert(
                diff_key(T::KIND, Some(attribute), new.id()),
                T::KIND,
                Change::Changed {
                    id: new.id().to_string(),
                    old_id: old.id().to_string(),
                    table_id: table_id.map(str::to_string),
                    attribute,
                    old_value,
                    new_value,
                },
            );
        }
        if differs {
            self.mark(T::KIND, new.id());
        }
        differs
    }

    fn insert(&mut self, key: String, object: ObjectKind, change: Change) {
        self.diff.diff_map.insert(key, DiffEntry { object, change });
    }

    /// Flag an entity as changed. An explicitly empty table attribute list
    /// also silences table dirtiness.
    pub(crate) fn mark(&mut self, object: ObjectKind, id: &str) {
        let set = match object {
            ObjectKind::Table => {
                if self
                    .options
                    .attributes
                    .tables
                    .as_ref()
                    .is_some_and(|a| a.is_empty())
                {
                    return;
                }
                &mut self.diff.changed_tables
            }
            ObjectKind::Field => &mut self.diff.changed_fields,
            ObjectKind::Index => &mut self.diff.changed_indexes,
            ObjectKind::Relationship => &mut self.diff.changed_relationships,
            ObjectKind::Area => &mut self.diff.changed_areas,
            ObjectKind::Note => &mut self.diff.changed_notes,
        };
        set.insert(id.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::model::Cardinality;

    fn sample() -> Diagram {
        let mut users = table(
            "T1",
            "users",
            vec![pk_field("F1", "id", "int"), field("F2", "email", "varchar")],
        );
        users.comments = Some("registered users".to_string());
        users.indexes.push(index("I1", "users_email_idx", &["F1", "F2"]));
        let orders = table(
            "T2",
            "orders",
            vec![pk_field("F3", "id", "int"), field("F4", "user_id", "int")],
        );
        let mut d = diagram(
            vec![users, orders],
            vec![relationship("R1", "T2", "F4", "T1", "F1")],
        );
        d.areas.push(area("A1", "core"));
        d.notes.push(note("N1", "remember to index"));
        d
    }

    #[test]
    fn test_identical_diagrams_have_no_diff() {
        let d = sample();
        let diff = generate_diff(&d, &d, &DiffOptions::default());
        assert!(diff.is_empty());
        assert!(diff.changed_tables.is_empty());
        assert!(diff.relationship_id_map.is_empty());
    }

    #[test]
    fn test_table_attribute_changes() {
        let old = sample();
        let mut new = sample();
        new.tables[0].name = "customers".to_string();
        new.tables[0].width = Some(300.0);

        let diff = generate_diff(&old, &new, &DiffOptions::default());
        assert_eq!(diff.diff_map.len(), 2);

        let entry = &diff.diff_map["table-name-T1"];
        assert_eq!(entry.object, ObjectKind::Table);
        match &entry.change {
            Change::Changed {
                old_value,
                new_value,
                ..
            } => {
                assert_eq!(old_value, "users");
                assert_eq!(new_value, "customers");
            }
            other => panic!("unexpected change {other:?}"),
        }
        assert!(diff.diff_map.contains_key("table-width-T1"));
        assert!(diff.changed_tables.contains("T1"));
    }

    #[test]
    fn test_attribute_filter() {
        let old = sample();
        let mut new = sample();
        new.tables[0].name = "customers".to_string();
        new.tables[0].color = "#000000".to_string();
        new.tables[0].width = Some(300.0);

        let options = DiffOptions {
            attributes: AttributeFilters {
                tables: Some(vec![Attribute::Width]),
                ..AttributeFilters::default()
            },
            ..DiffOptions::default()
        };
        let diff = generate_diff(&old, &new, &options);
        let keys: Vec<&str> = diff.diff_map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["table-width-T1"]);
    }

    #[test]
    fn test_whitespace_only_comment_change_is_ignored() {
        let mut old = sample();
        let mut new = sample();
        old.tables[0].comments = Some("a  b".to_string());
        new.tables[0].comments = Some("a\nb".to_string());
        new.notes[0].content = "  remember to\tindex ".to_string();

        let diff = generate_diff(&old, &new, &DiffOptions::default());
        assert!(diff.is_empty());
    }

    #[test]
    fn test_optional_flags_default_to_false() {
        let old = sample();
        let mut new = sample();
        new.tables[0].fields[1].increment = Some(false);
        new.tables[0].fields[1].is_array = Some(false);

        assert!(generate_diff(&old, &new, &DiffOptions::default()).is_empty());

        new.tables[0].fields[1].is_array = Some(true);
        let diff = generate_diff(&old, &new, &DiffOptions::default());
        assert!(diff.diff_map.contains_key("field-isArray-F2"));
        assert!(diff.changed_fields.contains("F2"));
    }

    #[test]
    fn test_composite_index_order_matters() {
        let old = sample();
        let mut new = sample();
        new.tables[0].indexes[0].field_ids.reverse();

        let diff = generate_diff(&old, &new, &DiffOptions::default());
        let entry = &diff.diff_map["index-fieldIds-I1"];
        match &entry.change {
            Change::Changed { table_id, .. } => assert_eq!(table_id.as_deref(), Some("T1")),
            other => panic!("unexpected change {other:?}"),
        }
        assert!(diff.changed_indexes.contains("I1"));
    }

    #[test]
    fn test_added_and_removed_fields_dirty_the_table() {
        let old = sample();
        let mut new = sample();
        new.tables[1].fields.retain(|f| f.id != "F4");
        new.tables[1].fields.push(field("F9", "total", "numeric"));
        new.relationships.clear();

        let diff = generate_diff(&old, &new, &DiffOptions::default());
        assert!(diff.diff_map["field-F4"].change.is_removed());
        match &diff.diff_map["field-F9"].change {
            Change::Added { table_id, entity } => {
                assert_eq!(table_id.as_deref(), Some("T2"));
                assert!(matches!(entity, AddedEntity::Field(f) if f.name == "total"));
            }
            other => panic!("unexpected change {other:?}"),
        }
        assert!(diff.changed_tables.contains("T2"));
        assert!(diff.diff_map["relationship-R1"].change.is_removed());
    }

    #[test]
    fn test_empty_table_attribute_list_silences_dirtiness() {
        let old = sample();
        let mut new = sample();
        new.tables[1].fields.push(field("F9", "total", "numeric"));
        new.tables.push(table("T3", "items", vec![]));

        let options = DiffOptions {
            attributes: AttributeFilters {
                tables: Some(vec![]),
                ..AttributeFilters::default()
            },
            ..DiffOptions::default()
        };
        let diff = generate_diff(&old, &new, &options);
        assert!(diff.diff_map.contains_key("field-F9"));
        assert!(diff.diff_map.contains_key("table-T3"));
        assert!(diff.changed_tables.is_empty());
    }

    #[test]
    fn test_change_type_filters() {
        let old = sample();
        let mut new = sample();
        new.tables.remove(1);
        new.relationships.clear();
        new.tables.push(table("T3", "items", vec![]));
        new.tables[0].name = "customers".to_string();

        let only_added = DiffOptions {
            change_types: ChangeTypeFilters {
                tables: Some(vec![ChangeKind::Added]),
                relationships: Some(vec![]),
                ..ChangeTypeFilters::default()
            },
            ..DiffOptions::default()
        };
        let diff = generate_diff(&old, &new, &only_added);
        let keys: Vec<&str> = diff.diff_map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["table-T3"]);
    }

    #[test]
    fn test_custom_table_matcher() {
        let old = sample();
        let mut new = sample();
        new.tables[0].id = "other".to_string();
        new.tables[0].name = "USERS".to_string();
        new.relationships.clear();

        let by_id = generate_diff(&old, &new, &DiffOptions::default());
        assert!(by_id.diff_map["table-T1"].change.is_removed());
        assert!(by_id.diff_map.contains_key("table-other"));

        let by_name = generate_diff(
            &old,
            &new,
            &DiffOptions {
                matchers: Matchers::by_name(),
                ..DiffOptions::default()
            },
        );
        assert!(!by_name.diff_map.contains_key("table-T1"));
        match &by_name.diff_map["table-name-other"].change {
            Change::Changed { old_id, .. } => assert_eq!(old_id, "T1"),
            other => panic!("unexpected change {other:?}"),
        }
    }

    #[test]
    fn test_relationship_changes_fill_id_map() {
        let old = sample();
        let mut new = sample();
        new.relationships[0].target_cardinality = Cardinality::Many;

        let diff = generate_diff(&old, &new, &DiffOptions::default());
        assert!(diff.diff_map.contains_key("relationship-targetCardinality-R1"));
        assert!(diff.changed_relationships.contains("R1"));
        assert_eq!(diff.relationship_id_map.get("R1").map(String::as_str), Some("R1"));
    }

    #[test]
    fn test_area_and_note_changes() {
        let old = sample();
        let mut new = sample();
        new.areas[0].height = 500.0;
        new.notes.clear();
        new.notes.push(note("N2", "new note"));

        let diff = generate_diff(&old, &new, &DiffOptions::default());
        assert!(diff.diff_map.contains_key("area-height-A1"));
        assert!(diff.diff_map["note-N1"].change.is_removed());
        assert!(diff.diff_map.contains_key("note-N2"));
        assert_eq!(diff.entries(ObjectKind::Note).count(), 2);
        assert!(diff.changed_notes.contains("N2"));
        assert!(diff.changed_areas.contains("A1"));
    }

    #[test]
    fn test_diff_serializes() {
        let old = sample();
        let mut new = sample();
        new.tables[0].name = "customers".to_string();
        let diff = generate_diff(&old, &new, &DiffOptions::default());
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["diffMap"]["table-name-T1"]["type"], "changed");
        assert_eq!(json["changedTables"][0], "T1");
    }
}
