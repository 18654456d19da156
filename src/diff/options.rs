//! What the diff engine compares and how it pairs entities up.

use super::types::{Attribute, ChangeKind};
use crate::model::{Area, Field, Index, Note, Relationship, Table};
use serde::Deserialize;

/// `None` checks everything, `Some(vec![])` checks nothing.
pub type Filter<T> = Option<Vec<T>>;

pub(crate) fn allows<T: PartialEq>(filter: &Filter<T>, item: &T) -> bool {
    filter.as_ref().is_none_or(|allowed| allowed.contains(item))
}

/// Per-kind allow-list of attributes compared on matched pairs.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeFilters {
    pub tables: Filter<Attribute>,
    pub fields: Filter<Attribute>,
    pub indexes: Filter<Attribute>,
    pub relationships: Filter<Attribute>,
    pub areas: Filter<Attribute>,
    pub notes: Filter<Attribute>,
}

/// Per-kind allow-list of added/removed/changed checks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeTypeFilters {
    pub tables: Filter<ChangeKind>,
    pub fields: Filter<ChangeKind>,
    pub indexes: Filter<ChangeKind>,
    pub relationships: Filter<ChangeKind>,
    pub areas: Filter<ChangeKind>,
    pub notes: Filter<ChangeKind>,
}

/// Decides whether an old and a new entity are the same one.
pub type Matcher<T> = Box<dyn Fn(&T, &T) -> bool>;

/// Custom matchers replace id matching for their kind.
#[derive(Default)]
pub struct Matchers {
    pub tables: Option<Matcher<Table>>,
    pub fields: Option<Matcher<Field>>,
    pub indexes: Option<Matcher<Index>>,
    pub relationships: Option<Matcher<Relationship>>,
    pub areas: Option<Matcher<Area>>,
    pub notes: Option<Matcher<Note>>,
}

impl Matchers {
    /// Pair tables by case-insensitive schema and name, fields by
    /// case-insensitive name, and indexes by name.
    pub fn by_name() -> Self {
        Self {
            tables: Some(Box::new(|old: &Table, new: &Table| {
                old.name.eq_ignore_ascii_case(&new.name)
                    && old.schema().map(str::to_lowercase) == new.schema().map(str::to_lowercase)
            })),
            fields: Some(Box::new(|old: &Field, new: &Field| {
                old.name.eq_ignore_ascii_case(&new.name)
            })),
            indexes: Some(Box::new(|old: &Index, new: &Index| {
                !old.name.is_empty() && old.name == new.name
            })),
            ..Self::default()
        }
    }
}

impl std::fmt::Debug for Matchers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matchers")
            .field("tables", &self.tables.is_some())
            .field("fields", &self.fields.is_some())
            .field("indexes", &self.indexes.is_some())
            .field("relationships", &self.relationships.is_some())
            .field("areas", &self.areas.is_some())
            .field("notes", &self.notes.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct DiffOptions {
    pub attributes: AttributeFilters,
    pub change_types: ChangeTypeFilters,
    pub matchers: Matchers,
}

/// Serializable subset of `DiffOptions` for the JSON surfaces.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiffOptionsJson {
    pub attributes: AttributeFilters,
    pub change_types: ChangeTypeFilters,
    /// Use `Matchers::by_name()` instead of id matching
    pub match_by_name: bool,
}

impl From<DiffOptionsJson> for DiffOptions {
    fn from(json: DiffOptionsJson) -> Self {
        Self {
            attributes: json.attributes,
            change_types: json.change_types,
            matchers: if json.match_by_name {
                Matchers::by_name()
            } else {
                Matchers::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    #[test]
    fn test_allows() {
        assert!(allows(&None, &ChangeKind::Added));
        assert!(!allows(&Some(vec![]), &ChangeKind::Added));
        assert!(allows(&Some(vec![ChangeKind::Added]), &ChangeKind::Added));
        assert!(!allows(&Some(vec![ChangeKind::Removed]), &ChangeKind::Added));
    }

    #[test]
    fn test_options_from_json() {
        let json = r#"{
            "attributes": { "tables": ["width"] },
            "changeTypes": { "fields": [] },
            "matchByName": true
        }"#;
        let parsed: DiffOptionsJson = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.attributes.tables, Some(vec![Attribute::Width]));
        assert_eq!(parsed.attributes.fields, None);
        assert_eq!(parsed.change_types.fields, Some(vec![]));

        let options = DiffOptions::from(parsed);
        assert!(options.matchers.tables.is_some());
        assert!(options.matchers.relationships.is_none());
    }

    #[test]
    fn test_by_name_matchers() {
        let m = Matchers::by_name();
        let tables = m.tables.unwrap();
        assert!(tables(&table("A", "Users", vec![]), &table("B", "users", vec![])));
        assert!(!tables(&table("A", "users", vec![]), &table("B", "orders", vec![])));

        let indexes = m.indexes.unwrap();
        assert!(!indexes(&index("I1", "", &[]), &index("I2", "", &[])));
    }
}
