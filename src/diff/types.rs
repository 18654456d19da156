//! Diff entry types.

use crate::model::{Area, Field, Index, Note, Relationship, Table};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectKind {
    Table,
    Field,
    Index,
    Relationship,
    Area,
    Note,
}

impl ObjectKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Field => "field",
            Self::Index => "index",
            Self::Relationship => "relationship",
            Self::Area => "area",
            Self::Note => "note",
        }
    }

    /// Attributes compared when the caller does not narrow them down.
    pub fn default_attributes(self) -> &'static [Attribute] {
        use Attribute::*;
        match self {
            Self::Table => &[Name, Comments, Color, X, Y, Width],
            Self::Field => &[
                Name,
                Type,
                PrimaryKey,
                Unique,
                Nullable,
                Comments,
                CharacterMaximumLength,
                Scale,
                Precision,
                Increment,
                IsArray,
            ],
            Self::Index => &[Name, Unique, FieldIds, Type],
            Self::Relationship => &[
                Name,
                SourceSchema,
                TargetSchema,
                SourceTableId,
                TargetTableId,
                SourceFieldId,
                TargetFieldId,
                SourceCardinality,
                TargetCardinality,
            ],
            Self::Area => &[Name, Color, X, Y, Width, Height],
            Self::Note => &[Content, Color, X, Y, Width, Height],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Name,
    Comments,
    Content,
    Color,
    X,
    Y,
    Width,
    Height,
    Type,
    PrimaryKey,
    Unique,
    Nullable,
    CharacterMaximumLength,
    Precision,
    Scale,
    Increment,
    IsArray,
    FieldIds,
    SourceSchema,
    TargetSchema,
    SourceTableId,
    TargetTableId,
    SourceFieldId,
    TargetFieldId,
    SourceCardinality,
    TargetCardinality,
}

impl Attribute {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Comments => "comments",
            Self::Content => "content",
            Self::Color => "color",
            Self::X => "x",
            Self::Y => "y",
            Self::Width => "width",
            Self::Height => "height",
            Self::Type => "type",
            Self::PrimaryKey => "primaryKey",
            Self::Unique => "unique",
            Self::Nullable => "nullable",
            Self::CharacterMaximumLength => "characterMaximumLength",
            Self::Precision => "precision",
            Self::Scale => "scale",
            Self::Increment => "increment",
            Self::IsArray => "isArray",
            Self::FieldIds => "fieldIds",
            Self::SourceSchema => "sourceSchema",
            Self::TargetSchema => "targetSchema",
            Self::SourceTableId => "sourceTableId",
            Self::TargetTableId => "targetTableId",
            Self::SourceFieldId => "sourceFieldId",
            Self::TargetFieldId => "targetFieldId",
            Self::SourceCardinality => "sourceCardinality",
            Self::TargetCardinality => "targetCardinality",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Changed,
}

/// The entity carried by an `added` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AddedEntity {
    Table(Table),
    Field(Field),
    Index(Index),
    Relationship(Relationship),
    Area(Area),
    Note(Note),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Change {
    #[serde(rename_all = "camelCase")]
    Added {
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<String>,
        entity: AddedEntity,
    },
    #[serde(rename_all = "camelCase")]
    Removed {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<String>,
    },
    /// `id`/`table_id` refer to the new diagram, `old_id` to the old one.
    #[serde(rename_all = "camelCase")]
    Changed {
        id: String,
        old_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        table_id: Option<String>,
        attribute: Attribute,
        old_value: Value,
        new_value: Value,
    },
}

impl Change {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Changed { .. } => ChangeKind::Changed,
        }
    }

    pub fn is_removed(&self) -> bool {
        self.kind() == ChangeKind::Removed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub object: ObjectKind,
    #[serde(flatten)]
    pub change: Change,
}

/// `{object}[-{attribute}]-{id}`
pub fn diff_key(object: ObjectKind, attribute: Option<Attribute>, id: &str) -> String {
    match attribute {
        Some(attribute) => format!("{}-{}-{}", object.tag(), attribute.tag(), id),
        None => format!("{}-{}", object.tag(), id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diff_key_format() {
        assert_eq!(diff_key(ObjectKind::Table, None, "T1"), "table-T1");
        assert_eq!(
            diff_key(ObjectKind::Index, Some(Attribute::FieldIds), "I1"),
            "index-fieldIds-I1"
        );
    }

    #[test]
    fn test_attribute_tags_match_serde() {
        for attribute in ObjectKind::Field.default_attributes() {
            let json = serde_json::to_value(attribute).unwrap();
            assert_eq!(json, attribute.tag());
        }
    }

    #[test]
    fn test_changed_entry_json() {
        let entry = DiffEntry {
            object: ObjectKind::Table,
            change: Change::Changed {
                id: "T1".to_string(),
                old_id: "T1".to_string(),
                table_id: None,
                attribute: Attribute::Name,
                old_value: Value::from("users"),
                new_value: Value::from("customers"),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["object"], "table");
        assert_eq!(json["type"], "changed");
        assert_eq!(json["attribute"], "name");
        assert_eq!(json["oldId"], "T1");
        assert_eq!(json["newValue"], "customers");
        assert!(json.get("tableId").is_none());
    }
}
