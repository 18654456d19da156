//! Small builders for test diagrams.

use crate::model::{
    Area, Cardinality, CustomType, CustomTypeField, CustomTypeKind, DataType, DatabaseType,
    Dependency, Diagram, Field, Index, Note, Relationship, Table,
};
use chrono::{DateTime, Utc};

pub fn table(id: &str, name: &str, fields: Vec<Field>) -> Table {
    Table {
        id: id.to_string(),
        name: name.to_string(),
        schema: None,
        x: 0.0,
        y: 0.0,
        width: None,
        color: "#8eb7ff".to_string(),
        is_view: false,
        is_materialized_view: false,
        fields,
        indexes: vec![],
        created_at: 0,
        comments: None,
        order: None,
        parent_area_id: None,
    }
}

pub fn field(id: &str, name: &str, typ: &str) -> Field {
    Field {
        id: id.to_string(),
        name: name.to_string(),
        data_type: DataType::new(typ),
        primary_key: false,
        unique: false,
        nullable: true,
        increment: None,
        is_array: None,
        character_maximum_length: None,
        precision: None,
        scale: None,
        default: None,
        collation: None,
        comments: None,
        created_at: 0,
    }
}

pub fn pk_field(id: &str, name: &str, typ: &str) -> Field {
    Field {
        primary_key: true,
        unique: true,
        nullable: false,
        ..field(id, name, typ)
    }
}

pub fn index(id: &str, name: &str, field_ids: &[&str]) -> Index {
    Index {
        id: id.to_string(),
        name: name.to_string(),
        unique: false,
        field_ids: field_ids.iter().map(|s| s.to_string()).collect(),
        index_type: None,
        is_primary_key: None,
        created_at: 0,
    }
}

pub fn relationship(
    id: &str,
    source_table: &str,
    source_field: &str,
    target_table: &str,
    target_field: &str,
) -> Relationship {
    Relationship {
        id: id.to_string(),
        name: format!("fk_{}", id.to_lowercase()),
        source_schema: None,
        target_schema: None,
        source_table_id: source_table.to_string(),
        target_table_id: target_table.to_string(),
        source_field_id: source_field.to_string(),
        target_field_id: target_field.to_string(),
        source_cardinality: Cardinality::Many,
        target_cardinality: Cardinality::One,
        created_at: 0,
    }
}

pub fn dependency(id: &str, table_id: &str, dependent_table_id: &str) -> Dependency {
    Dependency {
        id: id.to_string(),
        schema: None,
        dependent_schema: None,
        table_id: table_id.to_string(),
        dependent_table_id: dependent_table_id.to_string(),
        created_at: 0,
    }
}

pub fn area(id: &str, name: &str) -> Area {
    Area {
        id: id.to_string(),
        name: name.to_string(),
        x: 0.0,
        y: 0.0,
        width: 400.0,
        height: 300.0,
        color: "#b067e9".to_string(),
        order: None,
    }
}

pub fn note(id: &str, content: &str) -> Note {
    Note {
        id: id.to_string(),
        content: content.to_string(),
        x: 0.0,
        y: 0.0,
        width: 200.0,
        height: 100.0,
        color: "#ffe374".to_string(),
        order: None,
    }
}

pub fn enum_type(id: &str, name: &str, values: &[&str]) -> CustomType {
    CustomType {
        id: id.to_string(),
        schema: None,
        name: name.to_string(),
        kind: CustomTypeKind::Enum,
        values: Some(values.iter().map(|s| s.to_string()).collect()),
        fields: None,
        order: None,
    }
}

pub fn composite_type(id: &str, name: &str, fields: &[(&str, &str)]) -> CustomType {
    CustomType {
        id: id.to_string(),
        schema: None,
        name: name.to_string(),
        kind: CustomTypeKind::Composite,
        values: None,
        fields: Some(
            fields
                .iter()
                .map(|(f, t)| CustomTypeField {
                    field: f.to_string(),
                    type_name: t.to_string(),
                })
                .collect(),
        ),
        order: None,
    }
}

pub fn diagram(tables: Vec<Table>, relationships: Vec<Relationship>) -> Diagram {
    let epoch: DateTime<Utc> = DateTime::from_timestamp(0, 0).unwrap_or_default();
    Diagram {
        id: "d1".to_string(),
        name: "test".to_string(),
        database_type: DatabaseType::Generic,
        database_edition: None,
        tables,
        relationships,
        dependencies: vec![],
        areas: vec![],
        custom_types: vec![],
        notes: vec![],
        created_at: epoch,
        updated_at: epoch,
    }
}
