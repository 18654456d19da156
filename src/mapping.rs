//! Identity-key and descriptor maps over one diagram.

use crate::identity::{EntityDescriptor, KeyPart, build_key};
use crate::model::{CustomType, Dependency, Diagram, Relationship, Table};
use std::collections::HashMap;

/// Minimal naming data needed to key entities that reference this one.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub schema: Option<String>,
    pub name: String,
    pub color: Option<String>,
}

/// Lookup tables built in one pass over a diagram.
#[derive(Debug, Default)]
pub struct SourceMappings {
    /// Identity key -> opaque id
    pub key_to_id: HashMap<String, String>,
    /// Opaque id -> naming data (tables, fields, indexes)
    pub descriptors: HashMap<String, Descriptor>,
}

impl SourceMappings {
    /// Walk `diagram` once. Tables with their fields and indexes go first
    /// because relationship and dependency keys need endpoint descriptors.
    pub fn build(diagram: &Diagram) -> Self {
        let mut mappings = Self::default();

        for table in &diagram.tables {
            mappings.record(build_key(&table_descriptor(table, table.schema())), &table.id);
            mappings.descriptors.insert(
                table.id.clone(),
                Descriptor {
                    schema: table.schema().map(str::to_string),
                    name: table.name.clone(),
                    color: Some(table.color.clone()),
                },
            );

            for field in &table.fields {
                let key = build_key(&EntityDescriptor::Field {
                    schema: table.schema(),
                    table: &table.name,
                    name: &field.name,
                });
                mappings.record(key, &field.id);
                mappings.descriptors.insert(
                    field.id.clone(),
                    Descriptor {
                        schema: table.schema().map(str::to_string),
                        name: field.name.clone(),
                        color: None,
                    },
                );
            }

            for index in &table.indexes {
                let key = build_key(&EntityDescriptor::Index {
                    schema: table.schema(),
                    table: &table.name,
                    name: &index.name,
                });
                mappings.record(key, &index.id);
                mappings.descriptors.insert(
                    index.id.clone(),
                    Descriptor {
                        schema: table.schema().map(str::to_string),
                        name: index.name.clone(),
                        color: None,
                    },
                );
            }
        }

        for rel in &diagram.relationships {
            match mappings.relationship_key(rel) {
                Some(key) => mappings.record(key, &rel.id),
                None => log::debug!("relationship {} has unresolvable endpoints", rel.id),
            }
        }

        for dep in &diagram.dependencies {
            if let Some(key) = mappings.dependency_key(dep) {
                mappings.record(key, &dep.id);
            }
        }

        for custom_type in &diagram.custom_types {
            mappings.record(custom_type_key(custom_type), &custom_type.id);
        }

        for area in &diagram.areas {
            mappings.record(build_key(&EntityDescriptor::Area { name: &area.name }), &area.id);
        }

        mappings
    }

    /// Id of the entity with this identity, if the diagram has one.
    pub fn id_for(&self, descriptor: &EntityDescriptor) -> Option<&str> {
        self.key_to_id.get(&build_key(descriptor)).map(String::as_str)
    }

    /// Key a relationship through the endpoint descriptors. `None` when an
    /// endpoint table or field is unknown.
    pub fn relationship_key(&self, rel: &Relationship) -> Option<String> {
        let source_table = self.descriptors.get(&rel.source_table_id)?;
        let target_table = self.descriptors.get(&rel.target_table_id)?;
        let source_field = self.descriptors.get(&rel.source_field_id)?;
        let target_field = self.descriptors.get(&rel.target_field_id)?;

        Some(build_key(&EntityDescriptor::Relationship {
            source: KeyPart::new(
                source_table.schema.as_deref(),
                Some(&source_table.name),
                &source_field.name,
            ),
            target: KeyPart::new(
                target_table.schema.as_deref(),
                Some(&target_table.name),
                &target_field.name,
            ),
        }))
    }

    pub fn dependency_key(&self, dep: &Dependency) -> Option<String> {
        let table = self.descriptors.get(&dep.table_id)?;
        let dependent = self.descriptors.get(&dep.dependent_table_id)?;

        Some(build_key(&EntityDescriptor::Dependency {
            table: KeyPart::new(table.schema.as_deref(), None, &table.name),
            dependent: KeyPart::new(dependent.schema.as_deref(), None, &dependent.name),
        }))
    }

    // Duplicate names keep the first id seen.
    fn record(&mut self, key: String, id: &str) {
        self.key_to_id.entry(key).or_insert_with(|| id.to_string());
    }
}

pub fn table_descriptor<'a>(table: &'a Table, schema: Option<&'a str>) -> EntityDescriptor<'a> {
    EntityDescriptor::Table {
        schema,
        name: &table.name,
    }
}

pub fn custom_type_key(custom_type: &CustomType) -> String {
    build_key(&EntityDescriptor::CustomType {
        schema: custom_type.schema.as_deref(),
        name: &custom_type.name,
    })
}
