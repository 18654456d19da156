use super::{AddedEntity, Attribute, DiffBuilder, Diffable, ObjectKind, Scope};
use crate::model::{Diagram, Relationship};
use log::debug;
use serde_json::{Value, json};

impl Diffable for Relationship {
    const KIND: ObjectKind = ObjectKind::Relationship;

    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::Name => json!(self.name),
            Attribute::SourceSchema => json!(self.source_schema),
            Attribute::TargetSchema => json!(self.target_schema),
            Attribute::SourceTableId => json!(self.source_table_id),
            Attribute::TargetTableId => json!(self.target_table_id),
            Attribute::SourceFieldId => json!(self.source_field_id),
            Attribute::TargetFieldId => json!(self.target_field_id),
            Attribute::SourceCardinality => json!(self.source_cardinality),
            Attribute::TargetCardinality => json!(self.target_cardinality),
            _ => Value::Null,
        }
    }

    fn into_added(self) -> AddedEntity {
        AddedEntity::Relationship(self)
    }
}

/// Relationships whose endpoint tables both exist in `diagram`.
fn attached(diagram: &Diagram) -> Vec<Relationship> {
    diagram
        .relationships
        .iter()
        .filter(|r| {
            let ok = diagram.table(&r.source_table_id).is_some()
                && diagram.table(&r.target_table_id).is_some();
            if !ok {
                debug!("skipping detached relationship {}", r.id);
            }
            ok
        })
        .cloned()
        .collect()
}

impl DiffBuilder<'_> {
    pub(crate) fn relationships(&mut self, old: &Diagram, new: &Diagram) {
        let options = self.options;
        let (old_rels, new_rels) = (attached(old), attached(new));
        let outcome = self.collection(
            &old_rels,
            &new_rels,
            Scope {
                matcher: options.matchers.relationships.as_ref(),
                checks: &options.change_types.relationships,
                attributes: &options.attributes.relationships,
                tables: None,
            },
        );

        for (old_rel, new_rel) in outcome.changed {
            let map = &mut self.diff.relationship_id_map;
            map.insert(old_rel.id.clone(), new_rel.id.clone());
            map.insert(new_rel.id.clone(), old_rel.id.clone());
        }
    }
}
