use super::{AddedEntity, Attribute, DiffBuilder, Diffable, ObjectKind, Scope};
use crate::model::{Field, Index, Table};
use serde_json::{Value, json};

impl Diffable for Table {
    const KIND: ObjectKind = ObjectKind::Table;

    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::Name => json!(self.name),
            Attribute::Comments => json!(self.comments),
            Attribute::Color => json!(self.color),
            Attribute::X => json!(self.x),
            Attribute::Y => json!(self.y),
            Attribute::Width => json!(self.width),
            _ => Value::Null,
        }
    }

    fn into_added(self) -> AddedEntity {
        AddedEntity::Table(self)
    }
}

impl Diffable for Field {
    const KIND: ObjectKind = ObjectKind::Field;

    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::Name => json!(self.name),
            Attribute::Type => json!(self.data_type),
            Attribute::PrimaryKey => json!(self.primary_key),
            Attribute::Unique => json!(self.unique),
            Attribute::Nullable => json!(self.nullable),
            Attribute::Comments => json!(self.comments),
            Attribute::CharacterMaximumLength => json!(self.character_maximum_length),
            Attribute::Scale => json!(self.scale),
            Attribute::Precision => json!(self.precision),
            Attribute::Increment => json!(self.increment),
            Attribute::IsArray => json!(self.is_array),
            _ => Value::Null,
        }
    }

    fn into_added(self) -> AddedEntity {
        AddedEntity::Field(self)
    }
}

impl Diffable for Index {
    const KIND: ObjectKind = ObjectKind::Index;

    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::Name => json!(self.name),
            Attribute::Unique => json!(self.unique),
            Attribute::FieldIds => json!(self.field_ids),
            Attribute::Type => json!(self.index_type),
            _ => Value::Null,
        }
    }

    fn into_added(self) -> AddedEntity {
        AddedEntity::Index(self)
    }
}

impl DiffBuilder<'_> {
    /// Tables first, then the fields and indexes of every matched pair.
    pub(crate) fn tables(&mut self, old: &[Table], new: &[Table]) {
        let options = self.options;
        let outcome = self.collection(
            old,
            new,
            Scope {
                matcher: options.matchers.tables.as_ref(),
                checks: &options.change_types.tables,
                attributes: &options.attributes.tables,
                tables: None,
            },
        );

        for (old_table, new_table) in outcome.pairs {
            let tables = Some((old_table.id.as_str(), new_table.id.as_str()));
            let fields = self.collection(
                &old_table.fields,
                &new_table.fields,
                Scope {
                    matcher: options.matchers.fields.as_ref(),
                    checks: &options.change_types.fields,
                    attributes: &options.attributes.fields,
                    tables,
                },
            );
            let indexes = self.collection(
                &old_table.indexes,
                &new_table.indexes,
                Scope {
                    matcher: options.matchers.indexes.as_ref(),
                    checks: &options.change_types.indexes,
                    attributes: &options.attributes.indexes,
                    tables,
                },
            );

            let dirty = fields.structural
                || indexes.structural
                || !fields.changed.is_empty()
                || !indexes.changed.is_empty();
            if dirty {
                self.mark(ObjectKind::Table, &new_table.id);
            }
        }
    }
}
