use super::{AddedEntity, Attribute, DiffBuilder, Diffable, ObjectKind, Scope};
use crate::model::{Area, Note};
use serde_json::{Value, json};

impl Diffable for Area {
    const KIND: ObjectKind = ObjectKind::Area;

    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::Name => json!(self.name),
            Attribute::Color => json!(self.color),
            Attribute::X => json!(self.x),
            Attribute::Y => json!(self.y),
            Attribute::Width => json!(self.width),
            Attribute::Height => json!(self.height),
            _ => Value::Null,
        }
    }

    fn into_added(self) -> AddedEntity {
        AddedEntity::Area(self)
    }
}

impl Diffable for Note {
    const KIND: ObjectKind = ObjectKind::Note;

    fn id(&self) -> &str {
        &self.id
    }

    fn attribute(&self, attribute: Attribute) -> Value {
        match attribute {
            Attribute::Content => json!(self.content),
            Attribute::Color => json!(self.color),
            Attribute::X => json!(self.x),
            Attribute::Y => json!(self.y),
            Attribute::Width => json!(self.width),
            Attribute::Height => json!(self.height),
            _ => Value::Null,
        }
    }

    fn into_added(self) -> AddedEntity {
        AddedEntity::Note(self)
    }
}

impl DiffBuilder<'_> {
    pub(crate) fn areas(&mut self, old: &[Area], new: &[Area]) {
        let options = self.options;
        self.collection(
            old,
            new,
            Scope {
                matcher: options.matchers.areas.as_ref(),
                checks: &options.change_types.areas,
                attributes: &options.attributes.areas,
                tables: None,
            },
        );
    }

    pub(crate) fn notes(&mut self, old: &[Note], new: &[Note]) {
        let options = self.options;
        self.collection(
            old,
            new,
            Scope {
                matcher: options.matchers.notes.as_ref(),
                checks: &options.change_types.notes,
                attributes: &options.attributes.notes,
                tables: None,
            },
        );
    }
}
