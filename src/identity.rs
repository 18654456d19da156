//! Semantic identity keys.
//!
//! Two snapshots of the same schema may give the same table, field or
//! relationship different opaque ids. A key built from the entity's names
//! (schema, owning parent, own name, and for relationship-like entities the
//! opposite endpoint) is stable across snapshots and can be used for map
//! lookups instead of pairwise comparison.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Table,
    Field,
    Index,
    Relationship,
    Dependency,
    CustomType,
    Area,
}

impl EntityKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Field => "field",
            Self::Index => "index",
            Self::Relationship => "relationship",
            Self::Dependency => "dependency",
            Self::CustomType => "customType",
            Self::Area => "area",
        }
    }
}

/// One named endpoint: `schema.parent.name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPart<'a> {
    pub schema: Option<&'a str>,
    pub parent: Option<&'a str>,
    pub name: &'a str,
}

impl<'a> KeyPart<'a> {
    pub fn new(schema: Option<&'a str>, parent: Option<&'a str>, name: &'a str) -> Self {
        Self {
            schema,
            parent,
            name,
        }
    }
}

/// Everything needed to key an entity, independent of its opaque id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityDescriptor<'a> {
    Table {
        schema: Option<&'a str>,
        name: &'a str,
    },
    Field {
        schema: Option<&'a str>,
        table: &'a str,
        name: &'a str,
    },
    Index {
        schema: Option<&'a str>,
        table: &'a str,
        name: &'a str,
    },
    /// `source`/`target` carry the endpoint table as parent and the endpoint
    /// field as name.
    Relationship {
        source: KeyPart<'a>,
        target: KeyPart<'a>,
    },
    Dependency {
        table: KeyPart<'a>,
        dependent: KeyPart<'a>,
    },
    CustomType {
        schema: Option<&'a str>,
        name: &'a str,
    },
    Area {
        name: &'a str,
    },
}

impl<'a> EntityDescriptor<'a> {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Table { .. } => EntityKind::Table,
            Self::Field { .. } => EntityKind::Field,
            Self::Index { .. } => EntityKind::Index,
            Self::Relationship { .. } => EntityKind::Relationship,
            Self::Dependency { .. } => EntityKind::Dependency,
            Self::CustomType { .. } => EntityKind::CustomType,
            Self::Area { .. } => EntityKind::Area,
        }
    }

    fn parts(&self) -> (KeyPart<'a>, Option<KeyPart<'a>>) {
        match *self {
            Self::Table { schema, name } | Self::CustomType { schema, name } => {
                (KeyPart::new(schema, None, name), None)
            }
            Self::Field {
                schema,
                table,
                name,
            }
            | Self::Index {
                schema,
                table,
                name,
            } => (KeyPart::new(schema, Some(table), name), None),
            Self::Relationship { source, target } => (source, Some(target)),
            Self::Dependency { table, dependent } => (table, Some(dependent)),
            Self::Area { name } => (KeyPart::new(None, None, name), None),
        }
    }
}

/// Build the identity key for an entity.
///
/// Components are length-prefixed so names containing separators cannot
/// collide (`a.b` + `c` vs `a` + `b.c`). Empty schemas are treated as absent.
pub fn build_key(descriptor: &EntityDescriptor) -> String {
    let (own, other) = descriptor.parts();
    let mut key = String::from(descriptor.kind().tag());
    push_part(&mut key, &own);
    if let Some(other) = other {
        key.push_str("|>");
        push_part(&mut key, &other);
    }
    key
}

fn push_part(key: &mut String, part: &KeyPart) {
    push_component(key, part.schema.filter(|s| !s.is_empty()));
    push_component(key, part.parent);
    push_component(key, Some(part.name));
}

fn push_component(key: &mut String, value: Option<&str>) {
    key.push('|');
    match value {
        Some(v) => {
            let _ = write!(key, "{}:{}", v.len(), v);
        }
        None => key.push('-'),
    }
}
