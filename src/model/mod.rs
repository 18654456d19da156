//! Diagram entity model.
//!
//! `Diagram` is the aggregate root; every other entity is reachable only
//! through it. Engines treat diagrams as immutable inputs and build new
//! collections for their output.

mod canvas;
mod custom_type;
mod database;
mod relationship;
mod table;
mod validate;

pub use canvas::{Area, Note};
pub use custom_type::{CustomType, CustomTypeField, CustomTypeKind};
pub use database::DatabaseType;
pub use relationship::{Cardinality, Dependency, Relationship};
pub use table::{DataType, Field, Index, Table};
pub use validate::ValidationError;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagram {
    pub id: String,
    pub name: String,
    pub database_type: DatabaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_edition: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub custom_types: Vec<CustomType>,
    #[serde(default)]
    pub notes: Vec<Note>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Diagram {
    pub fn table(&self, id: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.id == id)
    }
}
