//! Weak cross-table references: foreign-key relationships and view
//! dependencies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,
    pub source_table_id: String,
    pub target_table_id: String,
    pub source_field_id: String,
    pub target_field_id: String,
    pub source_cardinality: Cardinality,
    pub target_cardinality: Cardinality,
    pub created_at: i64,
}

impl Relationship {
    /// Endpoint tuple `(source table, target table, source field, target field)`.
    pub fn endpoints(&self) -> (&str, &str, &str, &str) {
        (
            &self.source_table_id,
            &self.target_table_id,
            &self.source_field_id,
            &self.target_field_id,
        )
    }
}

/// A view (`dependent_table_id`) relying on another table or view (`table_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_schema: Option<String>,
    pub table_id: String,
    pub dependent_table_id: String,
    pub created_at: i64,
}
