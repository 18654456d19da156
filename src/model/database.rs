//! Database type tags and their conventions.

use serde::{Deserialize, Serialize};

/// Database type variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseType {
    /// No specific engine
    #[default]
    Generic,
    Postgresql,
    Mysql,
    Mariadb,
    SqlServer,
    Sqlite,
    Clickhouse,
    Cockroachdb,
    Oracle,
}

impl DatabaseType {
    /// Parse database type from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "generic" => Some(Self::Generic),
            "postgres" | "postgresql" => Some(Self::Postgresql),
            "mysql" => Some(Self::Mysql),
            "mariadb" => Some(Self::Mariadb),
            "sql_server" | "sqlserver" | "mssql" => Some(Self::SqlServer),
            "sqlite" => Some(Self::Sqlite),
            "clickhouse" => Some(Self::Clickhouse),
            "cockroachdb" | "cockroach" => Some(Self::Cockroachdb),
            "oracle" => Some(Self::Oracle),
            _ => None,
        }
    }

    /// Schema objects land in when none is given explicitly.
    pub fn default_schema(self) -> Option<&'static str> {
        match self {
            Self::Postgresql | Self::Cockroachdb => Some("public"),
            Self::SqlServer => Some("dbo"),
            _ => None,
        }
    }
}
