//! Table metadata entities returned by the schema API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::record::CachedRecord;

/// Column definition within a table's metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ColumnMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,
    /// UI data type (e.g. `SingleLineText`, `LinkToAnotherRecord`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uidt: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub pk: bool,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub rqd: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Full table metadata record
///
/// Only the identity fields and the column list are typed. Everything else the
/// server sends is kept in `extra` and round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub table_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnMeta>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TableMeta {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn with_column(mut self, column: ColumnMeta) -> Self {
        self.columns.push(column);
        self
    }

    /// Primary key columns, in declaration order
    pub fn primary_keys(&self) -> impl Iterator<Item = &ColumnMeta> {
        self.columns.iter().filter(|c| c.pk)
    }
}

impl CachedRecord for TableMeta {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

/// Lightweight table row as returned by the project table list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_name: Option<String>,
}

impl TableSummary {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            table_name: None,
        }
    }
}

// Older servers send flags as 0/1 instead of booleans.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        _ => false,
    })
}
