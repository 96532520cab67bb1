// datasmith-core/src/ports/connector.rs

// This file defines what the application needs, without knowing how it's done.
// The generation core never issues table DDL/DML through this port; it exists
// for the collaborator calls owned by the surrounding shell (connection
// metadata, the completion call's underlying query).

use crate::error::DatasmithError;
use async_trait::async_trait;
use std::collections::HashMap;

/// One result row, column name to value (engine-independent).
pub type Row = HashMap<String, serde_json::Value>;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute_query(&self, query: &str) -> Result<Vec<Row>, DatasmithError>;
}
