//! Domain-level result types returned by service mutations.
//! Reads return records from the `shared` crate directly; mutations that
//! remove data report what happened alongside a message for the UI.

use serde::Serialize;

/// Result of deleting a single record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteResult {
    pub success_message: String,
}

/// Result of clearing completed tasks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearCompletedResult {
    pub cleared_ids: Vec<u64>,
    pub success_message: String,
}

/// Summary of what sample data population created
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeedResult {
    pub profile_created: bool,
    pub task_ids: Vec<u64>,
    pub chore_ids: Vec<u64>,
    pub cooking_days: Vec<String>,
}

