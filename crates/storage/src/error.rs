// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("json decode error in column {column}: {source}")]
    Json { column: &'static str, source: serde_json::Error },
}

pub type StorageResult<T> = Result<T, StorageError>;
