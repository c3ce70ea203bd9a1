//! Static reference tables for portfolio classification.
//!
//! Team, manager-group, DevOps, backlog-bucket, display-order and release
//! tables ship as JSON under `reference/` and are compiled in. A directory
//! configured as `referenceDir` may override any of them file by file.
//! Tables are parsed and validated once at start-up and shared immutably.

pub mod embedded;
pub mod loader;
pub mod schema;

pub use loader::load_tables;
pub use schema::ReferenceTables;

/// Errors raised while loading reference tables.
#[derive(Debug, thiserror::Error)]
pub enum ReferenceError {
    #[error("Unknown reference table: {0}")]
    UnknownTable(String),
    #[error("Failed to read {file}: {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid reference table {file}: {message}")]
    Invalid { file: String, message: String },
}

impl ReferenceError {
    pub(crate) fn invalid(file: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            file: file.to_string(),
            message: message.into(),
        }
    }
}
