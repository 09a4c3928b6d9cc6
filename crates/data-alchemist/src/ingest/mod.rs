//! Best-effort CSV ingestion: header mapping to the canonical field names
//! plus per-field coercion of delimited text into lists and numbers.
//!
//! The parsers are forgiving on values (an unparseable number degrades to a
//! default the validator can flag) but strict on transport problems: a
//! malformed CSV stream is an error, not a silent truncation.

mod mapping;
mod parser;

pub use mapping::map_columns;
pub use parser::{read_clients, read_tasks, read_workers};

use crate::engine::domain::EntityKind;

/// Errors raised while reading an entity file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {entity} csv: {source}", entity = .entity.label())]
    Csv {
        entity: EntityKind,
        #[source]
        source: csv::Error,
    },
    #[error("{entity} csv has no header row", entity = .entity.label())]
    MissingHeader { entity: EntityKind },
    #[error("unknown entity collection: {name}")]
    UnknownEntity { name: String },
}
