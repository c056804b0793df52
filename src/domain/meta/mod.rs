//! Table metadata domain - records, aliases and collaborator traits

mod entity;
mod provider;
mod record;

pub use entity::{ColumnMeta, TableMeta, TableSummary};
pub use provider::{ErrorReporter, RecordFetcher, TitleDirectory};
pub use record::{CachedRecord, IdentifierFormat, DEFAULT_ID_PREFIX};

#[cfg(test)]
pub use provider::{MockErrorReporter, MockRecordFetcher, MockTitleDirectory};
