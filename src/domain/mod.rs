//! Domain layer - records, aliases and collaborator contracts

pub mod error;
pub mod meta;

pub use error::DomainError;
pub use meta::{
    CachedRecord, ColumnMeta, ErrorReporter, IdentifierFormat, RecordFetcher, TableMeta,
    TableSummary, TitleDirectory,
};
