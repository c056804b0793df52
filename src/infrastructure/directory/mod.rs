//! Title to id directory implementations

mod in_memory;

pub use in_memory::InMemoryTitleDirectory;
