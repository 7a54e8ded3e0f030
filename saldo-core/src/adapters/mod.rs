//! Adapter implementations
//!
//! Adapters implement the document store port with concrete technologies:
//! - DuckDB file (or in-memory) database for real use
//! - In-process maps for tests

pub mod duckdb;
pub mod memory;

pub use self::duckdb::DuckDbDocumentStore;
pub use self::memory::MemoryDocumentStore;
