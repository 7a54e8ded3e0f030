//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The core domain
//! depends only on these traits, not on concrete implementations.

mod document_store;

pub use document_store::{
    encode, sort_documents, Collection, Direction, Document, DocumentStore, Fields, OrderBy,
    USERS_COLLECTION,
};
