pub mod manager;
pub mod memory;
pub mod models;
pub mod pg_store;
pub mod repository;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryStore;
pub use pg_store::PgDocumentStore;
pub use repository::Repository;
pub use store::{Collection, Document, DocumentId, DocumentStore, UpdateOutcome};
