// Adapters layer: concrete implementations for external systems (http, storage, database).

pub mod http;
pub mod sqlite;
pub mod storage;

pub use http::HttpBackend;
pub use sqlite::SqliteStore;
pub use storage::LocalStorage;
