pub mod export;
pub mod seed;
pub mod worktree_port;

pub use crate::domain::model::{ExportResult, PortPair, SeededProject, WorktreeIdentity};
pub use crate::domain::ports::{BackendApi, FixtureStore, Storage};
pub use crate::utils::error::Result;
