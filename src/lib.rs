pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{HttpBackend, LocalStorage, SqliteStore};
pub use crate::config::Workspace;
pub use crate::core::export::ImageExporter;
pub use crate::core::seed::{SeedOptions, Seeder};
pub use crate::core::worktree_port::{compute_worktree_port, resolve_port, PortResolver};
pub use crate::utils::error::{DevToolsError, Result};
