//! Deterministic per-worktree ports.
//!
//! Every process that needs to find the dev backend or frontend (vite dev
//! server, seed CLI, this crate) derives the port the same way:
//! `base + (u32(md5(worktree)[..8 hex]) % 500)`. Changing the hash, the
//! truncation or the modulus breaks agreement between those processes.

use crate::domain::model::{PortAssignment, PortPair, PortSource, WorktreeIdentity};
use crate::utils::error::{DevToolsError, Result};
use md5::{Digest, Md5};
use std::path::{Path, PathBuf};

pub const PORT_OFFSET_RANGE: u32 = 500;
pub const DEFAULT_BACKEND_BASE_PORT: u16 = 5000;
pub const DEFAULT_FRONTEND_BASE_PORT: u16 = 3000;
/// Highest base port for which `base + 499` is still a valid TCP port.
pub const MAX_BASE_PORT: u16 = u16::MAX - (PORT_OFFSET_RANGE as u16 - 1);

pub fn md5_hex(name: &str) -> String {
    format!("{:x}", Md5::digest(name.as_bytes()))
}

/// Offset in `[0, 499]` for a worktree name.
pub fn worktree_offset(name: &str) -> u16 {
    let digest = Md5::digest(name.as_bytes());
    // 前 8 個 hex 字元 == 前 4 個 byte (big-endian)
    let prefix = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    (prefix % PORT_OFFSET_RANGE) as u16
}

pub fn compute_worktree_port(name: &str, base_port: u16) -> Result<u16> {
    let offset = worktree_offset(name);
    base_port
        .checked_add(offset)
        .ok_or(DevToolsError::PortOutOfRange { base_port, offset })
}

/// An explicit override always wins; the hash is only the fallback.
pub fn resolve_port(
    override_port: Option<u16>,
    worktree: &WorktreeIdentity,
    base_port: u16,
) -> Result<PortAssignment> {
    if let Some(port) = override_port {
        return Ok(PortAssignment {
            port,
            source: PortSource::Override,
        });
    }

    let port = compute_worktree_port(worktree.as_str(), base_port)?;
    Ok(PortAssignment {
        port,
        source: PortSource::Derived,
    })
}

/// Parses a `BACKEND_PORT` / `FRONTEND_PORT` style value. Empty, non-numeric
/// and `0` values count as "not configured".
pub fn parse_port_override(key: &str, raw: Option<&str>) -> Option<u16> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match raw.parse::<u16>() {
        Ok(0) => None,
        Ok(port) => Some(port),
        Err(_) => {
            tracing::warn!("⚠️ Ignoring {}={:?}: not a valid port", key, raw);
            None
        }
    }
}

/// Project root for a working directory: the parent when run from `frontend/`.
pub fn detect_project_root(cwd: &Path) -> PathBuf {
    match cwd.file_name() {
        Some(name) if name == "frontend" => cwd
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf()),
        _ => cwd.to_path_buf(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortOverrides {
    pub backend: Option<u16>,
    pub frontend: Option<u16>,
}

#[derive(Debug, Clone)]
pub struct PortResolver {
    worktree: WorktreeIdentity,
    backend_base: u16,
    frontend_base: u16,
}

impl PortResolver {
    pub fn new(worktree: WorktreeIdentity) -> Self {
        Self {
            worktree,
            backend_base: DEFAULT_BACKEND_BASE_PORT,
            frontend_base: DEFAULT_FRONTEND_BASE_PORT,
        }
    }

    pub fn with_bases(mut self, backend_base: u16, frontend_base: u16) -> Self {
        self.backend_base = backend_base;
        self.frontend_base = frontend_base;
        self
    }

    pub fn worktree(&self) -> &WorktreeIdentity {
        &self.worktree
    }

    pub fn offset(&self) -> u16 {
        worktree_offset(self.worktree.as_str())
    }

    pub fn resolve(&self, overrides: PortOverrides) -> Result<PortPair> {
        let backend = resolve_port(overrides.backend, &self.worktree, self.backend_base)?;
        let frontend = resolve_port(overrides.frontend, &self.worktree, self.frontend_base)?;

        tracing::debug!(
            "Resolved ports for worktree '{}' (offset {}): backend {} ({}), frontend {} ({})",
            self.worktree,
            self.offset(),
            backend.port,
            backend.source,
            frontend.port,
            frontend.source
        );

        Ok(PortPair { backend, frontend })
    }
}
