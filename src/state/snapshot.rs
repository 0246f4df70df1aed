//! Snapshot of an interrupted traversal
//!
//! The snapshot is a tagged JSON document:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "created_at": "2026-10-18T12:00:00Z",
//!   "checksum": "<sha-256 of the serialized state>",
//!   "state": { "max_depth": 2, "current_depth": 1, "root_url": "...", ... }
//! }
//! ```
//!
//! Loading checks the version and the checksum before the state is trusted.

use crate::config::TraceSettings;
use crate::output::OutputTarget;
use crate::state::{FrontierEntry, TraversalContext};
use crate::{SnapshotError, SnapshotResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Version of the snapshot layout written by this build
pub const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Traversal progress captured on interruption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotState {
    pub max_depth: u32,
    pub current_depth: u32,
    pub root_url: String,
    pub output_target: OutputTarget,
    pub dynamic_urls: bool,
    pub debug: bool,
    /// Every URL discovered so far, sorted
    pub visited: Vec<String>,
    /// Discovered links not yet expanded, bottom of the stack first
    pub frontier: Vec<FrontierEntry>,
}

/// Durable envelope around a [`SnapshotState`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub checksum: String,
    pub state: SnapshotState,
}

impl Snapshot {
    /// Captures the current traversal progress
    pub fn capture(settings: &TraceSettings, context: &TraversalContext) -> SnapshotResult<Self> {
        let state = SnapshotState {
            max_depth: settings.max_depth,
            current_depth: context.current_depth(),
            root_url: settings.root.to_string(),
            output_target: settings.output.clone(),
            dynamic_urls: settings.dynamic_urls,
            debug: settings.debug,
            visited: context.visited().to_sorted_vec(),
            frontier: context.frontier().to_vec(),
        };

        let checksum = compute_checksum(&state)?;

        Ok(Self {
            format_version: SNAPSHOT_FORMAT_VERSION,
            created_at: Utc::now(),
            checksum,
            state,
        })
    }

    /// Writes the snapshot, replacing any previous one at `path`
    ///
    /// The document is written to a temporary sibling first and renamed into
    /// place, so a crash mid-write never leaves a truncated snapshot.
    pub fn save(&self, path: &Path) -> SnapshotResult<()> {
        let json = serde_json::to_vec_pretty(self)?;
        let tmp = temporary_path(path);

        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;

        tracing::info!(
            "Snapshot written to {} ({} visited, {} pending)",
            path.display(),
            self.state.visited.len(),
            self.state.frontier.len()
        );

        Ok(())
    }

    /// Reads and validates a snapshot
    ///
    /// # Returns
    ///
    /// * `Ok(Snapshot)` - The snapshot passed version and checksum checks
    /// * `Err(SnapshotError)` - The file is missing, unreadable, or does not match the schema
    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let content = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => SnapshotError::Missing(path.display().to_string()),
            _ => SnapshotError::Io(e),
        })?;

        // Check the version before binding to the current schema
        let raw: serde_json::Value = serde_json::from_slice(&content)?;
        let found = raw
            .get("format_version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0) as u32;
        if found != SNAPSHOT_FORMAT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found,
                expected: SNAPSHOT_FORMAT_VERSION,
            });
        }

        let snapshot: Snapshot = serde_json::from_value(raw)?;
        snapshot.verify()?;

        tracing::debug!(
            "Loaded snapshot taken at {} for {}",
            snapshot.created_at,
            snapshot.state.root_url
        );

        Ok(snapshot)
    }

    fn verify(&self) -> SnapshotResult<()> {
        let computed = compute_checksum(&self.state)?;
        if computed != self.checksum {
            return Err(SnapshotError::ChecksumMismatch {
                stored: self.checksum.clone(),
                computed,
            });
        }
        Ok(())
    }
}

/// Hex-encoded SHA-256 of the compact JSON form of the state
fn compute_checksum(state: &SnapshotState) -> SnapshotResult<String> {
    let bytes = serde_json::to_vec(state)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

fn temporary_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
