use crate::config::types::{Config, Overrides, TraceSettings};
use crate::output::OutputTarget;
use crate::state::SnapshotState;
use crate::url::RootUrl;
use crate::{Result, SnapshotError};
use std::path::PathBuf;

impl TraceSettings {
    /// Resolves settings for a fresh traversal of `root`
    ///
    /// Precedence: command-line flags, then the config file, then defaults.
    pub fn fresh(root: &str, config: &Config, overrides: &Overrides) -> Result<Self> {
        let root = RootUrl::parse(root)?;

        let output = match (&overrides.output, &config.trace.output) {
            (Some(path), _) => OutputTarget::File(path.clone()),
            (None, Some(path)) => OutputTarget::File(PathBuf::from(path)),
            (None, None) => OutputTarget::Stdout,
        };

        Ok(Self {
            root,
            max_depth: overrides.max_depth.unwrap_or(config.trace.max_depth),
            output,
            snapshot_path: snapshot_path(config, overrides),
            dynamic_urls: overrides.dynamic_urls || config.trace.dynamic_urls,
            debug: overrides.debug || config.trace.debug,
        })
    }

    /// Resolves settings for resuming from a restored snapshot
    ///
    /// Command-line flags override restored values; the config file only
    /// supplies what the snapshot does not carry. A root given on the command
    /// line must match the snapshot's root.
    pub fn resumed(
        state: &SnapshotState,
        requested_root: Option<&str>,
        config: &Config,
        overrides: &Overrides,
    ) -> Result<Self> {
        let root = RootUrl::parse(&state.root_url)?;

        if let Some(requested) = requested_root {
            let requested = RootUrl::parse(requested)?;
            if requested != root {
                return Err(SnapshotError::RootMismatch {
                    snapshot: root.to_string(),
                    requested: requested.to_string(),
                }
                .into());
            }
        }

        let output = match &overrides.output {
            Some(path) => OutputTarget::File(path.clone()),
            None => state.output_target.clone(),
        };

        Ok(Self {
            root,
            max_depth: overrides.max_depth.unwrap_or(state.max_depth),
            output,
            snapshot_path: snapshot_path(config, overrides),
            dynamic_urls: overrides.dynamic_urls || state.dynamic_urls,
            debug: overrides.debug || state.debug,
        })
    }
}

/// Returns the snapshot file location: the `-f` flag, else the config value
pub fn snapshot_path(config: &Config, overrides: &Overrides) -> PathBuf {
    overrides
        .snapshot
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.trace.snapshot))
}
