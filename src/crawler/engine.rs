//! Traversal engine - depth-first link tracing
//!
//! The engine drives the page source and the link extractor:
//! - A fresh trace writes the root line and seeds the frontier with the root
//! - Each step pops the most recently discovered link, fetches its page,
//!   writes the new links one level deeper and pushes them back
//! - Pages at the depth limit are never fetched
//! - The stop signal is checked between steps; an interrupted trace leaves
//!   the unexpanded links on the frontier for a snapshot
//!
//! Depth is tracked per branch: the indentation of a line is always the
//! number of hops between the root and that link.

use crate::config::{snapshot_path, Config, HttpConfig, Overrides, TraceSettings};
use crate::crawler::fetcher::{FetchOutcome, HttpSource, PageSource};
use crate::crawler::parser::LinkExtractor;
use crate::output::{LinkWriter, TraceStatistics};
use crate::state::{FrontierEntry, Snapshot, StopSignal, TraversalContext};
use crate::{Result, SnapshotResult};
use std::io::Write;
use std::time::Instant;

/// How often progress is logged, in fetched pages
const PROGRESS_INTERVAL: u64 = 25;

/// How a traversal run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOutcome {
    /// The frontier was exhausted
    Completed(TraceStatistics),
    /// The stop signal was raised before the frontier was exhausted
    Interrupted(TraceStatistics),
}

impl TraceOutcome {
    pub fn statistics(&self) -> &TraceStatistics {
        match self {
            Self::Completed(stats) | Self::Interrupted(stats) => stats,
        }
    }

    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted(_))
    }
}

/// Depth-first link tracer
pub struct Tracer<S, W: Write> {
    source: S,
    writer: LinkWriter<W>,
    settings: TraceSettings,
    context: TraversalContext,
    stats: TraceStatistics,
}

impl<S: PageSource, W: Write> Tracer<S, W> {
    /// Starts a fresh trace: writes the root line and seeds the visited set
    pub fn start(source: S, writer: W, settings: TraceSettings) -> Result<Self> {
        let context = TraversalContext::new(&settings.root);
        let mut writer = LinkWriter::new(writer);
        writer.write_link(0, settings.root.page())?;

        tracing::info!(
            "Tracing {} within {} (max depth: {})",
            settings.root,
            settings.root.base(),
            depth_label(settings.max_depth)
        );

        Ok(Self {
            source,
            writer,
            settings,
            context,
            stats: TraceStatistics::default(),
        })
    }

    /// Continues a trace from a restored context; the root line is not written again
    pub fn resume(source: S, writer: W, settings: TraceSettings, context: TraversalContext) -> Self {
        tracing::info!(
            "Resuming trace of {} with {} pending links and {} visited URLs",
            settings.root,
            context.frontier().len(),
            context.visited().len()
        );

        Self {
            source,
            writer: LinkWriter::new(writer),
            settings,
            context,
            stats: TraceStatistics::default(),
        }
    }

    pub fn settings(&self) -> &TraceSettings {
        &self.settings
    }

    pub fn context(&self) -> &TraversalContext {
        &self.context
    }

    /// Captures the current progress for a later resume
    pub fn snapshot(&self) -> SnapshotResult<Snapshot> {
        Snapshot::capture(&self.settings, &self.context)
    }

    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    /// Runs until the frontier is exhausted or `stop` is raised
    ///
    /// Fetch and parse failures make the page a leaf; only output errors
    /// abort the run.
    pub async fn run(&mut self, stop: &StopSignal) -> Result<TraceOutcome> {
        let started = Instant::now();

        loop {
            if stop.is_stopped() {
                tracing::warn!(
                    "Trace interrupted with {} links pending",
                    self.context.frontier().len()
                );
                return Ok(TraceOutcome::Interrupted(self.finish(started)?));
            }

            let Some(entry) = self.context.pop() else {
                break;
            };

            if self.settings.max_depth > 0 && entry.depth >= self.settings.max_depth {
                tracing::trace!("Depth limit reached at {} (depth {})", entry.url, entry.depth);
                self.stats.depth_limited += 1;
                continue;
            }

            self.expand(entry).await?;
        }

        let stats = self.finish(started)?;
        tracing::info!(
            "Trace completed: {} links discovered, {} pages fetched in {:?}",
            stats.links_discovered,
            stats.pages_fetched,
            stats.elapsed
        );
        Ok(TraceOutcome::Completed(stats))
    }

    /// Fetches one page, writes its new links and schedules them
    async fn expand(&mut self, entry: FrontierEntry) -> Result<()> {
        let FrontierEntry { url, depth } = entry;
        tracing::debug!("Expanding {} (depth {})", url, depth);

        let body = match self.source.fetch(&url).await {
            FetchOutcome::Fetched {
                final_url,
                body,
                encoding,
                status_code,
            } => {
                tracing::debug!("Fetched {} ({}, {})", url, status_code, encoding);
                if final_url != url {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                self.stats.pages_fetched += 1;
                body
            }
            FetchOutcome::FetchFailed { reason } => {
                self.report_failure(&url, &reason);
                self.stats.fetch_failures += 1;
                return Ok(());
            }
            FetchOutcome::ParseFailed { reason } => {
                self.report_failure(&url, &reason);
                self.stats.parse_failures += 1;
                return Ok(());
            }
        };

        let extractor = LinkExtractor::new(&self.settings.root, self.settings.dynamic_urls)
            .verbose(self.settings.debug);
        let children = extractor.extract(&body, &url, self.context.visited_mut());

        let child_depth = depth + 1;
        for child in &children {
            self.writer.write_link(child_depth, child)?;
        }
        self.stats.links_discovered += children.len() as u64;
        self.context.push_children(&children, child_depth);

        if self.stats.pages_fetched % PROGRESS_INTERVAL == 0 && self.stats.pages_fetched > 0 {
            tracing::info!(
                "Progress: {} pages fetched, {} links discovered, {} pending",
                self.stats.pages_fetched,
                self.stats.links_discovered,
                self.context.frontier().len()
            );
        }

        Ok(())
    }

    fn report_failure(&self, url: &str, reason: &str) {
        if self.settings.debug {
            tracing::info!("No links from {}: {}", url, reason);
        } else {
            tracing::debug!("No links from {}: {}", url, reason);
        }
    }

    fn finish(&mut self, started: Instant) -> Result<TraceStatistics> {
        self.writer.flush()?;
        self.stats.visited_total = self.context.visited().len() as u64;
        self.stats.pending = self.context.frontier().len() as u64;
        self.stats.elapsed += started.elapsed();
        Ok(self.stats.clone())
    }
}

fn depth_label(max_depth: u32) -> String {
    if max_depth == 0 {
        "unbounded".to_string()
    } else {
        max_depth.to_string()
    }
}

/// Runs a complete trace over HTTP
///
/// This is the main entry point used by the binary. It will:
/// 1. Build the HTTP client
/// 2. Open the output target (appending when resuming)
/// 3. Start a fresh trace, or resume from `restored`
/// 4. Run until done or interrupted
/// 5. On interruption, write a snapshot to the configured snapshot path
///
/// # Arguments
///
/// * `settings` - Resolved traversal settings
/// * `http` - HTTP client configuration
/// * `restored` - Context rebuilt from a snapshot, or `None` for a fresh trace
/// * `stop` - Interruption flag
pub async fn run_trace(
    settings: TraceSettings,
    http: &HttpConfig,
    restored: Option<TraversalContext>,
    stop: &StopSignal,
) -> Result<TraceOutcome> {
    let source = HttpSource::from_config(http)?;
    let writer = settings.output.open(restored.is_some())?;
    tracing::debug!("Writing link hierarchy to {}", settings.output);

    let mut tracer = match restored {
        Some(context) => Tracer::resume(source, writer, settings, context),
        None => Tracer::start(source, writer, settings)?,
    };

    let outcome = tracer.run(stop).await?;

    if outcome.is_interrupted() {
        tracer.snapshot()?.save(&tracer.settings().snapshot_path)?;
    }

    Ok(outcome)
}

/// Starts a fresh trace of `root`
pub async fn start_trace(
    root: &str,
    config: &Config,
    overrides: &Overrides,
    stop: &StopSignal,
) -> Result<TraceOutcome> {
    let settings = TraceSettings::fresh(root, config, overrides)?;
    run_trace(settings, &config.http, None, stop).await
}

/// Resumes an interrupted trace from its snapshot
///
/// The snapshot is loaded and validated before anything is fetched or
/// written; any load failure is returned as is and never falls back to a
/// fresh trace. A `requested_root` must match the snapshot's root.
pub async fn resume_trace(
    config: &Config,
    overrides: &Overrides,
    requested_root: Option<&str>,
    stop: &StopSignal,
) -> Result<TraceOutcome> {
    let path = snapshot_path(config, overrides);
    tracing::info!("Resuming from snapshot: {}", path.display());

    let snapshot = Snapshot::load(&path)?;
    let settings = TraceSettings::resumed(&snapshot.state, requested_root, config, overrides)?;
    let context = TraversalContext::from_snapshot(&snapshot.state);

    run_trace(settings, &config.http, Some(context), stop).await
}
