//! Job orchestrator
//!
//! Owns the lifecycle of one scrape run: parameter validation, resource
//! acquisition, the sequential page drive, guaranteed cleanup on every
//! exit path, normalization of the accumulated fragments, and conversion
//! of the whole run into a terminal status.

use std::time::Instant;

use url::Url;

use crate::config::EngineConfig;
use crate::model::{
    FetchStrategy, ProgressEvent, RunStatistics, RunStatus, ScrapeParams, ScrapeRunResult,
    SourceSite,
};
use crate::pipeline::{self, DedupeKey, PipelineOptions};
use crate::scrape::driver::{drive, DriveOptions};
use crate::scrape::{adapter_for, SiteAdapter};

/// Per-run policy knobs, defaulted from the engine settings
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Swallow per-page fetch errors and keep paginating. Off by default:
    /// interactive single-shot requests want the failure surfaced; long
    /// batch jobs turn this on.
    pub continue_on_error: bool,
    /// Sleep between result pages
    pub page_delay: std::time::Duration,
    /// Natural key for the dedup stage
    pub dedupe_key: DedupeKey,
}

impl RunOptions {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            continue_on_error: config.run.continue_on_error,
            page_delay: config.run.page_delay(),
            dedupe_key: DedupeKey::default(),
        }
    }
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// One entry of a batch run
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub site: SourceSite,
    pub strategy: FetchStrategy,
    pub params: ScrapeParams,
}

/// Drives scrape runs end to end
pub struct JobOrchestrator {
    config: EngineConfig,
}

impl JobOrchestrator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs one scrape for a (site, strategy) pair: builds the adapter,
    /// drives it, and returns the normalized result.
    ///
    /// Parameter and resource-initialization errors propagate as `Err`;
    /// everything that happens after the first page request is folded
    /// into the returned result's status and statistics.
    pub async fn run(
        &self,
        site: SourceSite,
        strategy: FetchStrategy,
        params: &ScrapeParams,
        options: &RunOptions,
        progress: Option<&mut (dyn FnMut(ProgressEvent) + Send)>,
    ) -> crate::Result<ScrapeRunResult> {
        let mut adapter = adapter_for(site, strategy, &self.config)?;
        Self::run_with_adapter(&mut adapter, params, options, progress).await
    }

    /// Runs a batch of jobs strictly sequentially with an inter-job
    /// delay, trading throughput for politeness and a single browser
    /// process at a time. A failed job does not stop the batch; each
    /// job's outcome is returned in order.
    pub async fn run_batch(
        &self,
        jobs: &[BatchJob],
        inter_job_delay: std::time::Duration,
        options: &RunOptions,
    ) -> Vec<crate::Result<ScrapeRunResult>> {
        let mut results = Vec::with_capacity(jobs.len());

        for (index, job) in jobs.iter().enumerate() {
            if index > 0 && !inter_job_delay.is_zero() {
                tokio::time::sleep(inter_job_delay).await;
            }

            tracing::info!(
                "Batch job {}/{}: {} on {}",
                index + 1,
                jobs.len(),
                job.strategy,
                job.site
            );
            results.push(
                self.run(job.site, job.strategy, &job.params, options, None)
                    .await,
            );
        }

        results
    }

    /// Runs one scrape over a caller-supplied adapter.
    ///
    /// The adapter's cleanup routine runs on every exit path after
    /// resource acquisition: normal completion, early stop, abort, and
    /// failed initialization.
    pub async fn run_with_adapter(
        adapter: &mut SiteAdapter,
        params: &ScrapeParams,
        options: &RunOptions,
        progress: Option<&mut (dyn FnMut(ProgressEvent) + Send)>,
    ) -> crate::Result<ScrapeRunResult> {
        // Caller-fixable errors abort before any network activity
        adapter.validate_params(params)?;
        adapter.reset_stats();

        tracing::info!(
            "Starting {} run on {}: keyword='{}' location='{}' pages={}",
            adapter.strategy(),
            adapter.site(),
            params.keyword,
            params.location,
            params.max_pages
        );
        let started = Instant::now();

        // Resource acquisition; a failed launch still releases whatever
        // was partially acquired
        if let Err(error) = adapter.open().await {
            adapter.close().await;
            return Err(error);
        }

        let outcome = drive(
            adapter,
            params,
            DriveOptions {
                page_delay: options.page_delay,
                continue_on_error: options.continue_on_error,
                progress,
            },
        )
        .await;

        // Cleanup before any result assembly
        adapter.close().await;

        let adapter_stats = adapter.stats().clone();
        let fragments_extracted = outcome.fragments.len();

        let base_url = Url::parse(adapter.site().base_url())?;
        let (listings, pipeline_stats) = pipeline::process(
            outcome.fragments,
            &PipelineOptions {
                base_url,
                dedupe_key: options.dedupe_key,
            },
        );

        let status = terminal_status(outcome.aborted.is_some(), adapter_stats.errors.len());

        let mut statistics = RunStatistics {
            requests_attempted: adapter_stats.requests_attempted,
            requests_succeeded: adapter_stats.requests_succeeded,
            requests_failed: adapter_stats.requests_failed,
            fragments_extracted,
            duplicates_removed: pipeline_stats.duplicates_removed,
            invalid_dropped: pipeline_stats.invalid_removed,
            duration_ms: 0,
            errors: adapter_stats.errors,
        };
        statistics.set_duration(started.elapsed());

        tracing::info!(
            "Run {} in {}ms: {} pages, {} fragments, {} listings ({} duplicates, {} invalid)",
            status,
            statistics.duration_ms,
            outcome.pages_attempted,
            fragments_extracted,
            listings.len(),
            statistics.duplicates_removed,
            statistics.invalid_dropped
        );

        Ok(ScrapeRunResult {
            listings,
            statistics,
            status,
        })
    }
}

/// Converts a finished drive into the run's terminal status: an abort is
/// `Failed`, swallowed errors downgrade to `Partial`, and a clean drive
/// (early-stopped or not) is `Completed`.
fn terminal_status(aborted: bool, recorded_errors: usize) -> RunStatus {
    if aborted {
        RunStatus::Failed
    } else if recorded_errors > 0 {
        RunStatus::Partial
    } else {
        RunStatus::Completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_status_mapping() {
        assert_eq!(terminal_status(false, 0), RunStatus::Completed);
        assert_eq!(terminal_status(false, 2), RunStatus::Partial);
        assert_eq!(terminal_status(true, 1), RunStatus::Failed);
    }
}
