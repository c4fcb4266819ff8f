//! Bounded-concurrency batch execution.
//!
//! A fixed pool of worker threads pulls addresses from a bounded channel
//! and runs each through the pipeline; results are collected in completion
//! order. Worker count, channel depth, and optional chunking keep memory
//! proportional to the configured limits rather than to the input size.

use std::sync::Mutex;
use std::sync::mpsc;
use std::thread;

use tracing::{debug, info};

use crate::blacklist::Blacklist;
use crate::config::EngineConfig;
use crate::control::{CancelToken, Progress};
use crate::dns::{self, DnsError, LookupMx};
use crate::pipeline::{self, ValidationResult, VerdictStatus};
use crate::smtp::{ProbeMailbox, SmtpProber};

/// One batch submission: raw input lines plus the deny-set to apply.
///
/// Blank lines are skipped at run time, so `addresses` can be a file
/// loaded as-is.
#[derive(Debug)]
pub struct BatchJob<'b> {
    pub addresses: Vec<String>,
    pub blacklist: &'b Blacklist,
}

impl<'b> BatchJob<'b> {
    pub fn new(addresses: Vec<String>, blacklist: &'b Blacklist) -> Self {
        Self {
            addresses,
            blacklist,
        }
    }

    /// One address per line.
    pub fn from_lines(text: &str, blacklist: &'b Blacklist) -> Self {
        Self::new(text.lines().map(str::to_string).collect(), blacklist)
    }
}

/// Per-status totals over a result set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerdictCounts {
    pub valid: usize,
    pub invalid: usize,
    pub greylisted: usize,
    pub blacklisted: usize,
}

impl VerdictCounts {
    pub fn tally(results: &[ValidationResult]) -> Self {
        let mut counts = Self::default();
        for result in results {
            match result.status {
                VerdictStatus::Valid => counts.valid += 1,
                VerdictStatus::Invalid => counts.invalid += 1,
                VerdictStatus::Greylisted => counts.greylisted += 1,
                VerdictStatus::Blacklisted => counts.blacklisted += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.valid + self.invalid + self.greylisted + self.blacklisted
    }
}

/// Fans the pipeline out over a job with a fixed worker pool.
#[derive(Debug)]
pub struct BatchRunner {
    config: EngineConfig,
}

impl BatchRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Runs the whole job with fresh progress and no cancellation.
    pub fn run(&self, job: &BatchJob<'_>) -> Result<Vec<ValidationResult>, DnsError> {
        self.run_with(job, &Progress::new(), &CancelToken::new())
    }

    /// Runs the job, reporting through `progress` and stopping early when
    /// `cancel` fires. Results already produced are returned either way.
    ///
    /// The only fatal error is failing to build a resolver; per-address
    /// problems are verdicts, not errors.
    pub fn run_with(
        &self,
        job: &BatchJob<'_>,
        progress: &Progress,
        cancel: &CancelToken,
    ) -> Result<Vec<ValidationResult>, DnsError> {
        self.execute(job, progress, cancel, |config| {
            let resolver = dns::system_resolver(config.dns_timeout)?;
            Ok((resolver, SmtpProber::from_config(config)))
        })
    }

    /// Pool core, generic over how per-worker components are built. The
    /// factory runs on the calling thread so setup failures surface before
    /// any worker starts.
    pub(crate) fn execute<R, P, F>(
        &self,
        job: &BatchJob<'_>,
        progress: &Progress,
        cancel: &CancelToken,
        make_components: F,
    ) -> Result<Vec<ValidationResult>, DnsError>
    where
        R: LookupMx + Send,
        P: ProbeMailbox + Send,
        F: Fn(&EngineConfig) -> Result<(R, P), DnsError>,
    {
        let tasks: Vec<&str> = job
            .addresses
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();
        progress.set_total(tasks.len());
        if tasks.is_empty() {
            return Ok(Vec::new());
        }

        let chunk_len = match self.config.chunk_size {
            Some(n) if n > 0 => n,
            _ => tasks.len(),
        };
        info!(
            total = tasks.len(),
            workers = self.config.max_concurrency.max(1),
            "starting batch"
        );

        let mut results = Vec::with_capacity(tasks.len());
        for slice in tasks.chunks(chunk_len) {
            if cancel.is_cancelled() {
                debug!(done = results.len(), "batch cancelled between chunks");
                break;
            }
            let chunk_results =
                self.run_chunk(slice, job.blacklist, progress, cancel, &make_components)?;
            results.extend(chunk_results);
        }

        info!(completed = results.len(), "batch finished");
        Ok(results)
    }

    fn run_chunk<R, P, F>(
        &self,
        slice: &[&str],
        blacklist: &Blacklist,
        progress: &Progress,
        cancel: &CancelToken,
        make_components: &F,
    ) -> Result<Vec<ValidationResult>, DnsError>
    where
        R: LookupMx + Send,
        P: ProbeMailbox + Send,
        F: Fn(&EngineConfig) -> Result<(R, P), DnsError>,
    {
        let workers = self.config.max_concurrency.max(1).min(slice.len());
        let mut components = Vec::with_capacity(workers);
        for _ in 0..workers {
            components.push(make_components(&self.config)?);
        }

        // Tasks are bounded so a huge chunk cannot pile up in memory;
        // results flow through an unbounded channel so workers never stall
        // while the feeder is blocked.
        let (task_tx, task_rx) = mpsc::sync_channel::<&str>(workers * 4);
        let task_rx = Mutex::new(task_rx);
        let (result_tx, result_rx) = mpsc::channel::<ValidationResult>();
        let config = &self.config;
        let mut results = Vec::with_capacity(slice.len());

        thread::scope(|scope| {
            for (resolver, prober) in components {
                let result_tx = result_tx.clone();
                let task_rx = &task_rx;
                scope.spawn(move || {
                    loop {
                        let task = {
                            let Ok(guard) = task_rx.lock() else { break };
                            match guard.recv() {
                                Ok(task) => task,
                                Err(_) => break,
                            }
                        };
                        if cancel.is_cancelled() {
                            continue;
                        }
                        let result = pipeline::validate_with_components(
                            task, blacklist, config, &resolver, &prober, cancel,
                        );
                        progress.record_done();
                        if result_tx.send(result).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);

            for &task in slice {
                if cancel.is_cancelled() {
                    break;
                }
                if task_tx.send(task).is_err() {
                    break;
                }
            }
            drop(task_tx);

            for result in result_rx {
                results.push(result);
            }
        });

        Ok(results)
    }
}
