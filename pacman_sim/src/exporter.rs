//! JSON exporter for batch results.
//!
//! Writes the configuration, the aggregated summary and every per-trial
//! record so a batch can be compared offline.

use crate::batch::{AbortedTrial, BatchResults};
use crate::config::TrialConfig;
use pacman_core::{PerformanceSummary, TrialRecord};
use serde::Serialize;
use std::fs::File;
use std::io::Write;

/// Complete batch export.
#[derive(Debug, Clone, Serialize)]
pub struct BatchExport {
    /// Agent name
    pub agent: String,

    /// Options every trial ran with
    pub config: TrialConfig,

    /// Aggregate over completed trials
    pub summary: PerformanceSummary,

    /// Completed trials, ordered by seed
    pub records: Vec<TrialRecord>,

    /// Excluded trials with the reason each was aborted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aborted: Vec<AbortedTrial>,
}

impl BatchExport {
    /// Creates an empty export container.
    pub fn new(agent: &str, config: &TrialConfig) -> Self {
        Self {
            agent: agent.to_string(),
            config: config.clone(),
            summary: PerformanceSummary::from_records(&[], 0),
            records: Vec::new(),
            aborted: Vec::new(),
        }
    }

    /// Adds a completed trial.
    pub fn add_record(&mut self, record: TrialRecord) {
        self.records.push(record);
    }

    /// Adds an excluded trial.
    pub fn add_aborted(&mut self, aborted: AbortedTrial) {
        self.aborted.push(aborted);
    }

    /// Recomputes the summary from the collected records.
    pub fn finalize(&mut self) {
        pacman_core::sort_records(&mut self.records);
        self.aborted.sort_by_key(|a| a.seed);
        self.summary = PerformanceSummary::from_records(&self.records, self.aborted.len());
    }

    /// Builds a finalized export from batch results.
    pub fn from_results(agent: &str, config: &TrialConfig, results: BatchResults) -> Self {
        let mut export = Self::new(agent, config);
        results.records.into_iter().for_each(|r| export.add_record(r));
        results.aborted.into_iter().for_each(|a| export.add_aborted(a));
        export.finalize();
        export
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
