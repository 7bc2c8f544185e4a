//! Periodic jobs: low-frequency world updates with accumulating timers.
//!
//! A job fires once its accumulator reaches the period, then subtracts the
//! period rather than resetting to zero, so firing cadence never drifts
//! against the simulation clock. Accumulators start full so every job
//! fires on the first step of a fresh world.

use serde::{Deserialize, Serialize};

use depthwatch_core::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobKind {
    /// Rebuild each listening platform's passive-sonar candidate shortlist.
    SonarContactRefresh,
    /// Refresh cached lookout sighting reports.
    LookoutScan,
    /// Drop dead members from convoy rosters.
    ConvoyCompaction,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Job {
    pub kind: JobKind,
    pub period_secs: f64,
    pub accumulator_secs: f64,
}

impl Job {
    pub fn new(kind: JobKind, period_secs: f64) -> Self {
        Self {
            kind,
            period_secs,
            accumulator_secs: period_secs,
        }
    }

    /// Accumulate elapsed time; returns how many times the job fires.
    pub fn accumulate(&mut self, dt: f64) -> u32 {
        self.accumulator_secs += dt;
        let mut fires = 0;
        while self.accumulator_secs >= self.period_secs {
            self.accumulator_secs -= self.period_secs;
            fires += 1;
        }
        fires
    }
}

pub fn default_jobs() -> Vec<Job> {
    vec![
        Job::new(JobKind::SonarContactRefresh, JOB_SONAR_REFRESH_SECS),
        Job::new(JobKind::LookoutScan, JOB_LOOKOUT_SCAN_SECS),
        Job::new(JobKind::ConvoyCompaction, JOB_CONVOY_COMPACT_SECS),
    ]
}
