//! Per-run latency accounting.
//!
//! A [`BudgetLedger`] is created at the start of each run, wraps every stage
//! future, and records wall-clock elapsed time whether or not the stage
//! stayed inside its budget. Budgets are advisory unless deadline
//! enforcement is switched on, in which case collaborator stages are cut
//! off at their budget with [`CollaboratorError::DeadlineExceeded`].

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use intune_types::config::LatencyBudget;
use intune_types::{CollaboratorError, Stage, StageTiming};

/// Outcome of a finished run's accounting.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetReport {
    pub timings: StageTiming,
    pub overruns: Vec<Stage>,
    /// Sum of executed-stage timings.
    pub total_ms: u64,
    pub total_target_ms: u64,
    /// `total_ms < total_target_ms`.
    pub within_budget: bool,
}

/// Records stage timings against a [`LatencyBudget`].
#[derive(Debug)]
pub struct BudgetLedger<'a> {
    budgets: &'a LatencyBudget,
    enforce_deadlines: bool,
    timings: StageTiming,
    overruns: Vec<Stage>,
}

impl<'a> BudgetLedger<'a> {
    pub fn new(budgets: &'a LatencyBudget, enforce_deadlines: bool) -> Self {
        Self {
            budgets,
            enforce_deadlines,
            timings: StageTiming::new(),
            overruns: Vec::new(),
        }
    }

    /// Run a local stage and record its elapsed time.
    pub async fn measure<F, T>(&mut self, stage: Stage, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        let started = Instant::now();
        let out = fut.await;
        self.record(stage, started.elapsed());
        out
    }

    /// Run a collaborator stage. With deadline enforcement on, the stage is
    /// abandoned once it exceeds its budget.
    pub async fn measure_collaborator<F, T>(
        &mut self,
        stage: Stage,
        fut: F,
    ) -> Result<T, CollaboratorError>
    where
        F: Future<Output = Result<T, CollaboratorError>>,
    {
        let budget_ms = self.budgets.for_stage(stage);
        let started = Instant::now();
        let out = if self.enforce_deadlines {
            match tokio::time::timeout(Duration::from_millis(budget_ms), fut).await {
                Ok(out) => out,
                Err(_) => Err(CollaboratorError::DeadlineExceeded { budget_ms }),
            }
        } else {
            fut.await
        };
        self.record(stage, started.elapsed());
        out
    }

    fn record(&mut self, stage: Stage, elapsed: Duration) {
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let budget_ms = self.budgets.for_stage(stage);
        self.timings.record(stage, elapsed_ms);

        if elapsed_ms > budget_ms {
            warn!(stage = %stage, elapsed_ms, budget_ms, "stage over budget");
            if !self.overruns.contains(&stage) {
                self.overruns.push(stage);
            }
        } else {
            debug!(stage = %stage, elapsed_ms, budget_ms, "stage complete");
        }
    }

    pub fn timings(&self) -> &StageTiming {
        &self.timings
    }

    pub fn finish(self) -> BudgetReport {
        let total_ms = self.timings.total_ms();
        let total_target_ms = self.budgets.total_target_ms;
        BudgetReport {
            timings: self.timings,
            overruns: self.overruns,
            total_ms,
            total_target_ms,
            within_budget: total_ms < total_target_ms,
        }
    }
}
