//! Caller-side limits for CPU-bound searches.
//!
//! Exhaustive tour search and Bellman-Ford relaxation can run for a long time
//! on large inputs. A [`SearchBudget`] lets the caller impose a deadline or a
//! ceiling on explored states; the algorithms check the budget between
//! enumeration steps and abort with [`Error::SearchAborted`] once it is spent.

use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Resource limits applied to a single search invocation.
///
/// The default budget is unlimited.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchBudget {
    deadline: Option<Instant>,
    max_steps: Option<u64>,
}

impl SearchBudget {
    /// A budget with no deadline and no step ceiling.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Abort the search once the given wall-clock duration has elapsed.
    pub fn timeout(mut self, limit: Duration) -> Self {
        self.deadline = Some(Instant::now() + limit);
        self
    }

    /// Abort the search after the given number of enumeration steps.
    pub fn max_steps(mut self, limit: u64) -> Self {
        self.max_steps = Some(limit);
        self
    }

    /// Start metering a search against this budget.
    pub fn meter(&self) -> BudgetMeter {
        BudgetMeter {
            deadline: self.deadline,
            remaining: self.max_steps,
            since_clock_check: 0,
        }
    }
}

/// Mutable per-search state derived from a [`SearchBudget`].
#[derive(Debug)]
pub struct BudgetMeter {
    deadline: Option<Instant>,
    remaining: Option<u64>,
    since_clock_check: u32,
}

impl BudgetMeter {
    /// Only look at the clock every this many steps.
    const CLOCK_CHECK_INTERVAL: u32 = 1024;

    /// Account for one enumeration step, failing once the budget is spent.
    pub fn tick(&mut self) -> Result<()> {
        if let Some(remaining) = &mut self.remaining {
            if *remaining == 0 {
                return Err(Error::SearchAborted);
            }
            *remaining -= 1;
        }

        if let Some(deadline) = self.deadline {
            self.since_clock_check += 1;
            if self.since_clock_check >= Self::CLOCK_CHECK_INTERVAL {
                self.since_clock_check = 0;
                if Instant::now() >= deadline {
                    return Err(Error::SearchAborted);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_budget_never_aborts() {
        let mut meter = SearchBudget::unlimited().meter();
        for _ in 0..10_000 {
            meter.tick().unwrap();
        }
    }

    #[test]
    fn step_ceiling_aborts_the_search() {
        let mut meter = SearchBudget::unlimited().max_steps(3).meter();
        for _ in 0..3 {
            meter.tick().unwrap();
        }
        assert!(matches!(meter.tick(), Err(Error::SearchAborted)));
    }

    #[test]
    fn elapsed_deadline_aborts_after_clock_check() {
        let mut meter = SearchBudget::unlimited()
            .timeout(Duration::from_secs(0))
            .meter();
        let result = (0..=BudgetMeter::CLOCK_CHECK_INTERVAL).try_for_each(|_| meter.tick());
        assert!(matches!(result, Err(Error::SearchAborted)));
    }
}
