//! Plan executor

use action_primitives::{press_enter, set_controlled_value, ElementWaiter, PageDom};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::types::{
    AutomationPlan, FieldReport, FieldStep, FlowTiming, Outcome, PlanReport, StepReport,
};

/// Executes an [`AutomationPlan`] one step and one sub-field at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct StepSequencer {
    timing: FlowTiming,
    waiter: ElementWaiter,
}

impl StepSequencer {
    pub fn new(timing: FlowTiming) -> Self {
        Self {
            timing,
            waiter: ElementWaiter::new(timing.wait),
        }
    }

    pub fn timing(&self) -> FlowTiming {
        self.timing
    }

    /// Run the plan to completion or to the first reveal failure.
    ///
    /// Never fails: the caller proceeds with whatever portion succeeded.
    pub async fn run<P>(&self, page: &P, plan: &AutomationPlan) -> PlanReport
    where
        P: PageDom + ?Sized,
    {
        let total = plan.len();
        info!(steps = total, "Starting field automation");

        let mut report = PlanReport::default();
        let mut steps = plan.steps().iter().enumerate();

        for (index, step) in steps.by_ref() {
            let step_report = self.run_step(page, index, total, step).await;
            if !report.push(step_report) {
                break;
            }
            sleep(self.timing.between_steps()).await;
        }

        if let Some(halted) = report.halted_at {
            let reason = format!("plan halted at step {}", halted + 1);
            for (index, step) in steps {
                report.push(StepReport::not_attempted(index, step, &reason));
            }
        }

        info!(
            completed = report.completed_steps(),
            skipped = report.skipped_steps(),
            aborted = report.aborted_steps(),
            fields_set = report.completed_fields(),
            "Field automation finished"
        );
        report
    }

    async fn run_step<P>(
        &self,
        page: &P,
        index: usize,
        total: usize,
        step: &FieldStep,
    ) -> StepReport
    where
        P: PageDom + ?Sized,
    {
        let number = index + 1;
        let label = step.display_name().to_string();
        debug!(
            step = number,
            total,
            selector = %step.reveal_selector,
            "Waiting for reveal control"
        );

        let revealed = match self.waiter.wait_for(page, &step.reveal_selector).await {
            Ok(control) => page.click(&control).await,
            Err(err) => Err(err),
        };
        if let Err(err) = revealed {
            error!(step = number, error = %err, "Reveal control unavailable; halting plan");
            let reason = err.to_string();
            let mut report = StepReport::not_attempted(index, step, "reveal control unavailable");
            report.outcome = Outcome::aborted(reason);
            return report;
        }
        debug!(step = number, "Clicked reveal control");
        sleep(self.timing.after_reveal()).await;

        let mut fields = Vec::with_capacity(step.input_selectors.len());
        let mut failure: Option<String> = None;

        for (selector, value) in step.fields() {
            if failure.is_some() {
                fields.push(FieldReport {
                    selector: selector.to_string(),
                    outcome: Outcome::skipped("earlier field in step failed"),
                });
                continue;
            }

            let outcome = self
                .fill_field(page, number, selector, value, step.confirm_with_enter)
                .await;
            if let Outcome::Aborted { reason } = &outcome {
                failure = Some(reason.clone());
            } else {
                sleep(self.timing.between_fields()).await;
            }
            fields.push(FieldReport {
                selector: selector.to_string(),
                outcome,
            });
        }

        let outcome = match failure {
            None => Outcome::Completed,
            Some(reason) => Outcome::skipped(reason),
        };
        StepReport {
            index,
            label,
            outcome,
            fields,
        }
    }

    async fn fill_field<P>(
        &self,
        page: &P,
        number: usize,
        selector: &str,
        value: &str,
        confirm_with_enter: bool,
    ) -> Outcome
    where
        P: PageDom + ?Sized,
    {
        debug!(step = number, selector, "Waiting for input");
        let input = match self.waiter.wait_for(page, selector).await {
            Ok(input) => input,
            Err(err) => {
                warn!(step = number, error = %err, "Input unavailable; skipping rest of step");
                return Outcome::aborted(err.to_string());
            }
        };

        if let Err(err) = set_controlled_value(page, &input, value).await {
            warn!(step = number, selector, error = %err, "Failed to set input value");
            return Outcome::aborted(err.to_string());
        }
        debug!(step = number, selector, "Set input value");

        if confirm_with_enter {
            if let Err(err) = press_enter(page, &input).await {
                warn!(step = number, selector, error = %err, "Failed to confirm with Enter");
                return Outcome::aborted(err.to_string());
            }
            debug!(step = number, selector, "Pressed Enter");
        }
        Outcome::Completed
    }
}
