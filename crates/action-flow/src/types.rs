//! Core types for step sequencing

use action_primitives::WaitConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::FlowError;

/// One logical field group: click a reveal control, then fill its inputs in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStep {
    /// Optional human label used in logs and reports
    #[serde(default)]
    pub label: Option<String>,

    /// Control that mounts the inputs when clicked
    pub reveal_selector: String,

    /// Inputs to fill, in order
    pub input_selectors: Vec<String>,

    /// Values for `input_selectors`, same length
    pub values: Vec<String>,

    /// Dispatch a synthetic Enter after each value
    #[serde(default)]
    pub confirm_with_enter: bool,
}

impl FieldStep {
    pub fn new(
        reveal_selector: impl Into<String>,
        input_selectors: Vec<String>,
        values: Vec<String>,
        confirm_with_enter: bool,
    ) -> Result<Self, FlowError> {
        let step = Self {
            label: None,
            reveal_selector: reveal_selector.into(),
            input_selectors,
            values,
            confirm_with_enter,
        };
        step.validate()?;
        Ok(step)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn validate(&self) -> Result<(), FlowError> {
        if self.input_selectors.len() != self.values.len() {
            return Err(FlowError::InvalidStructure(format!(
                "step '{}' has {} inputs but {} values",
                self.display_name(),
                self.input_selectors.len(),
                self.values.len()
            )));
        }
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.reveal_selector)
    }

    pub(crate) fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.input_selectors
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Ordered, validated sequence of [`FieldStep`]s
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldStep>", into = "Vec<FieldStep>")]
pub struct AutomationPlan {
    steps: Vec<FieldStep>,
}

impl AutomationPlan {
    pub fn new(steps: Vec<FieldStep>) -> Result<Self, FlowError> {
        for step in &steps {
            step.validate()?;
        }
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[FieldStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl TryFrom<Vec<FieldStep>> for AutomationPlan {
    type Error = FlowError;

    fn try_from(steps: Vec<FieldStep>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<AutomationPlan> for Vec<FieldStep> {
    fn from(plan: AutomationPlan) -> Self {
        plan.steps
    }
}

/// Pacing for the sequencer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowTiming {
    /// Poll/timeout budget for every reveal control and input
    pub wait: WaitConfig,

    /// Pause after clicking a reveal control, before polling its inputs
    pub after_reveal_pause_ms: u64,

    /// Pause after each committed sub-field
    pub between_fields_pause_ms: u64,

    /// Pause after each step
    pub between_steps_pause_ms: u64,
}

impl Default for FlowTiming {
    fn default() -> Self {
        Self {
            wait: WaitConfig::default(),
            after_reveal_pause_ms: 150,
            between_fields_pause_ms: 200,
            between_steps_pause_ms: 200,
        }
    }
}

impl FlowTiming {
    pub(crate) fn after_reveal(&self) -> Duration {
        Duration::from_millis(self.after_reveal_pause_ms)
    }

    pub(crate) fn between_fields(&self) -> Duration {
        Duration::from_millis(self.between_fields_pause_ms)
    }

    pub(crate) fn between_steps(&self) -> Duration {
        Duration::from_millis(self.between_steps_pause_ms)
    }
}

/// Tagged result of a step or sub-field.
///
/// At step level `Aborted` halts the plan; `Completed` and `Skipped` let it continue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Completed,
    Skipped { reason: String },
    Aborted { reason: String },
}

impl Outcome {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Outcome::Skipped {
            reason: reason.into(),
        }
    }

    pub fn aborted(reason: impl Into<String>) -> Self {
        Outcome::Aborted {
            reason: reason.into(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReport {
    pub selector: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub label: String,
    pub outcome: Outcome,
    pub fields: Vec<FieldReport>,
}

impl StepReport {
    pub(crate) fn not_attempted(index: usize, step: &FieldStep, reason: &str) -> Self {
        Self {
            index,
            label: step.display_name().to_string(),
            outcome: Outcome::skipped(reason),
            fields: step
                .input_selectors
                .iter()
                .map(|selector| FieldReport {
                    selector: selector.clone(),
                    outcome: Outcome::skipped(reason),
                })
                .collect(),
        }
    }

    /// Whether the plan should proceed past this step
    pub fn allows_continuation(&self) -> bool {
        !self.outcome.is_aborted()
    }

    pub fn completed_fields(&self) -> usize {
        self.fields
            .iter()
            .filter(|field| field.outcome.is_completed())
            .count()
    }
}

/// Aggregated result of one plan execution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    pub steps: Vec<StepReport>,
    /// Index of the step that halted the plan, if any
    pub halted_at: Option<usize>,
}

impl PlanReport {
    /// Record a step and decide whether the plan continues.
    pub(crate) fn push(&mut self, step: StepReport) -> bool {
        let proceed = step.allows_continuation();
        if !proceed && self.halted_at.is_none() {
            self.halted_at = Some(step.index);
        }
        self.steps.push(step);
        proceed
    }

    pub fn is_complete(&self) -> bool {
        self.halted_at.is_none() && self.steps.iter().all(|step| step.outcome.is_completed())
    }

    pub fn completed_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.outcome.is_completed())
            .count()
    }

    pub fn skipped_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.outcome.is_skipped())
            .count()
    }

    pub fn aborted_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.outcome.is_aborted())
            .count()
    }

    pub fn completed_fields(&self) -> usize {
        self.steps.iter().map(StepReport::completed_fields).sum()
    }

    pub fn total_fields(&self) -> usize {
        self.steps.iter().map(|step| step.fields.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_mismatched_values_rejected() {
        let err = FieldStep::new("#edit", strings(&["#a", "#b"]), strings(&["1"]), true)
            .unwrap_err();
        assert!(matches!(err, FlowError::InvalidStructure(_)));
    }

    #[test]
    fn test_plan_deserialization_validates_steps() {
        let yaml = r##"
- reveal_selector: "#edit-name"
  input_selectors: ["#first", "#last"]
  values: ["DVF"]
  confirm_with_enter: true
"##;
        let parsed: Result<AutomationPlan, _> = serde_yaml::from_str(yaml);
        assert!(parsed.is_err());

        let yaml = r##"
- label: name
  reveal_selector: "#edit-name"
  input_selectors: ["#first", "#last"]
  values: ["DVF", "ReWrap"]
"##;
        let plan: AutomationPlan = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.steps()[0].display_name(), "name");
        assert!(!plan.steps()[0].confirm_with_enter);
    }

    #[test]
    fn test_outcome_serializes_tagged() {
        let value = serde_json::to_value(Outcome::skipped("missing")).unwrap();
        assert_eq!(value["status"], "skipped");
        assert_eq!(value["reason"], "missing");
    }

    #[test]
    fn test_report_halts_on_first_abort() {
        let step = FieldStep::new("#edit", strings(&["#a"]), strings(&["1"]), false).unwrap();
        let mut report = PlanReport::default();
        assert!(report.push(StepReport {
            index: 0,
            label: "a".into(),
            outcome: Outcome::Completed,
            fields: vec![],
        }));
        let mut aborted = StepReport::not_attempted(1, &step, "gone");
        aborted.outcome = Outcome::aborted("gone");
        assert!(!report.push(aborted));
        assert_eq!(report.halted_at, Some(1));
        assert!(!report.is_complete());
        assert_eq!(report.aborted_steps(), 1);
    }
}
