use std::time::Duration;

use tokio::time::Instant;

use action_flow::{AutomationPlan, FieldStep, FlowTiming, Outcome, StepSequencer};
use action_primitives::memory::{MemoryNode, MemoryPage};
use action_primitives::{DomEvent, WaitConfig};

fn timing() -> FlowTiming {
    FlowTiming {
        wait: WaitConfig {
            poll_interval_ms: 100,
            timeout_ms: 1_000,
        },
        after_reveal_pause_ms: 150,
        between_fields_pause_ms: 200,
        between_steps_pause_ms: 200,
    }
}

fn step(reveal: &str, inputs: &[&str], values: &[&str]) -> FieldStep {
    FieldStep::new(
        reveal,
        inputs.iter().map(|s| s.to_string()).collect(),
        values.iter().map(|s| s.to_string()).collect(),
        true,
    )
    .expect("valid step")
}

/// Wire a reveal control whose click mounts the given inputs.
fn wire(page: &MemoryPage, reveal: &str, inputs: &[&str]) {
    page.mount(reveal, MemoryNode::button());
    for input in inputs {
        page.reveal_on_click(reveal, input, MemoryNode::input(), Duration::from_millis(50));
    }
}

#[tokio::test(start_paused = true)]
async fn missing_reveal_control_halts_remaining_plan() {
    let page = MemoryPage::new();
    wire(&page, "#edit-name", &["#first", "#last"]);
    // step 2's reveal control never appears
    wire(&page, "#edit-phone", &["#phone"]);
    wire(&page, "#edit-address", &["#line1"]);

    let plan = AutomationPlan::new(vec![
        step("#edit-name", &["#first", "#last"], &["DVF", "ReWrap"]),
        step("#edit-email", &["#email"], &["dvf@trove.co"]),
        step("#edit-phone", &["#phone"], &["888-888-8888"]),
        step("#edit-address", &["#line1"], &["872 Washington Street"]),
    ])
    .unwrap();

    let report = StepSequencer::new(timing()).run(&page, &plan).await;

    assert_eq!(report.steps.len(), 4);
    assert_eq!(report.steps[0].outcome, Outcome::Completed);
    assert_eq!(report.steps[0].completed_fields(), 2);
    assert!(report.steps[1].outcome.is_aborted());
    assert!(report.steps[1]
        .fields
        .iter()
        .all(|field| field.outcome.is_skipped()));
    assert!(report.steps[2].outcome.is_skipped());
    assert!(report.steps[3].outcome.is_skipped());
    assert_eq!(report.halted_at, Some(1));

    assert_eq!(page.snapshot("#first").unwrap().value, "DVF");
    assert_eq!(page.snapshot("#last").unwrap().value, "ReWrap");
    assert_eq!(page.snapshot("#edit-phone").unwrap().clicks, 0);
    assert_eq!(page.snapshot("#edit-address").unwrap().clicks, 0);
    assert!(page.snapshot("#phone").is_none());
}

#[tokio::test(start_paused = true)]
async fn halting_step_is_not_followed_by_step_pause() {
    let page = MemoryPage::new();
    let plan = AutomationPlan::new(vec![
        step("#edit-email", &["#email"], &["dvf@trove.co"]),
        step("#edit-phone", &["#phone"], &["888-888-8888"]),
    ])
    .unwrap();

    let started = Instant::now();
    let report = StepSequencer::new(timing()).run(&page, &plan).await;

    assert_eq!(report.halted_at, Some(0));
    // only the reveal wait itself elapses
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1_000));
    assert!(elapsed < Duration::from_millis(1_200));
}

#[tokio::test(start_paused = true)]
async fn missing_sub_field_skips_rest_of_step_only() {
    let page = MemoryPage::new();
    // only the first name input ever mounts
    wire(&page, "#edit-name", &["#first"]);
    wire(&page, "#edit-email", &["#email"]);

    let plan = AutomationPlan::new(vec![
        step("#edit-name", &["#first", "#last"], &["DVF", "ReWrap"]),
        step("#edit-email", &["#email"], &["dvf@trove.co"]),
    ])
    .unwrap();

    let report = StepSequencer::new(timing()).run(&page, &plan).await;

    let first = &report.steps[0];
    assert!(first.outcome.is_skipped());
    assert_eq!(first.fields[0].outcome, Outcome::Completed);
    assert!(first.fields[1].outcome.is_aborted());

    assert_eq!(report.steps[1].outcome, Outcome::Completed);
    assert_eq!(report.halted_at, None);
    assert_eq!(page.snapshot("#first").unwrap().value, "DVF");
    assert_eq!(page.snapshot("#email").unwrap().value, "dvf@trove.co");
}

#[tokio::test(start_paused = true)]
async fn completed_plan_sets_values_and_confirms_each_field() {
    let page = MemoryPage::new();
    wire(&page, "#edit-email", &["#email"]);

    let plan = AutomationPlan::new(vec![step("#edit-email", &["#email"], &["dvf@trove.co"])])
        .unwrap();
    let report = StepSequencer::new(timing()).run(&page, &plan).await;

    assert!(report.is_complete());
    let node = page.snapshot("#email").unwrap();
    assert_eq!(node.value, "dvf@trove.co");
    assert_eq!(node.events, vec![DomEvent::input(), DomEvent::enter_key_down()]);
}

#[tokio::test(start_paused = true)]
async fn enter_is_not_sent_when_step_does_not_confirm() {
    let page = MemoryPage::new();
    wire(&page, "#edit-email", &["#email"]);

    let mut quiet = step("#edit-email", &["#email"], &["a@b.com"]);
    quiet.confirm_with_enter = false;
    let plan = AutomationPlan::new(vec![quiet]).unwrap();
    StepSequencer::new(timing()).run(&page, &plan).await;

    assert_eq!(page.snapshot("#email").unwrap().events, vec![DomEvent::input()]);
}

#[tokio::test(start_paused = true)]
async fn empty_plan_is_complete() {
    let page = MemoryPage::new();
    let report = StepSequencer::default()
        .run(&page, &AutomationPlan::default())
        .await;
    assert!(report.is_complete());
    assert_eq!(report.total_fields(), 0);
}
