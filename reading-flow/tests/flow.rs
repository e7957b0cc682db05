mod common;

use common::{at_results, controller, generated_portrait, FakeGateway};
use fortune_core::{FailureKind, Outcome, PortraitSource, ReadingStep, Severity};
use reading_flow::Capabilities;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test]
async fn test_start_reading_only_from_landing() {
    let mut flow = controller(FakeGateway::healthy(), Capabilities::none());

    assert_eq!(flow.start_reading(), Outcome::Completed);
    assert_eq!(flow.step(), ReadingStep::Connecting);

    assert_eq!(flow.start_reading(), Outcome::Skipped);
    assert_eq!(flow.step(), ReadingStep::Connecting);

    let diagnostics = flow.reporter().diagnostics_for("start_reading");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_connect_requires_connecting_step() {
    let gateway = FakeGateway::healthy();
    let mut flow = controller(gateway, Capabilities::none());

    assert_eq!(flow.connect_threads().await, Outcome::Skipped);
    assert_eq!(flow.step(), ReadingStep::Landing);
    assert_eq!(flow.reporter().diagnostics_for("connect_threads").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_generated_portrait_taken_verbatim() {
    let mut flow = controller(FakeGateway::healthy(), Capabilities::none());
    flow.start_reading();

    assert_eq!(flow.connect_threads().await, Outcome::Completed);

    let state = flow.snapshot();
    let expected = generated_portrait();
    assert_eq!(state.step, ReadingStep::Results);
    assert_eq!(state.reading_step, 4);
    assert_eq!(state.source, Some(PortraitSource::Generated));
    assert_eq!(state.portrait, Some(expected.portrait));
    assert_eq!(state.shareable_content, Some(expected.shareable_content));
    assert!(!state.is_loading());
    assert!(flow.reporter().diagnostics().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_failed_sync_still_reaches_results_on_schedule() {
    let mut flow = controller(FakeGateway::failing_sync(500), Capabilities::none());
    flow.start_reading();

    let start = Instant::now();
    assert_eq!(flow.connect_threads().await, Outcome::Degraded);
    assert_eq!(start.elapsed(), Duration::from_millis(4 * 800 + 1000));

    let state = flow.snapshot();
    assert_eq!(state.step, ReadingStep::Results);
    assert_eq!(state.source, Some(PortraitSource::Generated));

    let diagnostics = flow.reporter().diagnostics_for("sync");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].kind, FailureKind::NetworkFailure);
}

#[tokio::test(start_paused = true)]
async fn test_generation_failure_lands_on_demo_payload() {
    let mut flow = controller(FakeGateway::failing(500), Capabilities::none());
    flow.start_reading();

    let start = Instant::now();
    assert_eq!(flow.connect_threads().await, Outcome::Degraded);
    assert_eq!(start.elapsed(), Duration::from_millis(4200));

    let state = flow.snapshot();
    assert_eq!(state.step, ReadingStep::Results);
    assert_eq!(state.source, Some(PortraitSource::Demo));

    let portrait = state.portrait.unwrap();
    let content = state.shareable_content.unwrap();
    assert!(!portrait.is_empty());
    assert!(!content.is_empty());
    assert_eq!(portrait.archetype.as_deref(), Some("The Authentic Storyteller"));
    assert!(content.share_urls.threads.is_some());

    assert_eq!(flow.reporter().diagnostics_for("generate_portrait").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_sub_steps_advance_in_order() {
    let mut flow = controller(FakeGateway::healthy(), Capabilities::none());
    flow.start_reading();
    let mut rx = flow.subscribe();

    let observe = async {
        let mut seen: Vec<u8> = Vec::new();
        while rx.changed().await.is_ok() {
            let state = rx.borrow_and_update().clone();
            if state.step == ReadingStep::Results {
                break;
            }
            if state.step == ReadingStep::Reading && seen.last() != Some(&state.reading_step) {
                seen.push(state.reading_step);
            }
        }
        seen
    };

    let (outcome, seen) = tokio::join!(flow.connect_threads(), observe);
    assert_eq!(outcome, Outcome::Completed);
    assert_eq!(seen, vec![0, 1, 2, 3, 4]);
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_results() {
    let mut flow = at_results(FakeGateway::healthy(), Capabilities::none()).await;
    assert!(flow.snapshot().has_results());

    assert_eq!(flow.reset(), Outcome::Completed);
    let state = flow.snapshot();
    assert_eq!(state.step, ReadingStep::Landing);
    assert_eq!(state.reading_step, 0);
    assert!(state.portrait.is_none());
    assert!(state.shareable_content.is_none());
    assert!(state.source.is_none());

    assert_eq!(flow.start_reading(), Outcome::Completed);
}

#[tokio::test(start_paused = true)]
async fn test_reset_after_abandoned_reading() {
    let mut flow = controller(FakeGateway::healthy(), Capabilities::none());
    flow.start_reading();

    let abandoned = tokio::time::timeout(Duration::from_millis(1000), flow.connect_threads()).await;
    assert!(abandoned.is_err());

    let state = flow.snapshot();
    assert_eq!(state.step, ReadingStep::Reading);
    assert_eq!(state.reading_step, 1);
    assert!(!state.is_loading());

    flow.reset();
    assert_eq!(flow.step(), ReadingStep::Landing);
}

#[tokio::test(start_paused = true)]
async fn test_rerun_after_reset_calls_gateway_again() {
    let mut flow = at_results(FakeGateway::healthy(), Capabilities::none()).await;
    flow.reset();
    flow.start_reading();
    flow.connect_threads().await;

    assert_eq!(flow.step(), ReadingStep::Results);
    assert!(flow.reporter().diagnostics().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_gateway_called_once_per_reading() {
    let gateway = std::sync::Arc::new(FakeGateway::healthy());
    let mut flow = reading_flow::ReadingFlowController::new(
        gateway.clone(),
        Capabilities::none(),
        fortune_core::ErrorReporter::new(),
        fortune_core::ReadingConfig::default(),
        fortune_core::ShareConfig::default(),
    );
    flow.start_reading();
    flow.connect_threads().await;

    assert_eq!(gateway.sync_calls.load(Ordering::SeqCst), 1);
    assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 1);
}
