mod helpers;

use std::time::Duration;

use helpers::*;
use spectra::{PipelineSnapshot, RunOutcome, SourceRequest, UploadedFile};
use spectra_core::{Company, Period, Phase, PipelineState};
use spectra_mock::MockBehavior;

fn fetch() -> SourceRequest {
    SourceRequest::Fetch {
        first: Company::Sber,
        second: Company::Gazp,
        period: Period::Quarter,
    }
}

fn small_file() -> SourceRequest {
    SourceRequest::File(Some(UploadedFile::new(
        "small.json",
        r#"{"a":[1,2,3],"b":[4,5,6]}"#,
    )))
}

#[tokio::test]
async fn missing_market_data_returns_to_idle_without_message() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_series_behavior("SBER", MockBehavior::Return(dated("SBER", trend(1.0, 5))))
        .await;
    // GAZP has no behavior: the provider fails and fetch absorbs it

    let outcome = pipeline.submit(fetch()).await;

    assert_eq!(
        outcome,
        RunOutcome::SourceUnavailable {
            code: "GAZP".into()
        }
    );
    assert_eq!(pipeline.state(), PipelineState::idle());
    assert!(ctl.stationarity_calls().await.is_empty());
}

#[tokio::test]
async fn file_strategy_without_file_is_an_error() {
    let (pipeline, _ctl) = dynamic_pipeline();
    let outcome = pipeline.submit(SourceRequest::File(None)).await;
    assert_eq!(outcome, RunOutcome::Failed("Не выбран файл с данными".into()));
    assert_eq!(pipeline.state().phase(), Phase::Error);
}

#[tokio::test]
async fn unreadable_upload_surfaces_the_parser_message() {
    let (pipeline, ctl) = dynamic_pipeline();
    let file = UploadedFile::new("broken.json", "{ not json");
    let RunOutcome::Failed(msg) = pipeline.submit(SourceRequest::File(Some(file))).await else {
        panic!("expected a failed run");
    };
    assert!(msg.starts_with("data issue:"), "{msg}");
    assert_eq!(pipeline.snapshot().upload.as_deref(), Some("broken.json"));
    assert!(ctl.stationarity_calls().await.is_empty());
}

#[tokio::test]
async fn error_message_present_only_in_error_phase() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![1.0], vec![1.0])))
        .await;

    pipeline.submit(SourceRequest::File(None)).await;
    assert!(pipeline.state().error_message().is_some());

    // the next submit starts from a clean state
    pipeline.submit(small_file()).await;
    let state = pipeline.state();
    assert_eq!(state.phase(), Phase::Success);
    assert_eq!(state.error_message(), None);
}

#[tokio::test]
async fn clear_is_idempotent() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![1.0], vec![1.0])))
        .await;
    pipeline.submit(small_file()).await;
    assert!(!pipeline.results().is_empty());

    pipeline.clear();
    let once = pipeline.snapshot();
    pipeline.clear();
    let twice = pipeline.snapshot();

    assert_eq!(once, twice);
    assert_eq!(once, PipelineSnapshot::default());
    assert_eq!(once.upload, None);
}

#[tokio::test(start_paused = true)]
async fn subscribers_observe_loading_then_success() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_linear_combination_behavior(MockBehavior::Delay(
        Duration::from_secs(1),
        lc(vec![1.0], vec![1.0]),
    ))
    .await;
    let mut rx = pipeline.subscribe();

    let (outcome, phases) = tokio::join!(pipeline.submit(small_file()), async {
        let mut seen = vec![];
        let s = rx.wait_for(|s| s.state.is_loading()).await.unwrap().clone();
        seen.push(s.state.phase());
        let s = rx
            .wait_for(|s| s.state.phase() == Phase::Success)
            .await
            .unwrap()
            .clone();
        seen.push(s.state.phase());
        seen
    });

    assert_eq!(outcome, RunOutcome::Success);
    assert_eq!(phases, vec![Phase::Loading, Phase::Success]);
}

#[tokio::test(start_paused = true)]
async fn newer_submit_supersedes_an_inflight_run() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_series_behavior(
        "SBER",
        MockBehavior::Delay(Duration::from_secs(10), dated("SBER", trend(1.0, 40))),
    )
    .await;
    ctl.set_series_behavior(
        "GAZP",
        MockBehavior::Delay(Duration::from_secs(10), dated("GAZP", trend(2.0, 40))),
    )
    .await;
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![1.0; 3], vec![1.0])))
        .await;

    let (slow, fast) = tokio::join!(pipeline.submit(fetch()), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        pipeline.submit(small_file()).await
    });

    assert_eq!(fast, RunOutcome::Success);
    assert_eq!(slow, RunOutcome::Superseded);
    let snap = pipeline.snapshot();
    assert_eq!(snap.state.phase(), Phase::Success);
    assert_eq!(snap.results.raw.len(), 3);
    assert_eq!(snap.results.raw.first_code, "a");
}

#[tokio::test(start_paused = true)]
async fn clear_supersedes_an_inflight_run() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_linear_combination_behavior(MockBehavior::Delay(
        Duration::from_secs(10),
        lc(vec![1.0; 3], vec![1.0]),
    ))
    .await;

    let (outcome, ()) = tokio::join!(pipeline.submit(small_file()), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        pipeline.clear();
    });

    assert_eq!(outcome, RunOutcome::Superseded);
    assert_eq!(pipeline.snapshot(), PipelineSnapshot::default());
}

#[tokio::test]
async fn clear_empties_registered_sinks() {
    let sink = RecordingSink::shared();
    let (pipeline, ctl) = dynamic_pipeline_with(|b| b.with_sink(sink.clone()));
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![1.0; 3], vec![1.0; 2])))
        .await;
    assert_eq!(pipeline.submit(small_file()).await, RunOutcome::Success);

    pipeline.clear();

    let events = sink.events();
    assert_eq!(
        events[events.len() - 3..],
        [("raw", 0), ("spread", 0), ("periodogram", 0)]
    );
}

#[tokio::test]
async fn failed_run_leaves_sinks_empty() {
    let sink = RecordingSink::shared();
    let (pipeline, ctl) = dynamic_pipeline_with(|b| b.with_sink(sink.clone()));
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![1.0; 3], vec![1.0; 2])))
        .await;
    assert_eq!(pipeline.submit(small_file()).await, RunOutcome::Success);

    ctl.push_stationarity(stationary(true)).await;
    let outcome = pipeline.submit(small_file()).await;

    assert!(matches!(outcome, RunOutcome::Failed(_)));
    let events = sink.events();
    assert_eq!(
        events[events.len() - 3..],
        [("raw", 0), ("spread", 0), ("periodogram", 0)]
    );
}

#[tokio::test(start_paused = true)]
async fn superseded_run_never_reaches_sinks() {
    let sink = RecordingSink::shared();
    let (pipeline, ctl) = dynamic_pipeline_with(|b| b.with_sink(sink.clone()));
    ctl.set_linear_combination_behavior(MockBehavior::Delay(
        Duration::from_secs(10),
        lc(vec![1.0; 3], vec![1.0]),
    ))
    .await;

    let (outcome, ()) = tokio::join!(pipeline.submit(small_file()), async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        pipeline.clear();
    });

    assert_eq!(outcome, RunOutcome::Superseded);
    let events = sink.events();
    assert_eq!(
        events[events.len() - 3..],
        [("raw", 0), ("spread", 0), ("periodogram", 0)]
    );
    assert!(!events.iter().any(|e| e.0 != "raw" && e.1 > 0));
}

#[tokio::test(start_paused = true)]
async fn hung_service_fails_when_a_timeout_is_configured() {
    let (pipeline, ctl) =
        dynamic_pipeline_with(|b| b.request_timeout(Duration::from_secs(5)));
    ctl.set_linear_combination_behavior(MockBehavior::Hang).await;

    let outcome = pipeline.submit(small_file()).await;

    assert_eq!(
        outcome,
        RunOutcome::Failed("request timed out: linear-combination".into())
    );
}

#[tokio::test(start_paused = true)]
async fn hung_market_data_is_unavailable_when_a_timeout_is_configured() {
    let (pipeline, ctl) =
        dynamic_pipeline_with(|b| b.request_timeout(Duration::from_secs(5)));
    ctl.set_series_behavior("SBER", MockBehavior::Hang).await;
    ctl.set_series_behavior("GAZP", MockBehavior::Return(dated("GAZP", trend(1.0, 5))))
        .await;

    let outcome = pipeline.submit(fetch()).await;

    assert_eq!(
        outcome,
        RunOutcome::SourceUnavailable {
            code: "SBER".into()
        }
    );
}

#[tokio::test]
async fn build_requires_both_providers() {
    let err = spectra::Pipeline::builder().build().err().expect("missing providers");
    assert!(matches!(err, spectra_core::SpectraError::InvalidArg(_)));
}
