mod helpers;

use helpers::*;
use spectra::{RunOutcome, SourceRequest, UploadedFile};
use spectra_core::{Company, Period, Phase, SeriesIndex, SpectraError};
use spectra_mock::MockBehavior;

fn fetch(first: Company, second: Company) -> SourceRequest {
    SourceRequest::Fetch {
        first,
        second,
        period: Period::Year,
    }
}

#[tokio::test]
async fn fetch_run_reaches_success_with_service_lengths() {
    let sink = RecordingSink::shared();
    let (pipeline, ctl) = dynamic_pipeline_with(|b| b.with_sink(sink.clone()));
    ctl.set_series_behavior("SBER", MockBehavior::Return(dated("SBER", trend(250.0, 250))))
        .await;
    ctl.set_series_behavior("GAZP", MockBehavior::Return(dated("GAZP", trend(160.0, 250))))
        .await;
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![0.1; 249], vec![1.0; 124])))
        .await;

    let outcome = pipeline.submit(fetch(Company::Sber, Company::Gazp)).await;

    assert_eq!(outcome, RunOutcome::Success);
    let snap = pipeline.snapshot();
    assert_eq!(snap.state.phase(), Phase::Success);
    assert_eq!(snap.state.error_message(), None);
    assert_eq!(snap.results.raw.len(), 250);
    assert_eq!(snap.results.raw.first_code, "SBER");
    assert_eq!(snap.results.spread.len(), 249);
    assert_eq!(snap.results.periodogram.len(), 124);
    assert_eq!(
        sink.events(),
        vec![
            ("raw", 0),
            ("spread", 0),
            ("periodogram", 0),
            ("raw", 250),
            ("spread", 249),
            ("periodogram", 124),
        ]
    );

    let window = Period::Year.window(today());
    let requests = ctl.series_requests().await;
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|(_, r)| *r == window));
}

#[tokio::test]
async fn file_run_merges_to_the_shorter_series() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_linear_combination_behavior(MockBehavior::Return(lc(vec![1.0, 2.0, 3.0], vec![0.5])))
        .await;

    let file = UploadedFile::new("data.json", r#"{"a":[1,2,3],"b":[4,5,6,7]}"#);
    let outcome = pipeline.submit(SourceRequest::File(Some(file))).await;

    assert_eq!(outcome, RunOutcome::Success);
    let snap = pipeline.snapshot();
    assert_eq!(snap.upload.as_deref(), Some("data.json"));
    let raw = &snap.results.raw;
    assert_eq!(raw.len(), 3);
    assert_eq!(
        raw.dates(),
        vec![SeriesIndex::Index(0), SeriesIndex::Index(1), SeriesIndex::Index(2)]
    );
    assert_eq!(raw.value(2, "a"), Some(3.0));
    assert_eq!(raw.value(2, "b"), Some(6.0));

    // the service receives the untruncated inputs
    let calls = ctl.linear_combination_calls().await;
    assert_eq!(calls, vec![[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]]]);
}

#[tokio::test]
async fn stationary_second_series_is_named_and_stops_the_run() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_series_behavior("SBER", MockBehavior::Return(dated("SBER", trend(1.0, 30))))
        .await;
    ctl.set_series_behavior("GAZP", MockBehavior::Return(dated("GAZP", trend(2.0, 30))))
        .await;
    ctl.push_stationarity(stationary(false)).await;
    ctl.push_stationarity(stationary(true)).await;

    let outcome = pipeline.submit(fetch(Company::Sber, Company::Gazp)).await;

    let expected = "«Газпром» является стационарным временным рядом";
    assert_eq!(outcome, RunOutcome::Failed(expected.into()));
    let state = pipeline.state();
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.error_message(), Some(expected));
    assert!(ctl.linear_combination_calls().await.is_empty());
    assert!(pipeline.results().is_empty());
}

#[tokio::test]
async fn first_stationary_series_wins_when_both_are() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_series_behavior("VTBR", MockBehavior::Return(dated("VTBR", trend(1.0, 10))))
        .await;
    ctl.set_series_behavior("LKOH", MockBehavior::Return(dated("LKOH", trend(2.0, 10))))
        .await;
    ctl.push_stationarity(stationary(true)).await;
    ctl.push_stationarity(stationary(true)).await;

    let outcome = pipeline.submit(fetch(Company::Vtbr, Company::Lkoh)).await;

    assert_eq!(
        outcome,
        RunOutcome::Failed("«ВТБ» является стационарным временным рядом".into())
    );
    // series 2 is never checked
    assert_eq!(ctl.stationarity_calls().await.len(), 1);
}

#[tokio::test]
async fn uploaded_codes_are_their_own_labels() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.push_stationarity(stationary(true)).await;

    let file = UploadedFile::new("x.json", r#"{"stock1":[4,40,32],"stock2":[6,2,1]}"#);
    let outcome = pipeline.submit(SourceRequest::File(Some(file))).await;

    assert_eq!(
        outcome,
        RunOutcome::Failed("«stock1» является стационарным временным рядом".into())
    );
}

#[tokio::test]
async fn structured_service_message_is_surfaced_exactly() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.set_linear_combination_behavior(MockBehavior::Fail(SpectraError::Service {
        messages: vec!["length mismatch".into(), "second message".into()],
    }))
    .await;

    let file = UploadedFile::new("x.json", r#"{"a":[1,2],"b":[3]}"#);
    let outcome = pipeline.submit(SourceRequest::File(Some(file))).await;

    assert_eq!(outcome, RunOutcome::Failed("length mismatch".into()));
    assert_eq!(pipeline.state().error_message(), Some("length mismatch"));
    // raw rows were dispatched before the failing step
    let results = pipeline.results();
    assert_eq!(results.raw.len(), 1);
    assert!(results.spread.is_empty());
    assert!(results.periodogram.is_empty());
}

#[tokio::test]
async fn transport_message_is_surfaced_verbatim() {
    let (pipeline, ctl) = dynamic_pipeline();
    ctl.push_stationarity(MockBehavior::Fail(SpectraError::Transport(
        "Network Error".into(),
    )))
    .await;

    let file = UploadedFile::new("x.json", r#"{"a":[1,2],"b":[3,4]}"#);
    let outcome = pipeline.submit(SourceRequest::File(Some(file))).await;

    assert_eq!(outcome, RunOutcome::Failed("Network Error".into()));
}
