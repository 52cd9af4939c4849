use strata::{
    BackendSettings, ErrorKind, SEED_VARIABLE, SLOW_THRESHOLD_VARIABLE, STAGING_PREFIX_VARIABLE,
    SampleRequest, SamplerConfig, StrataEngine, Value,
};

use crate::common::*;

#[tokio::test(flavor = "current_thread")]
async fn test_sessions_are_isolated() {
    let engine = StrataEngine::new();
    let first = engine.create_session();
    let second = engine.create_session();
    load_two_strata(&first);
    assert!(first.table_exists("sales").unwrap());
    assert!(!second.table_exists("sales").unwrap());
    assert_error_kind(
        second.sample(by_region("out", 0.5)).await,
        ErrorKind::NotFound,
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_engine_config_seed() {
    let engine = StrataEngine::new().with_config(SamplerConfig::default().with_seed(77));
    let session = engine.create_session();
    load_two_strata(&session);
    let report = sample_ok(&session, by_region("out", 0.5)).await;
    assert_eq!(report.seed, 77);

    session.set_variable(SEED_VARIABLE, Value::int64(78));
    let report = sample_ok(&session, by_region("out2", 0.5)).await;
    assert_eq!(report.seed, 78);
}

#[tokio::test(flavor = "current_thread")]
async fn test_invalid_variable_fails_before_sampling() {
    let session = setup_session();
    load_two_strata(&session);
    session.set_variable(STAGING_PREFIX_VARIABLE, Value::string(""));
    assert_error_kind(
        session.sample(by_region("out", 0.5)).await,
        ErrorKind::InvalidArgument,
    );
    assert!(!session.table_exists("out").unwrap());
}

#[tokio::test(flavor = "current_thread")]
async fn test_no_staging_residue() {
    let session = seeded_session(3);
    load_two_strata(&session);
    session.set_variable(STAGING_PREFIX_VARIABLE, Value::string("__scratch"));
    sample_ok(&session, by_region("a", 0.5)).await;
    sample_ok(&session, by_region("b", 0.5).with_replacement(true)).await;
    sample_ok(&session, SampleRequest::new("sales", "c", 0.5)).await;
    let _ = session.sample(by_region("d", 3.0)).await;

    assert_eq!(session.table_names(), vec!["a", "b", "c", "sales"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_metrics_count_invocations() {
    let session = seeded_session(3);
    load_two_strata(&session);
    session.set_variable(SLOW_THRESHOLD_VARIABLE, Value::int64(0));

    sample_ok(&session, by_region("ok", 0.5)).await;
    let _ = session.sample(by_region("ok", 0.5)).await;

    let metrics = session.metrics();
    assert_eq!(metrics.get_invocation_count(), 2);
    assert_eq!(metrics.get_error_count(), 1);
    assert_eq!(metrics.get_rows_written(), 9);
    assert_eq!(metrics.get_slow_invocation_count(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn test_sample_batch_reports_each_request() {
    let session = seeded_session(10);
    load_two_strata(&session);
    let results = session
        .sample_batch(vec![
            by_region("one", 0.5),
            by_region("one", 0.5),
            by_region("two", 0.5).with_replacement(true),
        ])
        .await;
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err().kind(),
        ErrorKind::AlreadyExists
    );
    assert_eq!(results[2].as_ref().unwrap().rows_written, 9);
}

#[tokio::test(flavor = "current_thread")]
async fn test_drop_table_is_idempotent() {
    let session = seeded_session(1);
    load_two_strata(&session);
    sample_ok(&session, by_region("out", 0.5)).await;
    session.drop_table("out").unwrap();
    session.drop_table("out").unwrap();
    assert!(!session.table_exists("out").unwrap());
    sample_ok(&session, by_region("out", 0.5)).await;
}

#[tokio::test(flavor = "current_thread")]
async fn test_stratum_counts() {
    let session = seeded_session(1);
    load_two_strata(&session);
    let counts = session.stratum_counts("sales", &["region"]).unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].key, vec![Value::string("east")]);
    assert_eq!(counts[0].count, 12);
    let total = session.stratum_counts::<&str>("sales", &[]).unwrap();
    assert_eq!(total[0].count, 18);
}

#[tokio::test(flavor = "current_thread")]
async fn test_report_serializes() {
    let session = seeded_session(5);
    load_two_strata(&session);
    let report = sample_ok(&session, by_region("out", 0.5)).await;
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["output"], "out");
    assert_eq!(json["strategy"], "without_replacement");
    assert_eq!(json["rows_written"], 9);
    assert_float_eq(report.sampling_ratio(), 0.5, 1e-12);
}

#[tokio::test(flavor = "current_thread")]
async fn test_parallel_generation_matches_sequential() {
    let parallel = StrataEngine::new()
        .with_backend_settings(BackendSettings {
            parallel_threshold: 1,
        })
        .create_session();
    let sequential = setup_session();
    for session in [&parallel, &sequential] {
        session.set_variable(SEED_VARIABLE, Value::int64(123));
        load_two_strata(session);
        sample_ok(session, by_region("wo", 0.5)).await;
        sample_ok(session, by_region("wr", 0.5).with_replacement(true)).await;
    }
    for output in ["wo", "wr"] {
        assert_eq!(
            parallel.query(output).unwrap(),
            sequential.query(output).unwrap()
        );
    }
}
