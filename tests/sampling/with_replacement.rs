use strata::{SampleRequest, SamplingStrategy};

use crate::common::*;

fn with_replacement(output: &str, proportion: f64) -> SampleRequest {
    by_region(output, proportion).with_replacement(true)
}

#[tokio::test(flavor = "current_thread")]
async fn test_twelve_and_six_draw_exactly() {
    let session = seeded_session(99);
    load_two_strata(&session);

    let report = sample_ok(&session, with_replacement("draws", 0.5)).await;
    assert_eq!(report.strategy, SamplingStrategy::WithReplacement);
    assert_eq!(report.rows_written, 9);
    assert_eq!(
        sizes_of(&session, "draws"),
        vec![("east".to_string(), 6), ("west".to_string(), 3)]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_draws_stay_inside_their_stratum() {
    let session = seeded_session(1);
    load_two_strata(&session);
    sample_ok(&session, with_replacement("inside", 1.0)).await;

    let table = session.table("inside").unwrap();
    let ids = int_column(&table, "id");
    let regions = table.column_by_name("region").unwrap();
    assert_eq!(ids.len(), 18);
    for (row, id) in ids.iter().enumerate() {
        let expected = if *id <= 12 { "east" } else { "west" };
        assert_eq!(regions.get_value(row).to_string(), expected);
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_fixed_seed_reproduces_output() {
    let session = seeded_session(2024);
    load_two_strata(&session);
    sample_ok(&session, with_replacement("first", 0.5)).await;
    sample_ok(&session, with_replacement("second", 0.5)).await;
    assert_eq!(
        session.query("first").unwrap(),
        session.query("second").unwrap()
    );

    let other = seeded_session(2024);
    load_two_strata(&other);
    sample_ok(&other, with_replacement("first", 0.5)).await;
    assert_eq!(
        session.query("first").unwrap(),
        other.query("first").unwrap()
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_report_seed_reproduces_unseeded_run() {
    let session = setup_session();
    load_two_strata(&session);
    let report = sample_ok(&session, with_replacement("random", 0.5)).await;

    session.set_variable(strata::SEED_VARIABLE, strata::Value::int64(report.seed as i64));
    let replay = sample_ok(&session, with_replacement("replay", 0.5)).await;
    assert_eq!(replay.seed, report.seed);
    assert_eq!(
        session.query("random").unwrap(),
        session.query("replay").unwrap()
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_small_strata_contribute_nothing() {
    let session = seeded_session(7);
    session
        .create_table("sales", strata_table(&[("big", 10), ("small", 3)]))
        .unwrap();
    let report = sample_ok(&session, with_replacement("sparse", 0.2)).await;
    assert_eq!(report.strata, 2);
    assert_eq!(report.rows_written, 2);
    assert_eq!(sizes_of(&session, "sparse"), vec![("big".to_string(), 2)]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_ungrouped_with_replacement() {
    let session = seeded_session(31);
    load_two_strata(&session);
    let report = sample_ok(
        &session,
        SampleRequest::new("sales", "flat", 0.75).with_replacement(true),
    )
    .await;
    assert_eq!(report.rows_written, 13);
    assert_eq!(
        session.query("flat").unwrap().column_names(),
        vec!["id", "region", "tier", "amount"]
    );
}
