use strata::{SampleRequest, SamplingStrategy, Value};

use crate::common::*;

#[tokio::test(flavor = "current_thread")]
async fn test_twelve_and_six_at_half() {
    let session = seeded_session(17);
    load_two_strata(&session);

    let report = sample_ok(&session, by_region("half", 0.5)).await;
    assert_eq!(report.strategy, SamplingStrategy::WithoutReplacement);
    assert_eq!(report.rows_read, 18);
    assert_eq!(report.rows_written, 9);
    assert_eq!(report.strata, 2);
    assert_eq!(
        sizes_of(&session, "half"),
        vec![("east".to_string(), 6), ("west".to_string(), 3)]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_rows_are_never_repeated() {
    let session = seeded_session(5);
    load_two_strata(&session);
    sample_ok(&session, by_region("most", 0.9)).await;

    let ids = int_column(&session.table("most").unwrap(), "id");
    assert_eq!(ids.len(), 11 + 6);
    assert_distinct(&ids);
}

#[tokio::test(flavor = "current_thread")]
async fn test_nearest_rank_rounds_up() {
    let session = seeded_session(8);
    load_two_strata(&session);
    sample_ok(&session, by_region("quarter", 0.25)).await;
    assert_eq!(
        sizes_of(&session, "quarter"),
        vec![("east".to_string(), 3), ("west".to_string(), 2)]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_singleton_stratum_keeps_its_row() {
    let session = seeded_session(2);
    session
        .create_table("sales", strata_table(&[("north", 1), ("south", 3)]))
        .unwrap();
    sample_ok(&session, by_region("tiny", 0.01)).await;
    assert_eq!(
        sizes_of(&session, "tiny"),
        vec![("north".to_string(), 1), ("south".to_string(), 1)]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_full_proportion_returns_every_row() {
    let session = seeded_session(3);
    load_two_strata(&session);
    sample_ok(&session, by_region("all", 1.0)).await;

    let mut ids = int_column(&session.table("all").unwrap(), "id");
    ids.sort_unstable();
    assert_eq!(ids, (1..=18).collect::<Vec<_>>());
}

#[tokio::test(flavor = "current_thread")]
async fn test_ungrouped_uses_floor() {
    let session = seeded_session(4);
    load_two_strata(&session);

    let report = sample_ok(&session, SampleRequest::new("sales", "flat", 0.3)).await;
    assert_eq!(report.strata, 1);
    assert_eq!(report.rows_written, 5);
    assert_distinct(&int_column(&session.table("flat").unwrap(), "id"));

    let report = sample_ok(&session, SampleRequest::new("sales", "none", 0.05)).await;
    assert_eq!(report.rows_written, 0);
    assert!(session.table_exists("none").unwrap());
}

#[tokio::test(flavor = "current_thread")]
async fn test_default_targets_put_keys_last() {
    let session = seeded_session(6);
    load_two_strata(&session);
    sample_ok(&session, by_region("cols", 0.5)).await;

    let result = session.query("cols").unwrap();
    assert_eq!(result.column_names(), vec!["id", "tier", "amount", "region"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_explicit_targets_and_multiple_keys() {
    let session = seeded_session(6);
    load_two_strata(&session);
    let request = SampleRequest::new("sales", "narrow", 0.5)
        .with_keys(["region", " tier ", "region"])
        .with_targets(["amount"]);
    let report = sample_ok(&session, request).await;

    // east: 6 gold + 6 silver, west: 3 gold + 3 silver
    assert_eq!(report.strata, 4);
    assert_eq!(report.rows_written, 3 + 3 + 2 + 2);
    let result = session.query("narrow").unwrap();
    assert_eq!(result.column_names(), vec!["amount", "region", "tier"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_null_keys_form_their_own_stratum() {
    let session = seeded_session(12);
    let mut table = strata_table(&[("east", 4)]);
    for id in 5..=8 {
        table
            .push_row(vec![
                Value::int64(id),
                Value::Null,
                Value::string("gold"),
                Value::float64(1.0),
            ])
            .unwrap();
    }
    session.create_table("sales", table).unwrap();

    let report = sample_ok(&session, by_region("nulls", 0.5)).await;
    assert_eq!(report.strata, 2);
    assert_eq!(
        sizes_of(&session, "nulls"),
        vec![("east".to_string(), 2), ("NULL".to_string(), 2)]
    );
}
