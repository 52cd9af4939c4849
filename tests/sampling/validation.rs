use strata::{ErrorKind, SampleRequest};

use crate::common::*;

#[tokio::test(flavor = "current_thread")]
async fn test_existing_output_fails_and_creates_nothing() {
    let session = seeded_session(1);
    load_two_strata(&session);
    session
        .create_table("taken", strata_table(&[("x", 2)]))
        .unwrap();

    let result = session.sample(by_region("taken", 0.5)).await;
    assert_error_kind(result, ErrorKind::AlreadyExists);
    assert_eq!(session.table_names(), vec!["sales", "taken"]);
    assert_eq!(session.table("taken").unwrap().row_count(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn test_empty_source() {
    let session = setup_session();
    session.create_table("sales", strata_table(&[])).unwrap();
    let result = session.sample(by_region("out", 0.5)).await;
    assert_error_kind(result, ErrorKind::EmptyInput);
    assert!(!session.table_exists("out").unwrap());
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_source() {
    let session = setup_session();
    let result = session.sample(by_region("out", 0.5)).await;
    assert_error_kind(result, ErrorKind::NotFound);
}

#[tokio::test(flavor = "current_thread")]
async fn test_proportion_out_of_range_creates_nothing() {
    let session = setup_session();
    load_two_strata(&session);
    for proportion in [0.0, -1.0, 1.5, f64::NAN] {
        for with_replacement in [false, true] {
            let request = by_region("out", proportion).with_replacement(with_replacement);
            assert_error_kind(session.sample(request).await, ErrorKind::InvalidArgument);
        }
    }
    assert_eq!(session.table_names(), vec!["sales"]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_unknown_columns_are_all_named() {
    let session = setup_session();
    load_two_strata(&session);
    let request = SampleRequest::new("sales", "out", 0.5)
        .with_keys(["region", "country"])
        .with_targets(["amount", "discount"]);
    let result = session.sample(request.clone()).await;
    assert_error_contains(result, &["country, discount"]);
    assert_error_kind(session.sample(request).await, ErrorKind::SchemaMismatch);
}

#[tokio::test(flavor = "current_thread")]
async fn test_blank_and_identical_names() {
    let session = setup_session();
    load_two_strata(&session);
    assert_error_kind(
        session.sample(SampleRequest::new("sales", " ", 0.5)).await,
        ErrorKind::InvalidArgument,
    );
    assert_error_kind(
        session.sample(SampleRequest::new("sales", "sales", 0.5)).await,
        ErrorKind::InvalidArgument,
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_checks_run_in_order() {
    let session = setup_session();
    load_two_strata(&session);
    // missing source wins over a bad proportion
    assert_error_kind(
        session.sample(SampleRequest::new("ghost", "out", 7.0)).await,
        ErrorKind::NotFound,
    );
    // bad proportion wins over unknown columns
    let request = SampleRequest::new("sales", "out", 7.0).with_keys(["nope"]);
    assert_error_kind(session.sample(request).await, ErrorKind::InvalidArgument);
}

#[tokio::test(flavor = "current_thread")]
async fn test_validation_is_idempotent() {
    let session = setup_session();
    load_two_strata(&session);
    let request = by_region("out", 2.0);
    let first = session.sample(request.clone()).await.unwrap_err();
    let second = session.sample(request).await.unwrap_err();
    assert_eq!(first.to_string(), second.to_string());
}
