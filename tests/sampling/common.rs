pub use strata_test_utils::*;
use strata::{SampleReport, SampleRequest, StrataSession};

pub async fn sample_ok(session: &StrataSession, request: SampleRequest) -> SampleReport {
    session.sample(request).await.expect("sampling failed")
}

pub fn by_region(output: &str, proportion: f64) -> SampleRequest {
    SampleRequest::new("sales", output, proportion).with_keys(["region"])
}

pub fn sizes_of(session: &StrataSession, relation: &str) -> Vec<(String, usize)> {
    stratum_sizes(&session.table(relation).unwrap(), "region")
}
