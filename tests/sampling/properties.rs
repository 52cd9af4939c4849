use proptest::prelude::*;
use strata::{
    DataBackend, MemoryBackend, RelationName, SampleRequest, SamplerConfig, StratifiedSampler,
};
use strata_test_utils::{assert_distinct, int_column, strata_table};

const REGIONS: [&str; 4] = ["r0", "r1", "r2", "r3"];

fn run(
    sizes: &[usize],
    proportion: f64,
    with_replacement: bool,
    seed: u64,
) -> Vec<(String, u64)> {
    let layout: Vec<(&str, usize)> = REGIONS
        .iter()
        .copied()
        .zip(sizes.iter().copied())
        .collect();
    let backend = MemoryBackend::new();
    backend
        .insert_table(RelationName::new("sales").unwrap(), strata_table(&layout))
        .unwrap();
    let sampler =
        StratifiedSampler::with_config(&backend, SamplerConfig::default().with_seed(seed));
    let request = SampleRequest::new("sales", "out", proportion)
        .with_keys(["region"])
        .with_replacement(with_replacement);
    let report = sampler.sample(&request).unwrap();

    let output = RelationName::new("out").unwrap();
    let table = backend.table(&output).unwrap();
    assert_eq!(report.rows_written, table.row_count() as u64);
    if !with_replacement {
        assert_distinct(&int_column(&table, "id"));
    }
    assert_eq!(backend.relation_count(), 2);

    backend
        .row_count(&output, &["region".to_string()])
        .unwrap()
        .into_iter()
        .map(|g| (g.key[0].to_string(), g.count))
        .collect()
}

fn expected(sizes: &[usize], per_stratum: impl Fn(u64) -> u64) -> Vec<(String, u64)> {
    REGIONS
        .iter()
        .zip(sizes)
        .map(|(region, &n)| (region.to_string(), per_stratum(n as u64)))
        .filter(|(_, count)| *count > 0)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_without_replacement_takes_nearest_rank(
        sizes in prop::collection::vec(1usize..40, 1..=4),
        proportion in 0.01f64..=1.0,
        seed in any::<u64>(),
    ) {
        let actual = run(&sizes, proportion, false, seed);
        let want = expected(&sizes, |n| strata::nearest_rank(n, proportion));
        prop_assert_eq!(actual, want);
    }

    #[test]
    fn prop_with_replacement_takes_floor(
        sizes in prop::collection::vec(1usize..40, 1..=4),
        proportion in 0.01f64..=1.0,
        seed in any::<u64>(),
    ) {
        let actual = run(&sizes, proportion, true, seed);
        let want = expected(&sizes, |n| strata::draw_count(n, proportion));
        prop_assert_eq!(actual, want);
    }
}
