//! Compile-time layer filtering

use super::*;
use static_assertions::assert_type_eq_all;
use strata_layers::{any_enabled, count_enabled, enablement, is_layer_enabled, strata, Bedrock};

assert_type_eq_all!(AppPipeline, strata![Logging, Metrics, Validation]);
assert_type_eq_all!(LayerFilter<(Profiling,)>, Bedrock);
assert_type_eq_all!(
    strata_layers::layer_filter![Profiling, Shouting, Profiling],
    strata![Shouting]
);

#[test]
fn test_enablement_utilities() {
    type Pack = (Logging, Metrics, Profiling, Validation);

    assert!(is_layer_enabled::<Logging>());
    assert!(!is_layer_enabled::<Profiling>());
    assert_eq!(count_enabled::<Pack>(), 3);
    assert!(any_enabled::<Pack>());
    assert!(!any_enabled::<(Profiling,)>());
    assert_eq!(enablement::<Pack>(), &[true, true, false, true]);
}

#[test]
fn test_pipeline_diagnostics() {
    assert_eq!(<AppPipeline as Strata>::DEPTH, 3);
    assert_eq!(
        <AppPipeline as Strata>::layer_names(),
        vec!["Logging", "Metrics", "Validation"]
    );
}

#[test]
fn test_disabled_layer_never_runs() {
    // Profiling panics if any of its hooks run
    let states = setup();
    assert_eq!(exec_add(&states, 2, 40).unwrap(), 42);
}

#[test]
fn test_all_disabled_is_a_direct_call() {
    type Nothing = LayerFilter<(Profiling, Profiling)>;
    let states = setup();

    let out = <Nothing as Strata>::exec::<AddOp, _>(&states, add, (-1, -2)).unwrap();
    assert_eq!(out, -3);
    assert!(states.is_empty());
}

#[test]
fn test_empty_pack() {
    let states = setup();
    let out = <LayerFilter<()> as Strata>::exec::<ConcatOp, _>(&states, concat, ("a", "b")).unwrap();
    assert_eq!(out, "ab");
    assert_eq!(<LayerFilter<()> as Strata>::DEPTH, 0);
}
