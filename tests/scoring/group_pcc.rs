use crate::test_helpers::*;
use opa::{GlobalValue, LocalValues, Opa, OpaConfig, OpaError};

#[test]
fn two_opposite_rows_average_to_50() {
    let data = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    assert_eq!(result.individual_pccs, vec![Some(100.0), Some(0.0)]);
    assert_eq!(result.group_pcc, 50.0);
    assert_eq!(result.total_pairs, 6);
    assert_eq!(result.correct_pairs, 3);
    assert_eq!(result.global_value(), 50.0);
}

#[test]
fn group_pcc_is_pair_weighted() {
    // row 0: 3 pairs all correct; row 1: one missing, 1 pair wrong
    let data = array![[1.0, 2.0, 3.0], [3.0, f64::NAN, 1.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    assert_eq!(result.total_pairs, 4);
    assert_eq!(result.correct_pairs, 3);
    assert_abs_diff_eq!(result.group_pcc, 75.0, epsilon = 1e-12);
    assert_eq!(result.mean_local_value(), Some(50.0));
}

#[test]
fn rows_without_pairs_are_reported_not_averaged() {
    let data = array![[1.0, 2.0, 3.0], [f64::NAN, 5.0, f64::NAN], [1.0, 3.0, 2.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    assert_eq!(result.individual_pccs[1], None);
    assert_eq!(result.excluded_rows(), vec![1]);
    assert_eq!(result.total_pairs, 6);
    assert_eq!(result.correct_pairs, 5);
    assert_eq!(result.defined_local_values().len(), 2);
    assert!(result.group_pcc.is_finite());
}

#[test]
fn bundle_keeps_inputs() {
    let data = uniform_rows(4, 5, 3);
    let hyp = array![1.0, 2.0, 3.0, 4.0, 5.0];
    let config = OpaConfig::adjacent().with_threshold(0.25).unwrap();
    let result = Opa::group_pcc(&data, &hyp, config).unwrap();
    assert_eq!(result.data, data);
    assert_eq!(result.hypothesis, hyp);
    assert_eq!(result.config, config);
    assert_eq!(result.individual_pccs.len(), 4);
    assert_eq!(result.total_pairs, 4 * 4);
}

#[test]
fn column_count_must_match_hypothesis() {
    let data = array![[1.0, 2.0, 3.0]];
    assert_eq!(
        Opa::group_pcc(&data, &array![1.0, 2.0], OpaConfig::pairwise()),
        Err(OpaError::InvalidDimension { expected: 2, actual: 3 })
    );
}

#[test]
fn hypothesis_built_from_strided_view() {
    let wide = array![3.0, 0.0, 2.0, 0.0, 1.0];
    let hyp = wide.slice(ndarray::s![..;2]).to_owned();
    let data = array![[3.0, 2.0, 1.0]];
    let result = Opa::group_pcc(&data, &hyp, OpaConfig::pairwise()).unwrap();
    assert_eq!(result.group_pcc, 100.0);
}
