use crate::test_helpers::*;
use opa::analysis::randomization::{permutation_pccs, permutations};
use opa::{Opa, OpaConfig, OpaError, PermutationConfig};

#[test]
fn three_values_give_six_permutations_starting_with_identity() {
    let perms = permutations(&[1.0, 2.0, 3.0]);
    assert_eq!(perms.len(), 6);
    assert_eq!(perms[0], vec![1.0, 2.0, 3.0]);
    assert!(perms.contains(&vec![3.0, 2.0, 1.0]));
}

#[test]
fn repeated_values_keep_their_multiplicity() {
    let perms = permutations(&[1.0, 1.0, 2.0]);
    assert_eq!(perms.len(), 6);
    let ones_first = perms.iter().filter(|p| **p == vec![1.0, 1.0, 2.0]).count();
    assert_eq!(ones_first, 2);
}

#[test]
fn permutation_scores_of_a_triplet() {
    let recs = permutation_pccs(
        &[1.0, 2.0, 3.0],
        &[1.0, 2.0, 3.0],
        OpaConfig::pairwise(),
        PermutationConfig::default(),
    )
    .unwrap();
    let correct: Vec<usize> = recs.iter().map(|r| r.correct_pairs).collect();
    assert_eq!(correct, vec![3, 2, 2, 1, 1, 0]);
    assert_eq!(recs[0].pcc, 100.0);
}

#[test]
fn exhaustive_cvalues_for_opposite_rows() {
    let data = array![[1.0, 2.0, 3.0], [3.0, 2.0, 1.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    let cvals = Opa::permutation_cvalues(&result).unwrap();

    assert_eq!(cvals.n_reps, 6);
    // Two rows of three pairs each: group PCCs 0, 100/6, ..., 100
    assert_eq!(cvals.rand_pccs.len(), 7);
    assert_abs_diff_eq!(cvals.rand_pccs[3], 50.0, epsilon = 1e-12);
    let weights = cvals.null_weights.as_ref().unwrap();
    assert_abs_diff_eq!(weights[6], 1.0 / 36.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cvals.individual_cvals[0].unwrap(), 1.0 / 6.0, epsilon = 1e-12);
    assert_abs_diff_eq!(cvals.individual_cvals[1].unwrap(), 1.0, epsilon = 1e-12);
    // Per-row correct-pair counts {0:1, 1:2, 2:2, 3:1}/6, summed over two rows, P(sum >= 3)
    assert_abs_diff_eq!(cvals.group_cval, 23.0 / 36.0, epsilon = 1e-12);
}

#[test]
fn exhaustive_cvalues_skip_excluded_rows() {
    let data = array![[1.0, 2.0, 3.0, 4.0], [f64::NAN, f64::NAN, f64::NAN, 1.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0, 4.0], OpaConfig::adjacent()).unwrap();
    let cvals = Opa::permutation_cvalues(&result).unwrap();
    assert_eq!(cvals.individual_cvals[1], None);
    assert_eq!(cvals.rand_pccs.len(), 4);
    // Eulerian numbers: permutations of four with 0..=3 ascents
    let weights = cvals.null_weights.as_ref().unwrap();
    for (w, count) in weights.iter().zip([1.0, 11.0, 11.0, 1.0]) {
        assert_abs_diff_eq!(*w, count / 24.0, epsilon = 1e-12);
    }
    // Only the identity and nothing else reaches 3/3 adjacent matches
    assert_abs_diff_eq!(cvals.group_cval, 1.0 / 24.0, epsilon = 1e-12);
    assert_eq!(cvals.individual_cvals[0], Some(cvals.group_cval));
}

#[test]
fn exhaustive_cvalues_with_missing_values_permute_gaps() {
    let data = array![[1.0, f64::NAN, 3.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    let cvals = Opa::permutation_cvalues(&result).unwrap();
    assert_eq!(cvals.rand_pccs.to_vec(), vec![0.0, 100.0]);
    assert_eq!(cvals.null_weights, Some(array![0.5, 0.5]));
    assert_abs_diff_eq!(cvals.group_cval, 0.5, epsilon = 1e-12);
}

#[test]
fn exhaustive_null_distribution_grows_with_pairs_not_permutations() {
    let hyp = array![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    for rows in [1, 4, 9] {
        let data = noisy_rows(hyp.as_slice().unwrap(), rows, 1.0, 17);
        let result = Opa::group_pcc(&data, &hyp, OpaConfig::pairwise()).unwrap();
        let cvals = Opa::permutation_cvalues(&result).unwrap();

        assert_eq!(cvals.n_reps, 720);
        assert_eq!(result.total_pairs, rows * 15);
        assert_eq!(cvals.rand_pccs.len(), result.total_pairs + 1);
        assert_eq!(cvals.rand_pccs[0], 0.0);
        assert_abs_diff_eq!(cvals.rand_pccs[result.total_pairs], 100.0, epsilon = 1e-12);

        let weights = cvals.null_weights.as_ref().unwrap();
        assert_eq!(weights.len(), cvals.rand_pccs.len());
        assert_abs_diff_eq!(weights.sum(), 1.0, epsilon = 1e-9);
        let upper: f64 = weights.iter().skip(result.correct_pairs).sum();
        assert_abs_diff_eq!(upper, cvals.group_cval, epsilon = 1e-12);
    }
}

#[test]
fn long_rows_are_refused() {
    let data = uniform_rows(2, 11, 5);
    let hyp = Array1::from_iter((0..11).map(f64::from));
    let result = Opa::group_pcc(&data, &hyp, OpaConfig::pairwise()).unwrap();
    assert_eq!(
        Opa::permutation_cvalues(&result),
        Err(OpaError::PermutationSpaceTooLarge { n: 11, max: 10 })
    );
    assert_eq!(
        Opa::permutation_cvalues_bounded(&result, PermutationConfig::new(8)),
        Err(OpaError::PermutationSpaceTooLarge { n: 11, max: 8 })
    );
}
