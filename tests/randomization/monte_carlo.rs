use crate::test_helpers::*;
use opa::analysis::randomization::NullSampler;
use opa::{GlobalValue, LocalValues, MonteCarloConfig, Opa, OpaConfig, OpaError};

fn group_cval(data: &Array2<f64>, hyp: Array1<f64>, across: bool, seed: u64) -> f64 {
    let result = Opa::group_pcc(data, &hyp, OpaConfig::pairwise()).unwrap();
    let mut rng = StdRng::seed_from_u64(seed);
    Opa::monte_carlo_cvalues(&result, 1000, across, &mut rng)
        .unwrap()
        .global_value()
}

#[test]
fn matching_hypothesis_is_more_significant_than_unrelated_ones() {
    init_tracing();
    let data = noisy_rows(&[1.0, 2.0, 3.0, 4.0, 5.0], 10, 0.3, 42);
    for seed in [1, 2, 3] {
        for across in [false, true] {
            let matching = group_cval(&data, array![1.0, 2.0, 3.0, 4.0, 5.0], across, seed);
            let scrambled = group_cval(&data, array![3.0, 1.0, 5.0, 2.0, 4.0], across, seed);
            let reversed = group_cval(&data, array![5.0, 4.0, 3.0, 2.0, 1.0], across, seed);
            assert!(matching <= scrambled, "{matching} > {scrambled}");
            assert!(scrambled <= reversed, "{scrambled} > {reversed}");
            assert!(matching < 0.01);
            assert!(reversed > 0.99);
        }
    }
}

#[test]
fn same_seed_same_result() {
    let data = uniform_rows(6, 4, 9);
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0, 4.0], OpaConfig::adjacent()).unwrap();
    let a = Opa::monte_carlo_cvalues(&result, 200, true, &mut StdRng::seed_from_u64(5)).unwrap();
    let b = Opa::monte_carlo_cvalues(&result, 200, true, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn result_shapes_and_ranges() {
    let data = uniform_rows(5, 4, 13);
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0, 4.0], OpaConfig::pairwise()).unwrap();
    let cvals = Opa::monte_carlo_cvalues(&result, 300, false, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(cvals.n_reps, 300);
    assert_eq!(cvals.rand_pccs.len(), 300);
    assert_eq!(cvals.individual_cvals.len(), 5);
    for c in cvals.defined_local_values() {
        assert!((0.0..=1.0).contains(&c));
    }
    assert!((0.0..=1.0).contains(&cvals.group_cval));
    assert!(cvals.rand_pccs.iter().all(|p| (0.0..=100.0).contains(p)));
    assert_eq!(cvals.null_weights, None);
}

#[test]
fn ties_count_as_exceedances() {
    // Every shuffle of a constant row scores exactly the observed PCC
    let data = array![[2.0, 2.0, 2.0], [5.0, 5.0, 5.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 1.0, 1.0], OpaConfig::pairwise()).unwrap();
    let cvals = Opa::monte_carlo_cvalues(&result, 50, false, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(cvals.group_cval, 1.0);
    assert_eq!(cvals.individual_cvals, vec![Some(1.0), Some(1.0)]);
}

#[test]
fn excluded_rows_have_no_cvalue() {
    let data = array![[1.0, 2.0, 3.0], [f64::NAN, 4.0, f64::NAN], [2.0, 1.0, 3.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    for across in [false, true] {
        let cvals = Opa::monte_carlo_cvalues(&result, 100, across, &mut StdRng::seed_from_u64(8)).unwrap();
        assert_eq!(cvals.individual_cvals[1], None);
        assert!(cvals.individual_cvals[0].is_some());
    }
}

#[test]
fn zero_reps_is_an_error() {
    let data = array![[1.0, 2.0, 3.0]];
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0], OpaConfig::pairwise()).unwrap();
    assert_eq!(
        Opa::monte_carlo_cvalues(&result, 0, false, &mut StdRng::seed_from_u64(0)),
        Err(OpaError::InvalidRepCount(0))
    );
}

#[test]
fn seeded_config_is_reproducible() {
    use opa::NeverCancel;
    use opa::analysis::randomization::monte_carlo_cvalues_seeded;

    let data = uniform_rows(4, 5, 21);
    let result = Opa::group_pcc(&data, &array![1.0, 2.0, 3.0, 4.0, 5.0], OpaConfig::pairwise()).unwrap();
    let config = MonteCarloConfig::new(100, false).unwrap().with_seed(99);
    let a = monte_carlo_cvalues_seeded(&result, &config, &NeverCancel).unwrap();
    let b = monte_carlo_cvalues_seeded(&result, &config, &NeverCancel).unwrap();
    assert_eq!(a, b);
    assert!(!a.is_cancelled());
    assert_eq!(a.completed_reps(), 100);
}

#[test]
fn group_ties_hold_when_row_pccs_are_fractional() {
    // Rows of 6 pairs give PCCs in steps of 100/6; equal totals must tie regardless of rounding
    let data = array![[3.0, 4.0, 1.0, 2.0], [1.0, 2.0, 4.0, 3.0]];
    let hyp = array![1.0, 2.0, 3.0, 4.0];
    let config = OpaConfig::pairwise();
    let result = Opa::group_pcc(&data, &hyp, config).unwrap();
    assert_eq!((result.correct_pairs, result.total_pairs), (7, 12));

    let nreps = 2000;
    let cvals = Opa::monte_carlo_cvalues(&result, nreps, false, &mut StdRng::seed_from_u64(1)).unwrap();

    // Replay the same draws and count totals at or above the observed one
    let mut sampler = NullSampler::new(&data, false);
    let mut rng = StdRng::seed_from_u64(1);
    let mut at_least = 0usize;
    for _ in 0..nreps {
        let total: usize = sampler
            .draw(&mut rng)
            .iter()
            .map(|row| Opa::row_pcc(row, hyp.as_slice().unwrap(), config).unwrap().correct_pairs)
            .sum();
        if total >= result.correct_pairs {
            at_least += 1;
        }
    }
    assert!(at_least > 0);
    assert_eq!((cvals.group_cval * nreps as f64).round() as usize, at_least);
}
