//! Integration tests for the dense basis factorization
//!
//! Every test checks solves against the basis as the simplex engine sees it:
//! basis slot `r` holds loaded column `row_position()[r]`, later overwritten by
//! replaced columns.

use approx::assert_relative_eq;
use math_dense_factor::{
    BasisFactorization, DenseFactorization, FactorConfig, FactorError, FactorStatus,
    RegionVector, ReplaceStatus,
};
use ndarray::{Array1, Array2, array};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f64 = 1e-9;

fn random_matrix(rng: &mut StdRng, n: usize) -> Array2<f64> {
    Array2::from_shape_fn((n, n), |_| rng.random_range(-1.0..1.0))
}

fn random_vector(rng: &mut StdRng, n: usize) -> Array1<f64> {
    Array1::from_shape_fn(n, |_| rng.random_range(-1.0..1.0))
}

fn factored(a: &Array2<f64>, maximum_pivots: usize) -> DenseFactorization<f64> {
    let config = FactorConfig::default().with_maximum_pivots(maximum_pivots);
    let mut factorization = DenseFactorization::with_config(config).expect("valid config");
    factorization.load_matrix(a).expect("load should succeed");
    factorization.factor().expect("factor should succeed");
    factorization
}

/// Basis in slot order right after a factor
fn slot_basis(a: &Array2<f64>, factorization: &DenseFactorization<f64>) -> Array2<f64> {
    let n = a.nrows();
    let mut basis = Array2::<f64>::zeros((n, n));
    for (slot, &column) in factorization.row_position().iter().enumerate() {
        basis.column_mut(slot).assign(&a.column(column));
    }
    basis
}

fn ftran(factorization: &mut DenseFactorization<f64>, b: &Array1<f64>) -> Array1<f64> {
    let mut region = RegionVector::from_array(b, 0.0);
    factorization.update_column(&mut region, false);
    assert!(region.is_clean(), "FTRAN output must be clean");
    region.to_array(b.len())
}

fn btran(factorization: &mut DenseFactorization<f64>, c: &Array1<f64>) -> Array1<f64> {
    let mut region = RegionVector::from_array(c, 0.0);
    factorization.update_column_transpose(&mut region);
    assert!(region.is_clean(), "BTRAN output must be clean");
    region.to_array(c.len())
}

/// FTRAN an entering column and pick its largest entry as pivot
fn entering_column(
    factorization: &mut DenseFactorization<f64>,
    entering: &Array1<f64>,
) -> (RegionVector<f64>, usize, f64) {
    let n = entering.len();
    let mut column = RegionVector::from_array(entering, 0.0);
    factorization.update_column_ft(&mut column);
    let dense = column.to_array(n);
    let pivot_row = (0..n)
        .max_by(|&i, &j| dense[i].abs().total_cmp(&dense[j].abs()))
        .expect("non-empty basis");
    (column, pivot_row, dense[pivot_row])
}

fn assert_vectors_close(got: &Array1<f64>, expected: &Array1<f64>) {
    assert_eq!(got.len(), expected.len());
    for i in 0..got.len() {
        assert_relative_eq!(got[i], expected[i], epsilon = TOLERANCE);
    }
}

#[test]
fn test_identity_example() {
    let mut factorization = factored(&Array2::eye(2), 4);
    assert_eq!(factorization.status(), FactorStatus::Valid);
    assert_eq!(factorization.status().code(), 0);
    assert_eq!(factorization.number_good_u(), 2);

    let x = ftran(&mut factorization, &array![1.0, 0.0]);
    assert_eq!(x, array![1.0, 0.0]);

    let column = RegionVector::from_array(&array![1.0, 0.0], 0.0);
    let status = factorization
        .replace_column(&column, 0, 2.0, false)
        .expect("replace should succeed");
    assert_eq!(status.code(), 0);

    let x = ftran(&mut factorization, &array![1.0, 0.0]);
    assert_eq!(x, array![0.5, 0.0]);
}

#[test]
fn test_full_rank_factor() {
    let mut rng = StdRng::seed_from_u64(7);
    for n in [1, 2, 5, 12] {
        let a = random_matrix(&mut rng, n);
        let factorization = factored(&a, 10);
        assert_eq!(factorization.status(), FactorStatus::Valid);
        assert_eq!(factorization.number_good_u(), n);
        assert_eq!(factorization.number_pivots(), 0);
        for row in 0..n {
            let position = factorization.row_position()[row];
            assert_eq!(factorization.position_row()[position], row);
        }
    }
}

#[test]
fn test_ftran_round_trip() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 9;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 10);
    let basis = slot_basis(&a, &factorization);

    for _ in 0..5 {
        let b = random_vector(&mut rng, n);
        let x = ftran(&mut factorization, &b);
        assert_vectors_close(&basis.dot(&x), &b);
    }
}

#[test]
fn test_ftran_packed_round_trip() {
    let mut rng = StdRng::seed_from_u64(12);
    let n = 6;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 10);
    let basis = slot_basis(&a, &factorization);

    let mut region = RegionVector::from_packed(n, &[4, 1], &[2.0, -1.0]);
    factorization.update_column(&mut region, false);
    assert!(region.is_packed());
    assert!(region.is_clean());

    let mut b = Array1::<f64>::zeros(n);
    b[4] = 2.0;
    b[1] = -1.0;
    assert_vectors_close(&basis.dot(&region.to_array(n)), &b);
}

#[test]
fn test_btran_round_trip() {
    let mut rng = StdRng::seed_from_u64(13);
    let n = 8;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 10);
    let basis = slot_basis(&a, &factorization);

    let c = random_vector(&mut rng, n);
    let y = btran(&mut factorization, &c);
    assert_vectors_close(&basis.t().dot(&y), &c);
}

#[test]
fn test_btran_packed_round_trip() {
    let mut rng = StdRng::seed_from_u64(14);
    let n = 6;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 10);
    let mut basis = slot_basis(&a, &factorization);

    for _ in 0..3 {
        let entering = random_vector(&mut rng, n);
        let (column, pivot_row, pivot) = entering_column(&mut factorization, &entering);
        factorization
            .replace_column(&column, pivot_row, pivot, false)
            .expect("replace should succeed");
        basis.column_mut(pivot_row).assign(&entering);
    }

    let mut region = RegionVector::from_packed(n, &[3, 0], &[1.5, -2.0]);
    factorization.update_column_transpose(&mut region);
    assert!(region.is_packed());
    assert!(region.is_clean());

    let mut c = Array1::<f64>::zeros(n);
    c[3] = 1.5;
    c[0] = -2.0;
    assert_vectors_close(&basis.t().dot(&region.to_array(n)), &c);
}

#[test]
fn test_ftran_btran_duality() {
    let mut rng = StdRng::seed_from_u64(17);
    let n = 10;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 10);

    for _ in 0..3 {
        let b = random_vector(&mut rng, n);
        let c = random_vector(&mut rng, n);
        let x = ftran(&mut factorization, &b);
        let y = btran(&mut factorization, &c);
        assert_relative_eq!(c.dot(&x), y.dot(&b), epsilon = TOLERANCE);
    }
}

#[test]
fn test_replace_column_chain() {
    let mut rng = StdRng::seed_from_u64(23);
    let n = 7;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 10);
    let mut basis = slot_basis(&a, &factorization);

    for _ in 0..5 {
        let entering = random_vector(&mut rng, n);
        let (column, pivot_row, pivot) = entering_column(&mut factorization, &entering);

        let status = factorization
            .replace_column(&column, pivot_row, pivot, true)
            .expect("replace should succeed");
        assert_eq!(status, ReplaceStatus::Ok);
        basis.column_mut(pivot_row).assign(&entering);

        // The entering column now solves to its unit vector
        let x = ftran(&mut factorization, &entering);
        let mut unit = Array1::<f64>::zeros(n);
        unit[pivot_row] = 1.0;
        assert_vectors_close(&x, &unit);

        let b = random_vector(&mut rng, n);
        let x = ftran(&mut factorization, &b);
        assert_vectors_close(&basis.dot(&x), &b);

        let c = random_vector(&mut rng, n);
        let y = btran(&mut factorization, &c);
        assert_vectors_close(&basis.t().dot(&y), &c);
    }
    assert_eq!(factorization.number_pivots(), 5);
    assert_eq!(factorization.number_elements(), n * (n + 5));
}

#[test]
fn test_no_room_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(29);
    let n = 4;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 2);

    let entering = random_vector(&mut rng, n);
    let (column, pivot_row, pivot) = entering_column(&mut factorization, &entering);
    for _ in 0..2 {
        factorization
            .replace_column(&column, pivot_row, pivot, false)
            .expect("replace should succeed");
    }

    let b = random_vector(&mut rng, n);
    let before = ftran(&mut factorization, &b);
    let err = factorization
        .replace_column(&column, pivot_row, pivot, false)
        .unwrap_err();
    assert_eq!(err, FactorError::NoRoom { maximum_pivots: 2 });
    assert_eq!(err.code(), 3);
    assert!(err.needs_refactor());
    assert_eq!(factorization.number_pivots(), 2);
    assert_eq!(ftran(&mut factorization, &b), before);

    // A refactor empties the chain
    factorization.factor().expect("factor should succeed");
    assert_eq!(factorization.number_pivots(), 0);
}

#[test]
fn test_singular_pivot_rejected() {
    let mut factorization = factored(&Array2::eye(3), 4);
    let column = RegionVector::from_packed(3, &[1], &[1.0]);
    let err = factorization
        .replace_column(&column, 0, 0.0, false)
        .unwrap_err();
    assert_eq!(err.code(), 2);
    assert_eq!(factorization.number_pivots(), 0);
}

#[test]
fn test_singular_basis_repair() {
    // Third column is the sum of the first two
    let a = array![[1.0_f64, 2.0, 3.0], [0.0, 1.0, 1.0], [1.0, 3.0, 4.0]];
    let n = 3;
    let mut factorization = DenseFactorization::<f64>::new();
    factorization.load_matrix(&a).unwrap();
    let err = factorization.factor().unwrap_err();
    assert_eq!(err.code(), -1);
    assert_eq!(factorization.status(), FactorStatus::Singular);
    assert_eq!(factorization.number_good_u(), 2);

    let mut sequence: Vec<usize> = (0..n).collect();
    factorization.make_non_singular(&mut sequence, n);
    assert_eq!(&sequence[..2], &[0, 1]);
    assert!(sequence[2] >= n, "a slack replaces the dependent column");

    let slack = factorization.slack_value();
    let variable_column = |variable: usize| -> Array1<f64> {
        if variable < n {
            a.column(variable).to_owned()
        } else {
            let mut unit = Array1::<f64>::zeros(n);
            unit[variable - n] = slack;
            unit
        }
    };
    for (column, &variable) in sequence.iter().enumerate() {
        if variable < n {
            let values = variable_column(variable).to_vec();
            factorization.load_dense_column(column, &values).unwrap();
        } else {
            factorization.load_slack_column(column, variable - n).unwrap();
        }
    }
    factorization.factor().expect("repaired basis must factor");

    let mut pivot_variable = vec![usize::MAX; n];
    factorization.post_process(&sequence, &mut pivot_variable);
    let mut basis = Array2::<f64>::zeros((n, n));
    for (slot, &variable) in pivot_variable.iter().enumerate() {
        basis.column_mut(slot).assign(&variable_column(variable));
    }

    let b = array![1.0, -2.0, 0.5];
    let x = ftran(&mut factorization, &b);
    assert_vectors_close(&basis.dot(&x), &b);
}

#[test]
fn test_zero_column_is_singular_at_start() {
    let a = array![[0.0_f64, 1.0], [0.0, 2.0]];
    let mut factorization = DenseFactorization::<f64>::new();
    factorization.load_matrix(&a).unwrap();
    assert_eq!(
        factorization.factor(),
        Err(FactorError::Singular {
            good_columns: 0,
            columns: 2
        })
    );
    assert_eq!(factorization.number_good_u(), 0);
}

#[test]
fn test_sparse_staging_matches_dense_load() {
    let a = array![
        [3.0_f64, 0.0, 1.0, 0.0],
        [0.0, 0.0, 2.0, 5.0],
        [4.0, 1.0, 0.0, 0.0],
        [0.0, 2.0, 0.0, 1.0]
    ];
    let n = 4;
    let mut starts = vec![0];
    let mut rows = Vec::new();
    let mut values = Vec::new();
    for column in a.columns() {
        for (row, &value) in column.iter().enumerate() {
            if value != 0.0 {
                rows.push(row);
                values.push(value);
            }
        }
        starts.push(rows.len());
    }

    let mut staged = DenseFactorization::<f64>::new();
    staged.get_areas(n, n, 0, 0).unwrap();
    staged.stage_sparse_columns(&starts, &rows, &values).unwrap();
    staged.pre_process().unwrap();
    staged.factor().unwrap();

    let loaded = factored(&a, 200);
    for k in 0..n {
        assert_eq!(staged.factor_column(k), loaded.factor_column(k));
    }
    assert_eq!(staged.row_position(), loaded.row_position());
}

#[test]
fn test_clone_mid_update() {
    let mut rng = StdRng::seed_from_u64(31);
    let n = 5;
    let a = random_matrix(&mut rng, n);
    let mut factorization = factored(&a, 4);

    let entering = random_vector(&mut rng, n);
    let (column, pivot_row, pivot) = entering_column(&mut factorization, &entering);
    factorization
        .replace_column(&column, pivot_row, pivot, false)
        .unwrap();

    let mut copy = factorization.clone();
    assert_eq!(copy.maximum_space(), factorization.maximum_space());
    assert_eq!(copy.number_pivots(), 1);
    let b = random_vector(&mut rng, n);
    assert_eq!(ftran(&mut copy, &b), ftran(&mut factorization, &b));
}

#[test]
fn test_strategy_through_trait() {
    fn drive(strategy: &mut dyn BasisFactorization<f64>, a: &Array2<f64>) -> usize {
        let n = a.nrows();
        strategy.get_areas(n, n, 0, 0).unwrap();
        strategy.factor().expect("factor should succeed");
        strategy.number_rows()
    }

    let mut factorization = DenseFactorization::<f64>::new();
    factorization.get_areas(3, 3, 0, 0).unwrap();
    for k in 0..3 {
        factorization.load_slack_column(k, 2 - k).unwrap();
    }
    let rows = drive(&mut factorization, &Array2::eye(3));
    assert_eq!(rows, 3);
    assert_eq!(factorization.status(), FactorStatus::Valid);
    assert_eq!(factorization.row_position(), &[2, 1, 0]);
}

#[test]
fn test_storage_only_grows() {
    let mut factorization = DenseFactorization::<f64>::new();
    factorization.set_maximum_pivots(4).unwrap();
    factorization.get_areas(10, 10, 0, 0).unwrap();
    let space = factorization.maximum_space();
    assert_eq!(space, 10 * (10 + 5));

    factorization.get_areas(3, 3, 0, 0).unwrap();
    assert_eq!(factorization.maximum_space(), space);
    assert_eq!(factorization.status(), FactorStatus::Unfactored);

    factorization.set_maximum_pivots(20).unwrap();
    assert_eq!(factorization.maximum_space(), space);
    factorization.set_maximum_pivots(40).unwrap();
    assert!(factorization.maximum_space() >= 3 * (3 + 40));
}
