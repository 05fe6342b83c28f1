use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gridq::{
    add, fill_grid, mul, partition, should_parallelize, DenseMatrix, ExecMode, GridError,
    AUTO_COST_THRESHOLD,
};

fn counting(rows: usize, cols: usize) -> DenseMatrix<i64> {
    DenseMatrix::from_fn(rows, cols, |i, j| (i * cols + j) as i64)
}

#[test]
fn test_walkthrough() {
    let m = DenseMatrix::from_rows(vec![vec![1i64, 2], vec![3, 4]]).unwrap();

    let transposed = m.lazy().transpose().evaluate().unwrap();
    assert_eq!(
        transposed,
        DenseMatrix::from_rows(vec![vec![1, 3], vec![2, 4]]).unwrap()
    );

    let sum = &m + &m;
    assert_eq!(
        sum,
        DenseMatrix::from_rows(vec![vec![2, 4], vec![6, 8]]).unwrap()
    );

    let product = &m * &m;
    assert_eq!(
        product,
        DenseMatrix::from_rows(vec![vec![7, 10], vec![15, 22]]).unwrap()
    );

    let text = product.to_text();
    assert_eq!(text, "[[7, 10]\n [15, 22]]");
    let back: DenseMatrix<i64> = text.parse().unwrap();
    assert_eq!(back, product);
}

#[test]
fn test_partition_laws() {
    for len in 0..40 {
        for workers in 1..8 {
            let parts = partition(len, workers);
            assert!(parts.len() <= workers);

            // Contiguous, disjoint, covering.
            let mut cursor = 0;
            for part in &parts {
                assert_eq!(part.start, cursor);
                assert!(part.end > part.start);
                cursor = part.end;
            }
            assert_eq!(cursor, len);

            if len > 0 && len < workers {
                assert!(parts.iter().all(|p| p.end - p.start == 1));
            }
            if len >= workers {
                let chunk = len / workers;
                for part in &parts[..parts.len() - 1] {
                    assert_eq!(part.end - part.start, chunk);
                }
                let last = &parts[parts.len() - 1];
                assert_eq!(last.end - last.start, chunk + len % workers);
            }
        }
    }
}

#[test]
fn test_threshold_boundary() {
    assert!(!should_parallelize(AUTO_COST_THRESHOLD - 1, 1));
    assert!(should_parallelize(AUTO_COST_THRESHOLD, 1));
    assert!(should_parallelize(100, 100));
    assert!(!should_parallelize(99, 100));
    assert!(should_parallelize(usize::MAX, 2));
}

#[test]
fn test_series_fill_is_row_major() {
    let seen = Mutex::new(Vec::new());
    let _ = fill_grid(3, 4, ExecMode::Series, 1, |i, j| {
        seen.lock().unwrap().push((i, j));
        0u8
    });
    let order = seen.into_inner().unwrap();
    let expected: Vec<(usize, usize)> = (0..3)
        .flat_map(|i| (0..4).map(move |j| (i, j)))
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn test_parallel_fill_visits_every_cell_once() {
    let hits: Vec<AtomicU32> = (0..12 * 9).map(|_| AtomicU32::new(0)).collect();
    let out = fill_grid(12, 9, ExecMode::Parallel, 1, |i, j| {
        hits[i * 9 + j].fetch_add(1, Ordering::SeqCst);
        (i * 9 + j) as u32
    });
    assert!(hits.iter().all(|h| h.load(Ordering::SeqCst) == 1));
    assert_eq!(out[5 * 9 + 7], 52);
}

#[test]
fn test_modes_agree_on_floats() {
    let mut rng = StdRng::seed_from_u64(42);
    let source: Vec<f64> = (0..40 * 30).map(|_| rng.gen_range(-1.0..1.0)).collect();
    let m = DenseMatrix::from_vec(40, 30, source).unwrap();

    let series = m
        .lazy()
        .with_mode(ExecMode::Series)
        .map(|x| x.sin() + 0.5)
        .evaluate()
        .unwrap();
    let parallel = m
        .lazy()
        .with_mode(ExecMode::Parallel)
        .map(|x| x.sin() + 0.5)
        .evaluate()
        .unwrap();

    assert_eq!(series.shape(), parallel.shape());
    for i in 0..40 {
        for j in 0..30 {
            assert_relative_eq!(series[(i, j)], parallel[(i, j)], epsilon = 1e-15);
        }
    }
}

#[test]
fn test_crop_and_concat_are_inverse() {
    let m = counting(4, 4);
    let quadrant = |start: (usize, usize), end: (usize, usize)| {
        m.lazy().sub_matrix(start, end).unwrap().evaluate().unwrap()
    };
    let tl = quadrant((0, 0), (1, 1));
    let tr = quadrant((0, 2), (1, 3));
    let bl = quadrant((2, 0), (3, 1));
    let br = quadrant((2, 2), (3, 3));

    let top = &tl & &tr;
    let bottom = &bl & &br;
    assert_eq!(&top | &bottom, m);
}

#[test]
fn test_product_with_identity() {
    let a = counting(3, 3);
    let id = DenseMatrix::from_fn(3, 3, |i, j| i64::from(i == j));
    assert_eq!(mul(&a, &id).unwrap(), a);
    assert_eq!(mul(&id, &a).unwrap(), a);
}

#[test]
fn test_long_chain_over_large_matrix() {
    let big = DenseMatrix::from_fn(150, 80, |i, j| ((i * 80 + j) % 17) as i64);
    let chained = big
        .lazy()
        .parallel_hint(false)
        .map(|v| v + 1)
        .transpose()
        .sub_matrix((10, 20), (29, 59))
        .unwrap()
        .evaluate()
        .unwrap();
    assert_eq!(chained.shape(), (20, 40));
    assert_eq!(chained[(0, 0)], big[(20, 10)] + 1);
    assert_eq!(chained[(19, 39)], big[(59, 29)] + 1);
}

#[test]
fn test_error_taxonomy() {
    assert!(matches!(
        DenseMatrix::from_vec(2, 3, vec![1]).unwrap_err(),
        GridError::LengthMismatch {
            rows: 2,
            cols: 3,
            len: 1
        }
    ));

    let m = counting(2, 2);
    let oob = m.get(5, 0).unwrap_err();
    assert!(matches!(oob, GridError::OutOfBounds { row: 5, .. }));
    assert!(format!("{oob}").contains("out of bounds"));

    assert!(matches!(
        m.to_flat_vec().unwrap_err(),
        GridError::NotVector { rows: 2, cols: 2 }
    ));

    assert!(matches!(
        DenseMatrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err(),
        GridError::RaggedRows { row: 1, .. }
    ));

    assert!(matches!(
        m.lazy().sub_matrix((1, 0), (0, 0)).unwrap_err(),
        GridError::CropOrder { .. }
    ));

    let wide = counting(2, 3);
    assert!(matches!(
        add(&m, &wide).unwrap_err(),
        GridError::ShapeMismatch { .. }
    ));

    assert!(matches!(
        DenseMatrix::<i64>::from_text("nope").unwrap_err(),
        GridError::InvalidText(_)
    ));
}
