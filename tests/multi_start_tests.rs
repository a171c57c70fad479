use approx::assert_abs_diff_eq;
use ndarray::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use simplexmin::prelude::*;

// (x1 - 2)^4 + (x1 - 2 x2)^2, minimum 0 at (2, 1)
fn valley(x: &Array1<f64>) -> f64 {
    (x[0] - 2.0).powi(4) + (x[0] - 2.0 * x[1]).powi(2)
}

// Rastrigin in two dimensions, global minimum 0 at the origin
fn rastrigin(x: &Array1<f64>) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|v| v * v - 10.0 * (2.0 * std::f64::consts::PI * v).cos())
            .sum::<f64>()
}

#[test]
fn valley_r2() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let res = multi_start(
        MultiDimFn::new(valley),
        2,
        5,
        -2.0,
        4.0,
        0.1,
        1e-6,
        1000,
        &mut rng,
    )
    .unwrap();
    assert_eq!(res.runs.len(), 5);
    assert!(res.fmin < 1e-3, "fmin = {}", res.fmin);
    let (xmin, fmin) = res.clone().into_parts();
    assert_eq!(fmin, res.fmin);
    assert_abs_diff_eq!(valley(&xmin), fmin, epsilon = 1e-12);
}

#[test]
fn never_worse_than_any_run() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let res = multi_start(
        MultiDimFn::new(rastrigin),
        2,
        12,
        -5.12,
        5.12,
        0.1,
        1e-8,
        2000,
        &mut rng,
    )
    .unwrap();
    let min = res
        .runs
        .iter()
        .map(|r| r.fmin)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(res.fmin, min);
    assert!(res.runs.iter().all(|r| res.fmin <= r.fmin));
    assert_eq!(res.fn_evals(), res.runs.iter().map(|r| r.fn_evals).sum::<usize>());
}

#[test]
fn same_seed_same_result() {
    let run = |seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        multi_start(
            MultiDimFn::new(rastrigin),
            2,
            6,
            -3.0,
            3.0,
            0.1,
            1e-8,
            1000,
            &mut rng,
        )
        .unwrap()
    };
    let a = run(5);
    let b = run(5);
    assert_eq!(a.xmin, b.xmin);
    assert_eq!(a.fmin.to_bits(), b.fmin.to_bits());
    assert_eq!(a.best_run, b.best_run);
    for (ra, rb) in a.runs.iter().zip(b.runs.iter()) {
        assert_eq!(ra.initial_point, rb.initial_point);
        assert_eq!(ra.iters, rb.iters);
    }
}

#[test]
fn seeded_options_through_minimizer_trait() {
    let mut opt = MultiStartOptions::new(2, 3, -1.0, 1.0, Some(0.1), Some(1e-8), Some(1000));
    opt.set_rng_seed(Some(3));
    opt.set_contraction(ContractionMode::Classic);
    let res = MultiStart::new(MultiDimFn::new(|x: &Array1<f64>| x.dot(x)))
        .minimize(&opt)
        .unwrap();
    assert!(res.converged());
    assert!(res.fmin < 1e-6);
    assert_eq!(res.runs.len(), opt.runs());
}

#[test]
fn objective_error_stops_the_driver() {
    let f = FallibleFn::new(|x: &Array1<f64>| {
        if x[0] > 0.0 {
            Err("positive half-space is undefined")
        } else {
            Ok(x[0] * x[0])
        }
    });
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let err = multi_start(f, 1, 4, 1.0, 2.0, 0.1, 1e-6, 100, &mut rng).unwrap_err();
    assert!(matches!(err, MinimizerError::Objective(_)));
    assert_eq!(
        err.to_string(),
        "objective evaluation failed: positive half-space is undefined"
    );
}
