use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndarray::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplexmin::prelude::*;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TestType {
    Single,
    Classic,
}

impl TestType {
    pub fn name(&self) -> &'static str {
        match self {
            TestType::Single => "SingleContraction",
            TestType::Classic => "ClassicContraction",
        }
    }

    pub fn mode(&self) -> ContractionMode {
        match self {
            TestType::Single => ContractionMode::Single,
            TestType::Classic => ContractionMode::Classic,
        }
    }

    pub fn all_types() -> Vec<TestType> {
        vec![TestType::Single, TestType::Classic]
    }
}

#[derive(Clone)]
struct TestProblem {
    name: String,
    function: fn(&Array1<f64>) -> f64,
    x0: Array1<f64>,
    lb: f64,
    ub: f64,
    dimensions: usize,
}

// Test Functions
fn sphere_function(x: &Array1<f64>) -> f64 {
    x.iter().map(|xi| xi * xi).sum()
}

fn weighted_quadratic(x: &Array1<f64>) -> f64 {
    x.iter()
        .enumerate()
        .map(|(i, xi)| (i + 1) as f64 * xi * xi)
        .sum()
}

fn rosenbrock_function(x: &Array1<f64>) -> f64 {
    (0..x.len() - 1)
        .map(|i| 100.0 * (x[i + 1] - x[i] * x[i]).powi(2) + (1.0 - x[i]).powi(2))
        .sum()
}

fn rastrigin_function(x: &Array1<f64>) -> f64 {
    let a = 10.0;
    let pi = std::f64::consts::PI;
    a * x.len() as f64
        + x.iter()
            .map(|xi| xi * xi - a * (2.0 * pi * xi).cos())
            .sum::<f64>()
}

fn himmelblau_function(x: &Array1<f64>) -> f64 {
    (x[0] * x[0] + x[1] - 11.0).powi(2) + (x[0] + x[1] * x[1] - 7.0).powi(2)
}

fn setup_test_problems() -> Vec<TestProblem> {
    vec![
        TestProblem {
            name: "sphere_2d".to_string(),
            function: sphere_function,
            x0: array![1.5, 1.5],
            lb: -5.0,
            ub: 5.0,
            dimensions: 2,
        },
        TestProblem {
            name: "rosenbrock_2d".to_string(),
            function: rosenbrock_function,
            x0: array![-1.2, 1.0],
            lb: -2.0,
            ub: 2.0,
            dimensions: 2,
        },
        TestProblem {
            name: "himmelblau_2d".to_string(),
            function: himmelblau_function,
            x0: array![0.0, 0.0],
            lb: -5.0,
            ub: 5.0,
            dimensions: 2,
        },
        TestProblem {
            name: "quadratic_3d".to_string(),
            function: weighted_quadratic,
            x0: Array1::ones(3),
            lb: -3.0,
            ub: 3.0,
            dimensions: 3,
        },
        TestProblem {
            name: "rastrigin_5d".to_string(),
            function: rastrigin_function,
            x0: Array1::from_elem(5, 0.1),
            lb: -5.12,
            ub: 5.12,
            dimensions: 5,
        },
        TestProblem {
            name: "sphere_10d".to_string(),
            function: sphere_function,
            x0: Array1::from_elem(10, 0.3),
            lb: -2.0,
            ub: 2.0,
            dimensions: 10,
        },
    ]
}

fn run_optimization_benchmark(
    problem: &TestProblem,
    category: TestType,
    iterations: usize,
) -> (f64, usize, bool) {
    let mut opt = NelderMeadOptions::new(
        problem.x0.clone(),
        Some(0.1),
        Some(1e-10),
        Some(iterations),
        Some(false),
    );
    opt.set_contraction(category.mode());
    let mut solver = NelderMead::new(MultiDimFn::new(problem.function));
    match solver.minimize(&opt) {
        Ok(res) => (res.fmin, res.iters, res.converged),
        Err(e) => panic!("{} failed: {}", problem.name, e),
    }
}

fn bench_iteration_caps(c: &mut Criterion) {
    let problems = setup_test_problems();

    for iterations in [10, 100, 1000] {
        let mut group = c.benchmark_group(format!("nelder_mead_{}_iterations", iterations));
        group.measurement_time(Duration::from_secs(10));
        group.sample_size(20);

        for problem in &problems {
            group.throughput(Throughput::Elements(problem.dimensions as u64));
            for category in TestType::all_types() {
                group.bench_with_input(
                    BenchmarkId::new(format!("optimization_{}", category.name()), &problem.name),
                    &category,
                    |b, &cat| {
                        b.iter(|| {
                            black_box(run_optimization_benchmark(
                                black_box(problem),
                                black_box(cat),
                                black_box(iterations),
                            ))
                        });
                    },
                );
            }
        }
        group.finish();
    }
}

fn bench_history_recording(c: &mut Criterion) {
    let mut group = c.benchmark_group("nelder_mead_history");
    group.sample_size(20);

    for record in [false, true] {
        let label = if record { "recorded" } else { "off" };
        group.bench_with_input(
            BenchmarkId::new("rosenbrock_2d", label),
            &record,
            |b, &record| {
                b.iter(|| {
                    let opt = NelderMeadOptions::new(
                        array![-1.2, 1.0],
                        Some(0.1),
                        Some(1e-12),
                        Some(2000),
                        Some(record),
                    );
                    let mut solver = NelderMead::new(MultiDimFn::new(rosenbrock_function));
                    black_box(solver.minimize(&opt).map(|r| r.history.len()))
                });
            },
        );
    }
    group.finish();
}

fn bench_multi_start(c: &mut Criterion) {
    let problems = setup_test_problems();

    let mut group = c.benchmark_group("multi_start_8_runs");
    group.measurement_time(Duration::from_secs(15));
    group.sample_size(10);

    for problem in &problems {
        group.throughput(Throughput::Elements(8));
        group.bench_with_input(
            BenchmarkId::new("multi_start", &problem.name),
            problem,
            |b, prob| {
                b.iter(|| {
                    let mut rng = StdRng::seed_from_u64(17);
                    let res = multi_start(
                        MultiDimFn::new(prob.function),
                        prob.dimensions,
                        8,
                        prob.lb,
                        prob.ub,
                        0.1,
                        1e-8,
                        1000,
                        &mut rng,
                    );
                    black_box(res.map(|r| r.fmin))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_iteration_caps,
    bench_history_recording,
    bench_multi_start
);
criterion_main!(benches);
