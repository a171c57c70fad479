use crate::{
    error::{MinimizerError, Result},
    minimize::{
        ContractionMode, Minimizer, MinimizerResult, NelderMead, NelderMeadOptions,
        NelderMeadResult, ObjFn,
    },
};
use ndarray::prelude::*;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Uniform};
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of one restart
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub initial_point: Array1<f64>,
    pub xmin: Array1<f64>,
    pub fmin: f64,
    pub iters: usize,
    pub fn_evals: usize,
    pub converged: bool,
}

impl RunSummary {
    fn new(initial_point: Array1<f64>, res: NelderMeadResult) -> Self {
        RunSummary {
            initial_point,
            xmin: res.xmin,
            fmin: res.fmin,
            iters: res.iters,
            fn_evals: res.fn_evals,
            converged: res.converged,
        }
    }
}

/// Best point over all restarts, plus a summary of every run in run order
#[derive(Debug, Clone)]
pub struct MultiStartResult {
    pub xmin: Array1<f64>,
    pub fmin: f64,
    pub best_run: usize,
    pub runs: Vec<RunSummary>,
}

impl MultiStartResult {
    /// Keep the first run whose value is strictly lower than everything before it.
    ///
    /// When no run beats `+inf` (every value infinite or NaN) the first run is reported.
    fn from_runs(runs: Vec<RunSummary>) -> Self {
        let mut best_run = 0;
        let mut best = f64::INFINITY;
        for (i, run) in runs.iter().enumerate() {
            if run.fmin < best {
                best = run.fmin;
                best_run = i;
            }
        }
        MultiStartResult {
            xmin: runs[best_run].xmin.clone(),
            fmin: runs[best_run].fmin,
            best_run,
            runs,
        }
    }

    pub fn best(&self) -> &RunSummary {
        &self.runs[self.best_run]
    }

    /// `(xmin, fmin)`
    pub fn into_parts(self) -> (Array1<f64>, f64) {
        (self.xmin, self.fmin)
    }
}

impl MinimizerResult<Array1<f64>, f64> for MultiStartResult {
    fn xmin(&self) -> Array1<f64> {
        self.xmin.clone()
    }

    fn fmin(&self) -> f64 {
        self.fmin
    }

    fn fn_evals(&self) -> usize {
        self.runs.iter().map(|r| r.fn_evals).sum()
    }

    fn iters(&self) -> usize {
        self.runs.iter().map(|r| r.iters).sum()
    }

    fn converged(&self) -> bool {
        self.best().converged
    }
}

#[derive(Debug, Clone)]
pub struct MultiStartOptions {
    dimension: usize,
    runs: usize,
    lower_bound: f64,
    upper_bound: f64,
    step: f64,
    tolerance: f64,
    max_iterations: usize,
    contraction: ContractionMode,
    rng_seed: Option<u64>, // Optional seed for reproducibility
}

impl MultiStartOptions {
    pub fn new(
        dimension: usize,
        runs: usize,
        lb: f64,
        ub: f64,
        step: Option<f64>,
        tol: Option<f64>,
        max_iters: Option<usize>,
    ) -> Self {
        Self {
            dimension,
            runs,
            lower_bound: lb,
            upper_bound: ub,
            step: step.unwrap_or(0.1),
            tolerance: tol.unwrap_or(1e-6),
            max_iterations: max_iters.unwrap_or(1000),
            contraction: ContractionMode::Single,
            rng_seed: None,
        }
    }

    pub fn set_runs(&mut self, runs: usize) {
        self.runs = runs;
    }

    pub fn set_bounds(&mut self, lb: f64, ub: f64) {
        self.lower_bound = lb;
        self.upper_bound = ub;
    }

    pub fn set_step(&mut self, step: f64) {
        self.step = step;
    }

    pub fn set_tolerance(&mut self, tol: f64) {
        self.tolerance = tol;
    }

    pub fn set_max_iterations(&mut self, iters: usize) {
        self.max_iterations = iters;
    }

    pub fn set_contraction(&mut self, mode: ContractionMode) {
        self.contraction = mode;
    }

    pub fn set_rng_seed(&mut self, seed: Option<u64>) {
        self.rng_seed = seed;
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.lower_bound, self.upper_bound)
    }

    fn validate(&self) -> Result<()> {
        if self.dimension == 0 {
            return Err(MinimizerError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }
        if self.runs == 0 {
            return Err(MinimizerError::InvalidParameters(
                "run count must be positive".to_string(),
            ));
        }
        if !(self.lower_bound.is_finite()
            && self.upper_bound.is_finite()
            && self.lower_bound <= self.upper_bound)
        {
            return Err(MinimizerError::InvalidBounds {
                lower: self.lower_bound,
                upper: self.upper_bound,
            });
        }
        Ok(())
    }

    fn run_options(&self, initial_point: Array1<f64>) -> NelderMeadOptions {
        let mut opt = NelderMeadOptions::new(
            initial_point,
            Some(self.step),
            Some(self.tolerance),
            Some(self.max_iterations),
            Some(false),
        );
        opt.set_contraction(self.contraction);
        opt
    }
}

/// Repeats a Nelder-Mead search from uniformly random starting points
pub struct MultiStart {
    f: Box<dyn ObjFn>,
}

impl MultiStart {
    pub fn new<F>(f: F) -> Self
    where
        F: ObjFn + 'static,
    {
        MultiStart::new_boxed(Box::new(f))
    }

    pub fn new_boxed(f: Box<dyn ObjFn>) -> Self {
        MultiStart { f }
    }

    pub fn name(&self) -> &str {
        "MultiStart"
    }

    /// Run every restart with starting points drawn from `rng`.
    ///
    /// Each coordinate of each starting point is drawn independently from
    /// `Uniform[lb, ub]`. All points are drawn before any run starts, in run
    /// order, so the result depends only on the state of `rng`.
    pub fn run_with_rng<R>(
        &self,
        opt: &MultiStartOptions,
        rng: &mut R,
    ) -> Result<MultiStartResult>
    where
        R: Rng + ?Sized,
    {
        opt.validate()?;
        let uniform = Uniform::new_inclusive(opt.lower_bound, opt.upper_bound)
            .map_err(|e| MinimizerError::InvalidParameters(e.to_string()))?;
        let starts: Vec<Array1<f64>> = (0..opt.runs)
            .map(|_| Array1::from_shape_fn(opt.dimension, |_| uniform.sample(rng)))
            .collect();

        let runs = self.run_all(opt, starts)?;
        for (i, run) in runs.iter().enumerate() {
            info!(
                run = i + 1,
                fmin = run.fmin,
                iters = run.iters,
                converged = run.converged,
                "multi-start run finished"
            );
        }

        let result = MultiStartResult::from_runs(runs);
        info!(
            runs = opt.runs,
            best_run = result.best_run + 1,
            fmin = result.fmin,
            "multi-start finished"
        );
        Ok(result)
    }

    #[cfg(not(feature = "parallel"))]
    fn run_all(
        &self,
        opt: &MultiStartOptions,
        starts: Vec<Array1<f64>>,
    ) -> Result<Vec<RunSummary>> {
        let mut nm = NelderMead::new_boxed(dyn_clone::clone_box(&*self.f));
        let mut runs = Vec::with_capacity(starts.len());
        for start in starts {
            debug!(initial_point = %start, "starting multi-start run");
            let res = nm.minimize(&opt.run_options(start.clone()))?;
            runs.push(RunSummary::new(start, res));
        }
        Ok(runs)
    }

    #[cfg(feature = "parallel")]
    fn run_all(
        &self,
        opt: &MultiStartOptions,
        starts: Vec<Array1<f64>>,
    ) -> Result<Vec<RunSummary>> {
        starts
            .into_par_iter()
            .map(|start| -> Result<RunSummary> {
                debug!(initial_point = %start, "starting multi-start run");
                let mut nm = NelderMead::new_boxed(dyn_clone::clone_box(&*self.f));
                let res = nm.minimize(&opt.run_options(start.clone()))?;
                Ok(RunSummary::new(start, res))
            })
            .collect()
    }
}

impl Minimizer for MultiStart {
    type Options = MultiStartOptions;
    type Result = MultiStartResult;

    fn minimize(&mut self, opt: &Self::Options) -> Result<Self::Result> {
        let mut rng = match opt.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.run_with_rng(opt, &mut rng)
    }
}

/// Run `run_count` independent searches from random points in `[lower_bound, upper_bound]^dimension`
/// and keep the lowest value found.
#[allow(clippy::too_many_arguments)]
pub fn multi_start<F, R>(
    objective: F,
    dimension: usize,
    run_count: usize,
    lower_bound: f64,
    upper_bound: f64,
    step: f64,
    tolerance: f64,
    max_iterations: usize,
    rng: &mut R,
) -> Result<MultiStartResult>
where
    F: ObjFn + 'static,
    R: Rng + ?Sized,
{
    let opt = MultiStartOptions::new(
        dimension,
        run_count,
        lower_bound,
        upper_bound,
        Some(step),
        Some(tolerance),
        Some(max_iterations),
    );
    MultiStart::new(objective).run_with_rng(&opt, rng)
}
