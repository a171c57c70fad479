use crate::{
    error::{MinimizerError, Result},
    minimize::{Minimizer, MinimizerResult, ObjFn, Simplex, Vertex},
};
use ndarray::prelude::*;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Geometric transformation applied to the simplex in one iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NelderMeadMethod {
    Reflection,
    Expansion,
    /// Single-formula contraction towards the worst vertex
    Contraction,
    OutsideContraction,
    InsideContraction,
    Shrink,
}

impl fmt::Display for NelderMeadMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NelderMeadMethod::Reflection => write!(f, "Reflection"),
            NelderMeadMethod::Expansion => write!(f, "Expansion"),
            NelderMeadMethod::Contraction => write!(f, "Contraction"),
            NelderMeadMethod::OutsideContraction => write!(f, "OutsideContraction"),
            NelderMeadMethod::InsideContraction => write!(f, "InsideContraction"),
            NelderMeadMethod::Shrink => write!(f, "Shrink"),
        }
    }
}

/// How a failed reflection is contracted.
///
/// `Single` always contracts between the centroid and the worst vertex.
/// `Classic` distinguishes an outside contraction (towards the reflected
/// point, when it beat the worst vertex) from an inside contraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContractionMode {
    #[default]
    Single,
    Classic,
}

/// Number of times each transformation was applied during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepCounts {
    pub reflections: usize,
    pub expansions: usize,
    pub contractions: usize,
    pub shrinks: usize,
}

impl StepCounts {
    fn record(&mut self, method: NelderMeadMethod) {
        match method {
            NelderMeadMethod::Reflection => self.reflections += 1,
            NelderMeadMethod::Expansion => self.expansions += 1,
            NelderMeadMethod::Contraction
            | NelderMeadMethod::OutsideContraction
            | NelderMeadMethod::InsideContraction => self.contractions += 1,
            NelderMeadMethod::Shrink => self.shrinks += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.reflections + self.expansions + self.contractions + self.shrinks
    }
}

/// Result of Nelder-Mead optimization
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    pub xmin: Array1<f64>,
    pub fmin: f64,
    /// Iterations performed. Equal to the iteration cap when `converged` is false.
    pub iters: usize,
    pub fn_evals: usize,
    pub converged: bool,
    /// Spread between worst and best value of the final simplex
    pub spread: f64,
    pub steps: StepCounts,
    /// Sorted simplex at the start of every iteration, empty when recording is off
    pub history: Vec<Simplex>,
}

impl NelderMeadResult {
    pub fn history(&self) -> &[Simplex] {
        &self.history
    }

    /// `(xmin, fmin, iters, history)`
    pub fn into_parts(self) -> (Array1<f64>, f64, usize, Vec<Simplex>) {
        (self.xmin, self.fmin, self.iters, self.history)
    }
}

impl MinimizerResult<Array1<f64>, f64> for NelderMeadResult {
    fn xmin(&self) -> Array1<f64> {
        self.xmin.clone()
    }

    fn fmin(&self) -> f64 {
        self.fmin
    }

    fn fn_evals(&self) -> usize {
        self.fn_evals
    }

    fn iters(&self) -> usize {
        self.iters
    }

    fn converged(&self) -> bool {
        self.converged
    }
}

#[derive(Debug, Clone)]
pub struct NelderMeadOptions {
    initial_point: Array1<f64>,
    initial_simplex: Option<Simplex>,
    step: f64,
    tolerance: f64,
    max_iterations: usize,
    alpha: f64, // Reflection coefficient
    beta: f64,  // Contraction coefficient
    gamma: f64, // Expansion coefficient
    delta: f64, // Shrink coefficient
    contraction: ContractionMode,
    record_history: bool,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            initial_point: Array1::zeros(0),
            initial_simplex: None,
            step: 0.1,
            tolerance: 1e-6,
            max_iterations: 1000,
            alpha: 1.0,
            beta: 0.5,
            gamma: 2.0,
            delta: 0.5,
            contraction: ContractionMode::Single,
            record_history: true,
        }
    }
}

impl NelderMeadOptions {
    pub fn new(
        init: Array1<f64>,
        step: Option<f64>,
        tol: Option<f64>,
        max_iters: Option<usize>,
        record_history: Option<bool>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            initial_point: init,
            step: step.unwrap_or(defaults.step),
            tolerance: tol.unwrap_or(defaults.tolerance),
            max_iterations: max_iters.unwrap_or(defaults.max_iterations),
            record_history: record_history.unwrap_or(defaults.record_history),
            ..defaults
        }
    }

    pub fn set_initial_point(&mut self, init: Array1<f64>) {
        self.initial_point = init;
    }

    /// Start from an explicit simplex instead of the axis-aligned one built from `step`
    pub fn set_initial_simplex(&mut self, simplex: Option<Simplex>) {
        self.initial_simplex = simplex;
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

    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha;
    }

    pub fn set_beta(&mut self, beta: f64) {
        self.beta = beta;
    }

    pub fn set_gamma(&mut self, gamma: f64) {
        self.gamma = gamma;
    }

    pub fn set_delta(&mut self, delta: f64) {
        self.delta = delta;
    }

    pub fn set_contraction(&mut self, mode: ContractionMode) {
        self.contraction = mode;
    }

    pub fn set_record_history(&mut self, val: bool) {
        self.record_history = val;
    }

    pub fn initial_point(&self) -> &Array1<f64> {
        &self.initial_point
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn contraction(&self) -> ContractionMode {
        self.contraction
    }

    pub fn record_history(&self) -> bool {
        self.record_history
    }

    fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance < 0.0 {
            return Err(MinimizerError::InvalidTolerance(self.tolerance));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(MinimizerError::InvalidParameters(format!(
                "reflection coefficient must be positive, got {}",
                self.alpha
            )));
        }
        if !(self.gamma.is_finite() && self.gamma > 1.0) {
            return Err(MinimizerError::InvalidParameters(format!(
                "expansion coefficient must be greater than 1, got {}",
                self.gamma
            )));
        }
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(MinimizerError::InvalidParameters(format!(
                "contraction coefficient must be in (0, 1), got {}",
                self.beta
            )));
        }
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(MinimizerError::InvalidParameters(format!(
                "shrink coefficient must be in (0, 1), got {}",
                self.delta
            )));
        }
        Ok(())
    }

    fn build_simplex(&self) -> Result<Simplex> {
        match &self.initial_simplex {
            Some(simplex) => {
                if simplex.n() != self.initial_point.len() {
                    return Err(MinimizerError::InvalidDimension {
                        expected: self.initial_point.len(),
                        got: simplex.n(),
                    });
                }
                Ok(simplex.clone())
            }
            None => Simplex::new(&self.initial_point, self.step),
        }
    }
}

pub struct NelderMead {
    f: Box<dyn ObjFn>,
    fn_evals: usize,
}

impl NelderMead {
    pub fn new<F>(f: F) -> Self
    where
        F: ObjFn + 'static,
    {
        NelderMead::new_boxed(Box::new(f))
    }

    pub fn new_boxed(f: Box<dyn ObjFn>) -> Self {
        NelderMead { f, fn_evals: 0 }
    }

    pub fn fn_evals(&self) -> usize {
        self.fn_evals
    }

    pub fn name(&self) -> &str {
        "NelderMead"
    }

    fn calc_vertex(&mut self, point: Array1<f64>) -> Result<Vertex> {
        self.fn_evals += 1;
        Vertex::new(point, self.f.as_ref())
    }

    fn calc_obj(&mut self, x: &Array1<f64>) -> Result<f64> {
        self.fn_evals += 1;
        self.f.eval(x)
    }

    /// Evaluate every vertex of `simplex`, in row order
    pub fn evaluate(&mut self, simplex: &Simplex) -> Result<Array1<f64>> {
        let mut values = Array1::zeros(simplex.len());
        for (i, row) in simplex.vertices().rows().into_iter().enumerate() {
            values[i] = self.calc_obj(&row.to_owned())?;
        }
        Ok(values)
    }

    /// Apply one Nelder-Mead transformation to a simplex already sorted by `values`.
    ///
    /// Either the worst vertex is replaced, or every vertex but the best is
    /// shrunk towards it. `values` is kept aligned with the rows of `simplex`.
    pub fn step(
        &mut self,
        opt: &NelderMeadOptions,
        simplex: &mut Simplex,
        values: &mut Array1<f64>,
    ) -> Result<NelderMeadMethod> {
        let n = simplex.n();
        let centroid = simplex.centroid();
        let x_w = simplex.worst().to_owned();
        let f_b = values[0];
        let f_l = values[n - 1]; // Second worst
        let f_w = values[n];

        let reflected = self.calc_vertex(&centroid + &((&centroid - &x_w) * opt.alpha))?;

        if reflected.value < f_b {
            let expanded =
                self.calc_vertex(&centroid + &((&reflected.point - &centroid) * opt.gamma))?;
            if expanded.value < reflected.value {
                self.accept(simplex, values, expanded);
                return Ok(NelderMeadMethod::Expansion);
            }
            self.accept(simplex, values, reflected);
            return Ok(NelderMeadMethod::Reflection);
        }

        if reflected.value < f_l {
            self.accept(simplex, values, reflected);
            return Ok(NelderMeadMethod::Reflection);
        }

        match opt.contraction {
            ContractionMode::Single => {
                let contracted =
                    self.calc_vertex(&centroid + &((&x_w - &centroid) * opt.beta))?;
                if contracted.value < f_w {
                    self.accept(simplex, values, contracted);
                    return Ok(NelderMeadMethod::Contraction);
                }
            }
            ContractionMode::Classic => {
                if reflected.value < f_w {
                    let contracted = self
                        .calc_vertex(&centroid + &((&reflected.point - &centroid) * opt.beta))?;
                    if contracted.value <= reflected.value {
                        self.accept(simplex, values, contracted);
                        return Ok(NelderMeadMethod::OutsideContraction);
                    }
                } else {
                    let contracted =
                        self.calc_vertex(&centroid + &((&x_w - &centroid) * opt.beta))?;
                    if contracted.value < f_w {
                        self.accept(simplex, values, contracted);
                        return Ok(NelderMeadMethod::InsideContraction);
                    }
                }
            }
        }

        simplex.shrink_towards_best(opt.delta);
        for i in 1..=n {
            values[i] = self.calc_obj(&simplex.vertex(i).to_owned())?;
        }
        Ok(NelderMeadMethod::Shrink)
    }

    fn accept(&self, simplex: &mut Simplex, values: &mut Array1<f64>, vertex: Vertex) {
        let n = simplex.n();
        simplex.replace_worst(&vertex.point);
        values[n] = vertex.value;
    }

    fn minimize_opt(&mut self, opt: &NelderMeadOptions) -> Result<NelderMeadResult> {
        opt.validate()?;
        let mut simplex = opt.build_simplex()?;
        let n = simplex.n();
        self.fn_evals = 0;

        let mut values = self.evaluate(&simplex)?;
        let mut history: Vec<Simplex> = vec![];
        let mut steps = StepCounts::default();
        let mut iters = 0;
        let mut converged = false;

        while iters < opt.max_iterations {
            // Sort points from best to worst
            simplex.sort_by_values(&mut values);
            if opt.record_history {
                history.push(simplex.clone());
            }

            let spread = values[n] - values[0];
            debug!(iteration = iters, fmin = values[0], spread, "nelder-mead iteration");
            if spread < opt.tolerance {
                converged = true;
                break;
            }

            let method = self.step(opt, &mut simplex, &mut values)?;
            trace!(iteration = iters, %method, "simplex updated");
            steps.record(method);
            iters += 1;
        }

        if !converged {
            simplex.sort_by_values(&mut values);
        }
        let spread = values[n] - values[0];

        if converged {
            info!(iters, fmin = values[0], fn_evals = self.fn_evals, "nelder-mead converged");
        } else {
            warn!(
                max_iterations = opt.max_iterations,
                fmin = values[0],
                spread,
                "nelder-mead reached the iteration cap before converging"
            );
        }

        Ok(NelderMeadResult {
            xmin: simplex.best().to_owned(),
            fmin: values[0],
            iters,
            fn_evals: self.fn_evals,
            converged,
            spread,
            steps,
            history,
        })
    }
}

impl Minimizer for NelderMead {
    type Options = NelderMeadOptions;
    type Result = NelderMeadResult;

    fn minimize(&mut self, opt: &Self::Options) -> Result<Self::Result> {
        self.minimize_opt(opt)
    }
}

/// Minimize `objective` from `initial_point` with the default coefficients.
///
/// History is recorded. Hitting `max_iterations` is not an error: the result
/// has `converged == false` and `iters == max_iterations`.
pub fn optimize<F>(
    objective: F,
    initial_point: &Array1<f64>,
    step: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<NelderMeadResult>
where
    F: ObjFn + 'static,
{
    let opt = NelderMeadOptions::new(
        initial_point.to_owned(),
        Some(step),
        Some(tolerance),
        Some(max_iterations),
        Some(true),
    );
    NelderMead::new(objective).minimize(&opt)
}
