use crate::error::MinimizerError;

pub mod multi_start;
pub mod nelder_mead;
pub mod objective;
pub mod simplex;

pub use self::multi_start::{MultiStart, MultiStartOptions, MultiStartResult, RunSummary, multi_start};
pub use self::nelder_mead::{
    ContractionMode, NelderMead, NelderMeadMethod, NelderMeadOptions, NelderMeadResult, StepCounts,
    optimize,
};
pub use self::objective::{FallibleFn, MultiDimFn, ObjFn, ObjectiveError};
pub use self::simplex::{Simplex, Vertex, initialize_simplex};

pub trait Minimizer {
    type Options;
    type Result;

    /// Run the optimization described by `opt`
    fn minimize(&mut self, opt: &Self::Options) -> Result<Self::Result, MinimizerError>;
}

pub trait MinimizerResult<X, F> {
    fn xmin(&self) -> X;
    fn fmin(&self) -> F;
    fn fn_evals(&self) -> usize;
    fn iters(&self) -> usize;
    fn converged(&self) -> bool;
}
