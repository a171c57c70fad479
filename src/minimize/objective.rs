use crate::error::MinimizerError;
use dyn_clone::DynClone;
use ndarray::prelude::*;
use std::marker::PhantomData;

/// Error raised by a caller-supplied objective. Kept boxed and passed through unchanged.
pub type ObjectiveError = Box<dyn std::error::Error + Send + Sync + 'static>;

// Define a trait for the objective function
pub trait ObjFn: DynClone + Send + Sync {
    fn call(&self, x: &Array1<f64>) -> Result<f64, ObjectiveError>;

    /// Evaluate `x`, mapping an objective failure into [`MinimizerError::Objective`]
    fn eval(&self, x: &Array1<f64>) -> Result<f64, MinimizerError> {
        self.call(x).map_err(MinimizerError::Objective)
    }
}
dyn_clone::clone_trait_object!(ObjFn);

// Wrapper for infallible multi-dimensional functions
#[derive(Clone)]
pub struct MultiDimFn<F>(pub F)
where
    F: Fn(&Array1<f64>) -> f64 + Clone + Send + Sync;

impl<F> MultiDimFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone + Send + Sync,
{
    pub fn new(f: F) -> Self {
        MultiDimFn(f)
    }
}

impl<F> ObjFn for MultiDimFn<F>
where
    F: Fn(&Array1<f64>) -> f64 + Clone + Send + Sync,
{
    fn call(&self, x: &Array1<f64>) -> Result<f64, ObjectiveError> {
        Ok((self.0)(x))
    }
}

// Wrapper for functions that can fail
pub struct FallibleFn<F, E>
where
    F: Fn(&Array1<f64>) -> Result<f64, E> + Clone + Send + Sync,
    E: Into<ObjectiveError>,
{
    f: F,
    _err: PhantomData<fn() -> E>,
}

impl<F, E> FallibleFn<F, E>
where
    F: Fn(&Array1<f64>) -> Result<f64, E> + Clone + Send + Sync,
    E: Into<ObjectiveError>,
{
    pub fn new(f: F) -> Self {
        FallibleFn {
            f,
            _err: PhantomData,
        }
    }
}

impl<F, E> Clone for FallibleFn<F, E>
where
    F: Fn(&Array1<f64>) -> Result<f64, E> + Clone + Send + Sync,
    E: Into<ObjectiveError>,
{
    fn clone(&self) -> Self {
        FallibleFn::new(self.f.clone())
    }
}

impl<F, E> ObjFn for FallibleFn<F, E>
where
    F: Fn(&Array1<f64>) -> Result<f64, E> + Clone + Send + Sync,
    E: Into<ObjectiveError>,
{
    fn call(&self, x: &Array1<f64>) -> Result<f64, ObjectiveError> {
        (self.f)(x).map_err(Into::into)
    }
}
