//! Derivative-free minimization with the Nelder-Mead simplex method.
//!
//! [`minimize::optimize`] runs a single search from a starting point and
//! returns the best vertex, its value, the iterations used and the sorted
//! simplex recorded at every iteration. [`minimize::multi_start`] repeats the
//! search from uniformly random starting points and keeps the lowest value.
//!
//! ```
//! use ndarray::prelude::*;
//! use simplexmin::prelude::*;
//!
//! let f = MultiDimFn::new(|x: &Array1<f64>| x[0] * x[0] + 2.0 * x[1] * x[1]);
//! let res = optimize(f, &array![1.0, 1.0], 0.1, 1e-8, 1000).unwrap();
//! assert!(res.converged);
//! assert!(res.fmin < 1e-6);
//! ```
//!
//! Progress is reported through [`tracing`] events; install a subscriber to see them.
pub mod error;
pub mod minimize;
pub mod prelude;
pub mod util;
