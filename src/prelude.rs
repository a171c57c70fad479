//! simplexmin prelude.
//!
//! This module contains the most used types, traits and functions that you
//! can import easily as a group.
//!
//! ```
//! use simplexmin::prelude::*;
//!
//! ```

#[doc(no_inline)]
pub use crate::error::MinimizerError;

#[doc(no_inline)]
pub use crate::minimize::{
    ContractionMode, FallibleFn, Minimizer, MinimizerResult, MultiDimFn, MultiStart,
    MultiStartOptions, MultiStartResult, NelderMead, NelderMeadMethod, NelderMeadOptions,
    NelderMeadResult, ObjFn, ObjectiveError, RunSummary, Simplex, StepCounts, Vertex,
    initialize_simplex, multi_start, optimize,
};
