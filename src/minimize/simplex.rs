use crate::{
    error::{MinimizerError, Result},
    minimize::ObjFn,
};
use ndarray::prelude::*;
use std::cmp::Ordering;

/// A point of the search space paired with its objective value
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub point: Array1<f64>,
    pub value: f64,
}

impl Vertex {
    pub fn new(point: Array1<f64>, f: &dyn ObjFn) -> Result<Self> {
        let value = f.eval(&point)?;
        Ok(Vertex { point, value })
    }
}

/// `n + 1` vertices in `n` dimensions, one vertex per row.
///
/// Cloning copies the underlying array, so a clone is an independent snapshot
/// of the simplex at that moment.
#[derive(Debug, Clone, PartialEq)]
pub struct Simplex {
    vertices: Array2<f64>,
}

impl Simplex {
    /// Build the axis-aligned starting simplex around `initial_point`.
    ///
    /// Vertex 0 is `initial_point`; vertex `i` (for `i` in `1..=n`) is
    /// `initial_point` with coordinate `i - 1` increased by `step`.
    pub fn new(initial_point: &Array1<f64>, step: f64) -> Result<Self> {
        let n = initial_point.len();
        if n == 0 {
            return Err(MinimizerError::InvalidDimension {
                expected: 1,
                got: 0,
            });
        }
        if !(step.is_finite() && step > 0.0) {
            return Err(MinimizerError::InvalidStepSize(step));
        }
        if initial_point.iter().any(|x| !x.is_finite()) {
            return Err(MinimizerError::InvalidInitialPoint);
        }

        let vertices = Array2::from_shape_fn((n + 1, n), |(i, j)| {
            if i > 0 && i - 1 == j {
                initial_point[j] + step
            } else {
                initial_point[j]
            }
        });
        Ok(Simplex { vertices })
    }

    /// Wrap an explicit `(n + 1) x n` vertex array.
    pub fn from_vertices(vertices: Array2<f64>) -> Result<Self> {
        let (nrows, ncols) = vertices.dim();
        if ncols == 0 || nrows != ncols + 1 {
            return Err(MinimizerError::InvalidDimension {
                expected: ncols + 1,
                got: nrows,
            });
        }
        Ok(Simplex { vertices })
    }

    /// Dimension of the search space
    pub fn n(&self) -> usize {
        self.vertices.ncols()
    }

    pub fn len(&self) -> usize {
        self.vertices.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> ArrayView2<'_, f64> {
        self.vertices.view()
    }

    pub fn vertex(&self, i: usize) -> ArrayView1<'_, f64> {
        self.vertices.row(i)
    }

    pub fn best(&self) -> ArrayView1<'_, f64> {
        self.vertex(0)
    }

    pub fn worst(&self) -> ArrayView1<'_, f64> {
        self.vertex(self.n())
    }

    /// Mean of every vertex except the last (worst) one
    pub fn centroid(&self) -> Array1<f64> {
        let n = self.n();
        self.vertices
            .slice(s![..n, ..])
            .sum_axis(Axis(0))
            .mapv(|x| x / n as f64)
    }

    /// Sort vertices ascending by `values`, keeping `values` aligned.
    ///
    /// The sort is stable; NaN values compare greater than every number so
    /// they always end up at the worst end.
    pub fn sort_by_values(&mut self, values: &mut Array1<f64>) {
        let mut order: Vec<usize> = (0..values.len()).collect();
        order.sort_by(|&a, &b| cmp_values(values[a], values[b]));
        if order.iter().enumerate().all(|(i, &o)| i == o) {
            return;
        }
        let tmp_vertices = self.vertices.clone();
        let tmp_values = values.clone();
        for (i, &o) in order.iter().enumerate() {
            self.vertices.row_mut(i).assign(&tmp_vertices.row(o));
            values[i] = tmp_values[o];
        }
    }

    pub fn replace(&mut self, i: usize, point: &Array1<f64>) {
        self.vertices.row_mut(i).assign(point);
    }

    pub fn replace_worst(&mut self, point: &Array1<f64>) {
        let n = self.n();
        self.replace(n, point);
    }

    /// Move every vertex but the first towards it: `x[i] = x[0] + delta * (x[i] - x[0])`
    pub fn shrink_towards_best(&mut self, delta: f64) {
        let best = self.vertices.row(0).to_owned();
        for mut row in self.vertices.rows_mut().into_iter().skip(1) {
            row.zip_mut_with(&best, |x, &b| *x = b + delta * (*x - b));
        }
    }
}

/// Build the starting simplex for `initial_point` with edge length `step`
pub fn initialize_simplex(initial_point: &Array1<f64>, step: f64) -> Result<Simplex> {
    Simplex::new(initial_point, step)
}

fn cmp_values(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
    }
}
